use crate::report::Reporter;
use anyhow::{Context, Result};
use label_gate_core::config::{AppConfig, LookupMode};
use label_gate_core::models::display_list;
use label_gate_core::{decide, normalize, AllowList, Decision};
use providers::{EventPayload, GithubApi, GithubApiConfig, LabelSource, PullRequestRef};
use serde::Serialize;

#[derive(Debug)]
pub enum RunOutcome {
    /// The workflow was not triggered by a pull request; nothing to check.
    NotPullRequest,
    Decided {
        allowed: AllowList,
        pull_request: PullRequestRef,
        decision: Decision,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            RunOutcome::NotPullRequest => true,
            RunOutcome::Decided { decision, .. } => decision.verdict.is_success(),
        }
    }
}

/// Machine-readable view of a run, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub status: &'static str,
    pub message: String,
    pub pull_request: Option<String>,
    pub allowed: Vec<String>,
    pub matched: Vec<String>,
    pub not_matched: Vec<String>,
}

impl Summary {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        match outcome {
            RunOutcome::NotPullRequest => Summary {
                status: "skipped",
                message: "not a pull request".to_string(),
                pull_request: None,
                allowed: Vec::new(),
                matched: Vec::new(),
                not_matched: Vec::new(),
            },
            RunOutcome::Decided {
                allowed,
                pull_request,
                decision,
            } => Summary {
                status: if decision.verdict.is_success() {
                    "accepted"
                } else {
                    "rejected"
                },
                message: decision.verdict.to_string(),
                pull_request: Some(pull_request.to_string()),
                allowed: allowed.as_slice().to_vec(),
                matched: decision.result.matched.clone(),
                not_matched: decision.result.not_matched.clone(),
            },
        }
    }
}

/// Resolves the pull request from the workflow context, fetches its labels
/// and applies the one-allowed-label rule.
pub async fn run(cfg: &AppConfig, reporter: &dyn Reporter) -> Result<RunOutcome> {
    let allowed = normalize(cfg.allowed()?);
    reporter.debug(&format!("allowed labels: {}", display_list(allowed.as_slice())));

    let event = match cfg.github.event_path.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => EventPayload::from_path(path)
            .with_context(|| format!("reading event payload {path}"))?,
        None => EventPayload::default(),
    };

    let Some(pull_request) = event.pull_request_ref(cfg.github.repository.as_deref()) else {
        reporter.info("not a pull request");
        return Ok(RunOutcome::NotPullRequest);
    };

    let source: Box<dyn LabelSource> = match cfg.inputs.lookup {
        LookupMode::Event => Box::new(event),
        LookupMode::Api => {
            pull_request.owner_and_repo()?;
            Box::new(GithubApi::new(GithubApiConfig::new(
                cfg.github.api_url(),
                cfg.token(),
            )?))
        }
    };

    let decision = check(&allowed, source.as_ref(), &pull_request, reporter).await?;
    Ok(RunOutcome::Decided {
        allowed,
        pull_request,
        decision,
    })
}

/// Fetches labels for `pr` from `source` and decides on them.
pub async fn check(
    allowed: &AllowList,
    source: &dyn LabelSource,
    pr: &PullRequestRef,
    reporter: &dyn Reporter,
) -> Result<Decision> {
    let labels = source
        .labels(pr)
        .await
        .with_context(|| format!("fetching labels for {pr}"))?;
    reporter.debug(&format!("pull request labels: {}", display_list(&labels)));

    let decision = decide(allowed, labels.as_slice());
    if !labels.is_empty() {
        reporter.debug(&format!("matched {}", display_list(&decision.result.matched)));
        reporter.debug(&format!(
            "not matched {}",
            display_list(&decision.result.not_matched)
        ));
    }
    Ok(decision)
}

/// Reports the final verdict. Returns whether the run passed.
pub fn report_outcome(outcome: &RunOutcome, reporter: &dyn Reporter) -> Result<bool> {
    let RunOutcome::Decided { decision, .. } = outcome else {
        return Ok(true);
    };
    let message = decision.verdict.to_string();
    match decision.verdict.label() {
        Some(label) => {
            reporter.info(&message);
            reporter.set_output("label", label)?;
            Ok(true)
        }
        None => {
            reporter.fail(&message);
            Ok(false)
        }
    }
}
