use crate::{label_names, Label, LabelSource, ProviderError, PullRequestRef};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The webhook payload of the event that triggered the workflow run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequest>,
    #[serde(default)]
    repository: Option<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
struct PullRequest {
    number: u64,
    #[serde(default)]
    labels: Option<Vec<Label>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Repository {
    full_name: String,
}

impl EventPayload {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    pub fn parse(json: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// The pull request this event is about, or `None` for any other event.
    ///
    /// The repository comes from the payload, falling back to `repository`
    /// (usually `GITHUB_REPOSITORY`). It may stay unknown; only API lookups
    /// need it.
    pub fn pull_request_ref(&self, repository: Option<&str>) -> Option<PullRequestRef> {
        let pr = self.pull_request.as_ref()?;
        let full_name = self
            .repository
            .as_ref()
            .map(|r| r.full_name.as_str())
            .or(repository)
            .filter(|r| !r.is_empty());
        Some(PullRequestRef {
            repository: full_name.map(str::to_string),
            number: pr.number,
        })
    }

    /// Label names embedded in the payload; empty when the event carries none.
    pub fn label_names(&self) -> Vec<String> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.labels.clone())
            .map(label_names)
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl LabelSource for EventPayload {
    async fn labels(&self, _pr: &PullRequestRef) -> Result<Vec<String>, ProviderError> {
        Ok(self.label_names())
    }
}
