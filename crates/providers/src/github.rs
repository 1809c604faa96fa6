use crate::{label_names, Label, LabelSource, ProviderError, PullRequestRef};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

#[derive(Clone)]
pub struct GithubApiConfig {
    pub base_url: String,
    pub token: String,
    pub user_agent: String,
}

impl GithubApiConfig {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Result<Self, ProviderError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::MissingToken)?;
        Ok(Self {
            base_url: base_url.into(),
            token: token.to_string(),
            user_agent: concat!("label-gate/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }
}

/// Reads labels from `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Clone)]
pub struct GithubApi {
    client: Client,
    cfg: Arc<GithubApiConfig>,
}

impl GithubApi {
    pub fn new(cfg: GithubApiConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }

    fn pull_url(&self, pr: &PullRequestRef) -> Result<String, ProviderError> {
        let (owner, repo) = pr.owner_and_repo()?;
        Ok(format!(
            "{}/repos/{}/{}/pulls/{}",
            self.cfg.base_url.trim_end_matches('/'),
            owner,
            repo,
            pr.number
        ))
    }
}

#[derive(Deserialize)]
struct PullApiResponse {
    #[serde(default)]
    labels: Vec<Label>,
}

#[async_trait::async_trait]
impl LabelSource for GithubApi {
    async fn labels(&self, pr: &PullRequestRef) -> Result<Vec<String>, ProviderError> {
        let url = self.pull_url(pr)?;
        debug!(%url, "fetching pull request");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.cfg.token)
            .header(ACCEPT, ACCEPT_JSON)
            .header(USER_AGENT, &self.cfg.user_agent)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::RequestFailed(format!(
                "GET {url} returned {status}: {}",
                body.trim()
            )));
        }

        let parsed: PullApiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        Ok(label_names(parsed.labels))
    }
}
