//! Label sources: where a pull request's label names come from.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod event;
pub mod github;

pub use event::EventPayload;
pub use github::{GithubApi, GithubApiConfig};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read event payload: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid event payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("invalid repository `{0}`, expected `owner/name`")]
    InvalidRepository(String),
    #[error("repository unknown: set GITHUB_REPOSITORY or use an event payload that names it")]
    MissingRepository,
    #[error("a token is required to query the GitHub API")]
    MissingToken,
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// A label as GitHub serializes it. Only `name` is used downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Identifies one pull request.
///
/// The repository is only needed when labels are looked up through the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// `owner/name`, when known.
    pub repository: Option<String>,
    pub number: u64,
}

impl PullRequestRef {
    pub fn new(number: u64) -> Self {
        Self {
            repository: None,
            number,
        }
    }

    pub fn in_repository(repository: impl Into<String>, number: u64) -> Self {
        Self {
            repository: Some(repository.into()),
            number,
        }
    }

    /// Splits the repository into owner and name.
    pub fn owner_and_repo(&self) -> Result<(&str, &str), ProviderError> {
        let repository = self
            .repository
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or(ProviderError::MissingRepository)?;
        match repository.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok((owner, repo))
            }
            _ => Err(ProviderError::InvalidRepository(repository.to_string())),
        }
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repository {
            Some(repository) => write!(f, "{}#{}", repository, self.number),
            None => write!(f, "#{}", self.number),
        }
    }
}

#[async_trait::async_trait]
pub trait LabelSource: Send + Sync {
    /// Names of the labels currently attached to `pr`, in the order reported.
    async fn labels(&self, pr: &PullRequestRef) -> Result<Vec<String>, ProviderError>;
}

pub(crate) fn label_names(labels: Vec<Label>) -> Vec<String> {
    labels.into_iter().map(|l| l.name).collect()
}
