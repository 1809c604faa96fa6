use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub matched: Vec<String>,
    pub not_matched: Vec<String>,
}

impl ClassificationResult {
    /// True iff exactly one label matched the allow-list.
    pub fn accepted(&self) -> bool {
        self.matched.len() == 1
    }
}

/// Outcome of the acceptance rule for one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "labels", rename_all = "snake_case")]
pub enum Verdict {
    NoLabels,
    NoMatch,
    MultipleMatches(Vec<String>),
    Accepted(String),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    /// The single matched label, when accepted.
    pub fn label(&self) -> Option<&str> {
        match self {
            Verdict::Accepted(label) => Some(label.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NoLabels => f.write_str("pull request has no labels"),
            Verdict::NoMatch => f.write_str("expecting only one matched label, but found none"),
            Verdict::MultipleMatches(labels) => write!(
                f,
                "expecting only one matched label, but found {}",
                labels.join(", ")
            ),
            Verdict::Accepted(label) => write!(f, "found exactly one allowed label {label}"),
        }
    }
}

/// Renders a label list for diagnostics, `none` when empty.
pub fn display_list(labels: &[String]) -> String {
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}
