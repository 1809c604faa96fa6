use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator-configured label names, trimmed and with blank entries removed.
///
/// Duplicates are kept; only membership is ever tested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<String>);

impl AllowList {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Case-insensitive exact membership test.
    pub fn contains(&self, label: &str) -> bool {
        let needle = label.to_lowercase();
        self.0.iter().any(|allowed| allowed.to_lowercase() == needle)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Parses a newline-delimited allow-list.
///
/// Each line is trimmed and blank lines are dropped. Order and case are kept;
/// case folding only happens when comparing.
pub fn normalize(raw: &str) -> AllowList {
    AllowList(
        raw.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_lines() {
        let list = normalize("  Bug \n\nFeature\n");
        assert_eq!(list.as_slice(), ["Bug", "Feature"]);
    }

    #[test]
    fn handles_crlf_input() {
        let list = normalize("bug\r\nfeature\r\n");
        assert_eq!(list.as_slice(), ["bug", "feature"]);
    }

    #[test]
    fn blank_input_gives_empty_list() {
        assert!(normalize("").is_empty());
        assert!(normalize(" \n\t\n  ").is_empty());
    }

    #[test]
    fn keeps_duplicates_and_order() {
        let list = normalize("b\na\nb");
        assert_eq!(list.as_slice(), ["b", "a", "b"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn every_entry_is_a_trimmed_input_line() {
        let raw = "\n x \n\n  y\nz  \n   \n";
        let lines: Vec<&str> = raw.split('\n').map(str::trim).collect();
        for entry in normalize(raw).iter() {
            assert!(!entry.is_empty());
            assert!(lines.contains(&entry.as_str()));
        }
    }

    #[test]
    fn contains_ignores_case() {
        let list = AllowList::new(["Bug"]);
        assert!(list.contains("bug"));
        assert!(list.contains("BUG"));
        assert!(!list.contains("bugs"));
        assert!(!list.contains(" bug"));
    }

    #[test]
    fn displays_comma_separated() {
        assert_eq!(normalize("bug\nfeature").to_string(), "bug, feature");
    }
}
