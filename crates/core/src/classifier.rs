use crate::allowlist::AllowList;
use crate::models::{ClassificationResult, Verdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    pub result: ClassificationResult,
}

/// Splits observed labels into those present in the allow-list and the rest.
///
/// Comparison is case-insensitive and exact; observed names are not trimmed.
/// Input order is preserved on both sides.
pub fn classify<S: AsRef<str>>(allow: &AllowList, observed: &[S]) -> ClassificationResult {
    let mut result = ClassificationResult::default();
    for label in observed {
        let label = label.as_ref();
        if allow.contains(label) {
            result.matched.push(label.to_string());
        } else {
            result.not_matched.push(label.to_string());
        }
    }
    result
}

/// Applies the acceptance rule: exactly one observed label must be allowed.
///
/// An empty label set is reported as [`Verdict::NoLabels`] before any
/// classification happens.
pub fn decide<S: AsRef<str>>(allow: &AllowList, observed: &[S]) -> Decision {
    if observed.is_empty() {
        return Decision {
            verdict: Verdict::NoLabels,
            result: ClassificationResult::default(),
        };
    }

    let result = classify(allow, observed);

    let verdict = match result.matched.as_slice() {
        [] => Verdict::NoMatch,
        [single] => Verdict::Accepted(single.clone()),
        many => Verdict::MultipleMatches(many.to_vec()),
    };
    Decision { verdict, result }
}
