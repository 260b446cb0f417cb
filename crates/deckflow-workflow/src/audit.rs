//! Fail-closed classifier for audit judgments.
//!
//! The audit call asks the model for `APPROVE` or `REJECT`. Its answer is
//! free text, so the verdict is a keyword heuristic. Anything that is not a
//! clear, unnegated approval is treated as a rejection by the caller.

use serde::{Deserialize, Serialize};

const REJECT_KEYWORD: &str = "REJECT";
const APPROVE_WORDS: &[&str] = &["APPROVE", "APPROVED"];
const NEGATION_WORDS: &[&str] = &["NOT", "NO", "NEVER", "DON'T", "CANNOT"];

/// Outcome of classifying an audit response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditVerdict {
    Approve,
    Reject,
    /// Could not be read either way.
    Ambiguous,
}

impl AuditVerdict {
    /// Only a clear approval passes.
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approve)
    }
}

/// Classify a free-text audit response.
///
/// - any case-insensitive occurrence of `REJECT` is a rejection
/// - a standalone `APPROVE`/`APPROVED` with no negation word is an approval
/// - everything else, including empty text, is ambiguous
pub fn classify_audit(response: &str) -> AuditVerdict {
    let upper = response.to_uppercase().replace('\u{2019}', "'");

    if upper.contains(REJECT_KEYWORD) {
        return AuditVerdict::Reject;
    }

    let words: Vec<&str> = upper
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .collect();

    let approves = words.iter().any(|w| APPROVE_WORDS.contains(w));
    let negated = words.iter().any(|w| NEGATION_WORDS.contains(w));

    if approves && !negated {
        AuditVerdict::Approve
    } else {
        AuditVerdict::Ambiguous
    }
}
