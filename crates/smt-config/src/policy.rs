//! Detector policy configuration.
//!
//! The source logs admit two readings of "failure" and two treatments of a
//! failure run that never resolves. Both are real operational choices, so
//! both are explicit policy here rather than hard-coded defaults buried in
//! the scan loop.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::codes::FailureCodeTable;

/// Which attempts count as failures when opening an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePredicate {
    /// Outcome code must be present in the failure-code table.
    ///
    /// Codes outside the table (and 0) never open or extend an episode.
    #[default]
    KnownCodes,

    /// Any nonzero outcome code counts as a failure.
    NonZero,
}

impl FailurePredicate {
    /// Apply the predicate to one outcome code.
    pub fn is_failure(&self, code: i32, table: &FailureCodeTable) -> bool {
        match self {
            FailurePredicate::KnownCodes => table.contains(code),
            FailurePredicate::NonZero => code != 0,
        }
    }
}

impl std::fmt::Display for FailurePredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePredicate::KnownCodes => write!(f, "known-codes"),
            FailurePredicate::NonZero => write!(f, "non-zero"),
        }
    }
}

/// What to do with a failure run that reaches the end of a component's
/// history without a resolving success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Report the run as a halt: an ongoing, unresolved stoppage.
    #[default]
    EmitHalt,

    /// Drop the run from the output entirely.
    Drop,
}

impl std::fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedPolicy::EmitHalt => write!(f, "emit-halt"),
            UnresolvedPolicy::Drop => write!(f, "drop"),
        }
    }
}

/// Complete detector policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorPolicy {
    /// Failure predicate used to open and extend episodes.
    pub failure_predicate: FailurePredicate,

    /// Treatment of unresolved episodes.
    pub unresolved: UnresolvedPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_predicate_uses_table() {
        let table = FailureCodeTable::default();
        let p = FailurePredicate::KnownCodes;

        assert!(p.is_failure(4, &table));
        assert!(!p.is_failure(0, &table));
        // Nonzero but unknown: not a failure under this predicate.
        assert!(!p.is_failure(9, &table));
    }

    #[test]
    fn nonzero_predicate_ignores_table() {
        let table = FailureCodeTable::new([]);
        let p = FailurePredicate::NonZero;

        assert!(p.is_failure(9, &table));
        assert!(p.is_failure(-1, &table));
        assert!(!p.is_failure(0, &table));
    }

    #[test]
    fn defaults_are_known_codes_and_emit_halt() {
        let policy = DetectorPolicy::default();
        assert_eq!(policy.failure_predicate, FailurePredicate::KnownCodes);
        assert_eq!(policy.unresolved, UnresolvedPolicy::EmitHalt);
    }

    #[test]
    fn policy_deserializes_with_partial_fields() {
        let policy: DetectorPolicy =
            serde_json::from_str(r#"{"unresolved":"drop"}"#).unwrap();
        assert_eq!(policy.failure_predicate, FailurePredicate::KnownCodes);
        assert_eq!(policy.unresolved, UnresolvedPolicy::Drop);
    }

    #[test]
    fn policy_round_trips() {
        let policy = DetectorPolicy {
            failure_predicate: FailurePredicate::NonZero,
            unresolved: UnresolvedPolicy::Drop,
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("non-zero"));
        let back: DetectorPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }
}
