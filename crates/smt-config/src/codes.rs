//! Failure-code meaning table.
//!
//! Placement machines report one integer result code per attempt. Code 0 is
//! success; the codes below are the documented failure modes. The table is
//! an immutable, injected mapping so deployments with different machine
//! firmware can supply their own without process-wide side effects.

use serde::{Deserialize, Serialize};
use smt_common::{Error, Result};
use std::collections::BTreeMap;

/// Immutable mapping from failure outcome code to its named meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureCodeTable {
    codes: BTreeMap<i32, String>,
}

impl Default for FailureCodeTable {
    /// The six documented placement failure codes.
    fn default() -> Self {
        let codes = [
            (2, "Rejected by vision before electrical test"),
            (3, "Rejected by vision after electrical test"),
            (4, "Rejected by electrical test"),
            (5, "Not placed (lost after electrical test)"),
            (6, "Not taken by the machine"),
            (7, "Rejected by vision before pick-up"),
        ]
        .into_iter()
        .map(|(code, meaning)| (code, meaning.to_string()))
        .collect();

        Self { codes }
    }
}

impl FailureCodeTable {
    /// Build a table from explicit code/meaning pairs.
    pub fn new(codes: impl IntoIterator<Item = (i32, String)>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// Whether `code` is a known failure code.
    pub fn contains(&self, code: i32) -> bool {
        self.codes.contains_key(&code)
    }

    /// Named meaning of `code`, if known.
    pub fn meaning(&self, code: i32) -> Option<&str> {
        self.codes.get(&code).map(String::as_str)
    }

    /// Meaning of `code`, falling back to a generic label for codes outside
    /// the table (reachable when the nonzero predicate admits them).
    pub fn meaning_or_unknown(&self, code: i32) -> String {
        match self.meaning(code) {
            Some(meaning) => meaning.to_string(),
            None => format!("Unknown failure code {code}"),
        }
    }

    /// Iterate over `(code, meaning)` pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.codes.iter().map(|(code, meaning)| (*code, meaning.as_str()))
    }

    /// Number of known failure codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Validate table semantics.
    ///
    /// Code 0 is reserved for success and may never appear as a failure
    /// meaning; an empty table would make the known-codes predicate match
    /// nothing, which is always a configuration mistake.
    pub fn validate(&self) -> Result<()> {
        if self.codes.is_empty() {
            return Err(Error::InvalidCodes("table is empty".into()));
        }
        if self.codes.contains_key(&0) {
            return Err(Error::InvalidCodes(
                "code 0 is reserved for success and cannot be a failure code".into(),
            ));
        }
        if let Some((code, _)) = self.codes.iter().find(|(_, meaning)| meaning.trim().is_empty()) {
            return Err(Error::InvalidCodes(format!("code {code} has an empty meaning")));
        }
        Ok(())
    }
}
