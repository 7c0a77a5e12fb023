//! Domain types for placement-log analysis.
//!
//! These types represent the normalized input to the episode detector
//! (`Attempt`) and its classified output (`EpisodeEvent`), designed for
//! serialization into report payloads.

use serde::{Deserialize, Serialize};

/// One recorded placement try for one board position.
///
/// Attempts are read-only facts for the duration of an analysis run.
/// Within one component's history, `sequence_index` values are unique and
/// ascending; the detector requires the caller to sort by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Identity of the board position (the grouping key).
    ///
    /// Distinct from `part_number`: the same catalog part may be placed at
    /// many positions, and each position has its own failure history.
    pub component_id: String,

    /// Catalog identity of the component placed.
    pub part_number: String,

    /// Human-readable component description.
    pub description: String,

    /// Strictly increasing key establishing attempt order within a
    /// component's history (data-row ordinal in the source file).
    pub sequence_index: usize,

    /// Identifier of the material batch/reel in use at this attempt.
    pub batch_number: String,

    /// Integer result code; `0` is success, nonzero is a failure.
    pub outcome_code: i32,
}

impl Attempt {
    /// Whether this attempt placed the component successfully.
    pub fn is_success(&self) -> bool {
        self.outcome_code == 0
    }

    /// Batch identifier with surrounding whitespace removed.
    ///
    /// All batch comparisons go through this; raw log fields are padded
    /// inconsistently and must never cause a false replenishment.
    pub fn batch_trimmed(&self) -> &str {
        self.batch_number.trim()
    }
}

/// Classification of a failure episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Episode resolved (or unresolved) on the same batch that was failing.
    /// Signals a real production issue requiring intervention.
    Halt,

    /// Episode resolved by a change of batch. Signals exhausted or
    /// defective material, not a systemic fault.
    Replenishment,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Halt => write!(f, "halt"),
            EventKind::Replenishment => write!(f, "replenishment"),
        }
    }
}

/// One classified failure episode, the permanent output of an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    /// Halt or replenishment.
    pub kind: EventKind,

    /// Product label of the source file (header cell).
    pub product: String,

    /// Source file name, for traceability back to the raw log.
    pub source_file: String,

    /// Board position the episode occurred at.
    pub component_id: String,

    /// Catalog part number, carried for reporting.
    pub part_number: String,

    /// Component description, carried for reporting.
    pub description: String,

    /// Batch active during the failure run (trimmed).
    pub batch_number: String,

    /// Outcome codes of the 3-attempt window that opened the episode.
    pub fail_codes: Vec<i32>,

    /// Formatted trace of `fail_codes` with their meanings.
    pub fail_trace: String,

    /// Named meaning of the first failing attempt in the run.
    pub main_fail_type: String,
}
