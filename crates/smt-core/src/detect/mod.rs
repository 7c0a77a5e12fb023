//! Failure-episode detection and classification.
//!
//! Given one component's placement attempts in sequence order, the detector
//! finds contiguous failure episodes, locates each episode's resolution (the
//! next successful attempt), and classifies it:
//!
//! - **Halt**: the resolving attempt used the same batch that was failing,
//!   or the episode never resolved. The material kept failing.
//! - **Replenishment**: the resolving attempt used a different batch. The
//!   failures stopped because the batch was swapped.
//!
//! The scan is a single left-to-right pass with a 3-attempt lookahead
//! window, expressed as an explicit two-state machine so the cursor-advance
//! and episode-collapse rules are auditable in isolation:
//!
//! ```text
//! Scanning --(window of 3 failures at cursor)--> InEpisode
//! InEpisode --(classify, consume run + resolution)--> Scanning
//! ```
//!
//! The detector is a pure function of its inputs: no I/O, no shared state,
//! no error paths. Any well-formed attempt slice (including the empty one)
//! produces a result.

use serde::{Deserialize, Serialize};
use smt_common::{Attempt, EventKind};
use smt_config::{DetectorPolicy, FailureCodeTable, UnresolvedPolicy};

/// Number of consecutive failures that opens an episode.
pub const MIN_RUN: usize = 3;

/// One detected failure episode with its consumed index range.
///
/// `start..=end` is the range of attempt indices this episode consumed;
/// consumed indices are never re-examined as the start of another episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Index of the first failing attempt.
    pub start: usize,

    /// Last consumed index: the resolving attempt if resolved, otherwise
    /// the last failing attempt of the run.
    pub end: usize,

    /// Batch active at the episode's first failing attempt (trimmed).
    pub batch: String,

    /// Outcome codes of the 3-attempt window that opened the episode.
    pub window_codes: Vec<i32>,

    /// Index of the resolving attempt, if any.
    pub resolved_at: Option<usize>,

    /// Halt or replenishment.
    pub kind: EventKind,
}

/// Scan state. `InEpisode` records where the failing window was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    InEpisode { start: usize },
}

/// Episode detector for one component's attempt sequence.
///
/// Holds the injected policy and failure-code table; `scan` may be called
/// any number of times and carries no state between calls.
#[derive(Debug, Clone)]
pub struct Detector<'a> {
    policy: DetectorPolicy,
    codes: &'a FailureCodeTable,
}

impl<'a> Detector<'a> {
    pub fn new(policy: DetectorPolicy, codes: &'a FailureCodeTable) -> Self {
        Self { policy, codes }
    }

    fn is_failure(&self, code: i32) -> bool {
        self.policy.failure_predicate.is_failure(code, self.codes)
    }

    /// Scan one component's attempts, sorted ascending by sequence index.
    ///
    /// Out-of-order input is the caller's bug; the detector trusts the
    /// order it is given.
    pub fn scan(&self, attempts: &[Attempt]) -> Vec<Episode> {
        let n = attempts.len();
        let mut episodes = Vec::new();
        let mut cursor = 0usize;
        let mut state = ScanState::Scanning;

        loop {
            match state {
                ScanState::Scanning => {
                    if cursor + MIN_RUN > n {
                        break;
                    }
                    let window = &attempts[cursor..cursor + MIN_RUN];
                    if window.iter().all(|a| self.is_failure(a.outcome_code)) {
                        state = ScanState::InEpisode { start: cursor };
                    } else {
                        cursor += 1;
                    }
                }
                ScanState::InEpisode { start } => {
                    let batch = attempts[start].batch_trimmed().to_string();
                    let window_codes: Vec<i32> = attempts[start..start + MIN_RUN]
                        .iter()
                        .map(|a| a.outcome_code)
                        .collect();

                    // Lookahead for the resolution begins after the window.
                    let resolved_at = attempts[start + MIN_RUN..]
                        .iter()
                        .position(Attempt::is_success)
                        .map(|offset| start + MIN_RUN + offset);

                    match resolved_at {
                        Some(resolution) => {
                            let kind = if attempts[resolution].batch_trimmed() != batch {
                                EventKind::Replenishment
                            } else {
                                EventKind::Halt
                            };
                            episodes.push(Episode {
                                start,
                                end: resolution,
                                batch,
                                window_codes,
                                resolved_at: Some(resolution),
                                kind,
                            });
                            // The whole failing run plus its resolution is
                            // consumed; nothing in between is re-scanned.
                            cursor = resolution + 1;
                        }
                        None => {
                            // No success anywhere after the window. Consume
                            // the maximal failing run so a long unresolved
                            // tail yields at most one episode.
                            let mut end = start + MIN_RUN - 1;
                            while end + 1 < n && self.is_failure(attempts[end + 1].outcome_code) {
                                end += 1;
                            }
                            if self.policy.unresolved == UnresolvedPolicy::EmitHalt {
                                episodes.push(Episode {
                                    start,
                                    end,
                                    batch,
                                    window_codes,
                                    resolved_at: None,
                                    kind: EventKind::Halt,
                                });
                            }
                            cursor = end + 1;
                        }
                    }
                    state = ScanState::Scanning;
                }
            }
        }

        episodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smt_config::FailurePredicate;

    fn attempts(rows: &[(i32, &str)]) -> Vec<Attempt> {
        rows.iter()
            .enumerate()
            .map(|(i, (code, batch))| Attempt {
                component_id: "R101".into(),
                part_number: "PN-1".into(),
                description: "RES 10K".into(),
                sequence_index: i,
                batch_number: (*batch).into(),
                outcome_code: *code,
            })
            .collect()
    }

    fn detector(codes: &FailureCodeTable) -> Detector<'_> {
        Detector::new(DetectorPolicy::default(), codes)
    }

    const F: i32 = 4; // electrical reject
    const P: i32 = 0;

    #[test]
    fn three_fails_then_new_batch_is_replenishment() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[(F, "B1"), (F, "B1"), (F, "B1"), (P, "B2")]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].kind, EventKind::Replenishment);
        assert_eq!(episodes[0].batch, "B1");
        assert_eq!(episodes[0].resolved_at, Some(3));
        assert_eq!(episodes[0].end, 3);
    }

    #[test]
    fn three_fails_then_same_batch_is_halt() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[(F, "B1"), (F, "B1"), (F, "B1"), (P, "B1")]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].kind, EventKind::Halt);
    }

    #[test]
    fn interrupted_run_is_no_episode() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[(F, "B1"), (F, "B1"), (P, "B1"), (F, "B1")]);

        assert!(detector(&codes).scan(&seq).is_empty());
    }

    #[test]
    fn long_run_collapses_into_one_episode() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (P, "B2"),
        ]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].kind, EventKind::Replenishment);
        assert_eq!(episodes[0].batch, "B1");
        assert_eq!(episodes[0].end, 5);
    }

    #[test]
    fn unresolved_run_emits_terminal_halt_by_default() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[(F, "B1"), (F, "B1"), (F, "B1")]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].kind, EventKind::Halt);
        assert_eq!(episodes[0].resolved_at, None);
        assert_eq!(episodes[0].end, 2);
    }

    #[test]
    fn unresolved_run_dropped_under_drop_policy() {
        let codes = FailureCodeTable::default();
        let policy = DetectorPolicy {
            unresolved: UnresolvedPolicy::Drop,
            ..Default::default()
        };
        let seq = attempts(&[(F, "B1"), (F, "B1"), (F, "B1")]);

        assert!(Detector::new(policy, &codes).scan(&seq).is_empty());
    }

    #[test]
    fn two_independent_episodes_in_one_sequence() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (P, "B1"), // resolves first episode on same batch: halt
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (P, "B2"), // resolves second on a new batch: replenishment
        ]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].kind, EventKind::Halt);
        assert_eq!(episodes[1].kind, EventKind::Replenishment);
        // Consumed ranges do not overlap.
        assert!(episodes[0].end < episodes[1].start);
    }

    #[test]
    fn episode_may_start_at_any_offset() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[(P, "B1"), (F, "B1"), (F, "B1"), (F, "B1"), (P, "B2")]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].start, 1);
        assert_eq!(episodes[0].kind, EventKind::Replenishment);
    }

    #[test]
    fn batch_whitespace_never_causes_false_replenishment() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[(F, " B1 "), (F, "B1"), (F, "B1"), (P, "B1  ")]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].kind, EventKind::Halt);
        assert_eq!(episodes[0].batch, "B1");
    }

    #[test]
    fn window_codes_are_the_opening_three() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[(2, "B1"), (4, "B1"), (6, "B1"), (7, "B1"), (P, "B1")]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].window_codes, vec![2, 4, 6]);
    }

    #[test]
    fn unknown_code_breaks_run_under_known_codes_predicate() {
        let codes = FailureCodeTable::default();
        // Code 9 is not in the table: it neither opens nor extends a run.
        let seq = attempts(&[(F, "B1"), (F, "B1"), (9, "B1"), (F, "B1"), (P, "B2")]);

        assert!(detector(&codes).scan(&seq).is_empty());
    }

    #[test]
    fn unknown_code_counts_under_nonzero_predicate() {
        let codes = FailureCodeTable::default();
        let policy = DetectorPolicy {
            failure_predicate: FailurePredicate::NonZero,
            ..Default::default()
        };
        let seq = attempts(&[(F, "B1"), (F, "B1"), (9, "B1"), (P, "B2")]);

        let episodes = Detector::new(policy, &codes).scan(&seq);
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].kind, EventKind::Replenishment);
    }

    #[test]
    fn separate_unresolved_runs_each_emit_one_halt() {
        let codes = FailureCodeTable::default();
        // Two maximal failing runs separated by an unknown code, with no
        // success anywhere: one terminal halt per run, never more.
        let seq = attempts(&[
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (9, "B1"),
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
        ]);

        let episodes = detector(&codes).scan(&seq);
        assert_eq!(episodes.len(), 2);
        assert!(episodes.iter().all(|e| e.kind == EventKind::Halt));
        assert!(episodes.iter().all(|e| e.resolved_at.is_none()));
    }

    #[test]
    fn empty_and_short_sequences_yield_nothing() {
        let codes = FailureCodeTable::default();
        let d = detector(&codes);

        assert!(d.scan(&[]).is_empty());
        assert!(d.scan(&attempts(&[(F, "B1")])).is_empty());
        assert!(d.scan(&attempts(&[(F, "B1"), (F, "B1")])).is_empty());
    }

    #[test]
    fn scan_is_idempotent() {
        let codes = FailureCodeTable::default();
        let seq = attempts(&[
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (P, "B2"),
            (F, "B2"),
            (F, "B2"),
            (F, "B2"),
        ]);

        let d = detector(&codes);
        assert_eq!(d.scan(&seq), d.scan(&seq));
    }

    #[test]
    fn event_count_bounded_by_third_of_length() {
        let codes = FailureCodeTable::default();
        // Worst case for event density: back-to-back unresolved-free runs.
        let seq = attempts(&[
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (P, "B1"),
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
            (P, "B1"),
            (F, "B1"),
            (F, "B1"),
            (F, "B1"),
        ]);

        let episodes = detector(&codes).scan(&seq);
        assert!(episodes.len() <= seq.len() / 3);
    }
}
