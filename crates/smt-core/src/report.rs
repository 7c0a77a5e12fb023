//! Summary tables over the classified event set.
//!
//! These are the aggregate views operators act on: which failure modes
//! dominate, which products and components halt the most, and how halts
//! distribute across material batches. All tables are computed over the
//! halt set; replenishments are routine material changes and would only
//! add noise here.

use serde::{Deserialize, Serialize};
use smt_common::EpisodeEvent;
use std::collections::BTreeMap;

/// One key/count row of a summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub key: String,
    pub count: usize,
}

/// One row of the batch × failure-type cross-tabulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosstabRow {
    /// Batch number.
    pub batch: String,

    /// Halt count per failure meaning.
    pub counts: BTreeMap<String, usize>,
}

/// All summary tables for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryTables {
    /// Halts per dominant failure meaning.
    pub failure_types: Vec<CountRow>,

    /// Halts per product label.
    pub halts_by_product: Vec<CountRow>,

    /// Halts per part number (the problematic components).
    pub top_components: Vec<CountRow>,

    /// Halts per batch number.
    pub halts_by_batch: Vec<CountRow>,

    /// Batch × failure-type correlation.
    pub batch_failure_matrix: Vec<CrosstabRow>,
}

impl SummaryTables {
    /// Compute all tables from the halt set.
    pub fn from_halts(halts: &[EpisodeEvent]) -> Self {
        Self {
            failure_types: count_by(halts, |e| e.main_fail_type.as_str()),
            halts_by_product: count_by(halts, |e| e.product.as_str()),
            top_components: count_by(halts, |e| e.part_number.as_str()),
            halts_by_batch: count_by(halts, |e| e.batch_number.as_str()),
            batch_failure_matrix: crosstab(halts),
        }
    }
}

/// Count events per key, ordered by count descending then key ascending so
/// the output is deterministic across runs.
fn count_by<'a>(events: &'a [EpisodeEvent], key: impl Fn(&'a EpisodeEvent) -> &'a str) -> Vec<CountRow> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(key(event)).or_default() += 1;
    }

    let mut rows: Vec<CountRow> = counts
        .into_iter()
        .map(|(key, count)| CountRow {
            key: key.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    rows
}

/// Cross-tabulate halts by batch and failure meaning, batches ascending.
fn crosstab(events: &[EpisodeEvent]) -> Vec<CrosstabRow> {
    let mut matrix: BTreeMap<&str, BTreeMap<String, usize>> = BTreeMap::new();
    for event in events {
        *matrix
            .entry(&event.batch_number)
            .or_default()
            .entry(event.main_fail_type.clone())
            .or_default() += 1;
    }

    matrix
        .into_iter()
        .map(|(batch, counts)| CrosstabRow {
            batch: batch.to_string(),
            counts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smt_common::EventKind;

    fn halt(product: &str, part: &str, batch: &str, fail: &str) -> EpisodeEvent {
        EpisodeEvent {
            kind: EventKind::Halt,
            product: product.into(),
            source_file: "log.csv".into(),
            component_id: "R1".into(),
            part_number: part.into(),
            description: "CAP".into(),
            batch_number: batch.into(),
            fail_codes: vec![4, 4, 4],
            fail_trace: String::new(),
            main_fail_type: fail.into(),
        }
    }

    #[test]
    fn counts_ordered_by_count_then_key() {
        let halts = vec![
            halt("A", "PN-2", "B1", "vision"),
            halt("A", "PN-1", "B1", "vision"),
            halt("A", "PN-2", "B2", "electrical"),
        ];

        let tables = SummaryTables::from_halts(&halts);
        assert_eq!(tables.top_components[0].key, "PN-2");
        assert_eq!(tables.top_components[0].count, 2);
        assert_eq!(tables.top_components[1].key, "PN-1");

        // Equal counts fall back to key order.
        assert_eq!(tables.failure_types[0].key, "vision");
        assert_eq!(tables.failure_types[1].key, "electrical");
        assert_eq!(tables.failure_types[1].count, 1);
    }

    #[test]
    fn crosstab_groups_by_batch() {
        let halts = vec![
            halt("A", "PN-1", "B1", "vision"),
            halt("A", "PN-1", "B1", "electrical"),
            halt("A", "PN-1", "B1", "vision"),
            halt("A", "PN-1", "B2", "vision"),
        ];

        let tables = SummaryTables::from_halts(&halts);
        assert_eq!(tables.batch_failure_matrix.len(), 2);

        let b1 = &tables.batch_failure_matrix[0];
        assert_eq!(b1.batch, "B1");
        assert_eq!(b1.counts["vision"], 2);
        assert_eq!(b1.counts["electrical"], 1);
    }

    #[test]
    fn empty_halt_set_yields_empty_tables() {
        let tables = SummaryTables::from_halts(&[]);
        assert!(tables.failure_types.is_empty());
        assert!(tables.batch_failure_matrix.is_empty());
    }
}
