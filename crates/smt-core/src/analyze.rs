//! Analysis orchestration.
//!
//! Ties the pipeline together: ingest each file, group attempts by board
//! position, run the episode detector per group, and accumulate the two
//! event collections (halts, replenishments) into an [`AnalysisReport`].
//!
//! Per-component scans are independent; the reference behavior processes
//! them sequentially and the report content does not depend on any
//! cross-component order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smt_common::{Attempt, EpisodeEvent, Error, EventKind, Result};
use smt_config::AnalysisConfig;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::detect::{Detector, Episode};
use crate::ingest::{self, ParsedFile, SkippedRow};

/// Per-file ingest statistics carried into the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    /// Source file name.
    pub file: String,

    /// Product label from the header cell.
    pub product: String,

    /// Non-empty data rows seen.
    pub data_rows: usize,

    /// Attempts produced.
    pub attempts: usize,

    /// Rows dropped by the builder.
    pub skipped_rows: usize,

    /// Result codes coerced to success.
    pub coerced_outcomes: usize,
}

/// A file that could not be ingested at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Path as given on the command line.
    pub path: String,

    /// Why the file was skipped.
    pub reason: String,
}

/// Complete output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique id of this run.
    pub run_id: Uuid,

    /// When the run was performed.
    pub generated_at: DateTime<Utc>,

    /// Per-file ingest statistics.
    pub files: Vec<FileSummary>,

    /// Classified halt events.
    pub halts: Vec<EpisodeEvent>,

    /// Classified replenishment events.
    pub replenishments: Vec<EpisodeEvent>,

    /// Files skipped entirely.
    pub skipped_files: Vec<SkippedFile>,

    /// Rows dropped during ingestion, across all files.
    pub skipped_rows: Vec<SkippedRow>,
}

impl AnalysisReport {
    /// Distinct product labels seen, in first-seen order.
    pub fn products(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for file in &self.files {
            if !seen.contains(&file.product.as_str()) {
                seen.push(file.product.as_str());
            }
        }
        seen
    }

    /// Restrict events and file summaries to one product label.
    ///
    /// Skip diagnostics are kept unfiltered: a skipped file has no product
    /// label to match against.
    pub fn filtered_by_product(&self, product: &str) -> AnalysisReport {
        let keep = |e: &&EpisodeEvent| e.product == product;
        AnalysisReport {
            run_id: self.run_id,
            generated_at: self.generated_at,
            files: self
                .files
                .iter()
                .filter(|f| f.product == product)
                .cloned()
                .collect(),
            halts: self.halts.iter().filter(keep).cloned().collect(),
            replenishments: self.replenishments.iter().filter(keep).cloned().collect(),
            skipped_files: self.skipped_files.clone(),
            skipped_rows: self.skipped_rows.clone(),
        }
    }
}

/// Analyzer for a fixed configuration.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run the full analysis over the given log files.
    ///
    /// Unreadable files are skipped with a warning and recorded in the
    /// report; the run fails only when there is no input at all or every
    /// file was skipped.
    pub fn run(&self, paths: &[impl AsRef<Path>]) -> Result<AnalysisReport> {
        if paths.is_empty() {
            return Err(Error::NoInput);
        }

        let mut report = AnalysisReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            files: Vec::new(),
            halts: Vec::new(),
            replenishments: Vec::new(),
            skipped_files: Vec::new(),
            skipped_rows: Vec::new(),
        };

        for path in paths {
            let path = path.as_ref();
            match ingest::parse_file(path, &self.config.schema) {
                Ok(parsed) => self.analyze_file(&parsed, &mut report),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "skipping unreadable file");
                    report.skipped_files.push(SkippedFile {
                        path: path.display().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if report.files.is_empty() {
            return Err(Error::AllFilesSkipped { count: paths.len() });
        }

        info!(
            run_id = %report.run_id,
            files = report.files.len(),
            halts = report.halts.len(),
            replenishments = report.replenishments.len(),
            "analysis complete"
        );
        Ok(report)
    }

    fn analyze_file(&self, parsed: &ParsedFile, report: &mut AnalysisReport) {
        let detector = Detector::new(self.config.policy, &self.config.codes);

        for (_, group) in group_by_component(&parsed.attempts) {
            for episode in detector.scan(&group) {
                let event = self.build_event(parsed, &group, &episode);
                match event.kind {
                    EventKind::Halt => report.halts.push(event),
                    EventKind::Replenishment => report.replenishments.push(event),
                }
            }
        }

        report.files.push(FileSummary {
            file: parsed.file.clone(),
            product: parsed.product.clone(),
            data_rows: parsed.data_rows,
            attempts: parsed.attempts.len(),
            skipped_rows: parsed.skipped.len(),
            coerced_outcomes: parsed.coerced_outcomes,
        });
        report.skipped_rows.extend(parsed.skipped.iter().cloned());
    }

    fn build_event(&self, parsed: &ParsedFile, group: &[Attempt], episode: &Episode) -> EpisodeEvent {
        let first = &group[episode.start];
        let codes = &self.config.codes;

        let fail_trace = episode
            .window_codes
            .iter()
            .map(|&code| format!("{code} → {}", codes.meaning_or_unknown(code)))
            .collect::<Vec<_>>()
            .join(", ");
        let main_fail_type = codes.meaning_or_unknown(episode.window_codes[0]);

        EpisodeEvent {
            kind: episode.kind,
            product: parsed.product.clone(),
            source_file: parsed.file.clone(),
            component_id: first.component_id.clone(),
            part_number: first.part_number.clone(),
            description: first.description.clone(),
            batch_number: episode.batch.clone(),
            fail_codes: episode.window_codes.clone(),
            fail_trace,
            main_fail_type,
        }
    }
}

/// Group attempts by board position, preserving first-seen group order and
/// sorting each group by sequence index (the detector's precondition).
pub fn group_by_component(attempts: &[Attempt]) -> Vec<(String, Vec<Attempt>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Attempt>)> = Vec::new();

    for attempt in attempts {
        let slot = match index.get(attempt.component_id.as_str()) {
            Some(&slot) => slot,
            None => {
                groups.push((attempt.component_id.clone(), Vec::new()));
                index.insert(&attempt.component_id, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].1.push(attempt.clone());
    }

    for (_, group) in &mut groups {
        group.sort_by_key(|a| a.sequence_index);
    }
    groups
}
