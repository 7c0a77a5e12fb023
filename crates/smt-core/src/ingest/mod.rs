//! Placement-log ingestion.
//!
//! This module turns one raw machine export into a typed attempt stream:
//! - Latin-1 decode (machine exports are not UTF-8)
//! - Quote-aware CSV field splitting
//! - Product label from a fixed header cell
//! - Fixed-column mapping of data rows to [`Attempt`]s per [`ColumnSchema`]
//!
//! Rows missing a required identity field are dropped and recorded as
//! skipped-row diagnostics. A non-numeric or absent result code is coerced
//! to `0` (success) for compatibility with the historical logs; every such
//! coercion is counted so the policy stays visible in the output.

use serde::{Deserialize, Serialize};
use smt_common::Attempt;
use smt_config::ColumnSchema;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Product label used when the header cell is absent or empty.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// Errors that make an entire file unusable.
///
/// These never abort a multi-file analysis; the caller logs a warning and
/// continues with the remaining files.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("file has no data rows after the {0}-row preamble")]
    NoDataRows(usize),
}

/// One dropped data row with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Source file name.
    pub file: String,

    /// 1-based line number in the source file.
    pub line: usize,

    /// Why the row was dropped.
    pub reason: String,
}

/// Result of parsing one log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFile {
    /// Source file name (basename, for attribution in events).
    pub file: String,

    /// Product label from the header cell.
    pub product: String,

    /// Typed attempts in file row order.
    pub attempts: Vec<Attempt>,

    /// Non-empty data rows seen (including dropped ones).
    pub data_rows: usize,

    /// Rows dropped for missing fields or truncation.
    pub skipped: Vec<SkippedRow>,

    /// Result codes that were non-numeric or absent and coerced to success.
    pub coerced_outcomes: usize,
}

/// Decode Latin-1 bytes.
///
/// Every Latin-1 byte maps to the Unicode code point of the same value, so
/// the decode is total and allocation is the only cost.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Split one CSV line into fields.
///
/// Handles quoted fields with embedded commas and doubled-quote escapes.
/// No line spans are supported; machine exports never emit embedded
/// newlines.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Parse one placement log file into a typed attempt stream.
pub fn parse_file(path: &Path, schema: &ColumnSchema) -> Result<ParsedFile, IngestError> {
    let bytes = fs::read(path)?;
    let text = decode_latin1(&bytes);
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let lines: Vec<&str> = text.lines().collect();

    let product = lines
        .get(schema.product_row)
        .map(|line| split_csv_line(line))
        .and_then(|fields| fields.get(schema.product_col).map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

    let mut attempts = Vec::new();
    let mut skipped = Vec::new();
    let mut data_rows = 0usize;
    let mut coerced_outcomes = 0usize;

    for (line_idx, line) in lines.iter().enumerate().skip(schema.skip_rows) {
        if line.trim().is_empty() {
            continue;
        }
        data_rows += 1;
        let line_no = line_idx + 1;

        let fields = split_csv_line(line);
        if fields.len() < schema.min_columns() {
            skipped.push(SkippedRow {
                file: file.clone(),
                line: line_no,
                reason: format!(
                    "expected at least {} columns, found {}",
                    schema.min_columns(),
                    fields.len()
                ),
            });
            continue;
        }

        let part_number = fields[schema.part_number_col].trim();
        let description = fields[schema.description_col].trim();
        let reference = fields[schema.reference_col].trim();
        let batch_number = fields[schema.batch_number_col].trim();

        let missing = [
            ("part number", part_number),
            ("description", description),
            ("reference", reference),
            ("batch number", batch_number),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty());
        if let Some((field_name, _)) = missing {
            skipped.push(SkippedRow {
                file: file.clone(),
                line: line_no,
                reason: format!("missing {field_name}"),
            });
            continue;
        }

        let raw_result = fields[schema.result_col].trim();
        let outcome_code = match parse_outcome(raw_result) {
            Some(code) => code,
            None => {
                coerced_outcomes += 1;
                0
            }
        };

        attempts.push(Attempt {
            component_id: reference.to_string(),
            part_number: part_number.to_string(),
            description: description.to_string(),
            sequence_index: attempts.len(),
            batch_number: batch_number.to_string(),
            outcome_code,
        });
    }

    if data_rows == 0 {
        return Err(IngestError::NoDataRows(schema.skip_rows));
    }

    debug!(
        file = %file,
        product = %product,
        attempts = attempts.len(),
        skipped = skipped.len(),
        "parsed placement log"
    );

    Ok(ParsedFile {
        file,
        product,
        attempts,
        data_rows,
        skipped,
        coerced_outcomes,
    })
}

/// Parse a result-code field.
///
/// Machines write plain integers, but re-exported logs sometimes carry a
/// float rendering like `4.0`; both forms are accepted.
fn parse_outcome(raw: &str) -> Option<i32> {
    if let Ok(code) = raw.parse::<i32>() {
        return Some(code);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&f) => {
            Some(f as i32)
        }
        _ => None,
    }
}
