//! Report rendering.
//!
//! stdout is reserved for the rendered payload; all logging goes to stderr.
//! JSON is the machine contract, the table format is for humans at a
//! terminal, and summary is a single line for scripts and status checks.

use serde::Serialize;
use smt_common::{OutputFormat, Result};

use crate::analyze::AnalysisReport;
use crate::report::SummaryTables;

/// Combined payload for JSON output.
#[derive(Serialize)]
struct Payload<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    summaries: &'a SummaryTables,
}

/// Render an analysis report in the requested format.
pub fn render_report(
    report: &AnalysisReport,
    tables: &SummaryTables,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let payload = Payload {
                report,
                summaries: tables,
            };
            Ok(serde_json::to_string_pretty(&payload)?)
        }
        OutputFormat::Table => Ok(render_tables(report, tables)),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

fn render_summary(report: &AnalysisReport) -> String {
    format!(
        "run {}: {} halts, {} replenishments across {} files ({} rows skipped, {} files skipped)",
        report.run_id,
        report.halts.len(),
        report.replenishments.len(),
        report.files.len(),
        report.skipped_rows.len(),
        report.skipped_files.len(),
    )
}

fn render_tables(report: &AnalysisReport, tables: &SummaryTables) -> String {
    let mut out = String::new();

    section(&mut out, "Halts", &event_table(&report.halts));
    section(&mut out, "Replenishments", &event_table(&report.replenishments));
    section(
        &mut out,
        "Failure Stats",
        &count_table("Failure Type", &tables.failure_types),
    );
    section(
        &mut out,
        "Halts by Product",
        &count_table("Product", &tables.halts_by_product),
    );
    section(
        &mut out,
        "Top Problematic Components",
        &count_table("Part Number", &tables.top_components),
    );
    section(
        &mut out,
        "Halts by Batch",
        &count_table("Batch", &tables.halts_by_batch),
    );
    section(&mut out, "Batch Fail Correlation", &crosstab_table(tables));

    if !report.skipped_files.is_empty() || !report.skipped_rows.is_empty() {
        let mut diag = String::new();
        for skipped in &report.skipped_files {
            diag.push_str(&format!("file {}: {}\n", skipped.path, skipped.reason));
        }
        if !report.skipped_rows.is_empty() {
            diag.push_str(&format!("{} data rows dropped\n", report.skipped_rows.len()));
        }
        section(&mut out, "Skipped Input", &diag);
    }

    out.push_str(&render_summary(report));
    out.push('\n');
    out
}

fn section(out: &mut String, title: &str, body: &str) {
    out.push_str(title);
    out.push('\n');
    if body.is_empty() {
        out.push_str("(none)\n");
    } else {
        out.push_str(body);
    }
    out.push('\n');
}

fn event_table(events: &[smt_common::EpisodeEvent]) -> String {
    if events.is_empty() {
        return String::new();
    }
    let headers = ["Product", "File", "Component", "Part", "Batch", "Main Failure"];
    let rows: Vec<Vec<String>> = events
        .iter()
        .map(|e| {
            vec![
                e.product.clone(),
                e.source_file.clone(),
                e.component_id.clone(),
                e.part_number.clone(),
                e.batch_number.clone(),
                e.main_fail_type.clone(),
            ]
        })
        .collect();
    render_grid(&headers, &rows)
}

fn count_table(key_header: &str, rows: &[crate::report::CountRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    let grid: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.key.clone(), r.count.to_string()])
        .collect();
    render_grid(&[key_header, "Count"], &grid)
}

fn crosstab_table(tables: &SummaryTables) -> String {
    if tables.batch_failure_matrix.is_empty() {
        return String::new();
    }

    // Column set is the union of failure types across all batches.
    let mut fail_types: Vec<&str> = tables
        .batch_failure_matrix
        .iter()
        .flat_map(|row| row.counts.keys().map(String::as_str))
        .collect();
    fail_types.sort_unstable();
    fail_types.dedup();

    let mut headers = vec!["Batch"];
    headers.extend(fail_types.iter().copied());

    let rows: Vec<Vec<String>> = tables
        .batch_failure_matrix
        .iter()
        .map(|row| {
            let mut cells = vec![row.batch.clone()];
            for fail in &fail_types {
                cells.push(row.counts.get(*fail).copied().unwrap_or(0).to_string());
            }
            cells
        })
        .collect();

    render_grid(&headers, &rows)
}

/// Render an aligned text grid with a dashed header separator.
fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (i, header) in headers.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", header, width = widths[i]));
    }
    out.push('\n');
    for (i, _) in headers.iter().enumerate() {
        out.push_str(&"-".repeat(widths[i]));
        out.push_str("  ");
    }
    out.push('\n');
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}
