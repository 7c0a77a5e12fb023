//! Error types for SMT Triage.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//!
//! Errors formatted for human consumption look like:
//! ```text
//! ✗ Configuration Error
//!   Reason: invalid failure-code table: empty
//!   Fix: Run 'smt-triage check' to validate the config file.
//! ```
//!
//! The detector itself never errors; everything here belongs to the
//! configuration and ingestion layers around it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for SMT Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors (codes table, policy, column schema).
    Config,
    /// Log-file ingestion errors.
    Ingest,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Ingest => write!(f, "ingest"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for SMT Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid failure-code table: {0}")]
    InvalidCodes(String),

    #[error("invalid detector policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid column schema: {0}")]
    InvalidSchema(String),

    // Ingestion errors (20-29)
    #[error("ingest failed for {file}: {message}")]
    Ingest { file: String, message: String },

    #[error("no input files given")]
    NoInput,

    #[error("no file could be read: all {count} input files were skipped")]
    AllFilesSkipped { count: usize },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Error codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Ingestion errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidCodes(_) => 11,
            Error::InvalidPolicy(_) => 12,
            Error::InvalidSchema(_) => 13,
            Error::Ingest { .. } => 20,
            Error::NoInput => 21,
            Error::AllFilesSkipped { .. } => 22,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidCodes(_)
            | Error::InvalidPolicy(_)
            | Error::InvalidSchema(_) => ErrorCategory::Config,

            Error::Ingest { .. } | Error::NoInput | Error::AllFilesSkipped { .. } => {
                ErrorCategory::Ingest
            }

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidCodes(_) => "Invalid Failure-Code Table",
            Error::InvalidPolicy(_) => "Invalid Detector Policy",
            Error::InvalidSchema(_) => "Invalid Column Schema",
            Error::Ingest { .. } => "Ingest Error",
            Error::NoInput => "No Input Files",
            Error::AllFilesSkipped { .. } => "All Input Files Skipped",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidCodes(_) | Error::InvalidPolicy(_)
            | Error::InvalidSchema(_) => {
                "Run 'smt-triage check' to validate the config file, or remove it to use defaults."
            }
            Error::Ingest { .. } => {
                "Check that the file is a placement log in the expected CSV layout."
            }
            Error::NoInput => "Pass one or more log files: 'smt-triage analyze <FILE>...'.",
            Error::AllFilesSkipped { .. } => {
                "Re-run with -v to see the per-file warnings explaining each skip."
            }
            Error::Io(_) => "Check file paths, permissions, and disk space, then retry.",
            Error::Json(_) => "Invalid JSON. Check the file syntax or restore from backup.",
        }
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
