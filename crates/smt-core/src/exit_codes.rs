//! Exit codes for the smt-triage CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing. A run that finds zero events is still a success; the event
//! counts are in the payload.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use smt_common::{Error, ErrorCategory};

/// Exit codes for smt-triage operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean run (including runs with zero detected events)
    Success = 0,

    /// Invalid or unreadable configuration
    ConfigError = 10,

    /// Input files missing or unusable
    IngestError = 11,

    /// I/O failure outside ingestion
    IoError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Whether this exit code indicates success.
    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Ingest => ExitCode::IngestError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}
