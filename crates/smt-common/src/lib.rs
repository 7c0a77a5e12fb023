//! SMT Triage common types and errors.
//!
//! This crate provides foundational types shared across smt-triage modules:
//! - Placement attempt and episode event types
//! - Common error types with stable codes
//! - Output format specifications

pub mod error;
pub mod output;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use output::OutputFormat;
pub use types::{Attempt, EpisodeEvent, EventKind};
