//! SMT Triage configuration loading and validation.
//!
//! This crate provides:
//! - The failure-code → meaning table (codes.json section)
//! - Detector policy: failure predicate and unresolved-episode handling
//! - Column schema mapping raw log columns to attempt fields
//! - Config resolution (explicit path → env → built-in defaults)
//!
//! All configuration is immutable after load and injected into the core,
//! never read from process-wide mutable state.

pub mod codes;
pub mod policy;
pub mod resolve;
pub mod schema;

pub use codes::FailureCodeTable;
pub use policy::{DetectorPolicy, FailurePredicate, UnresolvedPolicy};
pub use resolve::{AnalysisConfig, ConfigSource};
pub use schema::ColumnSchema;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
