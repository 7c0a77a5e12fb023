//! SMT Triage Core Library
//!
//! This library provides the core functionality for placement-log triage:
//! - Log-file ingestion into typed placement attempts
//! - Failure-episode detection and halt/replenishment classification
//! - Analysis orchestration across files and components
//! - Summary reporting and output rendering
//!
//! The binary entry point is in `main.rs`.

pub mod analyze;
pub mod detect;
pub mod exit_codes;
pub mod ingest;
pub mod logging;
pub mod render;
pub mod report;
