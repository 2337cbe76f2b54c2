//! Download module for the album import.
//!
//! This module provides:
//! - The end-to-end import workflow
//! - Per-file and per-run outcome tracking

pub mod orchestrator;
pub mod state;

pub use orchestrator::run;
pub use state::{DownloadState, FileOutcome, RunOutcome};
