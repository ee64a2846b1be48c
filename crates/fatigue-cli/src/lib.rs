//! # fatigue-cli: CLI Tool for the Fatigue-Compliance Stack
//!
//! Provides the `fatigue` command-line interface over the rule engine,
//! the exception workflow, and the schedule gate.
//!
//! ## Subcommands
//!
//! - `fatigue evaluate`: Violations for a candidate shift.
//! - `fatigue dry-run`: Feasibility verdict for a candidate shift.
//! - `fatigue exception`: Validate a request or walk the workflow.
//! - `fatigue schedule`: Commit a candidate through the gate.
//! - `fatigue policy`: Print the effective policy.
//!
//! Results are written to stdout as JSON; logs go to stderr.
//!
//! ```bash
//! fatigue evaluate --candidate shift.json --history history.json --outage
//! fatigue --policy site.yaml dry-run --candidate shift.json
//! fatigue exception validate --request request.json
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: clean / complete / committed.
//! - `1`: input or configuration error.
//! - `2`: violations found, request incomplete, or shift not admitted.

pub mod config;
pub mod evaluate;
pub mod exception;
pub mod schedule;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use fatigue_core::Shift;

/// Exit code for a successful run with nothing to report.
pub const EXIT_OK: u8 = 0;

/// Exit code when the run completed but found a problem with the input
/// shift or request.
pub const EXIT_FINDINGS: u8 = 2;

/// Read and decode a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load a shift history file, or an empty history when none is given.
pub fn read_history(path: Option<&Path>) -> Result<Vec<Shift>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}

/// Write a value to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}
