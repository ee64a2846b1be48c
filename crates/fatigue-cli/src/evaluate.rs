//! # Evaluate and Dry-Run Subcommands
//!
//! Both read a candidate shift and an optional history file, run the
//! same engine, and differ only in what they print:
//!
//! - `evaluate` prints the violation list.
//! - `dry-run` prints the feasibility verdict with its violations.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use fatigue_core::Shift;
use fatigue_rules::{ComplianceEngine, Verdict};

use crate::{print_json, read_history, read_json, EXIT_FINDINGS, EXIT_OK};

/// Arguments shared by `fatigue evaluate` and `fatigue dry-run`.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// JSON file holding the candidate shift.
    #[arg(long)]
    pub candidate: PathBuf,

    /// JSON file holding the operator's shift history (an array).
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Apply outage limits.
    #[arg(long)]
    pub outage: bool,
}

/// Load the candidate and history named by `args`.
pub fn load_inputs(args: &EvaluateArgs) -> Result<(Shift, Vec<Shift>)> {
    let candidate: Shift = read_json(&args.candidate)?;
    let history = read_history(args.history.as_deref())?;
    tracing::debug!(
        operator = %candidate.operator_id(),
        history = history.len(),
        "loaded inputs"
    );
    Ok((candidate, history))
}

/// Print every violation for the candidate.
///
/// Exits with [`EXIT_FINDINGS`] when any violation was found.
pub fn run_evaluate(args: &EvaluateArgs, engine: &ComplianceEngine) -> Result<u8> {
    let (candidate, history) = load_inputs(args)?;
    let violations = engine.evaluate(&candidate, &history, args.outage);
    print_json(&violations)?;
    Ok(if violations.is_empty() { EXIT_OK } else { EXIT_FINDINGS })
}

/// Print the feasibility verdict for the candidate.
///
/// Exits with [`EXIT_FINDINGS`] unless the verdict is clear.
pub fn run_dry_run(args: &EvaluateArgs, engine: &ComplianceEngine) -> Result<u8> {
    let (candidate, history) = load_inputs(args)?;
    let feasibility = engine.dry_run(&candidate, &history, args.outage);
    print_json(&feasibility)?;
    Ok(if feasibility.verdict == Verdict::Clear {
        EXIT_OK
    } else {
        EXIT_FINDINGS
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn shift_json(start: &str, end: &str) -> String {
        format!(
            r#"{{"operatorId":"op-1","startTime":"{start}","endTime":"{end}","shiftType":"day"}}"#
        )
    }

    #[test]
    fn clean_candidate_exits_ok() {
        let dir = tempfile::tempdir().unwrap();
        let args = EvaluateArgs {
            candidate: write(
                dir.path(),
                "c.json",
                &shift_json("2026-04-07T06:00:00Z", "2026-04-07T18:00:00Z"),
            ),
            history: Some(write(
                dir.path(),
                "h.json",
                &format!("[{}]", shift_json("2026-04-06T06:00:00Z", "2026-04-06T18:00:00Z")),
            )),
            outage: false,
        };
        assert_eq!(run_evaluate(&args, &ComplianceEngine::default()).unwrap(), EXIT_OK);
        assert_eq!(run_dry_run(&args, &ComplianceEngine::default()).unwrap(), EXIT_OK);
    }

    #[test]
    fn violating_candidate_exits_with_findings() {
        let dir = tempfile::tempdir().unwrap();
        let args = EvaluateArgs {
            candidate: write(
                dir.path(),
                "c.json",
                &shift_json("2026-04-07T06:00:00Z", "2026-04-07T21:00:00Z"),
            ),
            history: None,
            outage: false,
        };
        assert_eq!(
            run_evaluate(&args, &ComplianceEngine::default()).unwrap(),
            EXIT_FINDINGS
        );
    }

    #[test]
    fn unreadable_candidate_is_an_error() {
        let args = EvaluateArgs {
            candidate: PathBuf::from("/nonexistent/c.json"),
            history: None,
            outage: false,
        };
        assert!(run_evaluate(&args, &ComplianceEngine::default()).is_err());
    }
}
