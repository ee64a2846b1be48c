//! # Schedule Subcommand
//!
//! Replays a history file into an in-memory store and commits the
//! candidate through the [`ScheduleGate`]. With `--packet`, violations
//! are admitted when the exception workflow accepts the packet.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use fatigue_exception::{ComplianceState, JustificationPacket};
use fatigue_gate::{Admission, GateError, InMemoryShiftStore, ScheduleGate, ShiftStore};
use fatigue_rules::ComplianceEngine;

use crate::evaluate::{load_inputs, EvaluateArgs};
use crate::exception::review_violations;
use crate::{print_json, read_json, EXIT_FINDINGS, EXIT_OK};

/// Arguments for the `fatigue schedule` subcommand.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub shift: EvaluateArgs,

    /// JSON file holding a justification packet for an exception.
    #[arg(long)]
    pub packet: Option<PathBuf>,
}

/// Commit the candidate if it is clean or covered by an accepted
/// exception.
pub fn run_schedule(args: &ScheduleArgs, engine: ComplianceEngine) -> Result<u8> {
    let (candidate, history) = load_inputs(&args.shift)?;
    let store = InMemoryShiftStore::new();
    for shift in history {
        store.insert(shift)?;
    }
    let gate = ScheduleGate::with_engine(store, engine);

    let admission = match &args.packet {
        None => Admission::Strict,
        Some(path) => {
            let packet: JustificationPacket = read_json(path)?;
            let violations = gate.check(&candidate, args.shift.outage)?.violations;
            let workflow = review_violations(candidate.clone(), violations, packet)?;
            if workflow.state == ComplianceState::ExceptionValid {
                Admission::WithException(Box::new(workflow.record()?))
            } else if workflow.errors.is_empty() {
                // Clean or blocked; the gate reports which.
                Admission::Strict
            } else {
                print_json(&workflow)?;
                return Ok(EXIT_FINDINGS);
            }
        }
    };

    match gate.schedule(candidate, args.shift.outage, admission) {
        Ok(outcome) => {
            print_json(&outcome)?;
            Ok(EXIT_OK)
        }
        Err(GateError::Rejected { verdict, violations }) => {
            tracing::warn!(?verdict, "shift not admitted");
            print_json(&violations)?;
            Ok(EXIT_FINDINGS)
        }
        Err(GateError::ExceptionMismatch { violations, .. }) => {
            tracing::warn!("exception does not cover the violations found");
            print_json(&violations)?;
            Ok(EXIT_FINDINGS)
        }
        Err(err) => Err(err.into()),
    }
}
