//! # Exception Subcommand
//!
//! - `validate`: list the fields an exception request is missing.
//! - `submit`: evaluate a candidate, attach a justification packet, and
//!   run the workflow through review, printing the resulting state.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use fatigue_core::Shift;
use fatigue_exception::{
    validate_exception, ComplianceState, ExceptionRequest, JustificationPacket, ShiftCompliance,
};
use fatigue_rules::{ComplianceEngine, Violation};

use crate::evaluate::{load_inputs, EvaluateArgs};
use crate::{print_json, read_json, EXIT_FINDINGS, EXIT_OK};

/// Arguments for the `fatigue exception` subcommand.
#[derive(Args, Debug)]
pub struct ExceptionArgs {
    #[command(subcommand)]
    pub command: ExceptionCommand,
}

/// Exception subcommands.
#[derive(Subcommand, Debug)]
pub enum ExceptionCommand {
    /// Check an exception request for missing fields.
    Validate {
        /// JSON file holding the exception request.
        #[arg(long)]
        request: PathBuf,
    },

    /// Evaluate a candidate and review an exception for its violations.
    Submit {
        #[command(flatten)]
        shift: EvaluateArgs,
        /// JSON file holding the justification packet.
        #[arg(long)]
        packet: PathBuf,
    },
}

/// Execute an exception subcommand.
pub fn run_exception(args: &ExceptionArgs, engine: &ComplianceEngine) -> Result<u8> {
    match &args.command {
        ExceptionCommand::Validate { request } => {
            let request: ExceptionRequest = read_json(request)?;
            let errors = validate_exception(&request);
            print_json(&errors)?;
            Ok(if errors.is_empty() { EXIT_OK } else { EXIT_FINDINGS })
        }
        ExceptionCommand::Submit { shift, packet } => {
            let (candidate, history) = load_inputs(shift)?;
            let packet: JustificationPacket = read_json(packet)?;
            let workflow = submit(engine, candidate, &history, shift.outage, packet)?;
            print_json(&workflow)?;
            Ok(match workflow.state {
                ComplianceState::Clean | ComplianceState::ExceptionValid => EXIT_OK,
                _ => EXIT_FINDINGS,
            })
        }
    }
}

/// Evaluate one candidate and run the workflow as far as it can go.
pub fn submit(
    engine: &ComplianceEngine,
    candidate: Shift,
    history: &[Shift],
    is_outage: bool,
    packet: JustificationPacket,
) -> Result<ShiftCompliance> {
    let violations = engine.evaluate(&candidate, history, is_outage);
    review_violations(candidate, violations, packet)
}

/// Run the workflow for already-evaluated violations.
///
/// Clean shifts and blocked shifts are returned without a request.
pub fn review_violations(
    candidate: Shift,
    violations: Vec<Violation>,
    packet: JustificationPacket,
) -> Result<ShiftCompliance> {
    let mut workflow = ShiftCompliance::assess(candidate, violations);

    if workflow.state == ComplianceState::Clean {
        return Ok(workflow);
    }
    if workflow.is_blocked() {
        tracing::warn!(
            operator = %workflow.shift.operator_id(),
            "shift has violations no exception can clear"
        );
        return Ok(workflow);
    }

    workflow.submit(packet)?;
    workflow.review()?;
    Ok(workflow)
}
