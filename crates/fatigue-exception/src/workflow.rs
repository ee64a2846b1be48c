//! # Exception Workflow State Machine
//!
//! Tracks one shift from assessment to an accepted or rejected exception.
//!
//! ## States
//!
//! ```text
//! assess ──▶ Clean (terminal)
//!    │
//!    └────▶ Violated ──▶ ExceptionPending ──▶ ExceptionValid (terminal)
//!                              │    ▲
//!                              ▼    │ resubmit
//!                         ExceptionInvalid
//! ```
//!
//! `submit` refuses violations that are not exception-eligible, so an
//! overlap can never reach `ExceptionPending`. `review` runs
//! [`validate_exception`] and lands in `ExceptionValid` only when nothing
//! is missing. Every transition is recorded with a [`Timestamp`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fatigue_core::{Shift, Timestamp};
use fatigue_rules::{Rule, Violation};

use crate::request::{validate_exception, ExceptionRequest, JustificationPacket};

// ─── Compliance State ────────────────────────────────────────────────

/// Where a shift stands in the exception workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceState {
    /// No violations (terminal).
    Clean,
    /// Violations found, no exception requested yet.
    Violated,
    /// Exception requested, awaiting review.
    ExceptionPending,
    /// Exception complete and accepted (terminal).
    ExceptionValid,
    /// Exception incomplete; may be resubmitted.
    ExceptionInvalid,
}

impl ComplianceState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Clean | Self::ExceptionValid)
    }

    /// Whether the shift may be committed in this state.
    pub fn permits_scheduling(&self) -> bool {
        self.is_terminal()
    }
}

impl std::fmt::Display for ComplianceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Clean => "CLEAN",
            Self::Violated => "VIOLATED",
            Self::ExceptionPending => "EXCEPTION_PENDING",
            Self::ExceptionValid => "EXCEPTION_VALID",
            Self::ExceptionInvalid => "EXCEPTION_INVALID",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by the exception workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExceptionError {
    /// An exception was requested for a shift without violations.
    #[error("shift has no violations to except")]
    NoViolations,

    /// A violation that no exception may clear.
    #[error("violation {rule} is not exception-eligible")]
    IneligibleViolation {
        /// Rule name of the blocking violation.
        rule: String,
    },

    /// Attempted transition is not valid from the current state.
    #[error("invalid exception transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// The workflow is in a terminal state.
    #[error("exception workflow is in terminal state {state}")]
    TerminalState {
        /// The terminal state.
        state: String,
    },
}

// ─── Transition Records ──────────────────────────────────────────────

/// Record of a workflow state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceTransitionRecord {
    pub from_state: ComplianceState,
    pub to_state: ComplianceState,
    pub timestamp: Timestamp,
    pub reason: String,
}

/// Auditable record of an accepted exception.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionRecord {
    /// The shift the exception was accepted for.
    pub shift: Shift,
    /// The accepted request.
    pub request: ExceptionRequest,
    /// Violations the exception covers.
    pub violations: Vec<Violation>,
    /// When the exception was accepted.
    pub approved_at: Timestamp,
    /// Full workflow history.
    pub transitions: Vec<ComplianceTransitionRecord>,
}

impl ExceptionRecord {
    /// Whether this record covers `violations` for `shift`.
    ///
    /// The record is bound to the shift it was accepted for: same
    /// operator, same start and end, and the same identity when the
    /// assessed shift carried one. Every violation must be eligible and
    /// its rule among those the record was accepted for.
    pub fn covers(&self, shift: &Shift, violations: &[Violation]) -> bool {
        if !self.is_for(shift) {
            return false;
        }
        let accepted: Vec<Rule> = self.violations.iter().map(|v| v.rule).collect();
        violations
            .iter()
            .all(|v| v.is_exception_eligible() && accepted.contains(&v.rule))
    }

    fn is_for(&self, shift: &Shift) -> bool {
        let same_identity = match self.shift.id() {
            Some(id) => shift.id() == Some(id),
            None => true,
        };
        self.shift.operator_id() == shift.operator_id()
            && &self.request.operator_id == shift.operator_id()
            && self.shift.start_time() == shift.start_time()
            && self.shift.end_time() == shift.end_time()
            && same_identity
    }
}

// ─── Shift Compliance ────────────────────────────────────────────────

/// Exception workflow for one evaluated shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftCompliance {
    /// Current workflow state.
    pub state: ComplianceState,
    /// The shift under assessment.
    pub shift: Shift,
    /// Violations the engine reported.
    pub violations: Vec<Violation>,
    /// The latest submitted request, if any.
    pub request: Option<ExceptionRequest>,
    /// Missing-field messages from the latest review.
    pub errors: Vec<String>,
    /// Ordered log of all state transitions.
    pub transitions: Vec<ComplianceTransitionRecord>,
}

impl ShiftCompliance {
    /// Start the workflow from an engine result.
    pub fn assess(shift: Shift, violations: Vec<Violation>) -> Self {
        let state = if violations.is_empty() {
            ComplianceState::Clean
        } else {
            ComplianceState::Violated
        };
        Self {
            state,
            shift,
            violations,
            request: None,
            errors: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Whether any violation is beyond the reach of an exception.
    pub fn is_blocked(&self) -> bool {
        self.violations.iter().any(|v| !v.is_exception_eligible())
    }

    /// Submit an exception request (VIOLATED or EXCEPTION_INVALID →
    /// EXCEPTION_PENDING).
    pub fn submit(&mut self, packet: JustificationPacket) -> Result<&ExceptionRequest, ExceptionError> {
        self.require_not_terminal()?;
        if !matches!(
            self.state,
            ComplianceState::Violated | ComplianceState::ExceptionInvalid
        ) {
            return Err(ExceptionError::InvalidTransition {
                from: self.state.to_string(),
                to: ComplianceState::ExceptionPending.to_string(),
            });
        }

        let request = ExceptionRequest::from_violations(&self.shift, &self.violations, packet)?;
        let reason = format!("exception requested for {}", request.violation_type);
        self.errors.clear();
        self.do_transition(ComplianceState::ExceptionPending, &reason);
        Ok(self.request.insert(request))
    }

    /// Review the pending request (EXCEPTION_PENDING → EXCEPTION_VALID or
    /// EXCEPTION_INVALID). Returns the missing-field messages, empty when
    /// the exception was accepted.
    pub fn review(&mut self) -> Result<&[String], ExceptionError> {
        self.require_not_terminal()?;
        let Some(request) = self.request.as_ref().filter(|_| self.state == ComplianceState::ExceptionPending)
        else {
            return Err(ExceptionError::InvalidTransition {
                from: self.state.to_string(),
                to: ComplianceState::ExceptionValid.to_string(),
            });
        };

        let errors = validate_exception(request);
        if errors.is_empty() {
            self.do_transition(ComplianceState::ExceptionValid, "exception complete");
        } else {
            let reason = format!("{} missing field(s)", errors.len());
            self.do_transition(ComplianceState::ExceptionInvalid, &reason);
        }
        self.errors = errors;
        Ok(&self.errors)
    }

    /// The auditable record of an accepted exception.
    pub fn record(&self) -> Result<ExceptionRecord, ExceptionError> {
        match (&self.state, &self.request) {
            (ComplianceState::ExceptionValid, Some(request)) => Ok(ExceptionRecord {
                shift: self.shift.clone(),
                request: request.clone(),
                violations: self.violations.clone(),
                approved_at: self
                    .transitions
                    .last()
                    .map_or_else(Timestamp::now, |t| t.timestamp),
                transitions: self.transitions.clone(),
            }),
            _ => Err(ExceptionError::InvalidTransition {
                from: self.state.to_string(),
                to: ComplianceState::ExceptionValid.to_string(),
            }),
        }
    }

    /// The shift as it should be committed: marked overridden when an
    /// exception was accepted, unchanged when clean.
    pub fn committable_shift(&self) -> Result<Shift, ExceptionError> {
        match self.state {
            ComplianceState::Clean => Ok(self.shift.clone()),
            ComplianceState::ExceptionValid => Ok(self.shift.overridden()),
            _ => Err(ExceptionError::InvalidTransition {
                from: self.state.to_string(),
                to: "COMMITTED".to_string(),
            }),
        }
    }

    fn require_not_terminal(&self) -> Result<(), ExceptionError> {
        if self.state.is_terminal() {
            return Err(ExceptionError::TerminalState {
                state: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: ComplianceState, reason: &str) {
        tracing::info!(
            operator = %self.shift.operator_id(),
            from = %self.state,
            to = %to,
            reason,
            "exception workflow transition"
        );
        self.transitions.push(ComplianceTransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
