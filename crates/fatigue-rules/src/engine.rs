//! # Compliance Engine
//!
//! Runs every evaluator against one candidate shift and returns the
//! concatenated violations in a fixed order:
//!
//! ```text
//! shift length → rest period → consecutive count → work-set hours → overlap
//! ```
//!
//! No evaluator short-circuits another, so a caller sees every problem in
//! one pass. The engine holds no mutable state; identical input always
//! yields identical, identically ordered output, and one engine may be
//! shared across threads.
//!
//! [`ComplianceEngine::dry_run`] condenses the same output into a
//! [`Verdict`] for callers (e.g. operator pickers) that only need to
//! predict whether scheduling would be possible.

use serde::{Deserialize, Serialize};

use fatigue_core::Shift;

use crate::evaluators::{
    ConsecutiveShiftEvaluator, EvaluationContext, OverlapEvaluator, RestPeriodEvaluator,
    RuleEvaluator, ShiftLengthEvaluator, WorkSetHoursEvaluator,
};
use crate::policy::{FatiguePolicy, PolicyError};
use crate::violation::Violation;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// What a caller would need to do to schedule a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No violations.
    Clear,
    /// Exception-eligible violations, none high-risk.
    RequiresException,
    /// Exception-eligible violations including a high-risk one.
    RequiresManagementApproval,
    /// At least one violation no exception can clear.
    Blocked,
}

impl Verdict {
    /// Classify a violation list.
    pub fn from_violations(violations: &[Violation]) -> Self {
        if violations.is_empty() {
            Self::Clear
        } else if violations.iter().any(|v| !v.is_exception_eligible()) {
            Self::Blocked
        } else if violations.iter().any(Violation::is_high_risk) {
            Self::RequiresManagementApproval
        } else {
            Self::RequiresException
        }
    }

    /// Whether the shift could be scheduled at all.
    pub fn is_schedulable(self) -> bool {
        !matches!(self, Self::Blocked)
    }
}

/// Result of a dry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feasibility {
    pub verdict: Verdict,
    pub violations: Vec<Violation>,
}

// ---------------------------------------------------------------------------
// ComplianceEngine
// ---------------------------------------------------------------------------

/// Evaluates candidate shifts against a fatigue policy.
#[derive(Debug)]
pub struct ComplianceEngine {
    policy: FatiguePolicy,
    evaluators: Vec<Box<dyn RuleEvaluator>>,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::build(FatiguePolicy::default())
    }
}

impl ComplianceEngine {
    /// Create an engine for a custom policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy fails validation.
    pub fn with_policy(policy: FatiguePolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self::build(policy))
    }

    fn build(policy: FatiguePolicy) -> Self {
        Self {
            policy,
            evaluators: vec![
                Box::new(ShiftLengthEvaluator),
                Box::new(RestPeriodEvaluator),
                Box::new(ConsecutiveShiftEvaluator),
                Box::new(WorkSetHoursEvaluator),
                Box::new(OverlapEvaluator),
            ],
        }
    }

    /// The policy in force.
    pub fn policy(&self) -> &FatiguePolicy {
        &self.policy
    }

    /// Evaluate a candidate shift against the operator's history.
    ///
    /// History entries for other operators, and any entry carrying the
    /// candidate's own identity, are ignored.
    pub fn evaluate(&self, candidate: &Shift, history: &[Shift], is_outage: bool) -> Vec<Violation> {
        let scoped = scope_history(candidate, history);
        let ctx = EvaluationContext {
            candidate,
            history: &scoped,
            is_outage,
            policy: &self.policy,
        };

        let mut violations = Vec::new();
        for evaluator in &self.evaluators {
            let found = evaluator.evaluate(&ctx);
            tracing::debug!(
                evaluator = evaluator.name(),
                violations = found.len(),
                "evaluator finished"
            );
            violations.extend(found);
        }

        tracing::debug!(
            operator = %candidate.operator_id(),
            start = %candidate.start_time(),
            history = scoped.len(),
            is_outage,
            violations = violations.len(),
            "evaluated candidate shift"
        );
        violations
    }

    /// Predict whether a candidate could be scheduled, without committing.
    pub fn dry_run(&self, candidate: &Shift, history: &[Shift], is_outage: bool) -> Feasibility {
        let violations = self.evaluate(candidate, history, is_outage);
        Feasibility {
            verdict: Verdict::from_violations(&violations),
            violations,
        }
    }
}

/// Evaluate with the default policy.
pub fn evaluate(candidate: &Shift, history: &[Shift], is_outage: bool) -> Vec<Violation> {
    ComplianceEngine::default().evaluate(candidate, history, is_outage)
}

fn scope_history(candidate: &Shift, history: &[Shift]) -> Vec<Shift> {
    history
        .iter()
        .filter(|shift| {
            if shift.operator_id() != candidate.operator_id() {
                tracing::warn!(
                    expected = %candidate.operator_id(),
                    found = %shift.operator_id(),
                    "ignoring history shift for another operator"
                );
                return false;
            }
            candidate.id().is_none() || shift.id() != candidate.id()
        })
        .cloned()
        .collect()
}
