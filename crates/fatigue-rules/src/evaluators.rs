//! # Rule Evaluators
//!
//! Five independent checks, each a [`RuleEvaluator`] that turns an
//! [`EvaluationContext`] into zero or more [`Violation`]s:
//!
//! | evaluator | rules |
//! |---|---|
//! | [`ShiftLengthEvaluator`] | `max_shift_length`, `extreme_shift_length` |
//! | [`RestPeriodEvaluator`] | `work_set_rest`, `minimum_rest` |
//! | [`ConsecutiveShiftEvaluator`] | `consecutive_shifts` |
//! | [`WorkSetHoursEvaluator`] | `work_set_hours`, `multiple_extended_shifts` |
//! | [`OverlapEvaluator`] | `shift_overlap` |
//!
//! Evaluators are pure and never consult each other. Checks within one
//! evaluator fire independently: an 18.5h shift yields both length
//! violations.

use std::fmt;

use fatigue_core::{hours_between, is_night_shift, Shift};

use crate::policy::FatiguePolicy;
use crate::violation::{Rule, Severity, Violation};
use crate::workset::{consecutive_chain, current_work_set};

// ---------------------------------------------------------------------------
// EvaluationContext
// ---------------------------------------------------------------------------

/// Input shared by every evaluator for one candidate shift.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// The shift being proposed.
    pub candidate: &'a Shift,
    /// The operator's shift history snapshot.
    pub history: &'a [Shift],
    /// Whether outage limits apply.
    pub is_outage: bool,
    /// Limits in force.
    pub policy: &'a FatiguePolicy,
}

// ---------------------------------------------------------------------------
// RuleEvaluator Trait
// ---------------------------------------------------------------------------

/// A single fatigue check.
pub trait RuleEvaluator: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Evaluate the candidate, returning every violation found.
    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation>;
}

// ---------------------------------------------------------------------------
// Shift length
// ---------------------------------------------------------------------------

/// Bounds the length of the candidate shift itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftLengthEvaluator;

impl RuleEvaluator for ShiftLengthEvaluator {
    fn name(&self) -> &'static str {
        "shift_length"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let hours = ctx.candidate.duration_hours();
        let policy = ctx.policy;
        let mut violations = Vec::new();

        if hours > policy.max_shift_hours {
            violations.push(Violation::new(
                Rule::MaxShiftLength,
                Severity::Violation,
                format!(
                    "Shift length of {hours:.2} hours exceeds the {} hour maximum",
                    policy.max_shift_hours
                ),
                hours,
                policy.max_shift_hours,
            ));
        }
        if hours > policy.high_risk_shift_hours {
            violations.push(Violation::new(
                Rule::ExtremeShiftLength,
                Severity::HighRisk,
                format!(
                    "Shift length of {hours:.2} hours exceeds the {} hour high-risk threshold",
                    policy.high_risk_shift_hours
                ),
                hours,
                policy.high_risk_shift_hours,
            ));
        }
        violations
    }
}

// ---------------------------------------------------------------------------
// Rest period
// ---------------------------------------------------------------------------

/// Checks rest since the operator's most recent shift.
///
/// The rest required to end a work-set depends on how many night shifts
/// the block ending at the previous shift contains.
///
/// The work-set rest check only fires for rest in
/// `[consecutive_gap_hours, required)`. Shorter gaps mean the operator is
/// still inside the shift block and are covered by the minimum-rest check
/// alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestPeriodEvaluator;

impl RuleEvaluator for RestPeriodEvaluator {
    fn name(&self) -> &'static str {
        "rest_period"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let start = ctx.candidate.start_time();
        let Some(previous) = ctx
            .history
            .iter()
            .filter(|s| s.end_time() <= start)
            .max_by_key(|s| s.end_time())
        else {
            return Vec::new();
        };

        let policy = ctx.policy;
        let rest = hours_between(previous.end_time(), start);
        // Night count of the block this rest would end: the previous
        // shift plus its own consecutive chain.
        let block = consecutive_chain(previous, ctx.history, policy);
        let nights = block.night_shift_count + usize::from(is_night_shift(previous));
        let required = policy.required_work_set_rest(nights);
        let mut violations = Vec::new();

        if rest >= policy.consecutive_gap_hours && rest < required {
            violations.push(Violation::new(
                Rule::WorkSetRest,
                Severity::Violation,
                format!(
                    "Insufficient rest to end work-set: {rest:.2} hours rest, {required} hours required after {nights} night shifts"
                ),
                rest,
                required,
            ));
        }
        if rest < policy.min_rest_hours {
            violations.push(Violation::new(
                Rule::MinimumRest,
                Severity::HighRisk,
                format!(
                    "Insufficient rest between shifts: {rest:.2} hours rest, minimum {} hours",
                    policy.min_rest_hours
                ),
                rest,
                policy.min_rest_hours,
            ));
        }
        violations
    }
}

// ---------------------------------------------------------------------------
// Consecutive shifts
// ---------------------------------------------------------------------------

/// Bounds the number of back-to-back shifts, tiered by shift length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsecutiveShiftEvaluator;

impl RuleEvaluator for ConsecutiveShiftEvaluator {
    fn name(&self) -> &'static str {
        "consecutive_shifts"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let hours = ctx.candidate.duration_hours();
        let max = ctx.policy.consecutive.max_for(hours, ctx.is_outage);
        let count = consecutive_chain(ctx.candidate, ctx.history, ctx.policy).len() + 1;

        if count <= max as usize {
            return Vec::new();
        }
        let mode = if ctx.is_outage { " during outage" } else { "" };
        vec![Violation::new(
            Rule::ConsecutiveShifts,
            Severity::Violation,
            format!(
                "{count} consecutive shifts exceeds the limit of {max} for {hours:.1} hour shifts{mode}"
            ),
            count as f64,
            f64::from(max),
        )]
    }
}

// ---------------------------------------------------------------------------
// Work-set hours
// ---------------------------------------------------------------------------

/// Caps cumulative hours and extended shifts within the work-set.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkSetHoursEvaluator;

impl RuleEvaluator for WorkSetHoursEvaluator {
    fn name(&self) -> &'static str {
        "work_set_hours"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let policy = ctx.policy;
        let ws = current_work_set(ctx.candidate, ctx.history, policy);
        let candidate_hours = ctx.candidate.duration_hours();
        let total = ws.total_hours + candidate_hours;
        let limits = &policy.work_set_hours;
        let max_hours = if ctx.is_outage {
            limits.outage
        } else if ws.all_day_shifts() {
            limits.day_only
        } else {
            limits.mixed
        };
        let mut violations = Vec::new();

        if total > max_hours {
            violations.push(Violation::new(
                Rule::WorkSetHours,
                Severity::Violation,
                format!("Work-set hours of {total:.2} exceed the {max_hours} hour limit"),
                total,
                max_hours,
            ));
        }

        let extended = ws.extended_shift_count + 1;
        if ws.has_extended_shifts
            && candidate_hours > policy.max_shift_hours
            && extended > policy.max_extended_shifts_per_work_set
        {
            violations.push(Violation::new(
                Rule::MultipleExtendedShifts,
                Severity::HighRisk,
                format!(
                    "Multiple extended shifts per work-set: {extended} shifts over {} hours",
                    policy.max_shift_hours
                ),
                extended as f64,
                policy.max_extended_shifts_per_work_set as f64,
            ));
        }
        violations
    }
}

// ---------------------------------------------------------------------------
// Overlap
// ---------------------------------------------------------------------------

/// Flags every history shift the candidate intersects.
///
/// Overlap is a data-integrity conflict, not a fatigue trade-off: these
/// violations are never exception-eligible.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapEvaluator;

impl RuleEvaluator for OverlapEvaluator {
    fn name(&self) -> &'static str {
        "overlap"
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let candidate = ctx.candidate;
        ctx.history
            .iter()
            .filter(|other| candidate.overlaps(other))
            .map(|other| {
                let overlap_start = candidate.start_time().max(other.start_time());
                let overlap_end = candidate.end_time().min(other.end_time());
                Violation::blocking(
                    Rule::ShiftOverlap,
                    format!(
                        "Shift overlaps an existing shift from {} to {}",
                        other.start_time().to_rfc3339(),
                        other.end_time().to_rfc3339()
                    ),
                    hours_between(overlap_start, overlap_end),
                    0.0,
                )
            })
            .collect()
    }
}
