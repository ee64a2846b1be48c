//! # Violations
//!
//! A [`Violation`] is a fact produced by one evaluator for one candidate
//! shift. It is data, never an error: the engine always returns every
//! applicable violation and leaves the block/allow decision to the caller.
//!
//! Wire shape:
//!
//! ```json
//! { "rule": "max_shift_length", "severity": "violation",
//!   "message": "...", "currentValue": 15.0, "limit": 14.0,
//!   "requiresException": true }
//! ```

use serde::{Deserialize, Serialize};

/// How serious a violation is.
///
/// Ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Advisory only.
    Warning,
    /// Breach requiring supervisor-level exception.
    Violation,
    /// Breach requiring management approval in addition.
    HighRisk,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Warning => "warning",
            Self::Violation => "violation",
            Self::HighRisk => "high-risk",
        };
        f.write_str(s)
    }
}

/// The rule a violation was raised under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Shift longer than the maximum shift length.
    MaxShiftLength,
    /// Shift longer than the high-risk shift length.
    ExtremeShiftLength,
    /// Rest too short to end the work-set.
    WorkSetRest,
    /// Rest below the absolute minimum between shifts.
    MinimumRest,
    /// Too many back-to-back shifts.
    ConsecutiveShifts,
    /// Cumulative work-set hours above the cap.
    WorkSetHours,
    /// More than one extended shift in a work-set.
    MultipleExtendedShifts,
    /// Candidate intersects an existing shift.
    ShiftOverlap,
}

impl Rule {
    /// Wire name of the rule.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MaxShiftLength => "max_shift_length",
            Self::ExtremeShiftLength => "extreme_shift_length",
            Self::WorkSetRest => "work_set_rest",
            Self::MinimumRest => "minimum_rest",
            Self::ConsecutiveShifts => "consecutive_shifts",
            Self::WorkSetHours => "work_set_hours",
            Self::MultipleExtendedShifts => "multiple_extended_shifts",
            Self::ShiftOverlap => "shift_overlap",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule breach found for a candidate shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Rule that fired.
    pub rule: Rule,
    /// Severity of the breach.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// Measured value (hours or count).
    pub current_value: f64,
    /// Limit the value was checked against.
    pub limit: f64,
    /// Whether the breach can be cleared by an exception.
    pub requires_exception: bool,
}

impl Violation {
    /// An exception-eligible violation.
    pub fn new(
        rule: Rule,
        severity: Severity,
        message: impl Into<String>,
        current_value: f64,
        limit: f64,
    ) -> Self {
        Self {
            rule,
            severity,
            message: message.into(),
            current_value: round_hundredths(current_value),
            limit,
            requires_exception: true,
        }
    }

    /// A violation no exception can clear.
    pub fn blocking(rule: Rule, message: impl Into<String>, current_value: f64, limit: f64) -> Self {
        Self {
            requires_exception: false,
            ..Self::new(rule, Severity::Violation, message, current_value, limit)
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.severity == Severity::HighRisk
    }

    /// Whether the exception workflow may accept this violation.
    pub fn is_exception_eligible(&self) -> bool {
        self.requires_exception
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
