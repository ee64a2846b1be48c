//! # Temporal Types: Shift Time Arithmetic
//!
//! Pure helpers the rule engine builds on:
//!
//! - [`hours_between`]: signed, fractional hours between two instants.
//! - [`classify_night`] / [`is_night_shift`]: whether a shift counts
//!   toward the night-shift threshold of the work-set rest rule.
//! - [`ShiftWindow`]: a shift described as calendar date plus local
//!   start/end clock times, resolved once into absolute instants.
//! - [`Timestamp`]: UTC-only, seconds-precision audit timestamp.
//!
//! ## Night Classification
//!
//! A declared `shiftType` is authoritative. Clock-hour inference is only
//! used for `rotating` or untyped shifts and is logged, since it
//! misclassifies e.g. a 05:30 early-day start.
//!
//! ## Local Time Resolution
//!
//! A local wall-clock time that falls in a daylight-saving gap, or that
//! occurs twice in a daylight-saving fold, is rejected. Shift boundaries
//! never move silently across an offset change.

use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::ShiftInputError;
use crate::shift::{Shift, ShiftType};

/// Start hour at or after which a shift is inferred to be a night shift.
const NIGHT_START_HOUR: u32 = 18;

/// Start hour before which a shift is inferred to be a night shift.
const EARLY_START_HOUR: u32 = 6;

/// End hour at or before which a shift is inferred to be a night shift.
const EARLY_END_HOUR: u32 = 6;

// ---------------------------------------------------------------------------
// Hours
// ---------------------------------------------------------------------------

/// Signed hours from `a` to `b`, with millisecond resolution.
///
/// Negative when `b` precedes `a`; callers that care guard for it.
pub fn hours_between(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>) -> f64 {
    b.signed_duration_since(a).num_milliseconds() as f64 / 3_600_000.0
}

// ---------------------------------------------------------------------------
// Night classification
// ---------------------------------------------------------------------------

/// Outcome of night-shift classification, recording how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "night", rename_all = "snake_case")]
pub enum NightClassification {
    /// Taken from the shift's declared type.
    Declared(bool),
    /// Inferred from the shift's local clock hours.
    Inferred(bool),
}

impl NightClassification {
    /// Whether the shift counts as a night shift.
    pub fn is_night(self) -> bool {
        match self {
            Self::Declared(night) | Self::Inferred(night) => night,
        }
    }

    /// Whether the clock-hour fallback was used.
    pub fn is_inferred(self) -> bool {
        matches!(self, Self::Inferred(_))
    }
}

/// Classify a shift as night or day.
///
/// `night` and `day` declarations are authoritative. `rotating` and
/// untyped shifts fall back to the clock-hour heuristic, read in the
/// shift's own UTC offset.
pub fn classify_night(shift: &Shift) -> NightClassification {
    match shift.shift_type() {
        Some(ShiftType::Night) => NightClassification::Declared(true),
        Some(ShiftType::Day) => NightClassification::Declared(false),
        Some(ShiftType::Rotating) | None => {
            let night = night_by_clock_hours(shift.start_time().hour(), shift.end_time().hour());
            tracing::warn!(
                operator = %shift.operator_id(),
                start = %shift.start_time(),
                shift_type = ?shift.shift_type(),
                night,
                "night status inferred from clock hours"
            );
            NightClassification::Inferred(night)
        }
    }
}

/// Whether a shift counts toward the night-shift threshold.
pub fn is_night_shift(shift: &Shift) -> bool {
    classify_night(shift).is_night()
}

fn night_by_clock_hours(start_hour: u32, end_hour: u32) -> bool {
    start_hour >= NIGHT_START_HOUR
        || start_hour < EARLY_START_HOUR
        || end_hour <= EARLY_END_HOUR
        || (start_hour < end_hour && start_hour >= NIGHT_START_HOUR)
}

// ---------------------------------------------------------------------------
// ShiftWindow
// ---------------------------------------------------------------------------

/// A shift expressed as a calendar date and local clock times.
///
/// An `end` at or before `start` means the shift finishes on the
/// following calendar day (e.g. 18:00–06:00).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftWindow {
    /// Calendar date on which the shift starts.
    pub date: NaiveDate,
    /// Local start time-of-day.
    pub start: NaiveTime,
    /// Local end time-of-day.
    pub end: NaiveTime,
}

impl ShiftWindow {
    /// Resolve the window into absolute instants in `tz`.
    ///
    /// # Errors
    ///
    /// Returns an error when either boundary does not exist or is
    /// ambiguous in `tz`.
    pub fn resolve<Tz: TimeZone>(
        &self,
        tz: &Tz,
    ) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), ShiftInputError> {
        let end_date = if self.end <= self.start {
            self.date
                .succ_opt()
                .ok_or_else(|| ShiftInputError::NonexistentLocalTime {
                    local: format!("{} {}", self.date, self.end),
                })?
        } else {
            self.date
        };

        let start_local = self.date.and_time(self.start);
        let end_local = end_date.and_time(self.end);
        let start = resolve_local(tz.from_local_datetime(&start_local), start_local)?;
        let end = resolve_local(tz.from_local_datetime(&end_local), end_local)?;
        Ok((start, end))
    }
}

/// Map a local-time lookup onto a single fixed-offset instant.
fn resolve_local<Tz: TimeZone>(
    result: LocalResult<DateTime<Tz>>,
    local: NaiveDateTime,
) -> Result<DateTime<FixedOffset>, ShiftInputError> {
    match result {
        LocalResult::Single(dt) => {
            let offset = dt.offset().fix();
            Ok(dt.with_timezone(&offset))
        }
        LocalResult::Ambiguous(_, _) => Err(ShiftInputError::AmbiguousLocalTime {
            local: local.to_string(),
        }),
        LocalResult::None => Err(ShiftInputError::NonexistentLocalTime {
            local: local.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A UTC-only timestamp, truncated to seconds precision.
///
/// Used for audit fields (exception creation, state transitions) so that
/// records compare and serialize deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with `Z` suffix.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
