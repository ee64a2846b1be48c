//! # Shifts: Validated Engine Input
//!
//! [`ShiftInput`] is the JSON wire shape accepted from callers. [`Shift`]
//! is the validated form the engine consumes: it is only constructible
//! when the operator is named and `end_time > start_time`, so the rule
//! engine never re-validates shape.
//!
//! A `Shift` is immutable input. Persisted shifts carry a [`ShiftId`];
//! candidate shifts do not. Accepting an exception produces a *new*
//! value via [`Shift::overridden`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::ShiftInputError;
use crate::identity::{OperatorId, ShiftId};
use crate::temporal::hours_between;

/// Declared kind of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    /// Daytime shift.
    Day,
    /// Night shift; counts toward the extended work-set rest threshold.
    Night,
    /// Rotating assignment; night status is inferred from clock hours.
    Rotating,
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Rotating => "rotating",
        };
        f.write_str(s)
    }
}

// ─── Wire Shape ──────────────────────────────────────────────────────

/// Shift as received on the wire.
///
/// Timestamps are RFC 3339 strings with an explicit offset. Boolean
/// flags default to `false` when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftInput {
    /// Identity of a persisted shift; absent for candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShiftId>,
    /// Operator the shift belongs to.
    pub operator_id: String,
    /// Start instant, RFC 3339 with offset.
    pub start_time: String,
    /// End instant, RFC 3339 with offset.
    pub end_time: String,
    /// Declared shift type, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_type: Option<ShiftType>,
    /// Worked under outage (turnaround) rules.
    #[serde(default)]
    pub is_outage: bool,
    /// Worked as overtime.
    #[serde(default)]
    pub is_overtime: bool,
    /// An exception has been accepted for this shift.
    #[serde(default)]
    pub is_overridden: bool,
}

// ─── Shift ───────────────────────────────────────────────────────────

/// A validated, immutable shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShiftInput", into = "ShiftInput")]
pub struct Shift {
    id: Option<ShiftId>,
    operator_id: OperatorId,
    start_time: DateTime<FixedOffset>,
    end_time: DateTime<FixedOffset>,
    shift_type: Option<ShiftType>,
    is_outage: bool,
    is_overtime: bool,
    is_overridden: bool,
}

impl Shift {
    /// Create a candidate shift.
    ///
    /// # Errors
    ///
    /// Rejects a blank operator and any shift whose end is not strictly
    /// after its start.
    pub fn new(
        operator_id: OperatorId,
        start_time: DateTime<FixedOffset>,
        end_time: DateTime<FixedOffset>,
    ) -> Result<Self, ShiftInputError> {
        if operator_id.as_str().trim().is_empty() {
            return Err(ShiftInputError::MissingOperator);
        }
        if end_time <= start_time {
            return Err(ShiftInputError::EndNotAfterStart {
                start: start_time.to_rfc3339(),
                end: end_time.to_rfc3339(),
            });
        }
        Ok(Self {
            id: None,
            operator_id,
            start_time,
            end_time,
            shift_type: None,
            is_outage: false,
            is_overtime: false,
            is_overridden: false,
        })
    }

    /// Attach a persisted identity.
    pub fn with_id(mut self, id: ShiftId) -> Self {
        self.id = Some(id);
        self
    }

    /// Declare the shift type.
    pub fn with_type(mut self, shift_type: ShiftType) -> Self {
        self.shift_type = Some(shift_type);
        self
    }

    /// Flag the shift as worked under outage rules.
    pub fn with_outage(mut self, is_outage: bool) -> Self {
        self.is_outage = is_outage;
        self
    }

    /// Flag the shift as overtime.
    pub fn with_overtime(mut self, is_overtime: bool) -> Self {
        self.is_overtime = is_overtime;
        self
    }

    /// A copy of this shift marked as covered by an accepted exception.
    pub fn overridden(&self) -> Self {
        Self {
            is_overridden: true,
            ..self.clone()
        }
    }

    pub fn id(&self) -> Option<ShiftId> {
        self.id
    }

    pub fn operator_id(&self) -> &OperatorId {
        &self.operator_id
    }

    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<FixedOffset> {
        self.end_time
    }

    pub fn shift_type(&self) -> Option<ShiftType> {
        self.shift_type
    }

    pub fn is_outage(&self) -> bool {
        self.is_outage
    }

    pub fn is_overtime(&self) -> bool {
        self.is_overtime
    }

    pub fn is_overridden(&self) -> bool {
        self.is_overridden
    }

    /// Length of the shift in hours.
    pub fn duration_hours(&self) -> f64 {
        hours_between(self.start_time, self.end_time)
    }

    /// Whether the two time ranges intersect. Touching ranges do not.
    pub fn overlaps(&self, other: &Shift) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }
}

impl TryFrom<ShiftInput> for Shift {
    type Error = ShiftInputError;

    fn try_from(input: ShiftInput) -> Result<Self, Self::Error> {
        let start = parse_offset_time("startTime", &input.start_time)?;
        let end = parse_offset_time("endTime", &input.end_time)?;
        let mut shift = Shift::new(OperatorId(input.operator_id), start, end)?;
        shift.id = input.id;
        shift.shift_type = input.shift_type;
        shift.is_outage = input.is_outage;
        shift.is_overtime = input.is_overtime;
        shift.is_overridden = input.is_overridden;
        Ok(shift)
    }
}

impl From<Shift> for ShiftInput {
    fn from(shift: Shift) -> Self {
        Self {
            id: shift.id,
            operator_id: shift.operator_id.0,
            start_time: shift.start_time.to_rfc3339(),
            end_time: shift.end_time.to_rfc3339(),
            shift_type: shift.shift_type,
            is_outage: shift.is_outage,
            is_overtime: shift.is_overtime,
            is_overridden: shift.is_overridden,
        }
    }
}

fn parse_offset_time(
    field: &'static str,
    value: &str,
) -> Result<DateTime<FixedOffset>, ShiftInputError> {
    DateTime::parse_from_rfc3339(value).map_err(|_| ShiftInputError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(start: &str, end: &str) -> ShiftInput {
        ShiftInput {
            id: None,
            operator_id: "op-1".into(),
            start_time: start.into(),
            end_time: end.into(),
            shift_type: None,
            is_outage: false,
            is_overtime: false,
            is_overridden: false,
        }
    }

    #[test]
    fn valid_input_converts() {
        let shift =
            Shift::try_from(input("2026-03-02T06:00:00-06:00", "2026-03-02T18:00:00-06:00"))
                .unwrap();
        assert_eq!(shift.operator_id().as_str(), "op-1");
        assert!((shift.duration_hours() - 12.0).abs() < f64::EPSILON);
        assert!(shift.id().is_none());
    }

    #[test]
    fn end_equal_to_start_rejected() {
        let err = Shift::try_from(input("2026-03-02T06:00:00Z", "2026-03-02T06:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, ShiftInputError::EndNotAfterStart { .. }));
    }

    #[test]
    fn end_before_start_rejected() {
        let err = Shift::try_from(input("2026-03-02T18:00:00Z", "2026-03-02T06:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, ShiftInputError::EndNotAfterStart { .. }));
    }

    #[test]
    fn timestamp_without_offset_rejected() {
        let err =
            Shift::try_from(input("2026-03-02T06:00:00", "2026-03-02T18:00:00Z")).unwrap_err();
        assert_eq!(
            err,
            ShiftInputError::InvalidTimestamp {
                field: "startTime",
                value: "2026-03-02T06:00:00".into(),
            }
        );
    }

    #[test]
    fn blank_operator_rejected() {
        let mut raw = input("2026-03-02T06:00:00Z", "2026-03-02T18:00:00Z");
        raw.operator_id = "  ".into();
        assert_eq!(
            Shift::try_from(raw).unwrap_err(),
            ShiftInputError::MissingOperator
        );
    }

    #[test]
    fn flags_default_to_false_on_the_wire() {
        let json = r#"{
            "operatorId": "op-9",
            "startTime": "2026-03-02T18:00:00+00:00",
            "endTime": "2026-03-03T06:00:00+00:00",
            "shiftType": "night"
        }"#;
        let shift: Shift = serde_json::from_str(json).unwrap();
        assert_eq!(shift.shift_type(), Some(ShiftType::Night));
        assert!(!shift.is_outage());
        assert!(!shift.is_overtime());
        assert!(!shift.is_overridden());
    }

    #[test]
    fn deserializing_invalid_shift_fails() {
        let json = r#"{
            "operatorId": "op-9",
            "startTime": "2026-03-03T06:00:00+00:00",
            "endTime": "2026-03-02T18:00:00+00:00"
        }"#;
        assert!(serde_json::from_str::<Shift>(json).is_err());
    }

    #[test]
    fn serializes_to_wire_shape() {
        let shift =
            Shift::try_from(input("2026-03-02T06:00:00+00:00", "2026-03-02T18:00:00+00:00"))
                .unwrap()
                .with_outage(true);
        let value = serde_json::to_value(&shift).unwrap();
        assert_eq!(value["operatorId"], "op-1");
        assert_eq!(value["isOutage"], true);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn overridden_copy_leaves_original_untouched() {
        let shift = Shift::try_from(input("2026-03-02T06:00:00Z", "2026-03-02T18:00:00Z"))
            .unwrap()
            .with_id(ShiftId::new());
        let copy = shift.overridden();
        assert!(copy.is_overridden());
        assert!(!shift.is_overridden());
        assert_eq!(copy.id(), shift.id());
    }

    #[test]
    fn one_minute_intersection_overlaps() {
        let a = Shift::try_from(input("2026-03-02T06:00:00Z", "2026-03-02T18:00:00Z")).unwrap();
        let b = Shift::try_from(input("2026-03-02T17:59:00Z", "2026-03-03T05:59:00Z")).unwrap();
        let c = Shift::try_from(input("2026-03-02T18:00:00Z", "2026-03-03T06:00:00Z")).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
