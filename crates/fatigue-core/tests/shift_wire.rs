//! # Shift Wire Format and Time Arithmetic
//!
//! Checks the JSON shape shifts arrive in, the validation applied while
//! decoding it, and the arithmetic invariants the rule engine relies on.

use chrono::{DateTime, Duration, FixedOffset};
use fatigue_core::{hours_between, is_night_shift, OperatorId, Shift, ShiftInputError, ShiftType};

fn parse(json: &str) -> Result<Shift, serde_json::Error> {
    serde_json::from_str(json)
}

#[test]
fn decodes_camel_case_wire_shape() {
    let shift = parse(
        r#"{
            "operatorId": "op-12",
            "startTime": "2026-01-05T18:00:00-06:00",
            "endTime": "2026-01-06T06:00:00-06:00",
            "shiftType": "night",
            "isOutage": true
        }"#,
    )
    .unwrap();

    assert_eq!(shift.operator_id().as_str(), "op-12");
    assert_eq!(shift.duration_hours(), 12.0);
    assert_eq!(shift.shift_type(), Some(ShiftType::Night));
    assert!(shift.is_outage());
    assert!(!shift.is_overtime());
    assert!(!shift.is_overridden());
    assert!(shift.id().is_none());
}

#[test]
fn rejects_inverted_interval() {
    let err = parse(
        r#"{
            "operatorId": "op-12",
            "startTime": "2026-01-05T18:00:00Z",
            "endTime": "2026-01-05T18:00:00Z"
        }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("end"), "{err}");
}

#[test]
fn rejects_offsetless_timestamp() {
    assert!(parse(
        r#"{
            "operatorId": "op-12",
            "startTime": "2026-01-05T18:00:00",
            "endTime": "2026-01-06T06:00:00Z"
        }"#,
    )
    .is_err());
}

#[test]
fn rejects_blank_operator() {
    let start = DateTime::parse_from_rfc3339("2026-01-05T06:00:00Z").unwrap();
    let err = Shift::new(OperatorId::new("  "), start, start + Duration::hours(8)).unwrap_err();
    assert_eq!(err, ShiftInputError::MissingOperator);
}

#[test]
fn declared_type_wins_over_clock_hours() {
    // 05:30 start would be inferred as a night shift.
    let shift = parse(
        r#"{
            "operatorId": "op-12",
            "startTime": "2026-01-05T05:30:00Z",
            "endTime": "2026-01-05T17:30:00Z",
            "shiftType": "day"
        }"#,
    )
    .unwrap();
    assert!(!is_night_shift(&shift));
}

#[test]
fn round_trips_through_json() {
    let json = r#"{"operatorId":"op-3","startTime":"2026-01-05T06:00:00+02:00","endTime":"2026-01-05T18:00:00+02:00","isOutage":false,"isOvertime":true,"isOverridden":false}"#;
    let shift = parse(json).unwrap();
    let again: Shift = serde_json::from_str(&serde_json::to_string(&shift).unwrap()).unwrap();
    assert_eq!(shift, again);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn base() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00+09:30").unwrap()
    }

    proptest! {
        #[test]
        fn hours_between_is_antisymmetric(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let x = base() + Duration::seconds(a);
            let y = base() + Duration::seconds(b);
            prop_assert_eq!(hours_between(x, y), -hours_between(y, x));
        }

        #[test]
        fn hours_between_ignores_offset(secs in 0i64..200_000, offset_h in -12i32..14) {
            let a = base();
            let b = a + Duration::seconds(secs);
            let tz = FixedOffset::east_opt(offset_h * 3600).unwrap();
            prop_assert_eq!(
                hours_between(a, b),
                hours_between(a.with_timezone(&tz), b.with_timezone(&tz))
            );
        }

        #[test]
        fn shift_accepts_exactly_positive_lengths(len in -3_600i64..86_400) {
            let start = base();
            let result = Shift::new(OperatorId::new("op-1"), start, start + Duration::seconds(len));
            prop_assert_eq!(result.is_ok(), len > 0);
        }
    }
}
