//! # Concurrent Scheduling
//!
//! Many threads racing to schedule shifts for the same operator must end
//! with a history the engine would itself accept: no overlaps, and no
//! shift committed against a history that was missing an earlier commit.

use std::thread;

use chrono::{DateTime, Duration, FixedOffset};
use fatigue_core::{OperatorId, Shift, ShiftType};
use fatigue_gate::{Admission, GateError, InMemoryShiftStore, ScheduleGate, ShiftStore};
use fatigue_rules::{ComplianceEngine, Verdict};

fn base() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-07-13T06:00:00-07:00").unwrap()
}

fn shift(operator: &str, start_h: i64, len_h: i64) -> Shift {
    let start = base() + Duration::hours(start_h);
    Shift::new(OperatorId::new(operator), start, start + Duration::hours(len_h))
        .unwrap()
        .with_type(ShiftType::Day)
}

#[test]
fn identical_requests_commit_exactly_once() {
    let gate = ScheduleGate::new(InMemoryShiftStore::new());

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| gate.schedule(shift("op-1", 0, 12), false, Admission::Strict)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let committed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(committed, 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert!(matches!(
            err,
            GateError::Rejected {
                verdict: Verdict::Blocked,
                ..
            }
        ));
    }
    assert_eq!(gate.store().len(), 1);
}

#[test]
fn operators_do_not_block_each_other() {
    let gate = ScheduleGate::new(InMemoryShiftStore::new());

    thread::scope(|s| {
        for n in 0..6 {
            let gate = &gate;
            s.spawn(move || {
                let operator = format!("op-{n}");
                gate.schedule(shift(&operator, 0, 12), false, Admission::Strict)
                    .unwrap();
            });
        }
    });

    assert_eq!(gate.store().len(), 6);
}

#[test]
fn racing_week_never_commits_an_overlap() {
    let gate = ScheduleGate::new(InMemoryShiftStore::new());

    // Eight daily 12h shifts, each raced by a copy two hours later.
    thread::scope(|s| {
        for day in 0..8 {
            for offset in [0, 2] {
                let gate = &gate;
                s.spawn(move || {
                    let _ = gate.schedule(shift("op-9", day * 24 + offset, 12), false, Admission::Strict);
                });
            }
        }
    });

    let history = gate
        .store()
        .history(&OperatorId::new("op-9"), base() - Duration::days(1))
        .unwrap();
    assert!(history.len() >= 7, "only {} committed", history.len());
    for (i, a) in history.iter().enumerate() {
        for b in &history[i + 1..] {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }
    }

    // Every committed shift is visible to later checks.
    let engine = ComplianceEngine::default();
    for committed in &history {
        let duplicate = Shift::new(OperatorId::new("op-9"), committed.start_time(), committed.end_time())
            .unwrap();
        assert_eq!(engine.dry_run(&duplicate, &history, false).verdict, Verdict::Blocked);
        assert_eq!(gate.check(&duplicate, false).unwrap().verdict, Verdict::Blocked);
    }
}
