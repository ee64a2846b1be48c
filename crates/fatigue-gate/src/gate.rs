//! # Schedule Gate
//!
//! Makes "fetch history → evaluate → persist" atomic per operator. Two
//! concurrent requests for the same operator are serialized, so the
//! second always evaluates against a history that includes the first.
//! Requests for different operators never contend.
//!
//! The caller states up front how violations may be admitted:
//!
//! - [`Admission::Strict`]: commit only a clean shift.
//! - [`Admission::WithException`]: also commit when an accepted
//!   [`ExceptionRecord`] covers every violation. The shift is stored
//!   with `is_overridden` set.
//!
//! A shift with an exception-ineligible violation (overlap) is never
//! committed.
//!
//! Per-operator locks live only while a request for that operator is in
//! flight. The lock table holds at most one entry per operator with a
//! concurrent `schedule` call, and is empty when the gate is idle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use fatigue_core::{OperatorId, Shift};
use fatigue_exception::ExceptionRecord;
use fatigue_rules::{ComplianceEngine, Feasibility, Verdict, Violation};

use crate::store::{ShiftStore, StoreError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How violations found at commit time may be admitted.
#[derive(Debug, Clone)]
pub enum Admission {
    /// Only a shift with no violations is committed.
    Strict,
    /// Violations covered by this accepted exception are admitted.
    WithException(Box<ExceptionRecord>),
}

/// A committed shift and the violations it was admitted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub shift: Shift,
    pub verdict: Verdict,
    pub violations: Vec<Violation>,
}

/// Reasons a shift was not committed.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The violations found cannot be admitted under the requested
    /// admission.
    #[error("shift not admitted ({verdict:?}): {} violation(s)", .violations.len())]
    Rejected {
        verdict: Verdict,
        violations: Vec<Violation>,
    },

    /// The exception record does not cover the violations found at
    /// commit time.
    #[error("exception record for {operator} does not cover the violations found")]
    ExceptionMismatch {
        operator: OperatorId,
        violations: Vec<Violation>,
    },

    /// The history window reaches outside the representable time range.
    #[error("history lookback of {hours}h from {start} is out of range")]
    LookbackOutOfRange { start: String, hours: f64 },

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// ScheduleGate
// ---------------------------------------------------------------------------

/// Commits shifts to a [`ShiftStore`] under per-operator locking.
#[derive(Debug)]
pub struct ScheduleGate<S> {
    store: S,
    engine: ComplianceEngine,
    locks: Mutex<HashMap<OperatorId, Arc<Mutex<()>>>>,
}

impl<S: ShiftStore> ScheduleGate<S> {
    /// Create a gate using the default policy.
    pub fn new(store: S) -> Self {
        Self::with_engine(store, ComplianceEngine::default())
    }

    /// Create a gate around a configured engine.
    pub fn with_engine(store: S, engine: ComplianceEngine) -> Self {
        Self {
            store,
            engine,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The engine evaluations run through.
    pub fn engine(&self) -> &ComplianceEngine {
        &self.engine
    }

    /// Predict the outcome of scheduling `candidate` against the current
    /// stored history. Takes no lock; the answer may be stale by the time
    /// [`ScheduleGate::schedule`] runs.
    pub fn check(&self, candidate: &Shift, is_outage: bool) -> Result<Feasibility, GateError> {
        let history = self.history_for(candidate)?;
        Ok(self.engine.dry_run(candidate, &history, is_outage))
    }

    /// Evaluate `candidate` against fresh history and commit it if the
    /// admission allows.
    pub fn schedule(
        &self,
        candidate: Shift,
        is_outage: bool,
        admission: Admission,
    ) -> Result<ScheduleOutcome, GateError> {
        let operator = candidate.operator_id().clone();
        let lock = self.operator_lock(&operator);
        let result = {
            let _guard = lock.lock();
            self.schedule_locked(candidate, is_outage, admission)
        };
        self.release_lock(&operator, lock);
        result
    }

    fn schedule_locked(
        &self,
        candidate: Shift,
        is_outage: bool,
        admission: Admission,
    ) -> Result<ScheduleOutcome, GateError> {
        let history = self.history_for(&candidate)?;
        let Feasibility { verdict, violations } =
            self.engine.dry_run(&candidate, &history, is_outage);

        let to_commit = match (verdict, &admission) {
            (Verdict::Clear, _) => candidate,
            (Verdict::Blocked, _) | (_, Admission::Strict) => {
                tracing::info!(
                    operator = %candidate.operator_id(),
                    ?verdict,
                    violations = violations.len(),
                    "shift rejected"
                );
                return Err(GateError::Rejected { verdict, violations });
            }
            (_, Admission::WithException(record)) => {
                if !record.covers(&candidate, &violations) {
                    tracing::info!(
                        operator = %candidate.operator_id(),
                        violations = violations.len(),
                        "exception record does not cover violations"
                    );
                    return Err(GateError::ExceptionMismatch {
                        operator: candidate.operator_id().clone(),
                        violations,
                    });
                }
                candidate.overridden()
            }
        };

        let shift = self.store.insert(to_commit)?;
        tracing::info!(
            operator = %shift.operator_id(),
            shift_id = ?shift.id(),
            ?verdict,
            overridden = shift.is_overridden(),
            "shift committed"
        );
        Ok(ScheduleOutcome {
            shift,
            verdict,
            violations,
        })
    }

    fn history_for(&self, candidate: &Shift) -> Result<Vec<Shift>, GateError> {
        let hours = self.engine.policy().history_lookback_hours;
        let since = candidate
            .start_time()
            .checked_sub_signed(Duration::milliseconds((hours * 3_600_000.0) as i64))
            .ok_or_else(|| GateError::LookbackOutOfRange {
                start: candidate.start_time().to_rfc3339(),
                hours,
            })?;
        Ok(self.store.history(candidate.operator_id(), since)?)
    }

    fn operator_lock(&self, operator: &OperatorId) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().entry(operator.clone()).or_default())
    }

    /// Drop the operator's lock entry unless another request holds a
    /// clone. Clones are only taken under the table lock, so a count of
    /// two (table + `lock`) means no one else is waiting.
    fn release_lock(&self, operator: &OperatorId, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(operator);
        }
    }
}
