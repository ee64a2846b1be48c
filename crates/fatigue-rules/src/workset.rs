//! # Work-Set Resolution
//!
//! Walks an operator's history backward from a candidate shift and
//! derives the two groupings the rules depend on:
//!
//! - [`ConsecutiveChain`]: shifts separated by gaps of at most
//!   `consecutive_gap_hours` (24h). Bounds the *count* of back-to-back
//!   shifts.
//! - [`WorkSet`]: shifts separated by gaps below the work-set rest
//!   threshold. Bounds *cumulative hours*.
//!
//! ## Dynamic Threshold
//!
//! ```text
//! threshold = 34h                      while nights(set) < 4
//! threshold = 46h                      once  nights(set) ≥ 4
//! ```
//!
//! The night count only grows as the walk extends backward, so the
//! threshold only rises and membership is monotonic: extending the walk
//! never evicts a shift already admitted.
//!
//! Both groupings are recomputed on every call. Nothing is cached, since
//! the history snapshot may differ between calls.

use fatigue_core::{hours_between, is_night_shift, Shift};

use crate::policy::FatiguePolicy;

/// Shifts immediately preceding a candidate with no gap over the
/// consecutive-gap limit. Chronological, candidate excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsecutiveChain {
    pub shifts: Vec<Shift>,
    pub night_shift_count: usize,
}

impl ConsecutiveChain {
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

/// The duty period a candidate shift would extend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkSet {
    /// Member shifts, chronological, candidate excluded.
    pub shifts: Vec<Shift>,
    /// Sum of member shift lengths.
    pub total_hours: f64,
    /// Members classified as night shifts.
    pub night_shift_count: usize,
    /// Members longer than the maximum shift length.
    pub extended_shift_count: usize,
    /// Any member longer than the maximum shift length.
    pub has_extended_shifts: bool,
    /// Any member worked under outage rules.
    pub is_outage: bool,
    /// Rest threshold in force when the walk stopped.
    pub threshold_hours: f64,
}

impl WorkSet {
    /// Whether no member is a night shift. Vacuously true when empty.
    pub fn all_day_shifts(&self) -> bool {
        self.night_shift_count == 0
    }
}

/// History shifts that end at or before the candidate starts, latest
/// start first.
fn preceding<'a>(candidate: &Shift, history: &'a [Shift]) -> Vec<&'a Shift> {
    let mut prior: Vec<&Shift> = history
        .iter()
        .filter(|s| s.end_time() <= candidate.start_time())
        .collect();
    prior.sort_by(|a, b| b.start_time().cmp(&a.start_time()));
    prior
}

/// Resolve the consecutive-shift chain ending at `candidate`.
pub fn consecutive_chain(
    candidate: &Shift,
    history: &[Shift],
    policy: &FatiguePolicy,
) -> ConsecutiveChain {
    let mut chain = ConsecutiveChain::default();
    let mut next_start = candidate.start_time();

    for shift in preceding(candidate, history) {
        let gap = hours_between(shift.end_time(), next_start);
        if gap > policy.consecutive_gap_hours {
            break;
        }
        if is_night_shift(shift) {
            chain.night_shift_count += 1;
        }
        next_start = shift.start_time();
        chain.shifts.push(shift.clone());
    }
    chain.shifts.reverse();

    tracing::debug!(
        operator = %candidate.operator_id(),
        length = chain.len(),
        nights = chain.night_shift_count,
        "resolved consecutive chain"
    );
    chain
}

/// Resolve the current work-set the candidate would extend.
pub fn current_work_set(candidate: &Shift, history: &[Shift], policy: &FatiguePolicy) -> WorkSet {
    let mut ws = WorkSet::default();
    let mut next_start = candidate.start_time();

    for shift in preceding(candidate, history) {
        let threshold = policy.required_work_set_rest(ws.night_shift_count);
        let gap = hours_between(shift.end_time(), next_start);
        if gap >= threshold {
            break;
        }

        let hours = shift.duration_hours();
        ws.total_hours += hours;
        if is_night_shift(shift) {
            ws.night_shift_count += 1;
        }
        if hours > policy.max_shift_hours {
            ws.extended_shift_count += 1;
            ws.has_extended_shifts = true;
        }
        ws.is_outage |= shift.is_outage();
        next_start = shift.start_time();
        ws.shifts.push(shift.clone());
    }
    ws.shifts.reverse();
    ws.threshold_hours = policy.required_work_set_rest(ws.night_shift_count);

    tracing::debug!(
        operator = %candidate.operator_id(),
        shifts = ws.shifts.len(),
        total_hours = ws.total_hours,
        nights = ws.night_shift_count,
        threshold = ws.threshold_hours,
        "resolved work-set"
    );
    ws
}
