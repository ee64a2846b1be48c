//! # fatigue-gate: Per-Operator Schedule Gate
//!
//! The rule engine is pure: it evaluates whatever history it is handed.
//! Scheduling additionally needs the history to be current at the moment
//! of commit. This crate closes that gap.
//!
//! ## Architecture
//!
//! - **Store** (`store.rs`): [`ShiftStore`], the persistence seam, and
//!   [`InMemoryShiftStore`], a `parking_lot`-guarded reference store.
//!
//! - **Gate** (`gate.rs`): [`ScheduleGate`], which holds a per-operator
//!   lock across fetch-history, evaluate, and insert, and applies the
//!   caller's [`Admission`].
//!
//! ## Crate Policy
//!
//! - Locks are never held across calls into a different operator's lock.
//! - Overlapping shifts are never committed, whatever the admission.

pub mod gate;
pub mod store;

pub use gate::{Admission, GateError, ScheduleGate, ScheduleOutcome};
pub use store::{InMemoryShiftStore, ShiftStore, StoreError};
