//! # fatigue-core: Foundational Types for the Fatigue-Compliance Stack
//!
//! Every other crate in the workspace depends on `fatigue-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated shifts.** A [`Shift`] can only be constructed with a
//!    named operator and `end_time > start_time`. Input errors are caught
//!    at the wire boundary ([`ShiftInput`] → [`Shift`]) and never reach
//!    the rule engine.
//!
//! 2. **Newtype identifiers.** [`OperatorId`] and [`ShiftId`] are distinct
//!    types.
//!
//! 3. **Offset-aware instants.** Shift boundaries are
//!    `DateTime<FixedOffset>`; local calendar times go through
//!    [`ShiftWindow::resolve`], which refuses daylight-saving gaps and folds.
//!
//! 4. **Authoritative shift type.** [`classify_night`] trusts a declared
//!    `day`/`night` type and only infers from clock hours as a logged
//!    fallback.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fatigue-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod shift;
pub mod temporal;

pub use error::ShiftInputError;
pub use identity::{OperatorId, ShiftId};
pub use shift::{Shift, ShiftInput, ShiftType};
pub use temporal::{
    classify_night, hours_between, is_night_shift, NightClassification, ShiftWindow, Timestamp,
};
