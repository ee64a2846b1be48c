//! # fatigue-exception: Exception Workflow
//!
//! Lets a fatigue violation be knowingly overridden with documented
//! justification and approval.
//!
//! ## Architecture
//!
//! - **Request** (`request.rs`): [`ExceptionRequest`] built from engine
//!   violations plus a [`JustificationPacket`], and
//!   [`validate_exception`], which lists every missing field.
//!
//! - **Workflow** (`workflow.rs`): [`ShiftCompliance`], the per-shift
//!   state machine `CLEAN | VIOLATED → EXCEPTION_PENDING →
//!   EXCEPTION_VALID | EXCEPTION_INVALID`, producing an auditable
//!   [`ExceptionRecord`].
//!
//! ## Crate Policy
//!
//! - Depends only on the violation shape from `fatigue-rules`.
//! - Violations that are not exception-eligible (overlap) are refused at
//!   request construction and can never be cleared.
//! - Validation never fails; incompleteness is a list of messages.

pub mod request;
pub mod workflow;

pub use request::{validate_exception, ExceptionRequest, JustificationPacket};
pub use workflow::{
    ComplianceState, ComplianceTransitionRecord, ExceptionError, ExceptionRecord, ShiftCompliance,
};
