//! # Error Types: Input Rejection
//!
//! Errors raised while turning caller input into engine input. The rule
//! engine itself never fails: policy violations are data, returned as
//! `Violation` values by `fatigue-rules`. Everything here is an *input*
//! error, rejected before evaluation starts.
//!
//! ## Design
//!
//! - Shift input errors carry the offending field and the raw value.
//! - Local-time resolution errors carry the wall-clock time that could
//!   not be mapped to a single instant.

use thiserror::Error;

/// Rejection of a single shift record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShiftInputError {
    /// The operator identifier was blank.
    #[error("operatorId must not be empty")]
    MissingOperator,

    /// A timestamp field did not parse as RFC 3339 with an offset.
    #[error("{field} is not an RFC 3339 timestamp with offset: {value:?}")]
    InvalidTimestamp {
        /// Field name on the wire (`startTime` or `endTime`).
        field: &'static str,
        /// The raw value received.
        value: String,
    },

    /// The shift does not end strictly after it starts.
    #[error("endTime {end} must be after startTime {start}")]
    EndNotAfterStart {
        /// Start as received.
        start: String,
        /// End as received.
        end: String,
    },

    /// A local wall-clock time falls in a daylight-saving gap.
    #[error("local time {local} does not exist in the shift's timezone")]
    NonexistentLocalTime {
        /// The unresolvable local date-time.
        local: String,
    },

    /// A local wall-clock time occurs twice (daylight-saving fold).
    #[error("local time {local} is ambiguous in the shift's timezone")]
    AmbiguousLocalTime {
        /// The ambiguous local date-time.
        local: String,
    },
}
