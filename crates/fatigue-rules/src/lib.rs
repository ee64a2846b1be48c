//! # fatigue-rules: Fatigue-Compliance Rule Engine
//!
//! Given a candidate shift and an operator's shift history, determines
//! work-set membership, evaluates every fatigue rule, and returns a
//! structured list of [`Violation`]s. It never decides whether a shift
//! may be scheduled; that decision belongs to the caller.
//!
//! ## Architecture
//!
//! - **Policy** (`policy.rs`): [`FatiguePolicy`], every numeric limit
//!   with RP-755 defaults, loadable from YAML/JSON.
//!
//! - **Work-sets** (`workset.rs`): the consecutive-shift chain (≤24h
//!   gaps) and the current work-set (34h/46h dynamic rest threshold).
//!
//! - **Evaluators** (`evaluators.rs`): shift length, rest period,
//!   consecutive count, work-set hours, overlap.
//!
//! - **Engine** (`engine.rs`): [`ComplianceEngine`], fixed-order
//!   aggregation plus the [`ComplianceEngine::dry_run`] feasibility check.
//!
//! ## Crate Policy
//!
//! - Every function is pure over its inputs: no I/O, no caching, no
//!   shared mutable state.
//! - Violations are returned, never raised.

pub mod engine;
pub mod evaluators;
pub mod policy;
pub mod violation;
pub mod workset;

pub use engine::{evaluate, ComplianceEngine, Feasibility, Verdict};
pub use evaluators::{EvaluationContext, RuleEvaluator};
pub use policy::{
    ConsecutiveLimit, ConsecutiveLimits, FatiguePolicy, PolicyError, WorkSetHourLimits,
    MAX_HISTORY_LOOKBACK_HOURS,
};
pub use violation::{Rule, Severity, Violation};
pub use workset::{consecutive_chain, current_work_set, ConsecutiveChain, WorkSet};
