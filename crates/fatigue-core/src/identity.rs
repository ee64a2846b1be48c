//! # Identity Newtypes
//!
//! Newtype wrappers for operator and shift identifiers. An `OperatorId`
//! cannot be passed where a `ShiftId` is expected.
//!
//! Operator identifiers are opaque strings supplied by the personnel
//! system. Shift identifiers are UUIDs assigned at persistence time; a
//! candidate shift has none.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of the operator a shift belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorId(pub String);

/// Identifier of a persisted shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftId(pub Uuid);

impl OperatorId {
    /// Wrap an operator identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ShiftId {
    /// Generate a new random shift identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ShiftId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operator:{}", self.0)
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "shift:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_ids_are_unique() {
        assert_ne!(ShiftId::new(), ShiftId::new());
    }

    #[test]
    fn display_prefixes_namespace() {
        assert_eq!(OperatorId::new("op-7").to_string(), "operator:op-7");
        let id = ShiftId::new();
        assert!(id.to_string().starts_with("shift:"));
    }

    #[test]
    fn operator_id_serializes_as_bare_string() {
        let json = serde_json::to_string(&OperatorId::new("op-7")).unwrap();
        assert_eq!(json, "\"op-7\"");
    }
}
