//! # Shift Store
//!
//! The persistence collaborator the gate reads history from and commits
//! accepted shifts to. [`InMemoryShiftStore`] is the reference
//! implementation; production stores wrap a database behind the same
//! trait.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use parking_lot::RwLock;

use fatigue_core::{OperatorId, Shift, ShiftId};

/// Errors raised by a [`ShiftStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A shift with this identity is already stored.
    #[error("shift {id} already exists")]
    Duplicate { id: ShiftId },

    /// The backing store failed.
    #[error("shift store failure: {0}")]
    Backend(String),
}

/// Read and write access to persisted shifts.
pub trait ShiftStore: Send + Sync {
    /// Every stored shift of `operator` that ends after `since`, ordered
    /// by start time.
    fn history(
        &self,
        operator: &OperatorId,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<Shift>, StoreError>;

    /// Persist a shift, assigning an identity if it has none. Returns the
    /// stored shift.
    fn insert(&self, shift: Shift) -> Result<Shift, StoreError>;
}

// -- In-Memory Store ----------------------------------------------------------

/// Thread-safe, cloneable in-memory shift store keyed by operator.
///
/// Clones share the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShiftStore {
    data: Arc<RwLock<HashMap<OperatorId, Vec<Shift>>>>,
}

impl InMemoryShiftStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shifts across all operators.
    pub fn len(&self) -> usize {
        self.data.read().values().map(Vec::len).sum()
    }

    /// Whether the store holds no shifts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ShiftStore for InMemoryShiftStore {
    fn history(
        &self,
        operator: &OperatorId,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<Shift>, StoreError> {
        let guard = self.data.read();
        let mut shifts: Vec<Shift> = guard
            .get(operator)
            .map(|all| all.iter().filter(|s| s.end_time() > since).cloned().collect())
            .unwrap_or_default();
        shifts.sort_by_key(Shift::start_time);
        Ok(shifts)
    }

    fn insert(&self, shift: Shift) -> Result<Shift, StoreError> {
        let shift = match shift.id() {
            Some(_) => shift,
            None => shift.with_id(ShiftId::new()),
        };
        let mut guard = self.data.write();
        let entries = guard.entry(shift.operator_id().clone()).or_default();
        if let Some(id) = shift.id() {
            if entries.iter().any(|s| s.id() == Some(id)) {
                return Err(StoreError::Duplicate { id });
            }
        }
        entries.push(shift.clone());
        Ok(shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-02-09T07:00:00+01:00").unwrap()
    }

    fn shift(operator: &str, start_h: i64, len_h: i64) -> Shift {
        let start = base() + Duration::hours(start_h);
        Shift::new(OperatorId::new(operator), start, start + Duration::hours(len_h)).unwrap()
    }

    #[test]
    fn insert_assigns_identity() {
        let store = InMemoryShiftStore::new();
        let stored = store.insert(shift("op-1", 0, 12)).unwrap();
        assert!(stored.id().is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn duplicate_identity_rejected() {
        let store = InMemoryShiftStore::new();
        let stored = store.insert(shift("op-1", 0, 12)).unwrap();
        let err = store.insert(stored).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[test]
    fn history_is_scoped_and_windowed() {
        let store = InMemoryShiftStore::new();
        store.insert(shift("op-1", 48, 12)).unwrap();
        store.insert(shift("op-1", 0, 12)).unwrap();
        store.insert(shift("op-2", 24, 12)).unwrap();

        let all = store.history(&OperatorId::new("op-1"), base() - Duration::hours(1)).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].start_time() < all[1].start_time());

        let recent = store.history(&OperatorId::new("op-1"), base() + Duration::hours(12)).unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn clones_share_data() {
        let store = InMemoryShiftStore::new();
        let clone = store.clone();
        clone.insert(shift("op-1", 0, 8)).unwrap();
        assert!(!store.is_empty());
    }
}
