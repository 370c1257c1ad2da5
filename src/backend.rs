//! Pluggable in-memory collections.
//!
//! Implement [`RecordMap`] to bring your own concurrent map.

use crate::record::{Record, RecordId};
use std::collections::HashMap;

/// Map from id to record that backs a [`RecordStore`](crate::RecordStore).
///
/// Every single-record method must be atomic on its own: a concurrent reader
/// sees either the old record or the new one. The store serializes whole
/// operations on top of that, so backends never need cross-record locking.
///
/// Methods work with owned records so the store API stays uniform regardless
/// of how the backend keeps them; reads clone.
pub trait RecordMap: Send + Sync {
    /// Insert or replace, returning the previous record under that id.
    fn insert(&self, record: Record) -> Option<Record>;

    /// Look up a record by id.
    fn get(&self, id: RecordId) -> Option<Record>;

    /// Remove a record, returning it if it was present.
    fn remove(&self, id: RecordId) -> Option<Record>;

    /// Snapshot of all records in no particular order.
    fn snapshot(&self) -> Vec<Record>;

    /// Number of records.
    fn len(&self) -> usize;

    /// `true` when the map holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check for an id without cloning the record. Override when the backend
    /// can do this cheaply.
    fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Drop every record. The default removes one id at a time; override with
    /// the backend's native clear when available.
    fn clear(&self) {
        for record in self.snapshot() {
            self.remove(record.id);
        }
    }
}

// ---- RwLock<HashMap> ---------------------------------------------------------

impl RecordMap for parking_lot::RwLock<HashMap<RecordId, Record>> {
    fn insert(&self, record: Record) -> Option<Record> {
        self.write().insert(record.id, record)
    }

    fn get(&self, id: RecordId) -> Option<Record> {
        self.read().get(&id).cloned()
    }

    fn remove(&self, id: RecordId) -> Option<Record> {
        self.write().remove(&id)
    }

    fn snapshot(&self) -> Vec<Record> {
        self.read().values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.read().len()
    }

    fn contains(&self, id: RecordId) -> bool {
        self.read().contains_key(&id)
    }

    fn clear(&self) {
        self.write().clear()
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl RecordMap for dashmap::DashMap<RecordId, Record> {
    fn insert(&self, record: Record) -> Option<Record> {
        dashmap::DashMap::insert(self, record.id, record)
    }

    fn get(&self, id: RecordId) -> Option<Record> {
        dashmap::DashMap::get(self, &id).map(|r| r.value().clone())
    }

    fn remove(&self, id: RecordId) -> Option<Record> {
        dashmap::DashMap::remove(self, &id).map(|(_, v)| v)
    }

    fn snapshot(&self) -> Vec<Record> {
        self.iter().map(|r| r.value().clone()).collect()
    }

    fn len(&self) -> usize {
        dashmap::DashMap::len(self)
    }

    fn contains(&self, id: RecordId) -> bool {
        dashmap::DashMap::contains_key(self, &id)
    }

    fn clear(&self) {
        dashmap::DashMap::clear(self)
    }
}
