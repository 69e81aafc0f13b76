//! In-memory record store.
//!
//! Keeps every player's record in a `HashMap`; nothing survives the
//! process.  Used by tests and by hosts that persist records themselves.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::errors::Result;
use crate::player::PlayerId;
use crate::vault::RecordStore;

/// Thread-safe in-memory `RecordStore`.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<PlayerId, BTreeMap<String, String>>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `get` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `set` calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of one player's whole record.
    pub fn snapshot(&self, player: &PlayerId) -> BTreeMap<String, String> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(player)
            .cloned()
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, player: &PlayerId, key: &str) -> Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(player).and_then(|r| r.get(key)).cloned())
    }

    fn set(&self, player: &PlayerId, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records
            .entry(player.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self, player: &PlayerId) -> Result<Vec<String>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .get(player)
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_isolated_per_player() {
        let store = MemoryRecordStore::new();
        let a = PlayerId::new("a").unwrap();
        let b = PlayerId::new("b").unwrap();

        store.set(&a, "k", "1").unwrap();
        assert_eq!(store.get(&a, "k").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get(&b, "k").unwrap(), None);
        assert!(store.keys(&b).unwrap().is_empty());
    }

    #[test]
    fn counts_reads_and_writes() {
        let store = MemoryRecordStore::new();
        let a = PlayerId::new("a").unwrap();
        store.set(&a, "k", "v").unwrap();
        let _ = store.get(&a, "k").unwrap();
        let _ = store.get(&a, "other").unwrap();
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read_count(), 2);
    }
}
