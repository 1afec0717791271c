//! Nullable store: thread-safe in-memory key-value storage for testing.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Mutex;

use tru_store::{KeyRange, KvRead, KvStore, StoreError, WriteBatch, WriteOp};

/// An ordered in-memory key-value store.
///
/// Scans copy the matching entries out before visiting them, so a visitor
/// may freely read the store again.
pub struct NullStore {
    entries: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
    batches: Mutex<usize>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            batches: Mutex::new(0),
        }
    }

    /// A copy of every entry, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of non-empty batches applied so far.
    pub fn batches_applied(&self) -> usize {
        *self.batches.lock().unwrap()
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvRead for NullStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn scan(
        &self,
        range: &KeyRange,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError> {
        if let Some(end) = &range.end {
            if end.as_slice() <= range.start.as_slice() {
                return Ok(());
            }
        }
        let upper = match &range.end {
            Some(end) => Bound::Excluded(end.as_slice()),
            None => Bound::Unbounded,
        };
        let matching: Vec<(Vec<u8>, Vec<u8>)> = self
            .entries
            .lock()
            .unwrap()
            .range::<[u8], _>((Bound::Included(range.start.as_slice()), upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (key, value) in &matching {
            if visit(key, value) {
                break;
            }
        }
        Ok(())
    }
}

impl KvStore for NullStore {
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut entries = self.entries.lock().unwrap();
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { key, value } => {
                    entries.insert(key, value);
                }
                WriteOp::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }
        *self.batches.lock().unwrap() += 1;
        Ok(())
    }
}
