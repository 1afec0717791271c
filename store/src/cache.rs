//! Write-through cache over a [`KvStore`].
//!
//! A `CacheStore` buffers puts and deletes in memory and serves reads from the
//! buffer first, falling back to the parent. Nothing reaches the parent until
//! [`CacheStore::commit`]; dropping the cache discards every staged write.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::{KeyRange, KvRead, KvStore, KvWrite, StoreError, WriteBatch};

/// Staged writes over a parent store. `None` marks a deleted key.
pub struct CacheStore<'a, S: ?Sized> {
    parent: &'a S,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvRead + ?Sized> CacheStore<'a, S> {
    pub fn new(parent: &'a S) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Convert the staged writes into a batch, in key order.
    pub fn into_batch(self) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for (key, value) in self.writes {
            match value {
                Some(value) => batch.put(key, value),
                None => batch.delete(key),
            }
        }
        batch
    }
}

impl<'a, S: KvStore + ?Sized> CacheStore<'a, S> {
    /// Apply every staged write to the parent atomically. Returns the number
    /// of operations written.
    pub fn commit(self) -> Result<usize, StoreError> {
        let parent = self.parent;
        let batch = self.into_batch();
        let ops = batch.len();
        if ops > 0 {
            parent.apply(batch)?;
        }
        tracing::trace!(ops, "cache store committed");
        Ok(ops)
    }
}

impl<'a, S: KvRead + ?Sized> KvRead for CacheStore<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.writes.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.parent.get(key),
        }
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
        let mut staged = self
            .writes
            .range::<[u8], _>((Bound::Included(range.start.as_slice()), upper))
            .peekable();
        let mut stopped = false;

        // Merge the parent's entries with the staged ones in key order.
        self.parent.scan(range, &mut |key, value| {
            while let Some((k, v)) = staged.next_if(|(k, _)| k.as_slice() < key) {
                if let Some(v) = v {
                    if visit(k.as_slice(), v.as_slice()) {
                        stopped = true;
                        return true;
                    }
                }
            }
            if let Some((_, v)) = staged.next_if(|(k, _)| k.as_slice() == key) {
                return match v {
                    Some(v) => {
                        stopped = visit(key, v.as_slice());
                        stopped
                    }
                    None => false,
                };
            }
            stopped = visit(key, value);
            stopped
        })?;

        if !stopped {
            for (k, v) in staged {
                if let Some(v) = v {
                    if visit(k.as_slice(), v.as_slice()) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<'a, S: KvRead + ?Sized> KvWrite for CacheStore<'a, S> {
    fn put(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}
