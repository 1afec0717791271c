//! Key-value access traits.

use crate::{KeyRange, StoreError, WriteBatch};

/// Read access to an ordered key-value space.
pub trait KvRead {
    /// Point lookup. `Ok(None)` means the key is absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Visit every entry in `range` in ascending key order.
    ///
    /// `visit` returns `true` to stop the scan early; no further entries are
    /// read after that.
    fn scan(
        &self,
        range: &KeyRange,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError>;

    /// Whether `key` is present.
    fn contains(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Staged write access. Writes are visible to subsequent reads through the
/// same handle but reach the backend only when committed.
pub trait KvWrite: KvRead {
    fn put(&mut self, key: &[u8], value: &[u8]);

    fn delete(&mut self, key: &[u8]);
}

/// A durable backend. Batches are applied atomically: either every operation
/// becomes visible or none does.
pub trait KvStore: KvRead {
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

impl<T: KvRead + ?Sized> KvRead for &T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn scan(
        &self,
        range: &KeyRange,
        visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) -> Result<(), StoreError> {
        (**self).scan(range, visit)
    }
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).apply(batch)
    }
}
