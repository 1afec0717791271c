//! LMDB implementation of the key-value traits.
//!
//! Keys are raw bytes compared lexicographically by LMDB, which is exactly the
//! order [`KvRead::scan`] promises.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use tru_store::{KeyRange, KvRead, KvStore, StoreError, WriteBatch, WriteOp};

use crate::LmdbError;

pub struct LmdbKvStore {
    env: Arc<Env>,
    db: Database<Bytes, Bytes>,
}

impl LmdbKvStore {
    pub(crate) fn new(env: Arc<Env>, db: Database<Bytes, Bytes>) -> Self {
        Self { env, db }
    }

    /// Number of entries in the database.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl KvRead for LmdbKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.map(|v| v.to_vec()))
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
        // LMDB rejects zero-length keys, so an empty start means "from the first key".
        let lower = if range.start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(range.start.as_slice())
        };
        let bounds = (lower, upper);

        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.db.range(&rtxn, &bounds).map_err(LmdbError::from)?;
        for result in iter {
            let (key, val) = result.map_err(LmdbError::from)?;
            if visit(key, val) {
                break;
            }
        }
        Ok(())
    }
}

impl KvStore for LmdbKvStore {
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let ops = batch.len();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { key, value } => {
                    self.db
                        .put(&mut wtxn, &key, &value)
                        .map_err(LmdbError::from)?;
                }
                WriteOp::Delete { key } => {
                    self.db.delete(&mut wtxn, &key).map_err(LmdbError::from)?;
                }
            }
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(ops, "applied write batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;

    /// Helper: open a temporary LMDB environment.
    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024)
            .expect("failed to open env");
        (dir, env)
    }

    fn scan_keys(store: &LmdbKvStore, range: &KeyRange) -> Vec<Vec<u8>> {
        let mut keys = Vec::new();
        store
            .scan(range, &mut |k, _| {
                keys.push(k.to_vec());
                false
            })
            .expect("scan");
        keys
    }

    #[test]
    fn batch_put_and_get() {
        let (_dir, env) = temp_env();
        let store = env.kv_store();

        let mut batch = WriteBatch::new();
        batch.put(b"k1".to_vec(), b"v1".to_vec());
        batch.put(b"k2".to_vec(), b"v2".to_vec());
        store.apply(batch).expect("apply");

        assert_eq!(store.get(b"k1").unwrap(), Some(b"v1".to_vec()));
        assert_eq!(store.get(b"k2").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(store.get(b"k3").unwrap(), None);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn later_op_on_same_key_wins() {
        let (_dir, env) = temp_env();
        let store = env.kv_store();

        let mut batch = WriteBatch::new();
        batch.put(b"k".to_vec(), b"first".to_vec());
        batch.delete(b"k".to_vec());
        batch.put(b"j".to_vec(), b"x".to_vec());
        batch.put(b"j".to_vec(), b"y".to_vec());
        store.apply(batch).expect("apply");

        assert_eq!(store.get(b"k").unwrap(), None);
        assert_eq!(store.get(b"j").unwrap(), Some(b"y".to_vec()));
    }

    #[test]
    fn scan_is_ordered_and_bounded() {
        let (_dir, env) = temp_env();
        let store = env.kv_store();

        let mut batch = WriteBatch::new();
        for k in [[0x30, 3], [0x30, 1], [0x31, 0], [0x30, 2]] {
            batch.put(k.to_vec(), vec![]);
        }
        store.apply(batch).expect("apply");

        let keys = scan_keys(&store, &KeyRange::prefix(&[0x30]));
        assert_eq!(keys, vec![vec![0x30, 1], vec![0x30, 2], vec![0x30, 3]]);

        let mut first = Vec::new();
        store
            .scan(&KeyRange::new(vec![], None), &mut |k, _| {
                first.push(k.to_vec());
                true
            })
            .unwrap();
        assert_eq!(first, vec![vec![0x30, 1]]);
    }

    #[test]
    fn scan_from_empty_start_covers_every_key() {
        let (_dir, env) = temp_env();
        let store = env.kv_store();

        let mut batch = WriteBatch::new();
        for k in [[0x02, 0], [0x00, 9], [0xff, 1]] {
            batch.put(k.to_vec(), vec![1]);
        }
        store.apply(batch).expect("apply");

        let all = scan_keys(&store, &KeyRange::new(vec![], None));
        assert_eq!(all, vec![vec![0x00, 9], vec![0x02, 0], vec![0xff, 1]]);

        let head = scan_keys(&store, &KeyRange::new(vec![], Some(vec![0x02, 0])));
        assert_eq!(head, vec![vec![0x00, 9]]);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024).unwrap();
            let mut batch = WriteBatch::new();
            batch.put(b"next_id".to_vec(), 7u64.to_be_bytes().to_vec());
            env.kv_store().apply(batch).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 4, 10 * 1024 * 1024).unwrap();
        assert_eq!(
            env.kv_store().get(b"next_id").unwrap(),
            Some(7u64.to_be_bytes().to_vec())
        );
    }
}
