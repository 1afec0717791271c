//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbError, LmdbKvStore};

/// Name of the database holding every staking record, index and queue entry.
const STAKING_DB: &str = "staking";

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    staking_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process per path and the
        // files are not modified by anything but this handle.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let staking_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(STAKING_DB))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            staking_db,
        })
    }

    /// A key-value handle over the staking database.
    pub fn kv_store(&self) -> LmdbKvStore {
        LmdbKvStore::new(Arc::clone(&self.env), self.staking_db)
    }
}
