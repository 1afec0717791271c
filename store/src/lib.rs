//! Abstract storage traits for the TruStory staking engine.
//!
//! The engine persists every record and index through a flat, ordered
//! key-value space. Every storage backend (LMDB, in-memory for testing)
//! implements [`KvStore`]; the rest of the codebase depends only on the traits.
//!
//! Writes reach a backend only as a [`WriteBatch`] applied atomically. Callers
//! stage their writes in a [`CacheStore`], which reads through to the backend,
//! and commit once: a dropped cache writes nothing.

pub mod batch;
pub mod cache;
pub mod error;
pub mod kv;
pub mod range;

pub use batch::{WriteBatch, WriteOp};
pub use cache::CacheStore;
pub use error::StoreError;
pub use kv::{KvRead, KvStore, KvWrite};
pub use range::{increment_prefix, successor, KeyRange};
