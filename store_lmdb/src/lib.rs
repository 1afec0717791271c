//! LMDB storage backend for the TruStory staking engine.
//!
//! Implements [`tru_store::KvStore`] using the `heed` LMDB bindings. The whole
//! staking key space lives in one named database inside a single environment;
//! each [`tru_store::WriteBatch`] is applied in one LMDB write transaction.

pub mod environment;
pub mod error;
pub mod kv;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use kv::LmdbKvStore;
