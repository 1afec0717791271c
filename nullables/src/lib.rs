//! Nullable infrastructure for deterministic testing.
//!
//! Everything the staking engine consumes from the outside world (block
//! time, the key-value store, the jail authority and the coin authority) is
//! abstracted behind a trait. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod bank;
pub mod clock;
pub mod guard;
pub mod store;

pub use bank::NullBank;
pub use clock::NullClock;
pub use guard::NullAuthGuard;
pub use store::NullStore;
