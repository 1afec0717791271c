//! Fundamental types for the TruStory staking engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, timestamps, record identifiers, amounts, and the
//! fixed-point decimal used by the reward calculator.

pub mod address;
pub mod dec;
pub mod error;
pub mod time;

pub use address::AccountAddress;
pub use dec::Dec;
pub use error::TypesError;
pub use time::Timestamp;

/// Identifier of a claim (owned by the claim module, outside this engine).
pub type ClaimId = u64;

/// Identifier of an argument. Assigned monotonically, starting at 1.
pub type ArgumentId = u64;

/// Identifier of a stake. Assigned monotonically, starting at 1.
pub type StakeId = u64;

/// Token amount in raw units of the stake denomination.
pub type Amount = u64;
