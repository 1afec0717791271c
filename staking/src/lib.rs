//! Stake lifecycle and reward engine for the TruStory claim/argument protocol.
//!
//! Users lock value ("stake") behind arguments attached to claims. Stakes
//! accrue time-weighted interest and, once matured, that interest is split
//! between the argument's creator and the staker.
//!
//! This crate handles:
//! - The stake ledger: argument and stake records plus the claim→arguments,
//!   argument→stakes, user→arguments and user→stakes indices
//! - The active stake queue, ordered by `(end_time, stake_id)`
//! - Interest and reward-split computation in fixed-point arithmetic
//! - Argument, upvote and challenge-stake submission with jail checks
//! - Settlement of matured stakes through an external coin-transfer authority
//!
//! All state lives in a [`tru_store::KvStore`]; every submission stages its
//! writes in a [`tru_store::CacheStore`] and commits them in one batch.

pub mod argument;
pub mod error;
pub mod guard;
pub mod interest;
pub mod keeper;
pub mod keys;
pub mod ledger;
pub mod params;
pub mod queue;
pub mod settlement;
pub mod stake;

pub use argument::Argument;
pub use error::StakingError;
pub use guard::{AuthGuard, GuardError};
pub use interest::{RewardCalculator, RewardSplit};
pub use keeper::StakingKeeper;
pub use ledger::StakeLedger;
pub use params::Params;
pub use settlement::{CoinTransfer, Payout, PayoutReason, SettlementReport, TransferError};
pub use stake::{Stake, StakeResult, StakeType};
