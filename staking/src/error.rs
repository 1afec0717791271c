//! Staking-engine errors.
//!
//! Validation errors are detected before any write is staged, so returning one
//! never leaves a partial submission behind.

use thiserror::Error;
use tru_store::StoreError;
use tru_types::{AccountAddress, ArgumentId};

use crate::guard::GuardError;
use crate::settlement::TransferError;

#[derive(Debug, Error)]
pub enum StakingError {
    #[error("invalid stake type: {0}")]
    InvalidStakeType(String),

    #[error("account {0} is jailed")]
    AccountJailed(AccountAddress),

    #[error("unknown argument {0}")]
    UnknownArgument(ArgumentId),

    #[error("{creator} already has a stake on argument {argument_id}")]
    DuplicateStake {
        argument_id: ArgumentId,
        creator: AccountAddress,
    },

    #[error("authorization guard failed: {0}")]
    Guard(#[from] GuardError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("argument body must be {min}..={max} characters, got {len}")]
    InvalidBodyLength { len: usize, min: usize, max: usize },

    #[error("argument summary must be at most {max} characters, got {len}")]
    InvalidSummaryLength { len: usize, max: usize },

    #[error("invalid staking parameters: {0}")]
    InvalidParams(String),

    #[error("staking parameters have not been initialised")]
    ParamsNotInitialized,

    #[error("arithmetic overflow in staking computation")]
    Overflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("record codec error: {0}")]
    Codec(String),

    #[error("coin transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

impl From<bincode::Error> for StakingError {
    fn from(e: bincode::Error) -> Self {
        Self::Codec(e.to_string())
    }
}
