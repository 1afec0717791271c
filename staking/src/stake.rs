//! Stake records and stake types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tru_types::{AccountAddress, Amount, ArgumentId, Dec, StakeId, Timestamp};

use crate::StakingError;

/// What a stake backs. The set is closed; every consumer matches exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeType {
    /// Stake behind an argument supporting the claim.
    Backing,
    /// Stake behind an argument disputing the claim.
    Challenge,
    /// Stake endorsing someone else's argument.
    Upvote,
}

impl StakeType {
    /// Whether an argument may be opened with this stake type.
    pub fn opens_argument(&self) -> bool {
        match self {
            Self::Backing | Self::Challenge => true,
            Self::Upvote => false,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Backing => 0,
            Self::Challenge => 1,
            Self::Upvote => 2,
        }
    }
}

impl TryFrom<u8> for StakeType {
    type Error = StakingError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Backing),
            1 => Ok(Self::Challenge),
            2 => Ok(Self::Upvote),
            other => Err(StakingError::InvalidStakeType(format!("0x{other:02x}"))),
        }
    }
}

impl fmt::Display for StakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Backing => "backing",
            Self::Challenge => "challenge",
            Self::Upvote => "upvote",
        };
        f.write_str(name)
    }
}

impl FromStr for StakeType {
    type Err = StakingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "backing" => Ok(Self::Backing),
            "challenge" => Ok(Self::Challenge),
            "upvote" => Ok(Self::Upvote),
            _ => Err(StakingError::InvalidStakeType(s.to_string())),
        }
    }
}

/// Outcome recorded on a stake once it has been settled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeResult {
    /// Interest accrued over the lock period, before rounding.
    pub interest: Dec,
    /// Raw units paid to the argument creator.
    pub creator_reward: Amount,
    /// Raw units of interest paid to the staker (principal excluded).
    pub staker_reward: Amount,
    pub settled_at: Timestamp,
}

/// A time-locked value commitment on an argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub id: StakeId,
    pub argument_id: ArgumentId,
    pub stake_type: StakeType,
    pub amount: Amount,
    pub creator: AccountAddress,
    pub created_time: Timestamp,
    /// `created_time + lock_period`. Never changes; the expiry queue key.
    pub end_time: Timestamp,
    /// Set once settlement has paid this stake out.
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub result: Option<StakeResult>,
}

impl Stake {
    /// Seconds the stake is locked for.
    pub fn lock_duration(&self) -> u64 {
        self.created_time.secs_until(self.end_time)
    }
}
