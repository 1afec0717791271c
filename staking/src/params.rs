//! Staking parameters.
//!
//! Process-wide configuration read by every submission and settlement. They
//! are persisted in the store at genesis and change only through
//! [`crate::StakingKeeper::set_params`], the governance path.

use serde::{Deserialize, Serialize};
use tru_types::time::SECS_PER_DAY;
use tru_types::{Amount, Dec};

use crate::stake::StakeType;
use crate::StakingError;

/// All staking parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // ── Lock ─────────────────────────────────────────────────────────────
    /// How long every stake stays locked. `end_time = created_time + lock_period_secs`.
    /// Default: 7 days.
    pub lock_period_secs: u64,

    // ── Interest ─────────────────────────────────────────────────────────
    /// Annual rate paid to the smallest, shortest stake.
    pub min_interest_rate: Dec,

    /// Annual rate paid once both the amount and the period components saturate.
    pub max_interest_rate: Dec,

    /// Share of the rate blend driven by the stake amount. Must sum to 1 with
    /// `period_weight`.
    pub amount_weight: Dec,

    /// Share of the rate blend driven by the holding period.
    pub period_weight: Dec,

    /// Amount (raw) at which the amount component of the blend saturates.
    pub interest_amount_cap: Amount,

    // ── Rewards ──────────────────────────────────────────────────────────
    /// Fraction of an upvote's interest paid to the argument creator.
    pub creator_reward_share: Dec,

    // ── Default stake amounts ────────────────────────────────────────────
    /// Initial stake (raw) when a backing argument is submitted.
    pub default_backing_amount: Amount,

    /// Initial stake (raw) when a challenge argument is submitted.
    pub default_challenge_amount: Amount,

    /// Stake (raw) recorded for each upvote.
    pub default_upvote_amount: Amount,

    // ── Argument text ────────────────────────────────────────────────────
    pub min_argument_length: usize,
    pub max_argument_length: usize,
    pub max_summary_length: usize,

    // ── Settlement ───────────────────────────────────────────────────────
    /// Upper bound on stakes settled per block.
    pub max_settlements_per_block: u32,
}

impl Params {
    /// The configured default amount for a stake of the given type.
    pub fn default_amount(&self, stake_type: StakeType) -> Amount {
        match stake_type {
            StakeType::Backing => self.default_backing_amount,
            StakeType::Challenge => self.default_challenge_amount,
            StakeType::Upvote => self.default_upvote_amount,
        }
    }

    /// Check internal consistency. Called before params are persisted.
    pub fn validate(&self) -> Result<(), StakingError> {
        let invalid = |msg: &str| Err(StakingError::InvalidParams(msg.to_string()));

        if self.lock_period_secs == 0 {
            return invalid("lock_period_secs must be positive");
        }
        if self.min_interest_rate > self.max_interest_rate {
            return invalid("min_interest_rate exceeds max_interest_rate");
        }
        if self.max_interest_rate > Dec::ONE {
            return invalid("max_interest_rate must not exceed 1");
        }
        if self.amount_weight.checked_add(self.period_weight) != Some(Dec::ONE) {
            return invalid("amount_weight and period_weight must sum to 1");
        }
        if self.creator_reward_share > Dec::ONE {
            return invalid("creator_reward_share must not exceed 1");
        }
        if self.interest_amount_cap == 0 {
            return invalid("interest_amount_cap must be positive");
        }
        if self.default_backing_amount == 0
            || self.default_challenge_amount == 0
            || self.default_upvote_amount == 0
        {
            return invalid("default stake amounts must be positive");
        }
        if self.min_argument_length > self.max_argument_length {
            return invalid("min_argument_length exceeds max_argument_length");
        }
        if self.max_settlements_per_block == 0 {
            return invalid("max_settlements_per_block must be positive");
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            lock_period_secs: 7 * SECS_PER_DAY,

            min_interest_rate: Dec::percent(10),
            max_interest_rate: Dec::percent(30),
            amount_weight: Dec::percent(50),
            period_weight: Dec::percent(50),
            interest_amount_cap: 1_000_000_000_000_000,

            creator_reward_share: Dec::percent(50),

            default_backing_amount: 50,
            default_challenge_amount: 50,
            default_upvote_amount: 10,

            min_argument_length: 1,
            max_argument_length: 1250,
            max_summary_length: 140,

            max_settlements_per_block: 100,
        }
    }
}
