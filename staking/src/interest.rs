//! Interest and reward-split computation.
//!
//! Everything here is pure fixed-point arithmetic over [`Dec`]: identical
//! inputs produce bit-identical outputs on every node.
//!
//! The effective annual rate interpolates between the configured minimum and
//! maximum using a weighted blend of how large the stake is (relative to
//! `interest_amount_cap`) and how long it was held (relative to the lock
//! period). Interest is simple, prorated over a 365-day year.

use tru_types::dec::mul_div_floor;
use tru_types::time::SECS_PER_YEAR;
use tru_types::{Amount, Dec};

use crate::{Params, StakingError};

/// Interest split between an argument's creator and its staker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardSplit {
    /// `interest × creator_reward_share`, rounded half-to-even to a whole unit.
    pub creator: Dec,
    /// `interest − creator`. Never rounded on its own.
    pub staker: Dec,
}

/// Interest calculator bound to one parameter set.
pub struct RewardCalculator<'p> {
    params: &'p Params,
}

impl<'p> RewardCalculator<'p> {
    pub fn new(params: &'p Params) -> Self {
        Self { params }
    }

    /// Effective annual rate for a stake of `amount` held `duration_secs`.
    pub fn rate(&self, amount: Amount, duration_secs: u64) -> Result<Dec, StakingError> {
        let p = self.params;

        let cap = u128::from(p.interest_amount_cap);
        let amount_factor = Dec::from_ratio(u128::from(amount).min(cap), cap)
            .map_err(|_| StakingError::InvalidParams("interest_amount_cap is zero".into()))?;

        let lock = u128::from(p.lock_period_secs);
        let period_factor = Dec::from_ratio(u128::from(duration_secs).min(lock), lock)
            .map_err(|_| StakingError::InvalidParams("lock_period_secs is zero".into()))?;

        let blend = p
            .amount_weight
            .checked_mul(amount_factor)
            .zip(p.period_weight.checked_mul(period_factor))
            .and_then(|(a, b)| a.checked_add(b))
            .ok_or(StakingError::Overflow)?;

        let band = p
            .max_interest_rate
            .checked_sub(p.min_interest_rate)
            .ok_or_else(|| {
                StakingError::InvalidParams("min_interest_rate exceeds max_interest_rate".into())
            })?;

        band.checked_mul(blend)
            .and_then(|spread| p.min_interest_rate.checked_add(spread))
            .ok_or(StakingError::Overflow)
    }

    /// Simple interest accrued by `amount` over `duration_secs`. Not rounded.
    pub fn interest(&self, amount: Amount, duration_secs: u64) -> Result<Dec, StakingError> {
        if amount == 0 || duration_secs == 0 {
            return Ok(Dec::ZERO);
        }
        let rate = self.rate(amount, duration_secs)?;
        let principal_rate = rate
            .raw()
            .checked_mul(u128::from(amount))
            .ok_or(StakingError::Overflow)?;
        let raw = mul_div_floor(
            principal_rate,
            u128::from(duration_secs),
            u128::from(SECS_PER_YEAR),
        )
        .ok_or(StakingError::Overflow)?;
        Ok(Dec::from_raw(raw))
    }

    /// Split `interest` so that `creator + staker == interest` exactly.
    ///
    /// Only the creator's share is rounded; the staker takes the exact
    /// remainder. An even share of an interest with a fraction therefore pays
    /// out as two whole amounts that can differ by one unit: a 0.50 share of
    /// 2,397,260,273,972.60… pays 1,198,630,136,986 to the creator and
    /// 1,198,630,136,987 to the staker, which still add up to the rounded
    /// interest.
    pub fn split_reward(&self, interest: Dec) -> Result<RewardSplit, StakingError> {
        let creator = interest
            .checked_mul(self.params.creator_reward_share)
            .ok_or(StakingError::Overflow)?
            .round();
        // Half-even rounding of a share <= 1 can exceed the total only by a
        // rounding unit; cap it so the remainder stays non-negative.
        let creator = creator.min(interest);
        let staker = interest
            .checked_sub(creator)
            .ok_or(StakingError::Overflow)?;
        Ok(RewardSplit { creator, staker })
    }
}
