//! Settlement of matured stakes.
//!
//! Once per block the driver calls [`StakingKeeper::settle_due`]. Each due
//! stake has its principal refunded and its interest split between the
//! staker and the argument creator; the stake is then marked expired and
//! leaves the active queue. Its record and index entries stay for audit.
//!
//! Value moves through a [`CoinTransfer`] implementation owned by the caller.
//! A run hands its whole payout list to the authority in one call and commits
//! store writes only after that call succeeded, so a rejected run moves no
//! value and leaves every stake queued for a retry.

use serde::Serialize;
use thiserror::Error;
use tru_types::{AccountAddress, Amount, Dec, StakeId, Timestamp};

use crate::{AuthGuard, RewardCalculator, Stake, StakeResult, StakingError, StakingKeeper};
use tru_store::KvStore;

/// Failure reported by the coin-transfer authority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransferError {
    pub message: String,
}

impl TransferError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutReason {
    /// The staked principal returned to the staker.
    StakeRefund,
    /// The staker's share of the interest.
    StakerInterest,
    /// The argument creator's share of an endorsing stake's interest.
    CreatorReward,
}

/// One transfer requested from the coin authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub stake_id: StakeId,
    pub recipient: AccountAddress,
    pub amount: Amount,
    pub reason: PayoutReason,
}

/// Moves value to accounts.
///
/// `transfer_batch` must be all-or-nothing: on `Err` none of the payouts may
/// have moved value.
pub trait CoinTransfer {
    fn transfer_batch(&mut self, payouts: &[Payout]) -> Result<(), TransferError>;
}

impl<T: CoinTransfer + ?Sized> CoinTransfer for &mut T {
    fn transfer_batch(&mut self, payouts: &[Payout]) -> Result<(), TransferError> {
        (**self).transfer_batch(payouts)
    }
}

/// What one settlement run did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    pub as_of: Timestamp,
    /// Settled stakes in queue order.
    pub settled: Vec<StakeId>,
    pub payouts: Vec<Payout>,
    /// Sum of the unrounded interest accrued by the settled stakes.
    pub total_interest: Dec,
}

fn whole_units(value: Dec) -> Result<Amount, StakingError> {
    Amount::try_from(value.round_int()).map_err(|_| StakingError::Overflow)
}

impl<S: KvStore, G: AuthGuard> StakingKeeper<S, G> {
    /// Settle up to `max_settlements_per_block` stakes whose `end_time` is at
    /// or before `as_of`, oldest first.
    pub fn settle_due<B: CoinTransfer>(
        &self,
        bank: &mut B,
        as_of: Timestamp,
    ) -> Result<SettlementReport, StakingError> {
        let params = self.params()?;
        let limit = params.max_settlements_per_block as usize;

        let mut due: Vec<Stake> = Vec::new();
        self.ledger().iterate_due(as_of, |stake| {
            due.push(stake.clone());
            due.len() >= limit
        })?;

        let mut report = SettlementReport {
            as_of,
            ..SettlementReport::default()
        };
        if due.is_empty() {
            return Ok(report);
        }

        let calc = RewardCalculator::new(&params);
        let mut ledger = self.staged();

        for mut stake in due {
            let argument = ledger.argument(stake.argument_id)?.ok_or_else(|| {
                StakingError::NotFound(format!(
                    "argument {} of stake {}",
                    stake.argument_id, stake.id
                ))
            })?;

            let interest = calc.interest(stake.amount, stake.lock_duration())?;
            let (creator_share, staker_share) = if stake.creator == argument.creator {
                (Dec::ZERO, interest)
            } else {
                let split = calc.split_reward(interest)?;
                (split.creator, split.staker)
            };
            let creator_reward = whole_units(creator_share)?;
            let staker_reward = whole_units(staker_share)?;

            let payouts = [
                (stake.creator.clone(), stake.amount, PayoutReason::StakeRefund),
                (stake.creator.clone(), staker_reward, PayoutReason::StakerInterest),
                (argument.creator.clone(), creator_reward, PayoutReason::CreatorReward),
            ];
            for (recipient, amount, reason) in payouts {
                if amount == 0 {
                    continue;
                }
                report.payouts.push(Payout {
                    stake_id: stake.id,
                    recipient,
                    amount,
                    reason,
                });
            }

            stake.expired = true;
            stake.result = Some(StakeResult {
                interest,
                creator_reward,
                staker_reward,
                settled_at: as_of,
            });
            ledger.save_stake(&stake)?;
            ledger.remove_from_queue(&stake);

            report.total_interest = report
                .total_interest
                .checked_add(interest)
                .ok_or(StakingError::Overflow)?;
            report.settled.push(stake.id);

            tracing::debug!(
                stake_id = stake.id,
                argument_id = stake.argument_id,
                interest = %interest,
                creator_reward,
                staker_reward,
                "stake staged for settlement"
            );
        }

        if let Err(e) = bank.transfer_batch(&report.payouts) {
            tracing::error!(
                as_of = %as_of,
                stakes = report.settled.len(),
                payouts = report.payouts.len(),
                error = %e,
                "settlement transfer rejected"
            );
            return Err(e.into());
        }

        let ops = ledger.into_inner().commit()?;
        tracing::info!(
            as_of = %as_of,
            settled = report.settled.len(),
            payouts = report.payouts.len(),
            ops,
            "settlement run committed"
        );
        Ok(report)
    }
}
