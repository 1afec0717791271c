//! Submission state machine for arguments, upvotes and attached stakes.
//!
//! Every entry point validates first, then stages all of its writes in one
//! [`CacheStore`] over the backing store and commits them as a single batch.
//! A rejected submission therefore leaves the store byte-for-byte unchanged.

use tru_store::{CacheStore, KvStore};
use tru_types::{AccountAddress, ArgumentId, ClaimId, Timestamp};

use crate::{Argument, AuthGuard, Params, Stake, StakeLedger, StakeType, StakingError};

/// Entry point of the staking engine.
pub struct StakingKeeper<S, G> {
    store: S,
    guard: G,
}

impl<S: KvStore, G: AuthGuard> StakingKeeper<S, G> {
    pub fn new(store: S, guard: G) -> Self {
        Self { store, guard }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Read access to committed state.
    pub fn ledger(&self) -> StakeLedger<&S> {
        StakeLedger::new(&self.store)
    }

    /// A ledger whose writes are staged until passed to `commit`.
    pub(crate) fn staged(&self) -> StakeLedger<CacheStore<'_, S>> {
        StakeLedger::new(CacheStore::new(&self.store))
    }

    fn commit(ledger: StakeLedger<CacheStore<'_, S>>) -> Result<usize, StakingError> {
        Ok(ledger.into_inner().commit()?)
    }

    /// Persist the initial parameters.
    pub fn init_genesis(&self, params: &Params) -> Result<(), StakingError> {
        params.validate()?;
        let mut ledger = self.staged();
        ledger.set_params(params)?;
        Self::commit(ledger)?;
        tracing::info!(
            lock_period_secs = params.lock_period_secs,
            "staking genesis initialised"
        );
        Ok(())
    }

    pub fn params(&self) -> Result<Params, StakingError> {
        self.ledger().params()
    }

    /// Replace the parameters. Stakes already created keep their `end_time`.
    pub fn set_params(&self, params: &Params) -> Result<(), StakingError> {
        params.validate()?;
        let mut ledger = self.staged();
        ledger.set_params(params)?;
        Self::commit(ledger)?;
        tracing::info!("staking parameters updated");
        Ok(())
    }

    fn ensure_not_jailed(&self, creator: &AccountAddress) -> Result<(), StakingError> {
        if self.guard.is_jailed(creator)? {
            tracing::warn!(creator = %creator, "submission rejected: account jailed");
            return Err(StakingError::AccountJailed(creator.clone()));
        }
        Ok(())
    }

    fn validate_text(params: &Params, body: &str, summary: &str) -> Result<(), StakingError> {
        let len = body.chars().count();
        if len < params.min_argument_length || len > params.max_argument_length {
            return Err(StakingError::InvalidBodyLength {
                len,
                min: params.min_argument_length,
                max: params.max_argument_length,
            });
        }
        let len = summary.chars().count();
        if len > params.max_summary_length {
            return Err(StakingError::InvalidSummaryLength {
                len,
                max: params.max_summary_length,
            });
        }
        Ok(())
    }

    /// Open a new argument on `claim_id` together with its initial stake.
    ///
    /// Checks run in order: stake type, text lengths, jail status. The claim
    /// itself is assumed to exist.
    pub fn submit_argument(
        &self,
        claim_id: ClaimId,
        body: &str,
        summary: &str,
        creator: &AccountAddress,
        stake_type: StakeType,
        now: Timestamp,
    ) -> Result<Argument, StakingError> {
        if !stake_type.opens_argument() {
            return Err(StakingError::InvalidStakeType(stake_type.to_string()));
        }
        let params = self.params()?;
        Self::validate_text(&params, body, summary)?;
        self.ensure_not_jailed(creator)?;

        let mut ledger = self.staged();
        let mut argument =
            ledger.create_argument(claim_id, creator, summary, body, stake_type, now)?;
        let amount = params.default_amount(stake_type);
        let stake = ledger.create_stake(argument.id, creator, stake_type, amount, now)?;

        argument.upvoted_count = 1;
        argument.upvoted_stake = amount;
        ledger.save_argument(&argument)?;
        Self::commit(ledger)?;

        tracing::info!(
            argument_id = argument.id,
            stake_id = stake.id,
            claim_id,
            creator = %creator,
            stake_type = %stake_type,
            amount,
            "argument submitted"
        );
        Ok(argument)
    }

    fn ensure_can_stake(
        &self,
        argument_id: ArgumentId,
        creator: &AccountAddress,
    ) -> Result<Argument, StakingError> {
        let ledger = self.ledger();
        let argument = ledger
            .argument(argument_id)?
            .ok_or(StakingError::UnknownArgument(argument_id))?;
        if ledger.has_stake(argument_id, creator)? {
            return Err(StakingError::DuplicateStake {
                argument_id,
                creator: creator.clone(),
            });
        }
        Ok(argument)
    }

    /// Endorse an argument with an upvote stake at the default upvote amount.
    pub fn submit_upvote(
        &self,
        argument_id: ArgumentId,
        creator: &AccountAddress,
        now: Timestamp,
    ) -> Result<Stake, StakingError> {
        let mut argument = self.ensure_can_stake(argument_id, creator)?;
        let params = self.params()?;
        let amount = params.default_amount(StakeType::Upvote);

        let mut ledger = self.staged();
        let stake = ledger.create_stake(argument_id, creator, StakeType::Upvote, amount, now)?;
        argument.upvoted_count = argument
            .upvoted_count
            .checked_add(1)
            .ok_or(StakingError::Overflow)?;
        argument.upvoted_stake = argument
            .upvoted_stake
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        argument.updated_time = now;
        ledger.save_argument(&argument)?;
        Self::commit(ledger)?;

        tracing::info!(
            argument_id,
            stake_id = stake.id,
            creator = %creator,
            upvoted_count = argument.upvoted_count,
            "upvote accepted"
        );
        Ok(stake)
    }

    /// Attach a backing or challenge stake to an existing argument. The
    /// upvote aggregates are left alone.
    pub fn attach_stake(
        &self,
        argument_id: ArgumentId,
        creator: &AccountAddress,
        stake_type: StakeType,
        now: Timestamp,
    ) -> Result<Stake, StakingError> {
        if !stake_type.opens_argument() {
            return Err(StakingError::InvalidStakeType(stake_type.to_string()));
        }
        self.ensure_can_stake(argument_id, creator)?;
        let params = self.params()?;
        let amount = params.default_amount(stake_type);

        let mut ledger = self.staged();
        let stake = ledger.create_stake(argument_id, creator, stake_type, amount, now)?;
        Self::commit(ledger)?;

        tracing::info!(
            argument_id,
            stake_id = stake.id,
            creator = %creator,
            stake_type = %stake_type,
            "stake attached"
        );
        Ok(stake)
    }

    /// Lift a jail through the guard.
    pub fn unjail(&self, address: &AccountAddress) -> Result<(), StakingError> {
        self.guard.unjail(address)?;
        tracing::info!(address = %address, "account unjailed");
        Ok(())
    }
}
