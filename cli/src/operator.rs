//! Collaborators the CLI plugs into the staking keeper.

use std::collections::BTreeSet;

use tru_staking::{AuthGuard, CoinTransfer, GuardError, Payout, TransferError};
use tru_types::AccountAddress;

/// Jail list taken from the configuration file.
pub struct ConfigGuard {
    jailed: BTreeSet<AccountAddress>,
}

impl ConfigGuard {
    pub fn new(jailed: BTreeSet<AccountAddress>) -> Self {
        Self { jailed }
    }
}

impl AuthGuard for ConfigGuard {
    fn is_jailed(&self, address: &AccountAddress) -> Result<bool, GuardError> {
        Ok(self.jailed.contains(address))
    }

    fn unjail(&self, address: &AccountAddress) -> Result<(), GuardError> {
        if self.jailed.contains(address) {
            return Err(GuardError::new(format!(
                "{address} is jailed by the config file; remove it from `jailed` instead"
            )));
        }
        Ok(())
    }
}

/// Collects payouts so a settlement run can be printed instead of executed.
#[derive(Default)]
pub struct PayoutJournal {
    entries: Vec<Payout>,
}

impl PayoutJournal {
    pub fn entries(&self) -> &[Payout] {
        &self.entries
    }
}

impl CoinTransfer for PayoutJournal {
    fn transfer_batch(&mut self, payouts: &[Payout]) -> Result<(), TransferError> {
        for payout in payouts {
            tracing::debug!(
                stake_id = payout.stake_id,
                recipient = %payout.recipient,
                amount = payout.amount,
                "payout journaled"
            );
        }
        self.entries.extend_from_slice(payouts);
        Ok(())
    }
}
