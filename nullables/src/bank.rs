//! Nullable coin authority: records transfers instead of moving value.

use std::collections::HashMap;

use tru_staking::{CoinTransfer, Payout, TransferError};
use tru_types::{AccountAddress, Amount};

/// Records every payout it is asked to make.
///
/// Batches are applied whole. [`NullBank::fail_next`] rejects the next batch
/// without recording any of it, to exercise settlement aborts.
#[derive(Default)]
pub struct NullBank {
    payouts: Vec<Payout>,
    batches: usize,
    fail_next: bool,
}

impl NullBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next batch.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Number of batches accepted so far.
    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    /// Total received by `address` across all recorded payouts.
    pub fn balance_of(&self, address: &AccountAddress) -> Amount {
        self.payouts
            .iter()
            .filter(|p| &p.recipient == address)
            .map(|p| p.amount)
            .sum()
    }

    /// Totals per recipient.
    pub fn balances(&self) -> HashMap<AccountAddress, Amount> {
        let mut totals = HashMap::new();
        for p in &self.payouts {
            *totals.entry(p.recipient.clone()).or_insert(0) += p.amount;
        }
        totals
    }
}

impl CoinTransfer for NullBank {
    fn transfer_batch(&mut self, payouts: &[Payout]) -> Result<(), TransferError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(TransferError::new("insufficient module funds"));
        }
        self.payouts.extend_from_slice(payouts);
        self.batches += 1;
        Ok(())
    }
}
