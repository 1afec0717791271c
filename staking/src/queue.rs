//! Active stake queue.
//!
//! Unsettled stakes are kept under `0x30 ++ end_time ++ stake_id`, so a range
//! scan from the start of the prefix to `as_of` yields exactly the due stakes
//! in `(end_time, id)` order and touches no entry that is not due.

use tru_store::{successor, KeyRange, KvRead, KvWrite};
use tru_types::{StakeId, Timestamp};

use crate::keys;
use crate::{Stake, StakeLedger, StakingError};

/// Queue keys read per scan before the stakes behind them are loaded.
const DUE_BATCH: usize = 64;

impl<S: KvRead> StakeLedger<S> {
    /// Visit every queued stake with `end_time <= as_of` in ascending
    /// `(end_time, id)` order. `visit` returns `true` to stop early.
    ///
    /// Keys are gathered a batch at a time and the scan released before any
    /// record is loaded, so backends never see a lookup nested in a scan.
    pub fn iterate_due<F>(&self, as_of: Timestamp, mut visit: F) -> Result<(), StakingError>
    where
        F: FnMut(&Stake) -> bool,
    {
        let upper = successor(&keys::active_queue(as_of, StakeId::MAX));
        let mut range = KeyRange::new(keys::active_queue_prefix(), Some(upper));

        loop {
            let mut ids = Vec::with_capacity(DUE_BATCH);
            let mut resume_after = None;
            let mut bad_key = None;
            self.store().scan(&range, &mut |key, _| {
                match keys::decode_active_queue(key) {
                    Ok((_, id)) => ids.push(id),
                    Err(e) => {
                        bad_key = Some(e);
                        return true;
                    }
                }
                if ids.len() == DUE_BATCH {
                    resume_after = Some(key.to_vec());
                    return true;
                }
                false
            })?;
            if let Some(e) = bad_key {
                return Err(e);
            }

            for id in ids {
                let stake = self
                    .stake(id)?
                    .ok_or_else(|| StakingError::NotFound(format!("queued stake {id}")))?;
                if visit(&stake) {
                    return Ok(());
                }
            }

            match resume_after {
                Some(key) => range = range.resume_from(successor(&key)),
                None => return Ok(()),
            }
        }
    }

    /// Whether the stake is still waiting in the queue.
    pub fn is_queued(&self, stake: &Stake) -> Result<bool, StakingError> {
        Ok(self
            .store()
            .contains(&keys::active_queue(stake.end_time, stake.id))?)
    }
}

impl<S: KvWrite> StakeLedger<S> {
    pub(crate) fn enqueue(&mut self, stake: &Stake) {
        self.store_mut()
            .put(&keys::active_queue(stake.end_time, stake.id), &[]);
    }

    /// Drop a stake's queue entry. The stake record and its indices stay.
    pub fn remove_from_queue(&mut self, stake: &Stake) {
        self.store_mut()
            .delete(&keys::active_queue(stake.end_time, stake.id));
        tracing::trace!(stake_id = stake.id, "stake removed from active queue");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::ledger;
    use crate::StakeType;
    use tru_types::AccountAddress;

    fn due_ids<S: KvRead>(ledger: &StakeLedger<S>, as_of: u64) -> Vec<StakeId> {
        let mut ids = Vec::new();
        ledger
            .iterate_due(Timestamp::new(as_of), |s| {
                ids.push(s.id);
                false
            })
            .unwrap();
        ids
    }

    #[test]
    fn due_stakes_come_in_end_time_then_id_order() {
        let mut ledger = ledger();
        let lock = ledger.params().unwrap().lock_period_secs;
        let alice = AccountAddress::new("tru1alice");
        ledger
            .create_argument(1, &alice, "s", "b", StakeType::Backing, Timestamp::new(0))
            .unwrap();

        // Created at 20, 10, 10: ids 1, 2, 3.
        for (who, at) in [("tru1a", 20), ("tru1b", 10), ("tru1c", 10)] {
            let who = AccountAddress::new(who);
            ledger
                .create_stake(1, &who, StakeType::Upvote, 10, Timestamp::new(at))
                .unwrap();
        }

        assert!(due_ids(&ledger, lock + 9).is_empty());
        assert_eq!(due_ids(&ledger, lock + 10), vec![2, 3]);
        assert_eq!(due_ids(&ledger, lock + 20), vec![2, 3, 1]);
        assert_eq!(due_ids(&ledger, u64::MAX), vec![2, 3, 1]);
    }

    #[test]
    fn visitor_can_stop_early() {
        let mut ledger = ledger();
        let alice = AccountAddress::new("tru1alice");
        ledger
            .create_argument(1, &alice, "s", "b", StakeType::Backing, Timestamp::new(0))
            .unwrap();
        for i in 0..5 {
            let who = AccountAddress::new(format!("tru1u{i}"));
            ledger
                .create_stake(1, &who, StakeType::Upvote, 10, Timestamp::new(i))
                .unwrap();
        }
        let mut seen = 0;
        ledger
            .iterate_due(Timestamp::new(u64::MAX), |_| {
                seen += 1;
                seen == 2
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn scan_spans_multiple_batches() {
        let mut ledger = ledger();
        let alice = AccountAddress::new("tru1alice");
        ledger
            .create_argument(1, &alice, "s", "b", StakeType::Backing, Timestamp::new(0))
            .unwrap();
        let total = DUE_BATCH as u64 * 2 + 3;
        for i in 0..total {
            let who = AccountAddress::new(format!("tru1u{i}"));
            ledger
                .create_stake(1, &who, StakeType::Upvote, 10, Timestamp::new(i))
                .unwrap();
        }
        let ids = due_ids(&ledger, u64::MAX);
        assert_eq!(ids, (1..=total).collect::<Vec<_>>());
    }

    #[test]
    fn removed_stakes_are_no_longer_due_but_persist() {
        let mut ledger = ledger();
        let alice = AccountAddress::new("tru1alice");
        ledger
            .create_argument(1, &alice, "s", "b", StakeType::Backing, Timestamp::new(0))
            .unwrap();
        let stake = ledger
            .create_stake(1, &alice, StakeType::Backing, 50, Timestamp::new(0))
            .unwrap();
        assert!(ledger.is_queued(&stake).unwrap());

        ledger.remove_from_queue(&stake);
        assert!(!ledger.is_queued(&stake).unwrap());
        assert!(due_ids(&ledger, u64::MAX).is_empty());
        assert_eq!(ledger.stake(stake.id).unwrap(), Some(stake.clone()));
        assert_eq!(ledger.stakes_by_argument(1).unwrap(), vec![stake]);
    }
}
