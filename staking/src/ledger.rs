//! Stake ledger: argument and stake records plus their indices.
//!
//! Reads are available over any [`KvRead`]; mutations need a [`KvWrite`],
//! normally a [`tru_store::CacheStore`] that the keeper commits once the
//! whole submission has been staged.
//!
//! Index entries are append-only. Settlement rewrites the stake record and
//! drops its queue entry (see [`crate::queue`]) but never touches an index.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tru_store::{KeyRange, KvRead, KvWrite};
use tru_types::{AccountAddress, Amount, ArgumentId, ClaimId, StakeId, Timestamp};

use crate::keys;
use crate::{Argument, Params, Stake, StakeType, StakingError};

/// Typed view over the staking key space of a store.
pub struct StakeLedger<S> {
    store: S,
}

impl<S> StakeLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KvRead> StakeLedger<S> {
    fn load<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, StakingError> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn load_counter(&self, key: &[u8]) -> Result<u64, StakingError> {
        match self.store.get(key)? {
            Some(bytes) => keys::decode_u64(&bytes),
            None => Ok(1),
        }
    }

    /// Ids held in the trailing bytes of every index key under `prefix`, in
    /// key order.
    pub(crate) fn index_ids(&self, prefix: &[u8]) -> Result<Vec<u64>, StakingError> {
        let mut ids = Vec::new();
        let mut bad_key = None;
        self.store.scan(&KeyRange::prefix(prefix), &mut |key, _| {
            match keys::trailing_id(key) {
                Ok(id) => {
                    ids.push(id);
                    false
                }
                Err(e) => {
                    bad_key = Some(e);
                    true
                }
            }
        })?;
        match bad_key {
            Some(e) => Err(e),
            None => Ok(ids),
        }
    }

    /// The persisted parameters. Fails if genesis has not run.
    pub fn params(&self) -> Result<Params, StakingError> {
        self.load(keys::PARAMS)?
            .ok_or(StakingError::ParamsNotInitialized)
    }

    pub fn argument(&self, id: ArgumentId) -> Result<Option<Argument>, StakingError> {
        self.load(&keys::argument(id))
    }

    pub fn stake(&self, id: StakeId) -> Result<Option<Stake>, StakingError> {
        self.load(&keys::stake(id))
    }

    fn arguments_for(&self, ids: Vec<ArgumentId>) -> Result<Vec<Argument>, StakingError> {
        ids.into_iter()
            .map(|id| {
                self.argument(id)?
                    .ok_or_else(|| StakingError::NotFound(format!("indexed argument {id}")))
            })
            .collect()
    }

    fn stakes_for(&self, ids: Vec<StakeId>) -> Result<Vec<Stake>, StakingError> {
        ids.into_iter()
            .map(|id| {
                self.stake(id)?
                    .ok_or_else(|| StakingError::NotFound(format!("indexed stake {id}")))
            })
            .collect()
    }

    /// Arguments on a claim in submission order.
    pub fn arguments_by_claim(&self, claim_id: ClaimId) -> Result<Vec<Argument>, StakingError> {
        let ids = self.index_ids(&keys::claim_arguments_prefix(claim_id))?;
        self.arguments_for(ids)
    }

    /// Stakes on an argument in submission order.
    pub fn stakes_by_argument(&self, argument_id: ArgumentId) -> Result<Vec<Stake>, StakingError> {
        let ids = self.index_ids(&keys::argument_stakes_prefix(argument_id))?;
        self.stakes_for(ids)
    }

    pub fn arguments_by_user(&self, address: &AccountAddress) -> Result<Vec<Argument>, StakingError> {
        let ids = self.index_ids(&keys::user_arguments_prefix(address))?;
        self.arguments_for(ids)
    }

    pub fn stakes_by_user(&self, address: &AccountAddress) -> Result<Vec<Stake>, StakingError> {
        let ids = self.index_ids(&keys::user_stakes_prefix(address))?;
        self.stakes_for(ids)
    }

    /// Whether `creator` already holds a stake on the argument.
    pub fn has_stake(
        &self,
        argument_id: ArgumentId,
        creator: &AccountAddress,
    ) -> Result<bool, StakingError> {
        Ok(self
            .store
            .contains(&keys::argument_staker(argument_id, creator))?)
    }

    /// The id of `creator`'s stake on the argument, if any.
    pub fn stake_id_of(
        &self,
        argument_id: ArgumentId,
        creator: &AccountAddress,
    ) -> Result<Option<StakeId>, StakingError> {
        match self.store.get(&keys::argument_staker(argument_id, creator))? {
            Some(bytes) => Ok(Some(keys::decode_u64(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Id the next created argument will receive.
    pub fn next_argument_id(&self) -> Result<ArgumentId, StakingError> {
        self.load_counter(keys::NEXT_ARGUMENT_ID)
    }

    /// Id the next created stake will receive.
    pub fn next_stake_id(&self) -> Result<StakeId, StakingError> {
        self.load_counter(keys::NEXT_STAKE_ID)
    }
}

impl<S: KvWrite> StakeLedger<S> {
    fn save<T: Serialize>(&mut self, key: &[u8], record: &T) -> Result<(), StakingError> {
        let bytes = bincode::serialize(record)?;
        self.store.put(key, &bytes);
        Ok(())
    }

    fn take_id(&mut self, counter: &[u8]) -> Result<u64, StakingError> {
        let id = self.load_counter(counter)?;
        let next = id.checked_add(1).ok_or(StakingError::Overflow)?;
        self.store.put(counter, &next.to_be_bytes());
        Ok(id)
    }

    pub fn set_params(&mut self, params: &Params) -> Result<(), StakingError> {
        self.save(keys::PARAMS, params)
    }

    /// Store a new argument under a fresh id and index it by claim and by
    /// creator. Aggregates start at zero.
    pub fn create_argument(
        &mut self,
        claim_id: ClaimId,
        creator: &AccountAddress,
        summary: &str,
        body: &str,
        stake_type: StakeType,
        time: Timestamp,
    ) -> Result<Argument, StakingError> {
        let id = self.take_id(keys::NEXT_ARGUMENT_ID)?;
        let argument = Argument {
            id,
            creator: creator.clone(),
            claim_id,
            summary: summary.to_string(),
            body: body.to_string(),
            stake_type,
            created_time: time,
            updated_time: time,
            upvoted_count: 0,
            upvoted_stake: 0,
        };
        self.save(&keys::argument(id), &argument)?;
        self.store.put(&keys::claim_argument(claim_id, id), &[]);
        self.store.put(&keys::user_argument(creator, id), &[]);

        tracing::debug!(argument_id = id, claim_id, creator = %creator, "argument created");
        Ok(argument)
    }

    /// Store a new stake, index it and enqueue it for expiry at
    /// `time + lock_period`.
    ///
    /// The one-stake-per-creator rule is the caller's to check through
    /// [`StakeLedger::has_stake`]; this only verifies the argument exists.
    pub fn create_stake(
        &mut self,
        argument_id: ArgumentId,
        creator: &AccountAddress,
        stake_type: StakeType,
        amount: Amount,
        time: Timestamp,
    ) -> Result<Stake, StakingError> {
        if !self.store.contains(&keys::argument(argument_id))? {
            return Err(StakingError::UnknownArgument(argument_id));
        }
        let lock_period = self.params()?.lock_period_secs;
        let end_time = time
            .checked_add_secs(lock_period)
            .ok_or(StakingError::Overflow)?;

        let id = self.take_id(keys::NEXT_STAKE_ID)?;
        let stake = Stake {
            id,
            argument_id,
            stake_type,
            amount,
            creator: creator.clone(),
            created_time: time,
            end_time,
            expired: false,
            result: None,
        };
        self.save(&keys::stake(id), &stake)?;
        self.store.put(&keys::argument_stake(argument_id, id), &[]);
        self.store.put(&keys::user_stake(creator, id), &[]);
        self.store
            .put(&keys::argument_staker(argument_id, creator), &id.to_be_bytes());
        self.enqueue(&stake);

        tracing::debug!(
            stake_id = id,
            argument_id,
            stake_type = %stake_type,
            amount,
            end_time = %end_time,
            "stake created"
        );
        Ok(stake)
    }

    /// Overwrite an existing argument record. Indices are unaffected.
    pub fn save_argument(&mut self, argument: &Argument) -> Result<(), StakingError> {
        self.save(&keys::argument(argument.id), argument)
    }

    /// Overwrite an existing stake record. Indices and queue are unaffected.
    pub fn save_stake(&mut self, stake: &Stake) -> Result<(), StakingError> {
        self.save(&keys::stake(stake.id), stake)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tru_store::{CacheStore, KeyRange, StoreError};

    /// A store with nothing in it, for use as a cache parent.
    pub(crate) struct Empty;

    impl KvRead for Empty {
        fn get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(None)
        }

        fn scan(
            &self,
            _range: &KeyRange,
            _visit: &mut dyn FnMut(&[u8], &[u8]) -> bool,
        ) -> Result<(), StoreError> {
            Ok(())
        }
    }

    pub(crate) fn ledger() -> StakeLedger<CacheStore<'static, Empty>> {
        let mut ledger = StakeLedger::new(CacheStore::new(&Empty));
        ledger.set_params(&Params::default()).unwrap();
        ledger
    }

    fn addr(s: &str) -> AccountAddress {
        AccountAddress::new(format!("tru1{s}"))
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut ledger = ledger();
        let a1 = ledger
            .create_argument(1, &addr("alice"), "s", "b", StakeType::Backing, Timestamp::new(10))
            .unwrap();
        let a2 = ledger
            .create_argument(1, &addr("bob"), "s", "b", StakeType::Challenge, Timestamp::new(11))
            .unwrap();
        assert_eq!((a1.id, a2.id), (1, 2));
        assert_eq!(ledger.next_argument_id().unwrap(), 3);

        let s1 = ledger
            .create_stake(a1.id, &addr("alice"), StakeType::Backing, 50, Timestamp::new(10))
            .unwrap();
        assert_eq!(s1.id, 1);
        assert_eq!(s1.end_time, Timestamp::new(10 + 7 * 24 * 3600));
    }

    #[test]
    fn indices_preserve_insertion_order() {
        let mut ledger = ledger();
        let t = Timestamp::new(100);
        for who in ["carol", "alice", "bob"] {
            ledger
                .create_argument(7, &addr(who), "s", "b", StakeType::Backing, t)
                .unwrap();
        }
        let creators: Vec<_> = ledger
            .arguments_by_claim(7)
            .unwrap()
            .into_iter()
            .map(|a| a.creator)
            .collect();
        assert_eq!(creators, vec![addr("carol"), addr("alice"), addr("bob")]);
        assert!(ledger.arguments_by_claim(8).unwrap().is_empty());

        for who in ["bob", "alice"] {
            ledger
                .create_stake(2, &addr(who), StakeType::Upvote, 10, t)
                .unwrap();
        }
        let stakes = ledger.stakes_by_argument(2).unwrap();
        assert_eq!(stakes.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(ledger.stakes_by_user(&addr("alice")).unwrap()[0].id, 2);
        assert_eq!(ledger.arguments_by_user(&addr("alice")).unwrap()[0].id, 2);
    }

    #[test]
    fn has_stake_tracks_argument_and_creator() {
        let mut ledger = ledger();
        let t = Timestamp::new(1);
        ledger
            .create_argument(1, &addr("alice"), "s", "b", StakeType::Backing, t)
            .unwrap();
        assert!(!ledger.has_stake(1, &addr("bob")).unwrap());
        ledger
            .create_stake(1, &addr("bob"), StakeType::Upvote, 10, t)
            .unwrap();
        assert!(ledger.has_stake(1, &addr("bob")).unwrap());
        assert_eq!(ledger.stake_id_of(1, &addr("bob")).unwrap(), Some(1));
        assert!(!ledger.has_stake(2, &addr("bob")).unwrap());
    }

    #[test]
    fn stake_on_missing_argument_is_rejected() {
        let mut ledger = ledger();
        let err = ledger
            .create_stake(42, &addr("bob"), StakeType::Upvote, 10, Timestamp::new(1))
            .unwrap_err();
        assert!(matches!(err, StakingError::UnknownArgument(42)));
        assert_eq!(ledger.next_stake_id().unwrap(), 1);
    }

    #[test]
    fn lookups_report_absence() {
        let ledger = ledger();
        assert_eq!(ledger.argument(1).unwrap(), None);
        assert_eq!(ledger.stake(1).unwrap(), None);
    }

    #[test]
    fn params_missing_before_genesis() {
        let ledger = StakeLedger::new(CacheStore::new(&Empty));
        assert!(matches!(
            ledger.params(),
            Err(StakingError::ParamsNotInitialized)
        ));
    }
}
