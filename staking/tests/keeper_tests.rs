use tru_nullables::{NullAuthGuard, NullClock, NullStore};
use tru_staking::{Argument, Params, Stake, StakeType, StakingError, StakingKeeper};
use tru_types::time::SECS_PER_DAY;
use tru_types::{AccountAddress, Timestamp};

type Keeper = StakingKeeper<NullStore, NullAuthGuard>;

fn setup() -> (Keeper, NullClock) {
    let keeper = StakingKeeper::new(NullStore::new(), NullAuthGuard::new());
    keeper.init_genesis(&Params::default()).unwrap();
    (keeper, NullClock::default())
}

fn addr(name: &str) -> AccountAddress {
    AccountAddress::new(format!("tru1{name}"))
}

fn due(keeper: &Keeper, as_of: Timestamp) -> Vec<Stake> {
    let mut stakes = Vec::new();
    keeper
        .ledger()
        .iterate_due(as_of, |stake| {
            stakes.push(stake.clone());
            false
        })
        .unwrap();
    stakes
}

#[test]
fn submit_argument_lifecycle() {
    let (keeper, clock) = setup();
    let now = clock.now();
    let lock = 7 * SECS_PER_DAY;
    let alice = addr("alice");
    let bob = addr("bob");
    keeper.guard().jail(&alice);

    let err = keeper
        .submit_argument(1, "body", "summary", &alice, StakeType::Upvote, now)
        .unwrap_err();
    assert!(matches!(err, StakingError::InvalidStakeType(_)));

    let err = keeper
        .submit_argument(1, "body", "summary", &alice, StakeType::Backing, now)
        .unwrap_err();
    assert!(matches!(err, StakingError::AccountJailed(ref a) if a == &alice));
    keeper.unjail(&alice).unwrap();

    let argument = keeper
        .submit_argument(1, "body", "summary", &alice, StakeType::Backing, now)
        .unwrap();
    let expected_argument = Argument {
        id: 1,
        creator: alice.clone(),
        claim_id: 1,
        summary: "summary".into(),
        body: "body".into(),
        stake_type: StakeType::Backing,
        created_time: now,
        updated_time: now,
        upvoted_count: 1,
        upvoted_stake: 50,
    };
    assert_eq!(argument, expected_argument);
    assert_eq!(keeper.ledger().argument(1).unwrap(), Some(expected_argument.clone()));

    let expected_stake = Stake {
        id: 1,
        argument_id: 1,
        stake_type: StakeType::Backing,
        amount: 50,
        creator: alice.clone(),
        created_time: now,
        end_time: Timestamp::new(now.as_secs() + lock),
        expired: false,
        result: None,
    };
    assert_eq!(keeper.ledger().stake(1).unwrap(), Some(expected_stake.clone()));

    let argument2 = keeper
        .submit_argument(1, "body2", "summary2", &bob, StakeType::Challenge, now)
        .unwrap();
    assert_eq!(argument2.id, 2);
    assert_eq!(argument2.stake_type, StakeType::Challenge);
    assert_eq!((argument2.upvoted_count, argument2.upvoted_stake), (1, 50));
    let expected_stake2 = Stake {
        id: 2,
        argument_id: 2,
        stake_type: StakeType::Challenge,
        creator: bob.clone(),
        ..expected_stake.clone()
    };
    assert_eq!(keeper.ledger().stake(2).unwrap(), Some(expected_stake2.clone()));

    let ledger = keeper.ledger();
    assert_eq!(
        ledger.arguments_by_claim(1).unwrap(),
        vec![expected_argument.clone(), argument2.clone()]
    );
    assert_eq!(ledger.stakes_by_argument(1).unwrap(), vec![expected_stake.clone()]);
    assert_eq!(ledger.arguments_by_user(&alice).unwrap(), vec![expected_argument]);
    assert_eq!(ledger.arguments_by_user(&bob).unwrap(), vec![argument2]);
    assert_eq!(ledger.stakes_by_user(&alice).unwrap(), vec![expected_stake.clone()]);
    assert_eq!(ledger.stakes_by_user(&bob).unwrap(), vec![expected_stake2.clone()]);

    assert!(due(&keeper, now).is_empty());
    assert_eq!(
        due(&keeper, Timestamp::new(now.as_secs() + lock)),
        vec![expected_stake, expected_stake2]
    );
}

#[test]
fn out_of_range_stake_type_is_rejected_before_submission() {
    assert!(matches!(
        StakeType::try_from(0xFF),
        Err(StakingError::InvalidStakeType(_))
    ));
}

#[test]
fn same_creator_may_open_several_arguments() {
    let (keeper, clock) = setup();
    let alice = addr("alice");
    let a1 = keeper
        .submit_argument(3, "for", "s", &alice, StakeType::Backing, clock.now())
        .unwrap();
    let a2 = keeper
        .submit_argument(3, "against", "s", &alice, StakeType::Challenge, clock.now())
        .unwrap();
    assert_ne!(a1.id, a2.id);
    assert_eq!(keeper.ledger().arguments_by_claim(3).unwrap().len(), 2);
    assert_eq!(keeper.ledger().stakes_by_user(&alice).unwrap().len(), 2);
}

#[test]
fn submit_upvote_lifecycle() {
    let (keeper, clock) = setup();
    let now = clock.now();
    let alice = addr("alice");
    let bob = addr("bob");

    let argument = keeper
        .submit_argument(1, "body", "summary", &alice, StakeType::Backing, now)
        .unwrap();

    clock.advance(60);
    let later = clock.now();
    let upvote = keeper.submit_upvote(argument.id, &bob, later).unwrap();
    assert_eq!(
        upvote,
        Stake {
            id: 2,
            argument_id: 1,
            stake_type: StakeType::Upvote,
            amount: 10,
            creator: bob.clone(),
            created_time: later,
            end_time: Timestamp::new(later.as_secs() + 7 * SECS_PER_DAY),
            expired: false,
            result: None,
        }
    );

    let stored = keeper.ledger().argument(argument.id).unwrap().unwrap();
    assert_eq!((stored.upvoted_count, stored.upvoted_stake), (2, 60));
    assert_eq!(stored.updated_time, later);

    assert!(matches!(
        keeper.submit_upvote(9999, &alice, later),
        Err(StakingError::UnknownArgument(9999))
    ));
    assert!(matches!(
        keeper.submit_upvote(argument.id, &alice, later),
        Err(StakingError::DuplicateStake { argument_id: 1, .. })
    ));
    assert!(matches!(
        keeper.submit_upvote(argument.id, &bob, later),
        Err(StakingError::DuplicateStake { argument_id: 1, .. })
    ));

    assert_eq!(keeper.ledger().stakes_by_user(&alice).unwrap().len(), 1);
    assert_eq!(keeper.ledger().stakes_by_user(&bob).unwrap(), vec![upvote]);
    let stored = keeper.ledger().argument(argument.id).unwrap().unwrap();
    assert_eq!(stored.upvoted_count, 2);
}

#[test]
fn jailed_submission_leaves_store_untouched() {
    let (keeper, clock) = setup();
    let alice = addr("alice");
    keeper
        .submit_argument(1, "body", "s", &addr("carol"), StakeType::Backing, clock.now())
        .unwrap();
    keeper.guard().jail(&alice);

    let before = keeper.store().snapshot();
    let batches = keeper.store().batches_applied();
    let err = keeper
        .submit_argument(1, "body", "s", &alice, StakeType::Challenge, clock.now())
        .unwrap_err();
    assert!(matches!(err, StakingError::AccountJailed(_)));
    assert_eq!(keeper.store().snapshot(), before);
    assert_eq!(keeper.store().batches_applied(), batches);
}

#[test]
fn guard_failure_propagates() {
    let (keeper, clock) = setup();
    let alice = addr("alice");
    keeper.guard().fail();

    let before = keeper.store().snapshot();
    let err = keeper
        .submit_argument(1, "body", "s", &alice, StakeType::Backing, clock.now())
        .unwrap_err();
    assert!(matches!(err, StakingError::Guard(_)));
    assert_eq!(keeper.store().snapshot(), before);

    keeper.guard().fail();
    assert!(matches!(keeper.unjail(&alice), Err(StakingError::Guard(_))));

    // The failure is one-shot.
    keeper
        .submit_argument(1, "body", "s", &alice, StakeType::Backing, clock.now())
        .unwrap();
}

#[test]
fn failure_after_argument_is_staged_commits_nothing() {
    let (keeper, _) = setup();
    let alice = addr("alice");

    // The argument record and its index entries are staged before the
    // initial stake's end time overflows.
    let late = Timestamp::new(u64::MAX - 5);
    let before = keeper.store().snapshot();
    let batches = keeper.store().batches_applied();
    let err = keeper
        .submit_argument(1, "body", "s", &alice, StakeType::Backing, late)
        .unwrap_err();
    assert!(matches!(err, StakingError::Overflow));
    assert_eq!(keeper.store().snapshot(), before);
    assert_eq!(keeper.store().batches_applied(), batches);
    assert!(keeper.ledger().arguments_by_claim(1).unwrap().is_empty());
    assert_eq!(keeper.ledger().next_argument_id().unwrap(), 1);

    let argument = keeper
        .submit_argument(1, "body", "s", &alice, StakeType::Backing, Timestamp::new(5))
        .unwrap();
    assert_eq!(argument.id, 1);
}

#[test]
fn lookups_of_missing_records_are_not_errors() {
    let (keeper, _) = setup();
    assert_eq!(keeper.ledger().argument(77).unwrap(), None);
    assert_eq!(keeper.ledger().stake(77).unwrap(), None);
    assert!(keeper.ledger().arguments_by_claim(77).unwrap().is_empty());
    assert!(keeper.ledger().stakes_by_user(&addr("nobody")).unwrap().is_empty());
}

#[test]
fn parameter_changes_apply_to_new_stakes_only() {
    let (keeper, clock) = setup();
    let alice = addr("alice");
    let first = keeper
        .submit_argument(1, "body", "s", &alice, StakeType::Backing, clock.now())
        .unwrap();

    keeper
        .set_params(&Params {
            lock_period_secs: SECS_PER_DAY,
            default_upvote_amount: 25,
            ..Params::default()
        })
        .unwrap();

    let upvote = keeper.submit_upvote(first.id, &addr("bob"), clock.now()).unwrap();
    assert_eq!(upvote.amount, 25);
    assert_eq!(upvote.lock_duration(), SECS_PER_DAY);

    let original = keeper.ledger().stake(1).unwrap().unwrap();
    assert_eq!(original.lock_duration(), 7 * SECS_PER_DAY);

    // The shorter upvote now matures before the original stake.
    let order: Vec<_> = due(&keeper, Timestamp::new(u64::MAX))
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(order, vec![upvote.id, original.id]);
}
