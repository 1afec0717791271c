//! Subcommand execution. Every command returns a JSON document that `main`
//! prints to stdout.

use anyhow::{bail, Context};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use tru_staking::{Params, RewardCalculator, StakeType, StakingError, StakingKeeper};
use tru_store_lmdb::{LmdbEnvironment, LmdbKvStore};
use tru_types::{AccountAddress, Amount, ArgumentId, ClaimId, StakeId, Timestamp};
use tru_utils::format_duration;

use crate::config::CliConfig;
use crate::operator::{ConfigGuard, PayoutJournal};

/// Maximum number of named databases in the environment.
const MAX_DBS: u32 = 4;

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Write the configured parameters as genesis state.
    Init,

    /// Show the persisted parameters.
    Params,

    /// Open an argument on a claim with its initial stake.
    SubmitArgument {
        #[arg(long)]
        claim: ClaimId,
        #[arg(long)]
        creator: AccountAddress,
        /// "backing" or "challenge".
        #[arg(long = "type", default_value = "backing")]
        stake_type: StakeType,
        #[arg(long)]
        body: String,
        #[arg(long, default_value = "")]
        summary: String,
        /// Block time in unix seconds. Defaults to the system clock.
        #[arg(long)]
        now: Option<u64>,
    },

    /// Upvote an argument.
    Upvote {
        #[arg(long)]
        argument: ArgumentId,
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Attach a backing or challenge stake to an existing argument.
    Attach {
        #[arg(long)]
        argument: ArgumentId,
        #[arg(long)]
        creator: AccountAddress,
        #[arg(long = "type")]
        stake_type: StakeType,
        #[arg(long)]
        now: Option<u64>,
    },

    /// Settle due stakes and print the resulting payouts.
    Settle {
        #[arg(long)]
        as_of: Option<u64>,
    },

    /// Show one argument.
    Argument { id: ArgumentId },

    /// Show one stake.
    Stake { id: StakeId },

    /// List the arguments on a claim in submission order.
    ClaimArguments { claim: ClaimId },

    /// List the stakes on an argument in submission order.
    ArgumentStakes { id: ArgumentId },

    /// List an account's arguments and stakes.
    User { address: AccountAddress },

    /// List queued stakes due at `--as-of`.
    Due {
        #[arg(long)]
        as_of: u64,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Compute interest and its split without touching the store.
    Interest {
        #[arg(long)]
        amount: Amount,
        /// Holding period in seconds. Defaults to the lock period.
        #[arg(long)]
        duration: Option<u64>,
    },
}

type Keeper = StakingKeeper<LmdbKvStore, ConfigGuard>;

fn open_keeper(config: &CliConfig) -> anyhow::Result<(LmdbEnvironment, Keeper)> {
    let env = LmdbEnvironment::open(&config.data_dir, MAX_DBS, config.map_size_bytes())
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    let keeper = StakingKeeper::new(env.kv_store(), ConfigGuard::new(config.jailed.clone()));
    Ok((env, keeper))
}

fn block_time(explicit: Option<u64>) -> anyhow::Result<Timestamp> {
    if let Some(secs) = explicit {
        return Ok(Timestamp::new(secs));
    }
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?;
    Ok(Timestamp::new(since_epoch.as_secs()))
}

/// Persisted parameters, or the configured ones before genesis.
fn effective_params(keeper: &Keeper, config: &CliConfig) -> anyhow::Result<Params> {
    match keeper.params() {
        Ok(params) => Ok(params),
        Err(StakingError::ParamsNotInitialized) => Ok(config.params.clone()),
        Err(e) => Err(e.into()),
    }
}

pub fn run(command: Command, config: &CliConfig) -> anyhow::Result<Value> {
    match command {
        // Before genesis there may be no store to open.
        Command::Interest { amount, duration } if !config.data_dir.exists() => {
            interest(&config.params, amount, duration)
        }
        command => run_with_store(command, config),
    }
}

fn run_with_store(command: Command, config: &CliConfig) -> anyhow::Result<Value> {
    let (_env, keeper) = open_keeper(config)?;
    let ledger = keeper.ledger();

    let value = match command {
        Command::Init => {
            if ledger.params().is_ok() {
                bail!("store at {} is already initialised", config.data_dir.display());
            }
            keeper.init_genesis(&config.params)?;
            json!({ "initialised": true, "params": config.params })
        }
        Command::Params => {
            let params = keeper.params()?;
            json!({
                "params": params,
                "lock_period": format_duration(params.lock_period_secs),
            })
        }
        Command::SubmitArgument {
            claim,
            creator,
            stake_type,
            body,
            summary,
            now,
        } => {
            let argument = keeper.submit_argument(
                claim,
                &body,
                &summary,
                &creator,
                stake_type,
                block_time(now)?,
            )?;
            json!(argument)
        }
        Command::Upvote {
            argument,
            creator,
            now,
        } => json!(keeper.submit_upvote(argument, &creator, block_time(now)?)?),
        Command::Attach {
            argument,
            creator,
            stake_type,
            now,
        } => json!(keeper.attach_stake(argument, &creator, stake_type, block_time(now)?)?),
        Command::Settle { as_of } => {
            let mut journal = PayoutJournal::default();
            let report = keeper.settle_due(&mut journal, block_time(as_of)?)?;
            tracing::info!(payouts = journal.entries().len(), "settlement journaled");
            json!(report)
        }
        Command::Argument { id } => match ledger.argument(id)? {
            Some(argument) => json!(argument),
            None => bail!("argument {id} not found"),
        },
        Command::Stake { id } => match ledger.stake(id)? {
            Some(stake) => json!(stake),
            None => bail!("stake {id} not found"),
        },
        Command::ClaimArguments { claim } => json!(ledger.arguments_by_claim(claim)?),
        Command::ArgumentStakes { id } => json!(ledger.stakes_by_argument(id)?),
        Command::User { address } => json!({
            "arguments": ledger.arguments_by_user(&address)?,
            "stakes": ledger.stakes_by_user(&address)?,
        }),
        Command::Due { as_of, limit } => {
            let limit = limit.unwrap_or(usize::MAX);
            let mut due = Vec::new();
            if limit > 0 {
                ledger.iterate_due(Timestamp::new(as_of), |stake| {
                    due.push(stake.clone());
                    due.len() >= limit
                })?;
            }
            json!(due)
        }
        Command::Interest { amount, duration } => {
            interest(&effective_params(&keeper, config)?, amount, duration)?
        }
    };
    Ok(value)
}

fn interest(params: &Params, amount: Amount, duration: Option<u64>) -> anyhow::Result<Value> {
    let duration = duration.unwrap_or(params.lock_period_secs);
    let calc = RewardCalculator::new(params);
    let interest = calc.interest(amount, duration)?;
    let split = calc.split_reward(interest)?;
    Ok(json!({
        "amount": amount,
        "duration": format_duration(duration),
        "rate": calc.rate(amount, duration)?,
        "interest": interest,
        "rounded": interest.round_int().to_string(),
        "creator_share": split.creator,
        "staker_share": split.staker,
    }))
}
