//! TruStory staking CLI: genesis, submissions, settlement and ledger queries
//! against a local LMDB store.

mod commands;
mod config;
mod operator;

use clap::Parser;
use std::path::PathBuf;

use config::CliConfig;
use tru_utils::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "tru-staking", about = "TruStory stake lifecycle and reward engine")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "TRU_STAKING_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of the LMDB store.
    #[arg(long, env = "TRU_STAKING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TRU_STAKING_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TRU_STAKING_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let output = commands::run(cli.command, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
