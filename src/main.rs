//! WealthWeb main entry point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

use wealthweb_api::start_server;
use wealthweb_config::{Config, ConfigError};
use wealthweb_core::{JsonFileStorage, Wealth};

#[derive(Parser, Debug)]
#[command(name = "wealthweb")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight personal finance ledger with a JSON API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Write a default configuration to the given path and exit
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init {
        std::fs::write(&args.config, Config::generate_default())
            .with_context(|| format!("failed to write {}", args.config.display()))?;
        println!("Wrote default configuration to {}", args.config.display());
        return Ok(());
    }

    let (config, missing) = match Config::load(&args.config) {
        Ok(config) => (config, None),
        Err(e @ ConfigError::FileNotFound { .. }) => (Config::default(), Some(e)),
        Err(e) => {
            if let Some(hint) = e.suggestion() {
                eprintln!("[{}] {}", e.code(), hint);
            }
            return Err(e).with_context(|| format!("invalid configuration {}", args.config.display()));
        }
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if let Some(e) = missing {
        log::warn!(target: "wealthweb", "{}, using defaults", e);
        if let Some(hint) = e.suggestion() {
            log::info!(target: "wealthweb", "{}", hint);
        }
    }
    log::info!(target: "wealthweb", "state file: {}", config.state_path().display());

    let storage = Arc::new(JsonFileStorage::new(config.state_path(), config.storage.pretty));
    let wealth = Wealth::open(&config, storage).context("failed to open ledger state")?;
    let wealth = Arc::new(RwLock::new(wealth));

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, wealth))
        .context("server error")?;

    Ok(())
}
