//! Validate configuration command.

use anyhow::{Context, Result};
use std::path::Path;
use tradebot_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    println!("Configuration OK: {}", config_path.display());
    println!("  app:        {} ({})", config.app.name, config.app.environment);
    println!("  logging:    {} / {}", config.logging.level, config.logging.format);
    println!(
        "  run:        backtest={} scan={} indexing={:?} verbosity={} notify={}",
        config.run.backtest_mode,
        config.run.scan_mode,
        config.run.indexing,
        config.run.verbosity,
        config.run.notify
    );
    println!(
        "  account:    balance={} leverage={} commission={}",
        config.account.initial_balance, config.account.leverage, config.account.commission
    );
    println!("  strategies: {}", config.strategies.len());
    for name in config.strategies.keys() {
        println!("    - {}", name);
    }
    Ok(())
}
