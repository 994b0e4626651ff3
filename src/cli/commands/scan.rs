//! Scan command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use tradebot_broker::VirtualVenue;
use tradebot_config::{load_config, AppConfig};
use tradebot_core::traits::{Notifier, Venue};
use tradebot_core::types::Granularity;
use tradebot_data::{FeedId, FeedRegistry};
use tradebot_engine::TradingBot;
use tradebot_notify::FileNotifier;
use tradebot_strategies::StrategyRegistry;

use crate::cli::ScanArgs;

/// Run one signal cycle per instrument over the latest data and report the
/// hits without submitting anything.
pub async fn run(args: ScanArgs, config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        load_config(config_path).context("Failed to load configuration")?
    } else {
        AppConfig::default()
    };

    let granularity: Granularity = args.granularity.parse()?;
    if args.instruments.is_empty() {
        anyhow::bail!("Provide at least one instrument with --instruments");
    }

    let registry = StrategyRegistry::new();
    let feeds = FeedRegistry::with_data_root(&args.data_dir);
    let notifier: Option<Arc<dyn Notifier>> = if config.run.notify > 0 {
        Some(Arc::new(FileNotifier::new()))
    } else {
        None
    };
    let mut any_hits = false;

    for instrument in &args.instruments {
        let mut run = config.run.clone();
        run.backtest_mode = true;
        run.scan_mode = true;

        let mut settings = config
            .strategies
            .get(&args.strategy)
            .cloned()
            .unwrap_or_default();
        settings.name = args.strategy.clone();
        settings.instrument = instrument.clone();
        settings.granularities = vec![granularity];
        settings.period = args.period;

        let feed = feeds.get(FeedId::Csv)?;
        let strategy = registry
            .create_default(&args.strategy, None)
            .context("Failed to create strategy")?;
        let venue = Arc::new(VirtualVenue::new(rust_decimal::Decimal::ZERO));

        let mut bot = match TradingBot::new(
            strategy,
            settings,
            run,
            config.email.clone(),
            None,
            feed,
            venue as Arc<dyn Venue>,
            notifier.clone(),
        )
        .await
        {
            Ok(bot) => bot,
            Err(err) => {
                info!(instrument = %instrument, error = %err, "Skipping instrument");
                continue;
            }
        };

        // Cutoff one bar past the latest data so the newest bar is visible
        // under open indexing.
        let Some(last) = bot.data().data.last().copied() else {
            continue;
        };
        let cutoff = last.timestamp + granularity.as_millis() as i64;
        bot.update_continuous(cutoff).await?;

        for (instrument, hit) in bot.scan_results() {
            any_hits = true;
            println!(
                "{}: signal={:?} entry={} stop={:?} take={:?}",
                instrument, hit.signal, hit.entry, hit.stop, hit.take
            );
        }
    }

    if !any_hits {
        println!("No scan hits.");
    }
    Ok(())
}
