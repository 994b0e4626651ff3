//! Backtest command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use tradebot_broker::VirtualVenue;
use tradebot_config::{load_config, AppConfig, StrategySettings};
use tradebot_core::traits::{DataFeed, Notifier, Venue};
use tradebot_core::types::Granularity;
use tradebot_data::{FeedId, FeedRegistry};
use tradebot_engine::{BacktestSummary, TradingBot};
use tradebot_notify::FileNotifier;
use tradebot_strategies::StrategyRegistry;

use crate::cli::BacktestArgs;

pub async fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    info!("Starting backtest for strategy: {}", args.strategy);

    let config = if config_path.exists() {
        load_config(config_path).context("Failed to load configuration")?
    } else {
        AppConfig::default()
    };

    let granularity: Granularity = args.granularity.parse()?;
    let start = args.start.as_deref().map(parse_date).transpose()?;
    let end = args.end.as_deref().map(parse_date).transpose()?;

    if !args.data.is_file() {
        anyhow::bail!(
            "Data file '{}' does not exist. Provide a CSV bar file with --data",
            args.data.display()
        );
    }

    let mut run = config.run.clone();
    run.backtest_mode = true;
    run.scan_mode = false;
    run.data_start = start;
    run.data_end = end;

    let mut settings = config
        .strategies
        .get(&args.strategy)
        .cloned()
        .unwrap_or_default();
    settings.name = args.strategy.clone();
    settings.instrument = args.instrument.clone();
    settings.granularities = vec![granularity];
    settings.period = args.period;
    settings.data_files.insert(granularity, args.data.clone());

    let feeds = FeedRegistry::with_data_root(args.data.parent().unwrap_or_else(|| Path::new(".")));
    let feed = feeds.get(FeedId::Csv)?;
    let series = feed.load_local(&args.data, start, end).await?;

    let registry = StrategyRegistry::new();
    let strategy_config = strategy_config(&args, &registry, &settings)?;
    let strategy = registry
        .create(&args.strategy, strategy_config, Some(series))
        .context("Failed to create strategy")?;

    let capital = Decimal::try_from(args.capital).unwrap_or_default();
    let venue = Arc::new(
        VirtualVenue::new(capital)
            .with_leverage(config.account.leverage)
            .with_commission(config.account.commission),
    );

    let notifier: Option<Arc<dyn Notifier>> = if run.notify > 0 {
        Some(Arc::new(FileNotifier::new()))
    } else {
        None
    };

    let mut bot = TradingBot::new(
        strategy,
        settings,
        run,
        config.email.clone(),
        None,
        feed,
        Arc::clone(&venue) as Arc<dyn Venue>,
        notifier,
    )
    .await?;

    // Replay: one periodic cycle per bar, sampling the account after each.
    let (first, last) = bot.iteration_range()?;
    let mut timestamps = Vec::with_capacity(last - first);
    let mut balance = Vec::with_capacity(last - first);
    let mut nav = Vec::with_capacity(last - first);
    let mut margin = Vec::with_capacity(last - first);
    for index in first..last {
        bot.update_periodic(index).await?;
        let snapshot = venue.account_snapshot();
        if let Some(bar) = bot.data().data.get(index) {
            timestamps.push(bar.timestamp);
        }
        balance.push(snapshot.balance);
        nav.push(snapshot.nav);
        margin.push(snapshot.margin);
    }

    let summary = bot.create_backtest_summary(balance, nav, margin, Some(timestamps));

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_summary(&summary, capital),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, serde_json::to_string_pretty(&summary)?)?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

fn strategy_config(
    args: &BacktestArgs,
    registry: &StrategyRegistry,
    settings: &StrategySettings,
) -> Result<serde_json::Value> {
    if let Some(path) = &args.strategy_config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(serde_json::from_str(&raw)?);
    }
    if !settings.params.is_empty() {
        return Ok(serde_json::to_value(&settings.params)?);
    }
    let info = registry
        .get(&args.strategy)
        .with_context(|| format!("Unknown strategy '{}'", args.strategy))?;
    Ok(info.default_config.clone())
}

fn parse_date(s: &str) -> Result<i64> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context("Invalid time of day")?;
    Ok(midnight.and_utc().timestamp_millis())
}

fn print_summary(summary: &BacktestSummary, initial_capital: Decimal) {
    let history = &summary.account_history;
    let final_nav = history.nav.last().copied().unwrap_or(initial_capital);
    let return_pct = if initial_capital > Decimal::ZERO {
        (final_nav / initial_capital - Decimal::ONE) * Decimal::from(100)
    } else {
        Decimal::ZERO
    };
    let closed: Vec<_> = summary
        .trade_summary
        .iter()
        .filter(|t| t.pnl.is_some())
        .collect();
    let winners = closed
        .iter()
        .filter(|t| t.pnl.map_or(false, |p| p > Decimal::ZERO))
        .count();

    println!("Backtest Summary: {} ({})", summary.instrument, summary.granularity);
    println!("═══════════════════════════════════════════════════════════");
    println!("  Bars processed:     {}", history.nav.len());
    println!("  Initial capital:    {}", initial_capital);
    println!("  Final NAV:          {:.2}", final_nav);
    println!("  Return:             {:.2}%", return_pct);
    println!("  Max drawdown:       {:.2}%", history.max_drawdown() * Decimal::from(100));
    println!("  Trades:             {}", summary.trade_summary.len());
    if !closed.is_empty() {
        println!(
            "  Win rate:           {:.1}%",
            100.0 * winners as f64 / closed.len() as f64
        );
    }
    println!("  Open at close:      {}", summary.open_trades.len());
    println!("  Cancelled orders:   {}", summary.cancelled_orders.len());
}
