//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tradebot")]
#[command(author, version, about = "Per-instrument strategy execution and backtest replay")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a strategy over historical data
    Backtest(BacktestArgs),
    /// Report would-be signals without submitting orders
    Scan(ScanArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Strategy to backtest
    #[arg(short, long)]
    pub strategy: String,

    /// Instrument to trade
    #[arg(short, long)]
    pub instrument: String,

    /// Bar data file (CSV)
    #[arg(long)]
    pub data: PathBuf,

    /// Bar granularity
    #[arg(short, long, default_value = "1h")]
    pub granularity: String,

    /// Strategy lookback period in bars
    #[arg(short, long, default_value = "50")]
    pub period: usize,

    /// Initial account balance
    #[arg(long, default_value = "100000")]
    pub capital: f64,

    /// Restrict data to on/after this date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Restrict data to on/before this date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Strategy configuration file (JSON)
    #[arg(long)]
    pub strategy_config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,

    /// Save the full summary to a file (JSON)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Strategy to scan with
    #[arg(short, long)]
    pub strategy: String,

    /// Instruments to scan (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub instruments: Vec<String>,

    /// Directory of bar data files
    #[arg(long)]
    pub data_dir: PathBuf,

    /// Bar granularity
    #[arg(short, long, default_value = "1h")]
    pub granularity: String,

    /// Strategy lookback period in bars
    #[arg(short, long, default_value = "50")]
    pub period: usize,
}
