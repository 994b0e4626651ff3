//! Configuration structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use tradebot_core::types::{BarIndexing, Granularity, SizingMethod};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub account: AccountSettings,
    #[serde(default)]
    pub email: EmailSettings,
    /// Strategy configurations keyed by name
    #[serde(default)]
    pub strategies: HashMap<String, StrategySettings>,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "tradebot".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// How the bot runs: mode, windowing rule, reporting levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Replay historical data instead of trading live
    pub backtest_mode: bool,
    /// Report signals without submitting orders
    pub scan_mode: bool,
    /// Which bar of the visible window cycles act on
    pub indexing: BarIndexing,
    /// 0 silent, 1 per-cycle summaries, 2 adds order detail
    pub verbosity: u8,
    /// 0 off, 1 record orders to file, 2 adds email per order
    pub notify: u8,
    /// Resolve prices through the feed's live quote when available
    pub use_live_price: bool,
    /// Restrict data to this range (epoch milliseconds)
    pub data_start: Option<i64>,
    pub data_end: Option<i64>,
    /// Where order records are appended when notify >= 1
    pub order_summary: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backtest_mode: true,
            scan_mode: false,
            indexing: BarIndexing::Open,
            verbosity: 1,
            notify: 0,
            use_live_price: false,
            data_start: None,
            data_end: None,
            order_summary: PathBuf::from("order_summary.txt"),
        }
    }
}

/// Simulated account settings for backtests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSettings {
    pub initial_balance: Decimal,
    pub leverage: Decimal,
    pub commission: Decimal,
}

impl Default for AccountSettings {
    fn default() -> Self {
        use rust_decimal_macros::dec;
        Self {
            initial_balance: dec!(100000),
            leverage: dec!(1),
            commission: Decimal::ZERO,
        }
    }
}

/// Outbound notification addressing, used when notify >= 2.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmailSettings {
    pub sender: Option<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// One strategy's static configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Registered strategy name
    pub name: String,
    pub instrument: String,
    /// Granularities to fetch; the first is the base
    pub granularities: Vec<Granularity>,
    /// Minimum bars the strategy needs before it can run
    pub period: usize,
    pub sizing: SizingMethod,
    /// Account fraction at risk per trade, for risk-based sizing
    pub risk_pc: Option<f64>,
    /// Hand open positions to the strategy on each periodic cycle
    #[serde(default)]
    pub include_positions: bool,
    /// Local data file per granularity; fetched live when absent
    #[serde(default)]
    pub data_files: HashMap<Granularity, PathBuf>,
    /// Local quote data file; derived from trading data when absent
    pub quote_file: Option<PathBuf>,
    /// Free-form strategy parameters, handed to the strategy untouched
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            instrument: String::new(),
            granularities: vec![Granularity::H1],
            period: 300,
            sizing: SizingMethod::Risk,
            risk_pc: None,
            include_positions: false,
            data_files: HashMap::new(),
            quote_file: None,
            params: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_backtest_safe() {
        let config = AppConfig::default();
        assert!(config.run.backtest_mode);
        assert!(!config.run.scan_mode);
        assert_eq!(config.run.indexing, BarIndexing::Open);
        assert_eq!(config.run.notify, 0);
    }

    #[test]
    fn strategy_settings_deserialize_from_toml() {
        let toml = r#"
            name = "ma-crossover"
            instrument = "EURUSD"
            granularities = ["1h", "4h"]
            period = 50
            sizing = "risk"
            risk_pc = 1.5
            include_positions = true

            [params]
            fast = 10
            slow = 30
        "#;
        let settings: StrategySettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.instrument, "EURUSD");
        assert_eq!(
            settings.granularities,
            vec![Granularity::H1, Granularity::H4]
        );
        assert_eq!(settings.period, 50);
        assert!(settings.include_positions);
        assert_eq!(settings.params.get("fast"), Some(&serde_json::json!(10)));
    }
}
