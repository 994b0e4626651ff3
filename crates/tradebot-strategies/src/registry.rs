//! Strategy registry for dynamic strategy loading.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tradebot_core::error::StrategyError;
use tradebot_core::traits::SignalGenerator;
use tradebot_core::types::BarSeries;

use crate::{MaCrossover, MaCrossoverConfig, Momentum, MomentumConfig};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Strategy name
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of available signal generators.
pub struct StrategyRegistry {
    strategies: HashMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = HashMap::new();

        strategies.insert(
            "ma-crossover".to_string(),
            StrategyInfo {
                name: "MA Crossover".to_string(),
                description: "Trades fast/slow moving average crossovers".to_string(),
                default_config: serde_json::to_value(MaCrossoverConfig::default())
                    .unwrap_or_default(),
            },
        );

        strategies.insert(
            "momentum".to_string(),
            StrategyInfo {
                name: "Momentum".to_string(),
                description: "Follows strong recent price movement".to_string(),
                default_config: serde_json::to_value(MomentumConfig::default())
                    .unwrap_or_default(),
            },
        );

        Self { strategies }
    }

    /// List all available strategies.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Create a strategy instance from configuration. `data` attaches the
    /// pre-fetched series consumed by index-driven cycles.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
        data: Option<BarSeries>,
    ) -> Result<Box<dyn SignalGenerator>, StrategyError> {
        match name {
            "ma-crossover" => {
                let config: MaCrossoverConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                let mut strategy = MaCrossover::new(config);
                if let Some(series) = data {
                    strategy = strategy.with_data(series);
                }
                Ok(Box::new(strategy))
            }
            "momentum" => {
                let config: MomentumConfig = serde_json::from_value(config)
                    .map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
                config.validate()?;
                let mut strategy = Momentum::new(config);
                if let Some(series) = data {
                    strategy = strategy.with_data(series);
                }
                Ok(Box::new(strategy))
            }
            _ => Err(StrategyError::NotFound(name.to_string())),
        }
    }

    /// Create a strategy with default configuration.
    pub fn create_default(
        &self,
        name: &str,
        data: Option<BarSeries>,
    ) -> Result<Box<dyn SignalGenerator>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone(), data)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
