//! Rate-of-change momentum strategy.

use serde::{Deserialize, Serialize};

use tradebot_core::error::StrategyError;
use tradebot_core::traits::SignalGenerator;
use tradebot_core::types::{BarSeries, DataBundle, Direction, OrderDraft, OrderIntent, Position};

/// Configuration for the momentum strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Lookback for the rate-of-change calculation
    pub lookback: usize,
    /// Minimum absolute rate of change to act on, as a fraction
    pub threshold: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback: 10,
            threshold: 0.02,
        }
    }
}

impl MomentumConfig {
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.lookback == 0 {
            return Err(StrategyError::InvalidConfig(
                "Lookback must be greater than 0".into(),
            ));
        }
        if self.threshold < 0.0 {
            return Err(StrategyError::InvalidConfig(
                "Threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Trades in the direction of strong recent price movement.
pub struct Momentum {
    config: MomentumConfig,
    data: Option<BarSeries>,
}

impl Momentum {
    pub fn new(config: MomentumConfig) -> Self {
        Self { config, data: None }
    }

    /// Attach the pre-fetched series used by index-driven cycles.
    pub fn with_data(mut self, data: BarSeries) -> Self {
        self.data = Some(data);
        self
    }

    fn evaluate(&self, closes: &[f64]) -> OrderIntent {
        if closes.len() <= self.config.lookback {
            return OrderIntent::none();
        }
        let now = closes[closes.len() - 1];
        let then = closes[closes.len() - 1 - self.config.lookback];
        if then == 0.0 {
            return OrderIntent::none();
        }
        let roc = (now - then) / then;
        if roc >= self.config.threshold {
            OrderIntent::Single(OrderDraft::market(Direction::Long))
        } else if roc <= -self.config.threshold {
            OrderIntent::Single(OrderDraft::market(Direction::Short))
        } else {
            OrderIntent::none()
        }
    }
}

impl SignalGenerator for Momentum {
    fn name(&self) -> &str {
        "momentum"
    }

    fn signal(&mut self, data: &DataBundle) -> OrderIntent {
        let Some(base) = data.base_series() else {
            return OrderIntent::none();
        };
        self.evaluate(&base.closes())
    }

    fn signal_at(&mut self, index: usize, _position: Option<&[Position]>) -> OrderIntent {
        let closes: Vec<f64> = match &self.data {
            Some(series) => series.iter().take(index + 1).map(|b| b.close).collect(),
            None => return OrderIntent::none(),
        };
        self.evaluate(&closes)
    }
}
