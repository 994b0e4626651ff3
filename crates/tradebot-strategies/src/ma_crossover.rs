//! Moving average crossover strategy.
//!
//! Goes long when the fast MA crosses above the slow MA and short when it
//! crosses below.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tradebot_core::error::StrategyError;
use tradebot_core::traits::{IndicatorSnapshot, SignalGenerator};
use tradebot_core::types::{BarSeries, DataBundle, Direction, OrderDraft, OrderIntent, Position};

use crate::sma;

/// Configuration for the MA crossover strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaCrossoverConfig {
    /// Fast moving average period
    pub fast_period: usize,
    /// Slow moving average period
    pub slow_period: usize,
}

impl Default for MaCrossoverConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
        }
    }
}

impl MaCrossoverConfig {
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.slow_period {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than slow period".into(),
            ));
        }
        Ok(())
    }
}

/// Moving average crossover signal generator.
pub struct MaCrossover {
    config: MaCrossoverConfig,
    /// Pre-fetched series for index-driven operation
    data: Option<BarSeries>,
    last_fast: Option<f64>,
    last_slow: Option<f64>,
}

impl MaCrossover {
    pub fn new(config: MaCrossoverConfig) -> Self {
        Self {
            config,
            data: None,
            last_fast: None,
            last_slow: None,
        }
    }

    /// Attach the pre-fetched series used by index-driven cycles.
    pub fn with_data(mut self, data: BarSeries) -> Self {
        self.data = Some(data);
        self
    }

    fn evaluate(&mut self, closes: &[f64]) -> OrderIntent {
        let fast = sma(closes, self.config.fast_period);
        let slow = sma(closes, self.config.slow_period);

        let n = fast.len().min(slow.len());
        if n < 2 {
            return OrderIntent::none();
        }
        let (fast_prev, fast_now) = (fast[fast.len() - 2], fast[fast.len() - 1]);
        let (slow_prev, slow_now) = (slow[slow.len() - 2], slow[slow.len() - 1]);
        self.last_fast = Some(fast_now);
        self.last_slow = Some(slow_now);

        if fast_prev <= slow_prev && fast_now > slow_now {
            OrderIntent::Single(OrderDraft::market(Direction::Long))
        } else if fast_prev >= slow_prev && fast_now < slow_now {
            OrderIntent::Single(OrderDraft::market(Direction::Short))
        } else {
            OrderIntent::none()
        }
    }
}

impl SignalGenerator for MaCrossover {
    fn name(&self) -> &str {
        "ma-crossover"
    }

    fn signal(&mut self, data: &DataBundle) -> OrderIntent {
        let Some(base) = data.base_series() else {
            return OrderIntent::none();
        };
        self.evaluate(&base.closes())
    }

    fn signal_at(&mut self, index: usize, _position: Option<&[Position]>) -> OrderIntent {
        let closes: Vec<f64> = match &self.data {
            Some(series) => series
                .iter()
                .take(index + 1)
                .map(|b| b.close)
                .collect(),
            None => return OrderIntent::none(),
        };
        self.evaluate(&closes)
    }

    fn indicators(&self) -> Option<IndicatorSnapshot> {
        let mut snapshot = HashMap::new();
        snapshot.insert("fast_ma".to_string(), vec![self.last_fast?]);
        snapshot.insert("slow_ma".to_string(), vec![self.last_slow?]);
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradebot_core::types::{Bar, Granularity};

    fn series(prices: &[f64]) -> BarSeries {
        BarSeries::from_bars(
            "TEST",
            Granularity::D1,
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| Bar::new(i as i64, p, p + 1.0, p - 1.0, p, 1000.0))
                .collect(),
        )
    }

    #[test]
    fn config_validation() {
        assert!(MaCrossoverConfig::default().validate().is_ok());
        let bad = MaCrossoverConfig {
            fast_period: 30,
            slow_period: 20,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn bullish_crossover_goes_long() {
        let mut strategy = MaCrossover::new(MaCrossoverConfig {
            fast_period: 2,
            slow_period: 4,
        });
        // Downtrend then sharp reversal: fast MA crosses up through slow.
        let data = DataBundle::Single(series(&[100.0, 98.0, 96.0, 94.0, 92.0, 98.0, 104.0]));

        let intent = strategy.signal(&data);
        match intent {
            OrderIntent::Single(draft) => assert_eq!(draft.direction, Some(Direction::Long)),
            other => panic!("expected a single long order, got {:?}", other),
        }
    }

    #[test]
    fn flat_market_stays_out() {
        let mut strategy = MaCrossover::new(MaCrossoverConfig {
            fast_period: 2,
            slow_period: 4,
        });
        let data = DataBundle::Single(series(&[100.0; 10]));
        assert!(strategy.signal(&data).is_empty());
    }

    #[test]
    fn index_driven_cycles_see_only_the_prefix() {
        let strategy = MaCrossover::new(MaCrossoverConfig {
            fast_period: 2,
            slow_period: 4,
        });
        let mut strategy =
            strategy.with_data(series(&[100.0, 98.0, 96.0, 94.0, 92.0, 98.0, 104.0]));

        // At index 4 the reversal has not happened yet.
        assert!(strategy.signal_at(4, None).is_empty());
        // By the final index it has.
        assert!(!strategy.signal_at(6, None).is_empty());
    }

    #[test]
    fn indicators_expose_both_averages() {
        let mut strategy = MaCrossover::new(MaCrossoverConfig {
            fast_period: 2,
            slow_period: 4,
        });
        assert!(strategy.indicators().is_none());

        strategy.signal(&DataBundle::Single(series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])));
        let snapshot = strategy.indicators().unwrap();
        assert!(snapshot.contains_key("fast_ma"));
        assert!(snapshot.contains_key("slow_ma"));
    }
}
