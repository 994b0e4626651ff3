//! Data feed interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DataError;
use crate::types::{BarSeries, Granularity, Order};

/// Two-sided quote plus directional cost factors for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LivePrice {
    pub bid: f64,
    pub ask: f64,
    /// Cost factor applied to long (non-negative direction) orders
    pub positive_hcf: f64,
    /// Cost factor applied to short orders
    pub negative_hcf: f64,
}

/// Synthesize a two-sided quote from the trading bar's close and the
/// aligned quote bar's close. Deterministic and venue-agnostic; used when
/// no live price capability is configured.
pub fn synthetic_live_price(last_close: f64, quote_close: f64) -> LivePrice {
    let hcf = if last_close == quote_close || last_close == 0.0 {
        1.0
    } else {
        quote_close / last_close
    };
    LivePrice {
        bid: quote_close,
        ask: quote_close,
        positive_hcf: hcf,
        negative_hcf: hcf,
    }
}

/// Source of bar data and live prices.
///
/// Implementations cover local files and remote feeds. Each returned series
/// is ordered oldest to newest; an empty series signals a retrieval failure
/// to the caller.
#[async_trait]
pub trait DataFeed: Send + Sync {
    /// Load a series from a local file, clamped to `[start, end]`.
    async fn load_local(
        &self,
        path: &Path,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<BarSeries, DataError>;

    /// Fetch a series for an instrument at a granularity.
    async fn fetch(
        &self,
        instrument: &str,
        granularity: Granularity,
        count: usize,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<BarSeries, DataError>;

    /// Fetch the quote-price series aligned with `base`, used only for
    /// execution price resolution.
    async fn fetch_quote(
        &self,
        base: &BarSeries,
        instrument: &str,
        granularity: Granularity,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<BarSeries, DataError>;

    /// Fetch a live two-sided quote for an order. Feeds without live price
    /// capability return `DataError::Unsupported`.
    async fn fetch_live_price(&self, order: &Order) -> Result<LivePrice, DataError>;

    /// Whether this feed can serve `fetch_live_price`.
    fn has_live_price(&self) -> bool {
        false
    }

    /// Feed name for diagnostics.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_price_uses_quote_close() {
        let price = synthetic_live_price(100.0, 101.0);
        assert_eq!(price.ask, 101.0);
        assert_eq!(price.bid, 101.0);
        assert!((price.positive_hcf - 1.01).abs() < 1e-12);
        assert_eq!(price.positive_hcf, price.negative_hcf);
    }

    #[test]
    fn synthetic_price_unit_hcf_when_closes_match() {
        let price = synthetic_live_price(1.25, 1.25);
        assert_eq!(price.positive_hcf, 1.0);
        assert_eq!(price.negative_hcf, 1.0);
        assert_eq!(price.bid, 1.25);
    }
}
