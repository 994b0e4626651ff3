//! OHLCV bar and time-series types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Granularity;

/// One OHLCV record at a timestamp.
///
/// Timestamps are Unix milliseconds. Prices use f64 for fast series
/// processing; money amounts are converted to `Decimal` at the order
/// qualification boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// The bar's price range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Whether `price` falls within the bar's traded range.
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp)
            .unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap())
    }
}

/// Ordered bar sequence for one instrument at one granularity.
///
/// Timestamps are unique and strictly increasing. The series is replaced
/// wholesale on refresh and never mutated mid-cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Instrument identifier
    pub instrument: String,
    /// Granularity of the bars
    pub granularity: Granularity,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty series.
    pub fn new(instrument: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            instrument: instrument.into(),
            granularity,
            bars: Vec::new(),
        }
    }

    /// Build a series from unordered bars. Bars are sorted by timestamp and
    /// duplicate timestamps keep the last occurrence.
    pub fn from_bars(
        instrument: impl Into<String>,
        granularity: Granularity,
        mut bars: Vec<Bar>,
    ) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            instrument: instrument.into(),
            granularity,
            bars,
        }
    }

    /// Append a bar. Bars at or before the last timestamp are rejected,
    /// keeping the index strictly increasing.
    pub fn push(&mut self, bar: Bar) -> bool {
        match self.bars.last() {
            Some(last) if bar.timestamp <= last.timestamp => false,
            _ => {
                self.bars.push(bar);
                true
            }
        }
    }

    /// Number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the series holds no bars.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// All bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The last (most recent) bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bar at `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// All timestamps in order.
    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Close prices in order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// A copy truncated to the last `n` bars, preserving order.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.bars.len().saturating_sub(n);
        self.with_bars(self.bars[start..].to_vec())
    }

    /// A copy restricted to bars with `start <= timestamp <= end`.
    pub fn clamp(&self, start: Option<i64>, end: Option<i64>) -> Self {
        let bars = self
            .bars
            .iter()
            .filter(|b| start.map_or(true, |s| b.timestamp >= s))
            .filter(|b| end.map_or(true, |e| b.timestamp <= e))
            .copied()
            .collect();
        self.with_bars(bars)
    }

    /// A copy keeping only bars whose timestamp satisfies `keep`.
    pub fn retain_timestamps(&self, keep: impl Fn(i64) -> bool) -> Self {
        let bars = self
            .bars
            .iter()
            .filter(|b| keep(b.timestamp))
            .copied()
            .collect();
        self.with_bars(bars)
    }

    fn with_bars(&self, bars: Vec<Bar>) -> Self {
        Self {
            instrument: self.instrument.clone(),
            granularity: self.granularity,
            bars,
        }
    }

    /// Iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}
