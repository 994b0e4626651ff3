//! CSV-backed data feed.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use tradebot_core::error::DataError;
use tradebot_core::traits::{DataFeed, LivePrice};
use tradebot_core::types::{Bar, BarSeries, Granularity, Order};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Historical data feed reading bar files from a directory.
///
/// Fetches resolve to `<root>/<instrument>_<granularity>.csv`. There is no
/// live quote stream; order qualification falls back to quote-bar
/// synthesis.
pub struct CsvFeed {
    root: PathBuf,
}

impl CsvFeed {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn instrument_path(&self, instrument: &str, granularity: Granularity) -> PathBuf {
        self.root
            .join(format!("{}_{}.csv", instrument, granularity))
    }

    fn load_series(
        &self,
        path: &Path,
        instrument: &str,
        granularity: Granularity,
    ) -> Result<BarSeries, DataError> {
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;
            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        debug!(path = %path.display(), bars = bars.len(), "CSV data loaded");

        // from_bars sorts and de-duplicates by timestamp.
        Ok(BarSeries::from_bars(instrument, granularity, bars))
    }
}

/// Parse various timestamp formats into epoch milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Unix timestamp, milliseconds if > 10 digits.
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return Ok(ts * 1000);
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl DataFeed for CsvFeed {
    async fn load_local(
        &self,
        path: &Path,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<BarSeries, DataError> {
        let instrument = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        let series = self.load_series(path, instrument, Granularity::default())?;
        Ok(series.clamp(start, end))
    }

    async fn fetch(
        &self,
        instrument: &str,
        granularity: Granularity,
        count: usize,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<BarSeries, DataError> {
        let path = self.instrument_path(instrument, granularity);
        let series = self.load_series(&path, instrument, granularity)?;
        Ok(series.clamp(start, end).tail(count))
    }

    async fn fetch_quote(
        &self,
        base: &BarSeries,
        _instrument: &str,
        _granularity: Granularity,
        _start: Option<i64>,
        _end: Option<i64>,
    ) -> Result<BarSeries, DataError> {
        // Historical files carry no separate quote stream; the trading
        // series doubles as the quote series.
        Ok(base.clone())
    }

    async fn fetch_live_price(&self, _order: &Order) -> Result<LivePrice, DataError> {
        Err(DataError::Unsupported(
            "live price quotes over CSV data".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1705312800000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1705312800000);
        assert!(parse_timestamp("not-a-date").is_err());
    }

    #[tokio::test]
    async fn loads_sorts_and_clamps_local_data() {
        let dir = std::env::temp_dir().join("tradebot-csv-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("EURUSD_1h.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        writeln!(file, "3000,1.0,1.1,0.9,1.05,100").unwrap();
        writeln!(file, "1000,1.0,1.1,0.9,1.00,100").unwrap();
        writeln!(file, "2000,1.0,1.1,0.9,1.02,100").unwrap();

        let feed = CsvFeed::new(&dir);
        let series = feed.load_local(&path, None, None).await.unwrap();
        assert_eq!(series.timestamps(), vec![1_000_000, 2_000_000, 3_000_000]);

        let clamped = feed
            .load_local(&path, Some(2_000_000), None)
            .await
            .unwrap();
        assert_eq!(clamped.timestamps(), vec![2_000_000, 3_000_000]);

        let fetched = feed
            .fetch("EURUSD", Granularity::H1, 2, None, None)
            .await
            .unwrap();
        assert_eq!(fetched.timestamps(), vec![2_000_000, 3_000_000]);
    }

    #[tokio::test]
    async fn missing_file_is_no_data() {
        let feed = CsvFeed::new("/nonexistent");
        let result = feed
            .fetch("EURUSD", Granularity::H1, 10, None, None)
            .await;
        assert!(matches!(result, Err(DataError::NoDataAvailable)));
    }
}
