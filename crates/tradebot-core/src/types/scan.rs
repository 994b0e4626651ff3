//! Scan-mode result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Direction, Granularity};

/// A potential signal recorded during a scan, never submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanHit {
    /// Order size, when the strategy sized the order
    pub size: Option<Decimal>,
    /// Would-be entry price (current bar close)
    pub entry: Decimal,
    pub stop: Option<Decimal>,
    pub take: Option<Decimal>,
    pub signal: Option<Direction>,
}

/// Context attached to a scan report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDetails {
    /// Watchlist/index being scanned
    pub index: String,
    pub strategy: String,
    pub granularity: Granularity,
}
