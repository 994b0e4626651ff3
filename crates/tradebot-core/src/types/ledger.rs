//! Venue trade and order history records used for summary building.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Direction, OrderKind};

/// Lifecycle status of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    Closed,
}

/// A trade held in venue history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: Uuid,
    pub instrument: String,
    pub direction: Direction,
    pub units: Decimal,
    pub entry_price: Decimal,
    pub exit_price: Option<Decimal>,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub status: TradeStatus,
    pub pnl: Option<Decimal>,
}

/// Lifecycle status of a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderRecordStatus {
    Pending,
    Filled,
    Cancelled,
}

/// An order held in venue history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: Uuid,
    pub instrument: String,
    pub kind: OrderKind,
    pub direction: Option<Direction>,
    pub price: Decimal,
    pub submitted_at: DateTime<Utc>,
    pub status: OrderRecordStatus,
}
