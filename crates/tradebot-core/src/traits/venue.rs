//! Venue/broker interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::VenueError;
use crate::types::{Bar, OrderRecord, Position, QualifiedOrder, TradeRecord};

/// Order execution venue.
///
/// Live venues ignore `update_simulated_position`; simulated venues use it
/// to advance fills and position marks during backtest replay. History
/// accessors back the backtest summary builder.
#[async_trait]
pub trait Venue: Send + Sync {
    /// Current positions for an instrument.
    async fn positions(&self, instrument: &str) -> Result<Vec<Position>, VenueError>;

    /// Submit a qualified order, timestamped with the bar that produced it.
    async fn place_order(
        &self,
        order: QualifiedOrder,
        order_time: DateTime<Utc>,
    ) -> Result<(), VenueError>;

    /// Advance the simulated venue with a new bar (backtest only).
    async fn update_simulated_position(
        &self,
        bar: &Bar,
        instrument: &str,
    ) -> Result<(), VenueError>;

    /// Full trade history.
    fn trades(&self) -> Vec<TradeRecord>;

    /// Full order history.
    fn orders(&self) -> Vec<OrderRecord>;

    /// Venue name for diagnostics.
    fn name(&self) -> &str;
}
