//! Position tracking types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open position reported by a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub instrument: String,
    /// Signed position size (negative = short)
    pub units: Decimal,
    /// Average entry price
    pub avg_price: Decimal,
    /// Last marked price
    pub last_price: Decimal,
}

impl Position {
    pub fn new(instrument: impl Into<String>, units: Decimal, avg_price: Decimal) -> Self {
        Self {
            instrument: instrument.into(),
            units,
            avg_price,
            last_price: avg_price,
        }
    }

    pub fn is_long(&self) -> bool {
        self.units > Decimal::ZERO
    }

    pub fn is_flat(&self) -> bool {
        self.units == Decimal::ZERO
    }

    /// Unrealized profit at the last marked price.
    pub fn unrealized_pnl(&self) -> Decimal {
        (self.last_price - self.avg_price) * self.units
    }

    /// Mark the position to a new price.
    pub fn mark(&mut self, price: Decimal) {
        self.last_price = price;
    }
}
