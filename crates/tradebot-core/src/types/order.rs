//! Order variants, drafts, and qualified orders.
//!
//! Strategies emit [`OrderIntent`] values built from [`OrderDraft`]s. The
//! engine normalizes drafts into stamped [`Order`]s and qualifies them with
//! an execution price before submission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::OrderError;
use super::Granularity;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Sign for notional calculations (+1 long, -1 short).
    pub fn sign(&self) -> Decimal {
        match self {
            Direction::Long => Decimal::ONE,
            Direction::Short => -Decimal::ONE,
        }
    }

    pub fn is_short(&self) -> bool {
        matches!(self, Direction::Short)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderKind {
    /// Execute immediately at the qualified price
    Market,
    /// Execute at the limit price or better
    Limit,
    /// Becomes a limit order when the stop price is reached
    StopLimit,
    /// Reduce an existing position
    Reduce,
    /// Close the position unconditionally
    Close,
}

impl OrderKind {
    /// Whether this order type requires a trade direction.
    /// Close orders are exempt.
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            OrderKind::Market | OrderKind::Limit | OrderKind::StopLimit | OrderKind::Reduce
        )
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Market => write!(f, "market"),
            OrderKind::Limit => write!(f, "limit"),
            OrderKind::StopLimit => write!(f, "stop-limit"),
            OrderKind::Reduce => write!(f, "reduce"),
            OrderKind::Close => write!(f, "close"),
        }
    }
}

/// Position sizing method stamped onto normalized orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizingMethod {
    /// Size from account risk percentage
    #[default]
    Risk,
    /// Size given explicitly by the strategy
    Fixed,
}

/// Raw order as emitted by a strategy, before normalization.
///
/// Required per-kind fields are checked by [`OrderDraft::validate`], so a
/// draft that survives construction is structurally well formed. Direction
/// presence is checked later by the normalizer because a missing direction
/// drops the single order rather than failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub kind: OrderKind,
    pub direction: Option<Direction>,
    /// Instrument override; defaults to the bot's own instrument
    pub instrument: Option<String>,
    /// Order size in units, when the strategy sizes explicitly
    pub size: Option<Decimal>,
    pub limit_price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
}

impl OrderDraft {
    fn new(kind: OrderKind, direction: Option<Direction>) -> Self {
        Self {
            kind,
            direction,
            instrument: None,
            size: None,
            limit_price: None,
            stop_price: None,
            stop_loss: None,
            take_profit: None,
        }
    }

    /// Market order draft.
    pub fn market(direction: Direction) -> Self {
        Self::new(OrderKind::Market, Some(direction))
    }

    /// Limit order draft.
    pub fn limit(direction: Direction, limit_price: Decimal) -> Self {
        let mut draft = Self::new(OrderKind::Limit, Some(direction));
        draft.limit_price = Some(limit_price);
        draft
    }

    /// Stop-limit order draft.
    pub fn stop_limit(direction: Direction, stop_price: Decimal, limit_price: Decimal) -> Self {
        let mut draft = Self::new(OrderKind::StopLimit, Some(direction));
        draft.stop_price = Some(stop_price);
        draft.limit_price = Some(limit_price);
        draft
    }

    /// Reduce order draft.
    pub fn reduce(direction: Direction, size: Decimal) -> Self {
        let mut draft = Self::new(OrderKind::Reduce, Some(direction));
        draft.size = Some(size);
        draft
    }

    /// Unconditional close draft. Exempt from the direction requirement.
    pub fn close() -> Self {
        Self::new(OrderKind::Close, None)
    }

    /// Set the instrument override.
    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Some(instrument.into());
        self
    }

    /// Set an explicit size.
    pub fn with_size(mut self, size: Decimal) -> Self {
        self.size = Some(size);
        self
    }

    /// Attach a stop loss.
    pub fn with_stop_loss(mut self, price: Decimal) -> Self {
        self.stop_loss = Some(price);
        self
    }

    /// Attach a take profit.
    pub fn with_take_profit(mut self, price: Decimal) -> Self {
        self.take_profit = Some(price);
        self
    }

    /// Check per-kind required fields.
    pub fn validate(&self) -> Result<(), OrderError> {
        let missing = |field: &str| OrderError::MissingField {
            kind: self.kind.to_string(),
            field: field.to_string(),
        };
        match self.kind {
            OrderKind::Limit if self.limit_price.is_none() => Err(missing("limit_price")),
            OrderKind::StopLimit if self.stop_price.is_none() => Err(missing("stop_price")),
            OrderKind::StopLimit if self.limit_price.is_none() => Err(missing("limit_price")),
            OrderKind::Reduce if self.size.is_none() => Err(missing("size")),
            _ => Ok(()),
        }
    }
}

/// Strategy output in any of its legal shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderIntent {
    /// A single order
    Single(OrderDraft),
    /// A homogeneous collection of orders
    Batch(Vec<OrderDraft>),
    /// Orders keyed by an arbitrary label
    Keyed(BTreeMap<String, OrderDraft>),
}

impl OrderIntent {
    /// An intent carrying no orders.
    pub fn none() -> Self {
        OrderIntent::Batch(Vec::new())
    }

    /// Number of drafts carried, regardless of shape.
    pub fn len(&self) -> usize {
        match self {
            OrderIntent::Single(_) => 1,
            OrderIntent::Batch(drafts) => drafts.len(),
            OrderIntent::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<OrderDraft> for OrderIntent {
    fn from(draft: OrderDraft) -> Self {
        OrderIntent::Single(draft)
    }
}

impl From<Vec<OrderDraft>> for OrderIntent {
    fn from(drafts: Vec<OrderDraft>) -> Self {
        OrderIntent::Batch(drafts)
    }
}

/// Normalized order: a validated draft stamped with bot and strategy
/// metadata, awaiting price qualification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub instrument: String,
    pub kind: OrderKind,
    pub direction: Option<Direction>,
    pub size: Option<Decimal>,
    pub limit_price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    /// Name of the strategy that produced the order
    pub strategy: String,
    pub granularity: Granularity,
    pub sizing: SizingMethod,
    /// Account risk percentage used for sizing, if configured
    pub risk_pc: Option<Decimal>,
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            Some(direction) => write!(f, "{} {} {}", direction, self.kind, self.instrument),
            None => write!(f, "{} {}", self.kind, self.instrument),
        }
    }
}

/// Normalized order with a resolved execution price and hedging cost
/// factor, ready for venue submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedOrder {
    pub order: Order,
    /// Resolved execution price (bid for shorts, ask otherwise)
    pub price: Decimal,
    /// Directional hedging/cost factor applied to the order notional
    pub hcf: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn draft_builders_set_required_fields() {
        let draft = OrderDraft::limit(Direction::Long, dec!(101.5));
        assert_eq!(draft.kind, OrderKind::Limit);
        assert_eq!(draft.limit_price, Some(dec!(101.5)));
        assert!(draft.validate().is_ok());

        let draft = OrderDraft::stop_limit(Direction::Short, dec!(99), dec!(98.5));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let mut draft = OrderDraft::limit(Direction::Long, dec!(100));
        draft.limit_price = None;
        assert!(matches!(
            draft.validate(),
            Err(OrderError::MissingField { .. })
        ));
    }

    #[test]
    fn close_orders_are_not_directional() {
        assert!(OrderKind::Market.is_directional());
        assert!(OrderKind::Reduce.is_directional());
        assert!(!OrderKind::Close.is_directional());
        assert!(OrderDraft::close().validate().is_ok());
    }

    #[test]
    fn intent_len_covers_all_shapes() {
        assert_eq!(OrderIntent::none().len(), 0);
        assert!(OrderIntent::none().is_empty());
        assert_eq!(
            OrderIntent::Single(OrderDraft::market(Direction::Long)).len(),
            1
        );

        let mut keyed = BTreeMap::new();
        keyed.insert("a".to_string(), OrderDraft::market(Direction::Long));
        keyed.insert("b".to_string(), OrderDraft::close());
        assert_eq!(OrderIntent::Keyed(keyed).len(), 2);
    }

    #[test]
    fn direction_sign() {
        assert_eq!(Direction::Long.sign(), Decimal::ONE);
        assert_eq!(Direction::Short.sign(), -Decimal::ONE);
        assert!(Direction::Short.is_short());
    }
}
