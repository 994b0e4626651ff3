//! Order-intent normalization.

use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use tradebot_core::error::OrderError;
use tradebot_core::types::{Granularity, Order, OrderDraft, OrderIntent, SizingMethod};

/// Bot/strategy metadata stamped onto every normalized order.
#[derive(Debug, Clone)]
pub struct OrderStamp {
    pub instrument: String,
    pub strategy: String,
    pub granularity: Granularity,
    pub sizing: SizingMethod,
    pub risk_pc: Option<Decimal>,
}

fn stamp_draft(draft: OrderDraft, stamp: &OrderStamp) -> Order {
    Order {
        id: Uuid::new_v4(),
        instrument: draft
            .instrument
            .unwrap_or_else(|| stamp.instrument.clone()),
        kind: draft.kind,
        direction: draft.direction,
        size: draft.size,
        limit_price: draft.limit_price,
        stop_price: draft.stop_price,
        stop_loss: draft.stop_loss,
        take_profit: draft.take_profit,
        strategy: stamp.strategy.clone(),
        granularity: stamp.granularity,
        sizing: stamp.sizing,
        risk_pc: stamp.risk_pc,
    }
}

/// Convert strategy output of any legal shape into a uniform order list.
///
/// Every draft is field-validated (fatal on failure) and stamped with the
/// bot's instrument, strategy name, granularity, sizing method, and risk
/// percentage. Directional order types missing a direction are dropped
/// from the batch with an advisory log; the rest proceed. An empty intent
/// yields an empty list.
pub fn normalize_orders(
    intent: OrderIntent,
    stamp: &OrderStamp,
) -> Result<Vec<Order>, OrderError> {
    let drafts: Vec<OrderDraft> = match intent {
        OrderIntent::Single(draft) => vec![draft],
        OrderIntent::Batch(drafts) => drafts,
        OrderIntent::Keyed(map) => map.into_values().collect(),
    };

    let mut orders = Vec::with_capacity(drafts.len());
    for draft in drafts {
        draft.validate()?;
        let order = stamp_draft(draft, stamp);

        // Filtered copy, never delete-in-place while iterating.
        if order.kind.is_directional() && order.direction.is_none() {
            warn!(
                instrument = %order.instrument,
                kind = %order.kind,
                "No trade direction provided for directional order; order ignored"
            );
            continue;
        }
        orders.push(order);
    }

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use tradebot_core::types::Direction;

    fn stamp() -> OrderStamp {
        OrderStamp {
            instrument: "EURUSD".to_string(),
            strategy: "ma_crossover".to_string(),
            granularity: Granularity::H1,
            sizing: SizingMethod::Risk,
            risk_pc: Some(dec!(1.5)),
        }
    }

    #[test]
    fn single_order_acquires_bot_metadata() {
        let intent = OrderIntent::Single(OrderDraft::market(Direction::Long));
        let orders = normalize_orders(intent, &stamp()).unwrap();

        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.instrument, "EURUSD");
        assert_eq!(order.strategy, "ma_crossover");
        assert_eq!(order.granularity, Granularity::H1);
        assert_eq!(order.sizing, SizingMethod::Risk);
        assert_eq!(order.risk_pc, Some(dec!(1.5)));
    }

    #[test]
    fn instrument_override_is_kept() {
        let intent =
            OrderIntent::Single(OrderDraft::market(Direction::Short).with_instrument("GBPUSD"));
        let orders = normalize_orders(intent, &stamp()).unwrap();
        assert_eq!(orders[0].instrument, "GBPUSD");
    }

    #[test]
    fn directionless_market_order_is_dropped() {
        let mut draft = OrderDraft::market(Direction::Long);
        draft.direction = None;
        let intent = OrderIntent::Batch(vec![draft, OrderDraft::market(Direction::Short)]);

        let orders = normalize_orders(intent, &stamp()).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].direction, Some(Direction::Short));
    }

    #[test]
    fn close_order_is_exempt_from_direction_check() {
        let orders =
            normalize_orders(OrderIntent::Single(OrderDraft::close()), &stamp()).unwrap();
        assert_eq!(orders.len(), 1);
        assert!(orders[0].direction.is_none());
    }

    #[test]
    fn malformed_draft_fails_the_batch() {
        let mut bad = OrderDraft::limit(Direction::Long, dec!(1));
        bad.limit_price = None;
        let intent = OrderIntent::Batch(vec![OrderDraft::market(Direction::Long), bad]);

        assert!(normalize_orders(intent, &stamp()).is_err());
    }

    #[test]
    fn empty_collection_yields_empty_list() {
        assert!(normalize_orders(OrderIntent::none(), &stamp())
            .unwrap()
            .is_empty());
        assert!(
            normalize_orders(OrderIntent::Keyed(BTreeMap::new()), &stamp())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn keyed_orders_come_out_in_key_order() {
        let mut keyed = BTreeMap::new();
        keyed.insert("b".to_string(), OrderDraft::market(Direction::Short));
        keyed.insert("a".to_string(), OrderDraft::market(Direction::Long));

        let orders = normalize_orders(OrderIntent::Keyed(keyed), &stamp()).unwrap();
        assert_eq!(orders[0].direction, Some(Direction::Long));
        assert_eq!(orders[1].direction, Some(Direction::Short));
    }
}
