//! Order price qualification.

use rust_decimal::Decimal;

use tradebot_core::error::{BotError, OrderError};
use tradebot_core::traits::{synthetic_live_price, DataFeed, LivePrice};
use tradebot_core::types::{Bar, Order, QualifiedOrder};

/// Attach an execution price and cost factor from a resolved quote.
///
/// Short orders take the bid and the negative-side factor; everything else
/// takes the ask and the positive-side factor. A quote that does not
/// convert to a decimal (NaN or infinite) rejects the order.
fn apply_quote(order: Order, quote: LivePrice) -> Result<QualifiedOrder, BotError> {
    let short = order.direction.map_or(false, |d| d.is_short());
    let (price, hcf) = if short {
        (quote.bid, quote.negative_hcf)
    } else {
        (quote.ask, quote.positive_hcf)
    };
    let price = Decimal::try_from(price).map_err(|_| {
        OrderError::Invalid(format!(
            "Unusable quote price {} for {}",
            price, order.instrument
        ))
    })?;
    let hcf = Decimal::try_from(hcf).map_err(|_| {
        OrderError::Invalid(format!(
            "Unusable cost factor {} for {}",
            hcf, order.instrument
        ))
    })?;
    Ok(QualifiedOrder { order, price, hcf })
}

/// Resolve an execution price and hedging cost factor for every order.
///
/// With a live-price capability configured the feed supplies the quote;
/// otherwise one is synthesized from the trading bar's close and the
/// aligned quote bar's close. Runs for every order, including in scan
/// mode, because scan output reports the would-be entry price.
pub async fn qualify_orders(
    orders: Vec<Order>,
    feed: &dyn DataFeed,
    use_live_price: bool,
    current_bar: &Bar,
    quote_bar: &Bar,
) -> Result<Vec<QualifiedOrder>, BotError> {
    let mut qualified = Vec::with_capacity(orders.len());
    for order in orders {
        let quote = if use_live_price {
            feed.fetch_live_price(&order).await?
        } else {
            synthetic_live_price(current_bar.close, quote_bar.close)
        };
        qualified.push(apply_quote(order, quote)?);
    }
    Ok(qualified)
}
