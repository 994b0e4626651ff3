//! Virtual venue for backtesting and simulation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::Signed;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

use tradebot_core::error::VenueError;
use tradebot_core::traits::Venue;
use tradebot_core::types::{
    Bar, Direction, OrderKind, OrderRecord, OrderRecordStatus, Position, QualifiedOrder,
    SizingMethod, TradeRecord, TradeStatus,
};

/// Point-in-time account figures, sampled once per backtest cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountSnapshot {
    pub balance: Decimal,
    pub nav: Decimal,
    pub margin: Decimal,
}

struct PendingOrder {
    record_id: Uuid,
    order: QualifiedOrder,
    submitted_at: DateTime<Utc>,
    /// Whether a stop-limit order's stop level has been traded through
    triggered: bool,
}

/// Stop-loss and take-profit levels attached to an open position.
#[derive(Debug, Clone, Copy, Default)]
struct Protective {
    stop_loss: Option<Decimal>,
    take_profit: Option<Decimal>,
}

#[derive(Default)]
struct VenueState {
    balance: Decimal,
    positions: HashMap<String, Position>,
    protective: HashMap<String, Protective>,
    pending: Vec<PendingOrder>,
    trades: Vec<TradeRecord>,
    orders: Vec<OrderRecord>,
}

/// Simulated venue backing backtest replay.
///
/// Market orders fill immediately at their qualified price; limit orders
/// rest until a bar's range touches the limit price; stop-limit orders
/// rest until the stop level is traded through, then fill once the limit
/// is touched. Stop-loss and take-profit levels on open trades are
/// checked against every bar. One aggregated position is held per
/// instrument.
pub struct VirtualVenue {
    state: Arc<Mutex<VenueState>>,
    leverage: Decimal,
    commission: Decimal,
}

impl VirtualVenue {
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            state: Arc::new(Mutex::new(VenueState {
                balance: initial_balance,
                ..VenueState::default()
            })),
            leverage: Decimal::ONE,
            commission: Decimal::ZERO,
        }
    }

    pub fn with_leverage(mut self, leverage: Decimal) -> Self {
        if leverage > Decimal::ZERO {
            self.leverage = leverage;
        }
        self
    }

    /// Flat commission charged per fill.
    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission = commission;
        self
    }

    /// Current account figures: settled balance, NAV including unrealized
    /// profit, and margin committed to open positions.
    pub fn account_snapshot(&self) -> AccountSnapshot {
        let state = self.state.lock().unwrap();
        let unrealized: Decimal = state.positions.values().map(|p| p.unrealized_pnl()).sum();
        let margin: Decimal = state
            .positions
            .values()
            .map(|p| (p.units.abs() * p.last_price) / self.leverage)
            .sum();
        AccountSnapshot {
            balance: state.balance,
            nav: state.balance + unrealized,
            margin,
        }
    }

    /// Cancel every resting order for an instrument.
    pub fn cancel_pending(&self, instrument: &str) {
        let mut state = self.state.lock().unwrap();
        let cancelled: Vec<Uuid> = state
            .pending
            .iter()
            .filter(|p| p.order.order.instrument == instrument)
            .map(|p| p.record_id)
            .collect();
        state
            .pending
            .retain(|p| p.order.order.instrument != instrument);
        for record in state.orders.iter_mut() {
            if cancelled.contains(&record.id) {
                record.status = OrderRecordStatus::Cancelled;
            }
        }
    }

    /// Units to trade: the strategy's explicit size, a risk-based size from
    /// the stop distance, or a single unit.
    fn sized_units(order: &QualifiedOrder, balance: Decimal) -> Decimal {
        if let Some(size) = order.order.size {
            return size;
        }
        if order.order.sizing == SizingMethod::Risk {
            if let (Some(risk_pc), Some(stop)) = (order.order.risk_pc, order.order.stop_loss) {
                let distance = (order.price - stop).abs();
                if distance > Decimal::ZERO {
                    return balance * risk_pc / dec!(100) / distance;
                }
            }
        }
        Decimal::ONE
    }

    fn check_margin(
        &self,
        state: &VenueState,
        units: Decimal,
        price: Decimal,
        hcf: Decimal,
    ) -> Result<(), VenueError> {
        let required = units.abs() * price * hcf / self.leverage;
        let unrealized: Decimal = state.positions.values().map(|p| p.unrealized_pnl()).sum();
        let available = state.balance + unrealized;
        if required > available {
            return Err(VenueError::InsufficientMargin {
                required,
                available,
            });
        }
        Ok(())
    }

    fn fill(
        state: &mut VenueState,
        order: &QualifiedOrder,
        units: Decimal,
        price: Decimal,
        time: DateTime<Utc>,
        commission: Decimal,
    ) {
        let instrument = &order.order.instrument;
        let direction = order.order.direction.unwrap_or(Direction::Long);
        let signed = units * direction.sign();
        state.balance -= commission;

        if order.order.stop_loss.is_some() || order.order.take_profit.is_some() {
            state.protective.insert(
                instrument.clone(),
                Protective {
                    stop_loss: order.order.stop_loss,
                    take_profit: order.order.take_profit,
                },
            );
        }

        match state.positions.get_mut(instrument) {
            Some(position) if position.units.signum() == signed.signum() => {
                // Same side: average in and extend the open trade.
                let total = position.units + signed;
                position.avg_price =
                    (position.avg_price * position.units + price * signed) / total;
                position.units = total;
                position.mark(price);
                if let Some(trade) = state
                    .trades
                    .iter_mut()
                    .find(|t| t.instrument == *instrument && t.status == TradeStatus::Open)
                {
                    trade.units = total.abs();
                    trade.entry_price = position.avg_price;
                }
            }
            Some(position) => {
                // Opposite side: realize against the open position.
                let closed = signed.abs().min(position.units.abs());
                let pnl = (price - position.avg_price)
                    * closed
                    * if position.is_long() { Decimal::ONE } else { -Decimal::ONE };
                state.balance += pnl;
                position.units += signed;
                position.mark(price);

                if let Some(trade) = state
                    .trades
                    .iter_mut()
                    .find(|t| t.instrument == *instrument && t.status == TradeStatus::Open)
                {
                    trade.exit_price = Some(price);
                    trade.exit_time = Some(time);
                    trade.pnl = Some(pnl);
                    trade.status = TradeStatus::Closed;
                }

                if position.is_flat() {
                    state.positions.remove(instrument);
                } else {
                    // Flipped through flat: the remainder opens a new trade.
                    let remainder = state.positions.get(instrument).map(|p| p.units);
                    if let Some(units) = remainder {
                        state.trades.push(TradeRecord {
                            id: Uuid::new_v4(),
                            instrument: instrument.clone(),
                            direction,
                            units: units.abs(),
                            entry_price: price,
                            exit_price: None,
                            entry_time: time,
                            exit_time: None,
                            status: TradeStatus::Open,
                            pnl: None,
                        });
                        if let Some(p) = state.positions.get_mut(instrument) {
                            p.avg_price = price;
                        }
                    }
                }
            }
            None => {
                let mut position = Position::new(instrument.clone(), signed, price);
                position.mark(price);
                state.positions.insert(instrument.clone(), position);
                state.trades.push(TradeRecord {
                    id: Uuid::new_v4(),
                    instrument: instrument.clone(),
                    direction,
                    units,
                    entry_price: price,
                    exit_price: None,
                    entry_time: time,
                    exit_time: None,
                    status: TradeStatus::Open,
                    pnl: None,
                });
            }
        }
    }

    fn close_position(state: &mut VenueState, instrument: &str, price: Decimal, time: DateTime<Utc>) {
        let Some(position) = state.positions.remove(instrument) else {
            return;
        };
        state.protective.remove(instrument);
        let pnl = position.units * (price - position.avg_price);
        state.balance += pnl;
        if let Some(trade) = state
            .trades
            .iter_mut()
            .find(|t| t.instrument == instrument && t.status == TradeStatus::Open)
        {
            trade.exit_price = Some(price);
            trade.exit_time = Some(time);
            trade.pnl = Some(pnl);
            trade.status = TradeStatus::Closed;
        }
    }

    fn mark_record(state: &mut VenueState, id: Uuid, status: OrderRecordStatus) {
        if let Some(record) = state.orders.iter_mut().find(|r| r.id == id) {
            record.status = status;
        }
    }
}

#[async_trait]
impl Venue for VirtualVenue {
    async fn positions(&self, instrument: &str) -> Result<Vec<Position>, VenueError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .positions
            .get(instrument)
            .filter(|p| !p.is_flat())
            .cloned()
            .into_iter()
            .collect())
    }

    async fn place_order(
        &self,
        order: QualifiedOrder,
        order_time: DateTime<Utc>,
    ) -> Result<(), VenueError> {
        let mut state = self.state.lock().unwrap();

        let record_id = order.order.id;
        state.orders.push(OrderRecord {
            id: record_id,
            instrument: order.order.instrument.clone(),
            kind: order.order.kind,
            direction: order.order.direction,
            price: order.price,
            submitted_at: order_time,
            status: OrderRecordStatus::Pending,
        });

        match order.order.kind {
            OrderKind::Market => {
                let units = Self::sized_units(&order, state.balance);
                self.check_margin(&state, units, order.price, order.hcf)?;
                Self::fill(
                    &mut state,
                    &order,
                    units,
                    order.price,
                    order_time,
                    self.commission,
                );
                Self::mark_record(&mut state, record_id, OrderRecordStatus::Filled);
            }
            OrderKind::Limit | OrderKind::StopLimit => {
                let units = Self::sized_units(&order, state.balance);
                self.check_margin(&state, units, order.price, order.hcf)?;
                debug!(order = %order.order, "Order resting until limit is touched");
                state.pending.push(PendingOrder {
                    record_id,
                    order,
                    submitted_at: order_time,
                    triggered: false,
                });
            }
            OrderKind::Reduce => {
                let units = order
                    .order
                    .size
                    .ok_or_else(|| VenueError::OrderRejected("reduce without size".into()))?;
                // Reduce works against the position, so flip the trade side.
                let mut reduce = order.clone();
                reduce.order.direction = order
                    .order
                    .direction
                    .map(|d| match d {
                        Direction::Long => Direction::Short,
                        Direction::Short => Direction::Long,
                    })
                    .or(Some(Direction::Short));
                Self::fill(
                    &mut state,
                    &reduce,
                    units,
                    order.price,
                    order_time,
                    self.commission,
                );
                Self::mark_record(&mut state, record_id, OrderRecordStatus::Filled);
            }
            OrderKind::Close => {
                let instrument = order.order.instrument.clone();
                if !state.positions.contains_key(&instrument) {
                    Self::mark_record(&mut state, record_id, OrderRecordStatus::Cancelled);
                    return Err(VenueError::PositionNotFound(instrument));
                }
                Self::close_position(&mut state, &instrument, order.price, order_time);
                Self::mark_record(&mut state, record_id, OrderRecordStatus::Filled);
            }
        }
        Ok(())
    }

    async fn update_simulated_position(
        &self,
        bar: &Bar,
        instrument: &str,
    ) -> Result<(), VenueError> {
        let mut state = self.state.lock().unwrap();
        let close = Decimal::try_from(bar.close).unwrap_or_default();
        let high = Decimal::try_from(bar.high).unwrap_or_default();
        let low = Decimal::try_from(bar.low).unwrap_or_default();

        // Resting orders fill when the bar trades through their limit.
        // Stop-limit orders must first see their stop level traded through;
        // trigger and fill may land on the same bar.
        let in_range = |level: Option<Decimal>| {
            level.map_or(false, |price| price >= low && price <= high)
        };
        let mut filled = Vec::new();
        let mut still_pending = Vec::new();
        for mut pending in state.pending.drain(..) {
            if pending.order.order.instrument != instrument {
                still_pending.push(pending);
                continue;
            }
            if pending.order.order.kind == OrderKind::StopLimit
                && !pending.triggered
                && in_range(pending.order.order.stop_price)
            {
                pending.triggered = true;
            }
            let armed =
                pending.order.order.kind != OrderKind::StopLimit || pending.triggered;
            if armed && in_range(pending.order.order.limit_price) {
                filled.push(pending);
            } else {
                still_pending.push(pending);
            }
        }
        state.pending = still_pending;
        for pending in filled {
            let limit = pending.order.order.limit_price.unwrap_or(pending.order.price);
            let units = Self::sized_units(&pending.order, state.balance);
            Self::fill(
                &mut state,
                &pending.order,
                units,
                limit,
                pending.submitted_at,
                self.commission,
            );
            Self::mark_record(&mut state, pending.record_id, OrderRecordStatus::Filled);
        }

        // Protective levels on the open position: stops win over takes
        // when a single bar spans both.
        if state.positions.contains_key(instrument) {
            let touched = |level: Option<Decimal>| {
                level.filter(|price| *price >= low && *price <= high)
            };
            let exit = state.protective.get(instrument).and_then(|levels| {
                touched(levels.stop_loss).or_else(|| touched(levels.take_profit))
            });
            if let Some(price) = exit {
                Self::close_position(&mut state, instrument, price, bar.datetime());
            }
        }

        if let Some(position) = state.positions.get_mut(instrument) {
            position.mark(close);
        }
        Ok(())
    }

    fn trades(&self) -> Vec<TradeRecord> {
        self.state.lock().unwrap().trades.clone()
    }

    fn orders(&self) -> Vec<OrderRecord> {
        self.state.lock().unwrap().orders.clone()
    }

    fn name(&self) -> &str {
        "virtual"
    }
}
