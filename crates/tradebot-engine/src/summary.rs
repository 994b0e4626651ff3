//! Backtest ledger and summary assembly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradebot_core::traits::{IndicatorSnapshot, Venue};
use tradebot_core::types::{
    BarSeries, Granularity, OrderRecord, OrderRecordStatus, TradeRecord, TradeStatus,
};

/// Account equity curve over a backtest: one point per processed bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountHistory {
    pub timestamps: Vec<i64>,
    pub balance: Vec<Decimal>,
    pub nav: Vec<Decimal>,
    pub margin: Vec<Decimal>,
    /// NAV relative to its running maximum, as a non-positive fraction
    pub drawdown: Vec<Decimal>,
}

impl AccountHistory {
    /// Assemble the curve, deriving drawdown from the NAV series.
    pub fn new(
        timestamps: Vec<i64>,
        balance: Vec<Decimal>,
        nav: Vec<Decimal>,
        margin: Vec<Decimal>,
    ) -> Self {
        let drawdown = drawdown_curve(&nav);
        Self {
            timestamps,
            balance,
            nav,
            margin,
            drawdown,
        }
    }

    /// Deepest drawdown over the run (most negative point).
    pub fn max_drawdown(&self) -> Decimal {
        self.drawdown
            .iter()
            .copied()
            .min()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Drawdown at each point: NAV over the running NAV maximum, minus one.
/// Zero at every new high, negative below it.
fn drawdown_curve(nav: &[Decimal]) -> Vec<Decimal> {
    let mut peak = Decimal::ZERO;
    nav.iter()
        .map(|&value| {
            if value > peak {
                peak = value;
            }
            if peak > Decimal::ZERO {
                value / peak - Decimal::ONE
            } else {
                Decimal::ZERO
            }
        })
        .collect()
}

/// Everything a finished backtest produced, built once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSummary {
    /// Base trading series the replay ran over
    pub data: BarSeries,
    pub account_history: AccountHistory,
    /// Full trade history from the venue
    pub trade_summary: Vec<TradeRecord>,
    /// Trades still open at the end of the run
    pub open_trades: Vec<TradeRecord>,
    /// Orders cancelled during the run
    pub cancelled_orders: Vec<OrderRecord>,
    /// Strategy indicator snapshot, if exposed
    pub indicators: Option<IndicatorSnapshot>,
    pub instrument: String,
    pub granularity: Granularity,
}

/// Assemble the immutable backtest summary from the accumulated account
/// series and the venue's trade/order history.
///
/// `timestamps` defaults to the trading series index when not supplied
/// explicitly.
#[allow(clippy::too_many_arguments)]
pub fn build_backtest_summary(
    data: &BarSeries,
    balance: Vec<Decimal>,
    nav: Vec<Decimal>,
    margin: Vec<Decimal>,
    timestamps: Option<Vec<i64>>,
    venue: &dyn Venue,
    indicators: Option<IndicatorSnapshot>,
    instrument: &str,
    granularity: Granularity,
) -> BacktestSummary {
    let trade_summary: Vec<TradeRecord> = venue
        .trades()
        .into_iter()
        .filter(|t| t.instrument == instrument)
        .collect();
    let open_trades = trade_summary
        .iter()
        .filter(|t| t.status == TradeStatus::Open)
        .cloned()
        .collect();
    let cancelled_orders = venue
        .orders()
        .into_iter()
        .filter(|o| o.instrument == instrument && o.status == OrderRecordStatus::Cancelled)
        .collect();

    let timestamps = timestamps.unwrap_or_else(|| data.timestamps());

    BacktestSummary {
        data: data.clone(),
        account_history: AccountHistory::new(timestamps, balance, nav, margin),
        trade_summary,
        open_trades,
        cancelled_orders,
        indicators,
        instrument: instrument.to_string(),
        granularity,
    }
}
