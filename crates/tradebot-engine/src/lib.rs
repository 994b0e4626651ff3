//! Bot update cycle engine.
//!
//! Binds one strategy instance to one instrument, a data feed, and a venue,
//! for continuous operation and historical replay. The per-cycle sequence:
//! refresh (live) or re-slice (backtest), window with the anti-lookahead
//! rule, check data sufficiency, suppress duplicate bars, invoke the
//! strategy, normalize and qualify its orders, then submit or record a scan
//! hit.

mod align;
mod bot;
mod dedup;
mod normalize;
mod qualify;
mod refresh;
mod summary;
mod window;

pub use align::align;
pub use bot::TradingBot;
pub use dedup::DuplicateDetector;
pub use normalize::{normalize_orders, OrderStamp};
pub use qualify::qualify_orders;
pub use refresh::{AuxSource, DataDescriptor, DataRefresher, RefreshedData};
pub use summary::{build_backtest_summary, AccountHistory, BacktestSummary};
pub use window::{visible_window, window_aux, window_bundle, WindowedBundle};
