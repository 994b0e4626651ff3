//! Data feeds for the trading bot.

mod csv_feed;
mod registry;

pub use csv_feed::CsvFeed;
pub use registry::{FeedId, FeedRegistry};
