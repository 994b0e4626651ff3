//! Interfaces to the engine's external collaborators.

mod feed;
mod notifier;
mod strategy;
mod venue;

pub use feed::{synthetic_live_price, DataFeed, LivePrice};
pub use notifier::Notifier;
pub use strategy::{IndicatorSnapshot, SignalGenerator};
pub use venue::Venue;
