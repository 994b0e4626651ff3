//! Strategy interface.

use std::collections::HashMap;

use crate::types::{DataBundle, OrderIntent, Position};

/// Snapshot of a strategy's indicator values, exposed for reporting.
pub type IndicatorSnapshot = HashMap<String, Vec<f64>>;

/// A trading strategy consumed by the update orchestrator.
///
/// Strategies are pure signal generators: they receive causally visible
/// data and return order intent. They never fetch data or talk to a venue
/// themselves.
pub trait SignalGenerator: Send + Sync {
    /// Unique strategy name, stamped onto every normalized order.
    fn name(&self) -> &str;

    /// Generate a signal from the windowed data bundle (continuous mode).
    ///
    /// The bundle contains only bars visible at the cycle's cutoff; the
    /// last bar of the base series is the current bar.
    fn signal(&mut self, data: &DataBundle) -> OrderIntent;

    /// Generate a signal for an explicit row index into pre-fetched data
    /// (periodic mode). `position` carries the venue's current position for
    /// the instrument when the strategy declared position awareness.
    fn signal_at(&mut self, index: usize, position: Option<&[Position]>) -> OrderIntent;

    /// Indicator values for summary reporting, if the strategy exposes any.
    fn indicators(&self) -> Option<IndicatorSnapshot> {
        None
    }
}
