//! Built-in signal generators.

mod ma_crossover;
mod momentum;
mod registry;

pub use ma_crossover::{MaCrossover, MaCrossoverConfig};
pub use momentum::{Momentum, MomentumConfig};
pub use registry::{StrategyInfo, StrategyRegistry};

/// Simple moving average over `values` with the given window. Returns one
/// value per full window, oldest first.
pub(crate) fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}
