//! Anti-lookahead windowing.
//!
//! Everything a strategy sees passes through [`visible_window`]: only the
//! causally visible prefix of a series survives, so no future information
//! can reach signal generation in either live or replay operation.

use std::collections::HashMap;

use tradebot_core::types::{AuxData, Bar, BarIndexing, BarSeries, BaseData, DataBundle, MtfData};

/// The causally visible prefix of `series` at `cutoff`, optionally
/// truncated to the last `tail` bars.
pub fn visible_window(
    series: &BarSeries,
    cutoff: i64,
    indexing: BarIndexing,
    tail: Option<usize>,
) -> BarSeries {
    let visible = match indexing {
        BarIndexing::Open => series.retain_timestamps(|ts| ts < cutoff),
        BarIndexing::Close => series.retain_timestamps(|ts| ts <= cutoff),
    };
    match tail {
        Some(n) => visible.tail(n),
        None => visible,
    }
}

/// Window every time-indexed auxiliary entry; scalars pass through
/// unchanged.
pub fn window_aux(
    aux: &HashMap<String, AuxData>,
    cutoff: i64,
    indexing: BarIndexing,
    tail: Option<usize>,
) -> HashMap<String, AuxData> {
    aux.iter()
        .map(|(key, value)| {
            let windowed = match value {
                AuxData::Series(series) => {
                    AuxData::Series(visible_window(series, cutoff, indexing, tail))
                }
                AuxData::Scalar(v) => AuxData::Scalar(*v),
            };
            (key.clone(), windowed)
        })
        .collect()
}

/// A bundle windowed for one cycle.
#[derive(Debug, Clone)]
pub struct WindowedBundle {
    /// The windowed data handed to the strategy
    pub data: DataBundle,
    /// Last row of the windowed base series, if any
    pub current_bar: Option<Bar>,
    /// Whether the base series accumulated at least `period` bars
    pub sufficient: bool,
}

fn window_mtf(mtf: &MtfData, cutoff: i64, indexing: BarIndexing, tail: Option<usize>) -> MtfData {
    mtf.map_series(|series| visible_window(series, cutoff, indexing, tail))
}

/// Apply the anti-lookahead rule uniformly across a strategy data bundle.
///
/// The base series, every multi-timeframe entry, and every time-indexed
/// auxiliary entry are windowed with the same cutoff and truncated to the
/// last `period` bars. Sufficiency requires the windowed base series to
/// hold at least `period` bars.
pub fn window_bundle(
    bundle: &DataBundle,
    cutoff: i64,
    indexing: BarIndexing,
    period: usize,
) -> WindowedBundle {
    let tail = Some(period);
    let data = match bundle {
        DataBundle::Single(series) => {
            DataBundle::Single(visible_window(series, cutoff, indexing, tail))
        }
        DataBundle::Multi(mtf) => DataBundle::Multi(window_mtf(mtf, cutoff, indexing, tail)),
        DataBundle::Composite { base, aux } => {
            let base = match base {
                BaseData::Single(series) => {
                    BaseData::Single(visible_window(series, cutoff, indexing, tail))
                }
                BaseData::Multi(mtf) => BaseData::Multi(window_mtf(mtf, cutoff, indexing, tail)),
            };
            DataBundle::Composite {
                base,
                aux: window_aux(aux, cutoff, indexing, tail),
            }
        }
    };

    let (current_bar, visible_len) = match data.base_series() {
        Some(base) => (base.last().copied(), base.len()),
        None => (None, 0),
    };

    WindowedBundle {
        data,
        current_bar,
        sufficient: visible_len >= period,
    }
}
