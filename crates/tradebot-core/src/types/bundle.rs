//! Strategy data bundles.
//!
//! The exact shape handed to a strategy: a single series, a multi-timeframe
//! dataset, or a composite of base data plus named auxiliary inputs. The
//! tagged enum replaces runtime shape-sniffing; an unrecognized shape cannot
//! be constructed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{BarSeries, Granularity};

/// Multi-timeframe dataset: granularity label to series, insertion-ordered.
/// The first-configured granularity is the base used for duplicate
/// detection and sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MtfData {
    order: Vec<Granularity>,
    series: HashMap<Granularity, BarSeries>,
}

impl MtfData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series under its granularity label. Re-inserting a label
    /// replaces the series but keeps its original position.
    pub fn insert(&mut self, granularity: Granularity, series: BarSeries) {
        if !self.series.contains_key(&granularity) {
            self.order.push(granularity);
        }
        self.series.insert(granularity, series);
    }

    pub fn get(&self, granularity: Granularity) -> Option<&BarSeries> {
        self.series.get(&granularity)
    }

    /// The first-configured (base) granularity.
    pub fn base_granularity(&self) -> Option<Granularity> {
        self.order.first().copied()
    }

    /// The series at the base granularity.
    pub fn base(&self) -> Option<&BarSeries> {
        self.base_granularity().and_then(|g| self.series.get(&g))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate entries in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (Granularity, &BarSeries)> {
        self.order.iter().filter_map(|g| self.series.get(g).map(|s| (*g, s)))
    }

    /// Rebuild with each series mapped through `f`, preserving order.
    pub fn map_series(&self, mut f: impl FnMut(&BarSeries) -> BarSeries) -> Self {
        let mut out = Self::new();
        for (granularity, series) in self.iter() {
            out.insert(granularity, f(series));
        }
        out
    }
}

/// Auxiliary strategy input: a time-indexed series or an opaque scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuxData {
    Series(BarSeries),
    Scalar(f64),
}

/// Base portion of a composite bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseData {
    Single(BarSeries),
    Multi(MtfData),
}

impl BaseData {
    /// The series driving duplicate detection and sufficiency checks.
    pub fn base_series(&self) -> Option<&BarSeries> {
        match self {
            BaseData::Single(series) => Some(series),
            BaseData::Multi(mtf) => mtf.base(),
        }
    }
}

/// The exact data shape passed to a strategy on each cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataBundle {
    /// A single trading series
    Single(BarSeries),
    /// A multi-timeframe dataset
    Multi(MtfData),
    /// Base data plus named auxiliary inputs
    Composite {
        base: BaseData,
        aux: HashMap<String, AuxData>,
    },
}

impl DataBundle {
    /// The base-granularity series of whatever shape this bundle holds.
    pub fn base_series(&self) -> Option<&BarSeries> {
        match self {
            DataBundle::Single(series) => Some(series),
            DataBundle::Multi(mtf) => mtf.base(),
            DataBundle::Composite { base, .. } => base.base_series(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;

    fn series(granularity: Granularity, n: i64) -> BarSeries {
        BarSeries::from_bars(
            "EURUSD",
            granularity,
            (0..n)
                .map(|i| Bar::new(i, 1.0, 1.0, 1.0, 1.0, 1.0))
                .collect(),
        )
    }

    #[test]
    fn first_inserted_granularity_is_base() {
        let mut mtf = MtfData::new();
        mtf.insert(Granularity::H4, series(Granularity::H4, 3));
        mtf.insert(Granularity::H1, series(Granularity::H1, 5));

        assert_eq!(mtf.base_granularity(), Some(Granularity::H4));
        assert_eq!(mtf.base().unwrap().len(), 3);
        let order: Vec<_> = mtf.iter().map(|(g, _)| g).collect();
        assert_eq!(order, vec![Granularity::H4, Granularity::H1]);
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut mtf = MtfData::new();
        mtf.insert(Granularity::H4, series(Granularity::H4, 3));
        mtf.insert(Granularity::H1, series(Granularity::H1, 5));
        mtf.insert(Granularity::H4, series(Granularity::H4, 7));

        assert_eq!(mtf.base_granularity(), Some(Granularity::H4));
        assert_eq!(mtf.base().unwrap().len(), 7);
        assert_eq!(mtf.len(), 2);
    }

    #[test]
    fn bundle_base_series_for_each_shape() {
        let single = DataBundle::Single(series(Granularity::H1, 4));
        assert_eq!(single.base_series().unwrap().len(), 4);

        let mut mtf = MtfData::new();
        mtf.insert(Granularity::H1, series(Granularity::H1, 6));
        let composite = DataBundle::Composite {
            base: BaseData::Multi(mtf),
            aux: HashMap::new(),
        };
        assert_eq!(composite.base_series().unwrap().len(), 6);
    }
}
