//! Time-series alignment.

use std::collections::BTreeSet;

use tradebot_core::types::BarSeries;

/// Truncate each series to the intersection of all their timestamp sets.
///
/// Per-series bar content is preserved and order maintained; rows whose
/// timestamp is absent from any other input are dropped, never invented.
/// Series sharing no common timestamps come back empty.
pub fn align(inputs: &[&BarSeries]) -> Vec<BarSeries> {
    let mut common: Option<BTreeSet<i64>> = None;
    for series in inputs {
        let timestamps: BTreeSet<i64> = series.iter().map(|b| b.timestamp).collect();
        common = Some(match common {
            Some(existing) => existing.intersection(&timestamps).copied().collect(),
            None => timestamps,
        });
    }
    let common = common.unwrap_or_default();

    inputs
        .iter()
        .map(|series| series.retain_timestamps(|ts| common.contains(&ts)))
        .collect()
}

/// Align exactly two series, returning them as a pair.
pub fn align_pair(a: &BarSeries, b: &BarSeries) -> (BarSeries, BarSeries) {
    let mut aligned = align(&[a, b]);
    let b = aligned.pop().unwrap_or_else(|| b.clone());
    let a = aligned.pop().unwrap_or_else(|| a.clone());
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradebot_core::types::{Bar, Granularity};

    fn series(timestamps: &[i64]) -> BarSeries {
        BarSeries::from_bars(
            "EURUSD",
            Granularity::H1,
            timestamps
                .iter()
                .map(|&ts| Bar::new(ts, ts as f64, ts as f64, ts as f64, ts as f64, 1.0))
                .collect(),
        )
    }

    #[test]
    fn intersects_timestamp_sets() {
        let a = series(&[1, 2, 3, 5]);
        let b = series(&[1, 2, 4, 5]);

        let aligned = align(&[&a, &b]);
        assert_eq!(aligned[0].timestamps(), vec![1, 2, 5]);
        assert_eq!(aligned[1].timestamps(), vec![1, 2, 5]);
    }

    #[test]
    fn preserves_each_series_content() {
        let a = series(&[1, 2, 3]);
        let mut b = series(&[]);
        b.push(Bar::new(2, 9.0, 9.5, 8.5, 9.25, 42.0));
        b.push(Bar::new(3, 7.0, 7.5, 6.5, 7.25, 17.0));

        let (a2, b2) = align_pair(&a, &b);
        assert_eq!(a2.timestamps(), vec![2, 3]);
        assert_eq!(b2.get(0).unwrap().close, 9.25);
        assert_eq!(b2.get(1).unwrap().volume, 17.0);
    }

    #[test]
    fn disjoint_inputs_give_empty_outputs() {
        let a = series(&[1, 2]);
        let b = series(&[3, 4]);

        let aligned = align(&[&a, &b]);
        assert!(aligned[0].is_empty());
        assert!(aligned[1].is_empty());
    }

    #[test]
    fn three_way_intersection() {
        let a = series(&[1, 2, 3, 4]);
        let b = series(&[2, 3, 4]);
        let c = series(&[1, 3, 4]);

        let aligned = align(&[&a, &b, &c]);
        for s in &aligned {
            assert_eq!(s.timestamps(), vec![3, 4]);
        }
    }
}
