//! Data refresh control.
//!
//! Fetches or loads the base, multi-timeframe, quote, and auxiliary
//! datasets for one bot and synchronizes the trading and quote series.
//! Everything is rebuilt wholesale on each refresh; nothing is patched in
//! place.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use tradebot_core::error::DataError;
use tradebot_core::traits::DataFeed;
use tradebot_core::types::{AuxData, BarSeries, BaseData, DataBundle, Granularity, MtfData};

use crate::align::align_pair;

/// Where a bot's trading data comes from.
#[derive(Debug, Clone)]
pub enum DataDescriptor {
    /// One local file at the base granularity
    LocalSingle(PathBuf),
    /// Local files per granularity; the first entry is the base
    LocalMulti(Vec<(Granularity, PathBuf)>),
    /// Live fetch through the feed at the configured granularities
    Fetch,
}

/// Auxiliary data source: a local series file or a fixed scalar.
#[derive(Debug, Clone)]
pub enum AuxSource {
    Local(PathBuf),
    Scalar(f64),
}

/// One refresh's worth of datasets, aligned and bundled.
#[derive(Debug, Clone)]
pub struct RefreshedData {
    /// Base trading series, synchronized with `quote`
    pub data: BarSeries,
    /// Multi-timeframe data when more than one granularity is configured
    pub multi: Option<MtfData>,
    /// Quote series, synchronized with `data`
    pub quote: BarSeries,
    pub aux: Option<HashMap<String, AuxData>>,
    /// The exact shape handed to the strategy
    pub bundle: DataBundle,
}

/// Loads and synchronizes all datasets for one instrument.
pub struct DataRefresher {
    feed: Arc<dyn DataFeed>,
    instrument: String,
    /// Configured granularities; the first is the base
    granularities: Vec<Granularity>,
    /// Bar count for live fetches (the strategy lookback period)
    period: usize,
    data: DataDescriptor,
    quote_path: Option<PathBuf>,
    aux: Option<HashMap<String, AuxSource>>,
    start: Option<i64>,
    end: Option<i64>,
}

impl DataRefresher {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        feed: Arc<dyn DataFeed>,
        instrument: impl Into<String>,
        granularities: Vec<Granularity>,
        period: usize,
        data: DataDescriptor,
        quote_path: Option<PathBuf>,
        aux: Option<HashMap<String, AuxSource>>,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Self {
        Self {
            feed,
            instrument: instrument.into(),
            granularities,
            period,
            data,
            quote_path,
            aux,
            start,
            end,
        }
    }

    /// The base (first-configured) granularity.
    pub fn base_granularity(&self) -> Granularity {
        self.granularities.first().copied().unwrap_or_default()
    }

    /// Fetch/load every dataset and synchronize trading and quote series.
    ///
    /// An empty base series is a data-retrieval failure and aborts the
    /// refresh.
    pub async fn refresh(&self) -> Result<RefreshedData, DataError> {
        let (data, multi) = self.retrieve_trading_data().await?;
        self.check_not_empty(&data)?;

        let quote = self.retrieve_quote_data(&data).await?;
        let aux = self.retrieve_aux_data().await?;

        // Correct any timestamp mismatches between trading and quote data.
        let (data, quote) = align_pair(&data, &quote);
        self.check_not_empty(&data)?;

        // Keep the MTF base entry consistent with the synchronized series.
        let multi = multi.map(|mtf| {
            let mut updated = mtf;
            updated.insert(self.base_granularity(), data.clone());
            updated
        });

        let base = match &multi {
            Some(mtf) => BaseData::Multi(mtf.clone()),
            None => BaseData::Single(data.clone()),
        };
        let bundle = match &aux {
            Some(aux) => DataBundle::Composite {
                base,
                aux: aux.clone(),
            },
            None => match base {
                BaseData::Single(series) => DataBundle::Single(series),
                BaseData::Multi(mtf) => DataBundle::Multi(mtf),
            },
        };

        debug!(
            instrument = %self.instrument,
            bars = data.len(),
            quote_bars = quote.len(),
            "Data refreshed"
        );

        Ok(RefreshedData {
            data,
            multi,
            quote,
            aux,
            bundle,
        })
    }

    async fn retrieve_trading_data(
        &self,
    ) -> Result<(BarSeries, Option<MtfData>), DataError> {
        match &self.data {
            DataDescriptor::LocalSingle(path) => {
                let data = self.feed.load_local(path, self.start, self.end).await?;
                Ok((data, None))
            }
            DataDescriptor::LocalMulti(paths) => {
                let mut mtf = MtfData::new();
                for (granularity, path) in paths {
                    let series = self.feed.load_local(path, self.start, self.end).await?;
                    mtf.insert(*granularity, series);
                }
                let data = mtf
                    .base()
                    .cloned()
                    .ok_or(DataError::NoDataAvailable)?;
                Ok((data, Some(mtf)))
            }
            DataDescriptor::Fetch => {
                let mut mtf = MtfData::new();
                for granularity in &self.granularities {
                    let series = self
                        .feed
                        .fetch(
                            &self.instrument,
                            *granularity,
                            self.period,
                            self.start,
                            self.end,
                        )
                        .await?;
                    mtf.insert(*granularity, series);
                }
                let data = mtf
                    .base()
                    .cloned()
                    .ok_or(DataError::NoDataAvailable)?;
                let multi = if mtf.len() > 1 { Some(mtf) } else { None };
                Ok((data, multi))
            }
        }
    }

    async fn retrieve_quote_data(&self, data: &BarSeries) -> Result<BarSeries, DataError> {
        match &self.quote_path {
            Some(path) => self.feed.load_local(path, self.start, self.end).await,
            None => {
                self.feed
                    .fetch_quote(
                        data,
                        &self.instrument,
                        self.base_granularity(),
                        self.start,
                        self.end,
                    )
                    .await
            }
        }
    }

    async fn retrieve_aux_data(
        &self,
    ) -> Result<Option<HashMap<String, AuxData>>, DataError> {
        let Some(sources) = &self.aux else {
            return Ok(None);
        };
        let mut aux = HashMap::new();
        for (key, source) in sources {
            let value = match source {
                AuxSource::Local(path) => {
                    AuxData::Series(self.feed.load_local(path, self.start, self.end).await?)
                }
                AuxSource::Scalar(v) => AuxData::Scalar(*v),
            };
            aux.insert(key.clone(), value);
        }
        Ok(Some(aux))
    }

    fn check_not_empty(&self, data: &BarSeries) -> Result<(), DataError> {
        if data.is_empty() {
            return Err(DataError::EmptyDataset {
                instrument: self.instrument.clone(),
            });
        }
        Ok(())
    }
}
