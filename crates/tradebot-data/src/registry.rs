//! Feed capability registry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tradebot_core::error::DataError;
use tradebot_core::traits::DataFeed;

use crate::CsvFeed;

/// Identifier for a registered feed implementation. Feed capabilities are
/// reached through the `DataFeed` trait on the resolved implementation,
/// never by method-name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedId {
    /// Local CSV bar files
    #[default]
    Csv,
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedId::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for FeedId {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(FeedId::Csv),
            other => Err(DataError::Unsupported(format!("feed '{}'", other))),
        }
    }
}

/// Maps feed identifiers to typed `DataFeed` implementations.
pub struct FeedRegistry {
    feeds: HashMap<FeedId, Arc<dyn DataFeed>>,
}

impl FeedRegistry {
    /// Build a registry with the built-in feeds rooted at `data_root`.
    pub fn with_data_root(data_root: impl AsRef<Path>) -> Self {
        let mut feeds: HashMap<FeedId, Arc<dyn DataFeed>> = HashMap::new();
        feeds.insert(FeedId::Csv, Arc::new(CsvFeed::new(data_root.as_ref())));
        Self { feeds }
    }

    /// Register or replace a feed implementation.
    pub fn insert(&mut self, id: FeedId, feed: Arc<dyn DataFeed>) {
        self.feeds.insert(id, feed);
    }

    /// Resolve a feed by identifier.
    pub fn get(&self, id: FeedId) -> Result<Arc<dyn DataFeed>, DataError> {
        self.feeds
            .get(&id)
            .cloned()
            .ok_or_else(|| DataError::Unsupported(format!("feed '{}'", id)))
    }
}
