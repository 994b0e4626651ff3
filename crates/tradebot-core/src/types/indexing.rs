//! Bar indexing convention.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::BotError;

/// Whether a bar's timestamp marks its open or its close, governing the
/// anti-lookahead cutoff rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BarIndexing {
    /// Timestamp marks the bar's open: only bars strictly before the cutoff
    /// are visible.
    #[default]
    Open,
    /// Timestamp marks the bar's close: bars at or before the cutoff are
    /// visible.
    Close,
}

impl FromStr for BarIndexing {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(BarIndexing::Open),
            "close" => Ok(BarIndexing::Close),
            other => Err(BotError::Config(format!(
                "Unrecognised bar indexing '{other}' (expected 'open' or 'close')"
            ))),
        }
    }
}
