//! Bar granularity definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Time resolution of a bar series, or the literal tick stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Granularity {
    /// Raw tick data
    #[serde(rename = "tick")]
    Tick,
    /// 1 minute bars
    #[serde(rename = "1m")]
    M1,
    /// 5 minute bars
    #[serde(rename = "5m")]
    M5,
    /// 15 minute bars
    #[serde(rename = "15m")]
    M15,
    /// 30 minute bars
    #[serde(rename = "30m")]
    M30,
    /// 1 hour bars
    #[serde(rename = "1h")]
    #[default]
    H1,
    /// 4 hour bars
    #[serde(rename = "4h")]
    H4,
    /// Daily bars
    #[serde(rename = "1d")]
    D1,
    /// Weekly bars
    #[serde(rename = "1w")]
    W1,
}

impl Granularity {
    /// Duration of one bar in seconds. Zero for tick data.
    pub fn as_secs(&self) -> u64 {
        match self {
            Granularity::Tick => 0,
            Granularity::M1 => 60,
            Granularity::M5 => 300,
            Granularity::M15 => 900,
            Granularity::M30 => 1800,
            Granularity::H1 => 3600,
            Granularity::H4 => 14400,
            Granularity::D1 => 86400,
            Granularity::W1 => 604800,
        }
    }

    /// Duration of one bar in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.as_secs() * 1000
    }

    /// Whether this series delivers ticks rather than bars.
    pub fn is_tick(&self) -> bool {
        matches!(self, Granularity::Tick)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Tick => "tick",
            Granularity::M1 => "1m",
            Granularity::M5 => "5m",
            Granularity::M15 => "15m",
            Granularity::M30 => "30m",
            Granularity::H1 => "1h",
            Granularity::H4 => "4h",
            Granularity::D1 => "1d",
            Granularity::W1 => "1w",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Granularity {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tick" => Ok(Granularity::Tick),
            "1m" | "1min" => Ok(Granularity::M1),
            "5m" | "5min" => Ok(Granularity::M5),
            "15m" | "15min" => Ok(Granularity::M15),
            "30m" | "30min" => Ok(Granularity::M30),
            "1h" | "hour" => Ok(Granularity::H1),
            "4h" => Ok(Granularity::H4),
            "1d" | "day" | "daily" => Ok(Granularity::D1),
            "1w" | "week" | "weekly" => Ok(Granularity::W1),
            other => Err(DataError::InvalidGranularity(other.to_string())),
        }
    }
}
