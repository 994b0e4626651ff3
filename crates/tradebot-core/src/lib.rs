//! Core types and interfaces for the tradebot execution engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries, data bundles)
//! - Order intent, normalized and qualified order types
//! - Interfaces for strategies, data feeds, venues, and notifiers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BotError, BotResult};
pub use traits::*;
pub use types::*;
