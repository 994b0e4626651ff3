//! CLI command implementations.

pub mod backtest;
pub mod scan;
pub mod strategies;
pub mod validate;
