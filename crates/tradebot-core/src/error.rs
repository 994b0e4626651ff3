//! Error types for the execution engine.

use thiserror::Error;

/// Top-level execution engine error.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Venue error: {0}")]
    Venue(#[from] VenueError),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Data retrieval and processing errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Empty dataset retrieved for {instrument}")]
    EmptyDataset { instrument: String },

    #[error("Not enough bars for lookback period: need {required}, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Feed does not support {0}")]
    Unsupported(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Order construction and normalization errors.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Invalid order submitted: {0}")]
    Invalid(String),

    #[error("Missing required field '{field}' for {kind} order")]
    MissingField { kind: String, field: String },

    #[error("Order not yet qualified with a price")]
    Unqualified,
}

/// Venue/broker errors.
#[derive(Error, Debug)]
pub enum VenueError {
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Insufficient margin: required {required}, available {available}")]
    InsufficientMargin {
        required: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    #[error("Position not found: {0}")]
    PositionNotFound(String),

    #[error("Venue error: {0}")]
    Internal(String),
}

/// Strategy construction errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),
}

/// Result type alias for engine operations.
pub type BotResult<T> = Result<T, BotError>;
