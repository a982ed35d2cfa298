use thiserror::Error;

/// Errors surfaced by brokerage adapters
///
/// The core propagates these to its caller without interpreting or
/// retrying them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Order rejected: {0}")]
    Rejected(String),

    #[error("Adapter unavailable: {0}")]
    Unavailable(String),
}

pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Sizing could not turn a proto-order into a viable order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    #[error("Cannot construct order for {symbol}: {reason}")]
    ConstructionFailure { symbol: String, reason: String },
}

/// The pulse schedule could not be loaded
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PulseSourceError {
    #[error("Cannot read pulse source {path}: {error}")]
    Io { path: String, error: String },

    #[error("Malformed pulse identifier: {0}")]
    Malformed(String),
}
