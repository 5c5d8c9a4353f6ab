//! Error types for Cellaret.

/// A specialized Result type for Cellaret operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Cellaret operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Signal-related error.
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),
}

/// Signal-specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("invalid or already disconnected connection ID")]
    InvalidConnection,
}
