//! Error types for the gridterm engine.

use thiserror::Error;

use crate::Dimensions;

/// Main error type for gridterm operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid grid dimensions (zero width or height)
    #[error("Invalid dimensions: {rows}x{cols}")]
    InvalidDimensions {
        /// Number of rows
        rows: u16,
        /// Number of columns
        cols: u16,
    },

    /// Refresh interval below the 1ms minimum
    #[error("Invalid refresh interval: {0}ms (minimum 1ms)")]
    InvalidRefreshInterval(u64),

    /// Two buffers that must stay in lockstep have different dimensions
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensions of the destination buffer
        expected: Dimensions,
        /// Dimensions of the source buffer
        actual: Dimensions,
    },

    /// `run` was called while the engine is already running
    #[error("Engine is already running")]
    AlreadyRunning,

    /// The input hook was installed twice
    #[error("Input hook already installed")]
    HookAlreadyInstalled,

    /// Input hook installation or delivery failure
    #[error("Input hook error: {0}")]
    Hook(String),

    /// Console device failure
    #[error("Console error: {0}")]
    Console(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
