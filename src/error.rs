//! # Error Types
//!
//! Custom error types for GS Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for GS Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Serial port could not be opened
    #[error("failed to open serial port: {0}")]
    PortOpen(String),

    /// Serial write failed on the judging channel
    #[error("transmit error: {0}")]
    Transmit(String),

    /// Wire protocol errors (truncated or malformed frames)
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GS Bridge
pub type Result<T> = std::result::Result<T, BridgeError>;
