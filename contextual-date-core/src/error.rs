//! Error types for contextual-date-core

use thiserror::Error;

/// Main error type for the contextual-date-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Input could not be normalized into an instant
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for contextual-date-core
pub type Result<T> = std::result::Result<T, Error>;
