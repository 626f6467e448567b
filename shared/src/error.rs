//! Error types for the booking calendar Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the bookings response.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (unknown group, no feeds configured)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single upstream feed failed to load or parse
    #[error("Feed error for {url}: {message}")]
    Feed { url: String, message: String },

    /// Every configured feed failed
    #[error("All configured feeds failed")]
    AllFeedsFailed,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config(_) => 400,
            _ => 500,
        }
    }
}
