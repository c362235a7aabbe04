//! Error types for the logger

use thiserror::Error;

/// Errors that can occur while setting up or adjusting the logger
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid filter '{directive}': {message}")]
    Filter { directive: String, message: String },

    #[error("Failed to reload log filter: {message}")]
    Reload { message: String },

    #[error("Failed to install global subscriber: {message}")]
    Init { message: String },
}

impl LoggerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn reload(message: impl Into<String>) -> Self {
        Self::Reload { message: message.into() }
    }

    pub fn init(message: impl Into<String>) -> Self {
        Self::Init { message: message.into() }
    }
}
