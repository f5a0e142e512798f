//! Error types and handling for `Aurora Tonight`

use thiserror::Error;

/// Main error type for the `Aurora Tonight` application
#[derive(Error, Debug)]
pub enum AuroraError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream feed failures (unreachable, non-2xx, undecodable, timed out)
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl AuroraError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Whether this error means upstream data could not be obtained
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AuroraError::Api { .. } | AuroraError::Config { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AuroraError::Config { .. } | AuroraError::Api { .. } => {
                "Failed to fetch aurora or weather data. Please try again later.".to_string()
            }
            AuroraError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            AuroraError::General { message } => message.clone(),
        }
    }
}
