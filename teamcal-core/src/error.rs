//! Error types for teamcal.

use thiserror::Error;

/// Errors that can occur in teamcal operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Calendar accessed outside of a mounted scope")]
    NotMounted,
}

impl CalendarError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CalendarError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for teamcal operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
