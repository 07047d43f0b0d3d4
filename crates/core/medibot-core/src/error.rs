//! Error types for MediBot core

use thiserror::Error;

/// Main error type for MediBot operations
#[derive(Debug, Error)]
pub enum MediBotError {
    /// No self-declared name was found in the transcribed text
    #[error("Name not detected in: '{text_preview}'. Ask the user to say 'me llamo <nombre>'")]
    NameNotDetected {
        /// First characters of the rejected text
        text_preview: String,
    },

    /// Storage operation error (from sqlx)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Storage operation error (custom message)
    #[error("Database error: {0}")]
    Database(String),

    /// External chat/TTS/transcription collaborator failed
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Convenient Result type using MediBotError
pub type Result<T> = std::result::Result<T, MediBotError>;

impl MediBotError {
    /// Create a name-not-detected error carrying a short preview of the text
    pub fn name_not_detected(text: &str) -> Self {
        MediBotError::NameNotDetected {
            text_preview: text.chars().take(60).collect(),
        }
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        MediBotError::Database(msg.into())
    }

    /// Create an upstream service error
    pub fn upstream(msg: impl Into<String>) -> Self {
        MediBotError::Upstream(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        MediBotError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        MediBotError::Validation(msg.into())
    }

    /// True for every flavour of persistence failure
    pub fn is_storage(&self) -> bool {
        matches!(self, MediBotError::Storage(_) | MediBotError::Database(_))
    }
}
