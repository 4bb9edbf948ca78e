//! Error types for the dictionary service
//!
//! Library code returns [`DictionaryError`]; the HTTP layer maps each variant
//! onto a status code (see `api::error`).

use thiserror::Error;

/// Main error type for the dictionary system
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Missing or malformed client input
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Administrative endpoints are disabled because no secret is configured
    #[error("Administrative endpoints are disabled: {0}")]
    AdminDisabled(String),

    #[error("{0}")]
    NotFound(String),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(feature = "database")]
    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Import error in {file}: {message}")]
    Import { file: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DictionaryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
