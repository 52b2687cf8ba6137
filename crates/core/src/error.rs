//! # Errors
//!
//! Error taxonomy shared by the favorites store and the catalog client.
//! Only `NotFound` and `Network` ever reach the presentation layer; the
//! other variants are logged and absorbed where they occur.

use thiserror::Error;

/// Library-wide error type
#[derive(Debug, Error)]
pub enum PokedexError {
    /// No catalog entry matches the requested name
    #[error("No catalog entry named '{0}'")]
    NotFound(String),

    /// Transport failure, timeout, or unexpected HTTP status
    #[error("Network error: {message}")]
    Network {
        message: String,
        status: Option<u16>,
    },

    /// Durable storage read or write failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted or remote payload could not be decoded
    #[error("Failed to decode {what}: {details}")]
    Decode { what: String, details: String },
}

pub type Result<T> = std::result::Result<T, PokedexError>;

impl PokedexError {
    pub fn decode(what: impl Into<String>, details: impl ToString) -> Self {
        PokedexError::Decode {
            what: what.into(),
            details: details.to_string(),
        }
    }

    /// Whether the error should be shown to the user rather than absorbed
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            PokedexError::NotFound(_) | PokedexError::Network { .. }
        )
    }
}

impl From<rusqlite::Error> for PokedexError {
    fn from(err: rusqlite::Error) -> Self {
        PokedexError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for PokedexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return PokedexError::decode("catalog response", err);
        }
        PokedexError::Network {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}
