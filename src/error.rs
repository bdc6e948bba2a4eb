//! Error types shared by the repository, the store and the interactors

use thiserror::Error;

/// Result type for country operations
pub type CountriesResult<T> = Result<T, CountriesError>;

/// Errors surfaced to a `Loadable::Failed` slot.
///
/// Every variant owns its message so the error can be cloned into state
/// snapshots and compared in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountriesError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Server returned status {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Failed to decode response: {message}")]
    Decoding { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CountriesError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        CountriesError::Network {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, url: impl Into<String>) -> Self {
        CountriesError::Http {
            status,
            url: url.into(),
        }
    }

    /// Create a decoding error
    pub fn decoding(message: impl Into<String>) -> Self {
        CountriesError::Decoding {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        CountriesError::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CountriesError::Internal {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for CountriesError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return CountriesError::decoding(error.to_string());
        }
        match error.status() {
            Some(status) => CountriesError::http(
                status.as_u16(),
                error.url().map(|u| u.to_string()).unwrap_or_default(),
            ),
            None => CountriesError::network(error.to_string()),
        }
    }
}

impl From<serde_json::Error> for CountriesError {
    fn from(error: serde_json::Error) -> Self {
        CountriesError::decoding(error.to_string())
    }
}
