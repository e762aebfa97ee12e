//! Error types for the coin tracker

use thiserror::Error;

/// Errors that can occur when fetching market data from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Provider API error: HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Creates an ApiError
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
        }
    }
}

/// Errors returned by tracker operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The fetch failed; carries the user-facing message
    #[error("{0}")]
    FetchFailed(String),

    /// A currency code outside the supported set
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

impl TrackerError {
    /// Creates a FetchFailed error
    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    /// Creates an UnsupportedCurrency error
    pub fn unsupported_currency(code: &str) -> Self {
        Self::UnsupportedCurrency(code.to_string())
    }
}
