/*!
 * Error types for the dualsub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Only two of them ever abort a conversion: `SubtitleError` (nothing in the input
 * looked like a caption) and `BackendError` (the selected backend cannot be used).
 * Everything that goes wrong while talking to a translator degrades to a
 * placeholder line instead.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The request did not complete within the batch timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Map a non-success HTTP status to the closest provider error
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Whether a retry has any chance of producing a different outcome
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::AuthenticationError(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur during subtitle parsing
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubtitleError {
    /// The input contained no block with a time range and text
    #[error("No captions found in input ({blocks} blocks scanned)")]
    NoCaptions {
        /// Number of blank-line separated blocks that were inspected
        blocks: usize,
    },
}

/// Errors raised before dispatch when the selected backend cannot be used
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// The backend needs a credential and none was configured
    #[error("{provider} requires an API key (set it in the config, with --api-key or DUALSUB_API_KEY)")]
    MissingCredential {
        /// Display name of the backend
        provider: String,
    },
}

/// A timestamp that could not be converted; the codec recovers from it locally
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Malformed timestamp '{input}': {reason}")]
pub struct TimeFormatError {
    /// The raw timestamp text
    pub input: String,
    /// What was wrong with it
    pub reason: &'static str,
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The backend cannot be used at all
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// The dispatch was cancelled before every batch was sent
    #[error("Translation cancelled after {completed} of {total} batches")]
    Cancelled {
        /// Batches that had finished when the cancellation was observed
        completed: usize,
        /// Total number of batches
        total: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from backend selection
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
