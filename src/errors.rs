/*!
 * Error types for the lingocue engine.
 *
 * Remote failures never reach player code: the services recover them into
 * fallback values. These types describe what went wrong on the way, so
 * collaborators and tests can still reason about it.
 */

use thiserror::Error;

/// Errors that can occur when talking to a remote collaborator
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

    /// The transport gave up waiting
    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else if let Some(status) = error.status() {
            Self::ApiError {
                status_code: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(error: serde_json::Error) -> Self {
        Self::ParseError(error.to_string())
    }
}

/// Errors raised while building cues
#[derive(Error, Debug, PartialEq)]
pub enum CueError {
    /// The cue ends before it starts
    #[error("Invalid time range for cue {id}: end {end_ms} < start {start_ms}")]
    InvalidInterval {
        id: i64,
        start_ms: u64,
        end_ms: u64,
    },
}

/// Errors in the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid language code '{0}'")]
    InvalidLanguage(String),

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("API key is required for provider {0}")]
    MissingApiKey(String),

    #[error("Invalid provider type: {0}")]
    UnknownProvider(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a remote collaborator
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from cue construction
    #[error("Cue error: {0}")]
    Cue(#[from] CueError),

    /// Error from configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

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
