//! Core error types for socialspark-core.
//!
//! Each component surfaces its own typed error to its direct caller;
//! [`CoreError`] collects them for front-ends that only need to report.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for socialspark-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transport-level errors from the sync gateway
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Ranking service errors
    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    /// Contact store errors
    #[error("Contact error: {0}")]
    Contact(#[from] ContactError),

    /// Spark scheduler errors
    #[error("Spark error: {0}")]
    Spark(#[from] SparkError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential storage errors
    #[error("Credential error: {0}")]
    Credential(#[from] keyring::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the sync gateway.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, timeout or body-read failure
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),

    /// Response status outside 200..=299
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),

    /// Request body could not be serialized
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body is not the expected JSON shape
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The auth provider reports no authenticated session
    #[error("not authenticated")]
    NotAuthenticated,

    /// The request path could not be joined onto the base URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TransportError {
    /// HTTP status code, when the server answered with a non-2xx status.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::BadStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// Errors raised by the ranking client.
#[derive(Error, Debug)]
pub enum RankingError {
    /// Non-2xx status, network failure or malformed body
    #[error("invalid ranking response: {0}")]
    InvalidResponse(#[source] TransportError),

    /// The gateway refused the call for lack of credentials
    #[error("not authenticated")]
    NotAuthenticated,
}

impl From<TransportError> for RankingError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotAuthenticated => RankingError::NotAuthenticated,
            other => RankingError::InvalidResponse(other),
        }
    }
}

/// Errors raised by the contact store.
#[derive(Error, Debug)]
pub enum ContactError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Update requested for a contact that was never persisted
    #[error("contact has no id; create it before updating")]
    MissingId,

    /// A create response, or an entry of a listed collection, carries no id
    #[error("server response is missing the contact id")]
    MissingServerId,
}

/// Errors raised by the spark scheduler.
#[derive(Error, Debug)]
pub enum SparkError {
    /// Phase-1 ranking fetch failed; the task list was cleared
    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error("no spark task with id '{0}'")]
    TaskNotFound(String),

    /// A newer refresh started before this one resolved
    #[error("refresh superseded by a newer request")]
    Superseded,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable config directory
    #[error("Configuration directory unavailable: {0}")]
    DataDir(#[source] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
