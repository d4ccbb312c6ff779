//! Error types for the Koplista API client.
//!
//! # Design
//! `Auth` and `NotFound` get dedicated variants because callers branch on
//! them (setup validation, "item already gone"). Every other status >= 400
//! lands in `Api` with the raw status and body. Transport failures are kept
//! apart in `Connectivity` so "cannot reach the service" never looks like a
//! rejected request.

use thiserror::Error;

/// Errors returned by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request timed out or the service could not be reached.
    #[error("connection error: {0}")]
    Connectivity(String),

    /// The server returned 401: the API key was rejected.
    #[error("invalid API key")]
    Auth,

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status >= 400 other than 401 and 404.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connectivity(_))
    }

    /// HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Auth => Some(401),
            ApiError::NotFound => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while building a client from user-supplied configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid Koplista URL '{0}': URL must start with 'http://' or 'https://'")]
    InvalidUrl(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
