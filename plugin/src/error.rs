//! Adapter and config-flow errors.

use koplista_core::ApiError;
use thiserror::Error;

/// Why an adapter could not complete a host request.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("item name is required")]
    MissingItem,

    #[error("no Koplista entry is configured")]
    NotConfigured,

    #[error("invalid service data: {0}")]
    InvalidCall(String),

    #[error("unknown shopping list '{0}'")]
    UnknownList(String),

    #[error("item '{item}' not found on list '{list}'")]
    UnknownItem { list: String, item: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AdapterError {
    /// Input problems are reported without any call to the service.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, AdapterError::Api(_))
    }
}

/// Config flow errors. `key()` is the identifier the host's form shows.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    #[error("URL must start with http:// or https://")]
    InvalidUrl,

    #[error("the API key was rejected")]
    InvalidAuth,

    #[error("cannot connect to Koplista")]
    CannotConnect,

    #[error("unexpected error")]
    Unknown,
}

impl FlowError {
    pub fn key(self) -> &'static str {
        match self {
            FlowError::InvalidUrl => "invalid_url",
            FlowError::InvalidAuth => "invalid_auth",
            FlowError::CannotConnect => "cannot_connect",
            FlowError::Unknown => "unknown",
        }
    }
}
