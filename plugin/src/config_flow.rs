//! Validation behind the setup and reconfigure forms.

use koplista_core::{ApiClient, ConfigError, Reachability};

use crate::error::FlowError;
use crate::options::{EntryData, PluginOptions};

pub const ENTRY_TITLE: &str = "Koplista";

/// Check that `data` describes a reachable service with a working key.
/// Returns the title for the new entry.
pub async fn validate_input(data: &EntryData, options: &PluginOptions) -> Result<&'static str, FlowError> {
    let config = data.connection().map_err(|err| {
        tracing::error!("Invalid configuration: {err}");
        FlowError::InvalidUrl
    })?;
    let client = ApiClient::with_timeout(config, options.request_timeout()).map_err(|err| {
        tracing::error!("Unexpected exception during setup: {err}");
        match err {
            ConfigError::InvalidUrl(_) => FlowError::InvalidUrl,
            ConfigError::HttpClient(_) => FlowError::Unknown,
        }
    })?;

    match client.test_connection().await {
        Reachability::Reachable => Ok(ENTRY_TITLE),
        Reachability::Unauthorized => Err(FlowError::InvalidAuth),
        Reachability::EndpointMissing | Reachability::Unreachable => Err(FlowError::CannotConnect),
    }
}
