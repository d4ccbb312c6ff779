//! Async facade over `KoplistaClient` and `Transport`.

use std::time::Duration;

use crate::client::{KoplistaClient, Reachability};
use crate::config::{ConnectionConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{ApiError, ConfigError};
use crate::transport::Transport;
use crate::types::{AddItem, Item, ShoppingList};

/// The Koplista API client used by the plugin. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: KoplistaClient,
    transport: Transport,
}

impl ApiClient {
    pub fn new(config: ConnectionConfig) -> Result<Self, ConfigError> {
        Self::with_timeout(config, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: ConnectionConfig, timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            client: KoplistaClient::new(config),
            transport: Transport::new(timeout)?,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.client.config()
    }

    pub async fn list_lists(&self) -> Result<Vec<ShoppingList>, ApiError> {
        let response = self.transport.execute(self.client.build_list_lists()).await?;
        self.client.parse_list_lists(response)
    }

    pub async fn list_items(&self, list_id: &str) -> Result<Vec<Item>, ApiError> {
        let response = self.transport.execute(self.client.build_list_items(list_id)).await?;
        self.client.parse_list_items(response)
    }

    /// Add `item_name` to `list_id`. Returns the created item when the
    /// service echoes it back.
    pub async fn add_item(&self, list_id: &str, item_name: &str) -> Result<Option<Item>, ApiError> {
        let req = self.client.build_add_item(&AddItem {
            list_id: list_id.to_string(),
            item_name: item_name.to_string(),
        })?;
        let response = self.transport.execute(req).await?;
        self.client.parse_add_item(response)
    }

    pub async fn remove_item(&self, item_id: &str) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_remove_item(item_id)).await?;
        self.client.parse_remove_item(response)
    }

    pub async fn mark_bought(&self, item_id: &str, bought: bool) -> Result<(), ApiError> {
        let req = self.client.build_mark_bought(item_id, bought)?;
        let response = self.transport.execute(req).await?;
        self.client.parse_mark_bought(response)
    }

    /// Setup-time probe. Never fails; transport errors are `Unreachable`.
    pub async fn test_connection(&self) -> Reachability {
        match self.transport.execute(self.client.build_probe()).await {
            Ok(response) => {
                let outcome = self.client.classify_probe(&response);
                tracing::debug!(status = response.status, ?outcome, "connection probe answered");
                outcome
            }
            Err(err) => {
                tracing::warn!(error = %err, "connection probe failed");
                Reachability::Unreachable
            }
        }
    }
}
