//! The per-entry handle every adapter receives.

use std::fmt;
use std::sync::Arc;

use koplista_core::ApiClient;

use crate::coordinator::Coordinator;
use crate::error::AdapterError;
use crate::options::Language;
use crate::snapshot::Snapshot;

/// List used when neither the caller nor the snapshot names one.
pub const DEFAULT_LIST_ID: &str = "default";

/// Client, coordinator and reply language for one configured entry.
#[derive(Clone)]
pub struct InstanceContext {
    entry_id: String,
    client: ApiClient,
    coordinator: Arc<Coordinator>,
    language: Language,
}

impl InstanceContext {
    pub fn new(
        entry_id: impl Into<String>,
        client: ApiClient,
        coordinator: Arc<Coordinator>,
        language: Language,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            client,
            coordinator,
            language,
        }
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Pick the list id a mutation should target.
    ///
    /// A requested id or name must match a known list. If the snapshot is
    /// empty (the service may not expose its lists) the request is passed
    /// through as an id. Without a request the first known list is used,
    /// falling back to `"default"`.
    pub fn resolve_list_id(&self, requested: Option<&str>) -> Result<String, AdapterError> {
        resolve_list_id(&self.coordinator.snapshot(), requested)
    }
}

impl fmt::Debug for InstanceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceContext")
            .field("entry_id", &self.entry_id)
            .field("base_url", &self.client.config().base_url())
            .field("language", &self.language)
            .finish()
    }
}

pub(crate) fn resolve_list_id(snapshot: &Snapshot, requested: Option<&str>) -> Result<String, AdapterError> {
    match requested.map(str::trim).filter(|r| !r.is_empty()) {
        Some(requested) => match snapshot.resolve_list(requested) {
            Some(entry) => Ok(entry.info.id.clone()),
            None if snapshot.is_empty() => Ok(requested.to_string()),
            None => Err(AdapterError::UnknownList(requested.to_string())),
        },
        None => Ok(snapshot
            .first_list()
            .map(|entry| entry.info.id.clone())
            .unwrap_or_else(|| DEFAULT_LIST_ID.to_string())),
    }
}

/// Trimmed item name, or `MissingItem` if there is nothing left.
pub(crate) fn require_item(item: Option<&str>) -> Result<String, AdapterError> {
    item.map(str::trim)
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .ok_or(AdapterError::MissingItem)
}
