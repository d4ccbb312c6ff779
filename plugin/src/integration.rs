//! Configured entries and the host-facing entry points.
//!
//! `Integration` is the one piece of state the host keeps for this plugin.
//! Adapters never reach into it; the host-facing methods below pick an
//! entry and pass its `InstanceContext` down explicitly.

use std::sync::Arc;

use koplista_core::{ApiClient, ConfigError};
use tokio::task::JoinHandle;

use crate::context::InstanceContext;
use crate::coordinator::Coordinator;
use crate::intent::{self, Intent, IntentResponse, INTENT_ADD_ITEM};
use crate::options::{EntryData, PluginOptions};
use crate::services::{self, ServiceResponse};
use crate::todo::{self, TodoListEntity};

struct ConfiguredEntry {
    context: InstanceContext,
    poller: JoinHandle<()>,
}

impl Drop for ConfiguredEntry {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

/// Returned from `setup_entry`.
#[derive(Debug)]
pub struct SetupOutcome {
    pub context: InstanceContext,
    pub entities: Vec<TodoListEntity>,
    /// True for the first entry: the host should register the services and
    /// the intent handler now.
    pub register_services: bool,
}

/// Returned from `unload_entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnloadOutcome {
    /// True once no entries remain.
    pub unregister_services: bool,
}

#[derive(Default)]
pub struct Integration {
    options: PluginOptions,
    entries: Vec<ConfiguredEntry>,
}

impl Integration {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            options,
            entries: Vec::new(),
        }
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build client and coordinator, run the first fetch and start polling.
    ///
    /// A failed first fetch does not fail setup: the entry comes up with an
    /// empty snapshot, no checklist entities, and `last_update_success`
    /// false. Setting up an id that already exists replaces it; the
    /// replacement never asks for the services to be registered again.
    pub async fn setup_entry(
        &mut self,
        entry_id: &str,
        data: &EntryData,
    ) -> Result<SetupOutcome, ConfigError> {
        let client = ApiClient::with_timeout(data.connection()?, self.options.request_timeout())?;
        let coordinator = Arc::new(Coordinator::new(client.clone(), self.options.scan_interval()));
        let context = InstanceContext::new(entry_id, client, coordinator.clone(), self.options.language);

        if !coordinator.refresh().await {
            tracing::warn!(entry = entry_id, "initial Koplista fetch failed; continuing with empty data");
        }
        let poller = coordinator.spawn_polling();

        // Replacing an entry keeps the services it registered.
        let replaced = self.remove(entry_id);
        let register_services = self.entries.is_empty() && !replaced;
        self.entries.push(ConfiguredEntry {
            context: context.clone(),
            poller,
        });
        tracing::info!(entry = entry_id, url = context.client().config().base_url(), "Koplista entry set up");

        Ok(SetupOutcome {
            entities: todo::entities_for(&context),
            context,
            register_services,
        })
    }

    /// Stop polling for `entry_id`. `None` if it was not set up.
    pub fn unload_entry(&mut self, entry_id: &str) -> Option<UnloadOutcome> {
        if !self.remove(entry_id) {
            return None;
        }
        tracing::info!(entry = entry_id, "Koplista entry unloaded");
        Some(UnloadOutcome {
            unregister_services: self.entries.is_empty(),
        })
    }

    /// Drop the entry and its poller. False if there was none.
    fn remove(&mut self, entry_id: &str) -> bool {
        match self.entries.iter().position(|e| e.context.entry_id() == entry_id) {
            Some(pos) => {
                drop(self.entries.remove(pos));
                true
            }
            None => false,
        }
    }

    pub fn get(&self, entry_id: &str) -> Option<&InstanceContext> {
        self.entries
            .iter()
            .map(|e| &e.context)
            .find(|ctx| ctx.entry_id() == entry_id)
    }

    /// The entry host-level calls are routed to.
    ///
    /// Always the first configured entry. With several entries the others
    /// are unreachable from services and intents; this is known and left
    /// as is.
    pub fn first(&self) -> Option<&InstanceContext> {
        self.entries.first().map(|e| &e.context)
    }

    pub async fn call_service(&self, service: &str, data: serde_json::Value) -> ServiceResponse {
        services::handle_call(self.first(), self.options.language, service, data).await
    }

    /// `None` for intent types this plugin does not handle.
    pub async fn handle_intent(&self, intent_type: &str, intent: &Intent) -> Option<IntentResponse> {
        match intent_type {
            INTENT_ADD_ITEM => Some(intent::handle_add_item(self.first(), self.options.language, intent).await),
            _ => None,
        }
    }
}
