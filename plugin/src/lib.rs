//! Koplista shopping-list plugin for a home-automation host.
//!
//! # Overview
//! - `Coordinator` polls the service and publishes an immutable `Snapshot`.
//! - Adapters (`services`, `intent`, `todo`) turn host events into API calls
//!   and report a localized result. Each takes an explicit `InstanceContext`.
//! - `Integration` keeps the configured entries and routes host calls.
//! - `config_flow` validates user input for the setup form.
//!
//! Adapters never return errors to the host: failures become messages.

pub mod config_flow;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod integration;
pub mod intent;
pub mod messages;
pub mod options;
pub mod services;
pub mod snapshot;
pub mod todo;

pub use context::{InstanceContext, DEFAULT_LIST_ID};
pub use coordinator::{Coordinator, CoordinatorState, PollOutcome};
pub use error::{AdapterError, FlowError};
pub use integration::{Integration, SetupOutcome, UnloadOutcome};
pub use intent::{Intent, IntentResponse, INTENT_ADD_ITEM};
pub use options::{EntryData, Language, PluginOptions};
pub use services::{ItemCall, ServiceResponse, SERVICE_ADD_ITEM, SERVICE_REMOVE_ITEM};
pub use snapshot::{ListEntry, Snapshot};
pub use todo::{TodoItem, TodoItemStatus, TodoListEntity, TodoListEntityFeature};

pub const DOMAIN: &str = "koplista";
