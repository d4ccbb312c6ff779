//! Host service calls: `add_item` and `remove_item`.
//!
//! Both accept `{"item": ..., "list_name": ...}` (`list_id` is accepted as an
//! alias). The list is optional; see `InstanceContext::resolve_list_id`.

use koplista_core::Item;
use serde::Deserialize;

use crate::context::{require_item, InstanceContext};
use crate::error::AdapterError;
use crate::messages::{self, Action};
use crate::options::Language;

pub const SERVICE_ADD_ITEM: &str = "add_item";
pub const SERVICE_REMOVE_ITEM: &str = "remove_item";

/// Service call data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemCall {
    #[serde(default, alias = "list_id")]
    pub list_name: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub list_id: String,
    pub name: String,
    /// Present when the service echoed the created item.
    pub item: Option<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub list_id: String,
    pub item_id: String,
    pub name: String,
}

/// What the host shows the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub success: bool,
    pub message: String,
}

pub async fn add_item(ctx: &InstanceContext, call: &ItemCall) -> Result<Added, AdapterError> {
    let name = require_item(call.item.as_deref())?;
    let list_id = ctx.resolve_list_id(call.list_name.as_deref())?;

    let item = ctx.client().add_item(&list_id, &name).await.inspect_err(|err| {
        tracing::error!(entry = ctx.entry_id(), "Failed to add item '{name}': {err}");
    })?;
    tracing::info!(entry = ctx.entry_id(), "Added item '{name}' to list '{list_id}'");

    ctx.coordinator().request_refresh().await;
    Ok(Added { list_id, name, item })
}

/// Removes the first item on the list whose name matches, ignoring case.
pub async fn remove_item(ctx: &InstanceContext, call: &ItemCall) -> Result<Removed, AdapterError> {
    let name = require_item(call.item.as_deref())?;
    let list_id = ctx.resolve_list_id(call.list_name.as_deref())?;

    let snapshot = ctx.coordinator().snapshot();
    let item_id = snapshot
        .find_items(&list_id, &name)
        .first()
        .map(|item| item.id.clone())
        .ok_or_else(|| AdapterError::UnknownItem {
            list: list_id.clone(),
            item: name.clone(),
        })?;

    ctx.client().remove_item(&item_id).await.inspect_err(|err| {
        tracing::error!(entry = ctx.entry_id(), "Failed to remove item '{name}': {err}");
    })?;
    tracing::info!(entry = ctx.entry_id(), "Removed item '{name}' from list '{list_id}'");

    ctx.coordinator().request_refresh().await;
    Ok(Removed {
        list_id,
        item_id,
        name,
    })
}

/// Dispatch a raw host service call. Never fails: every error becomes a
/// response with `success == false`. `fallback` is the reply language when
/// no entry is configured.
pub async fn handle_call(
    ctx: Option<&InstanceContext>,
    fallback: Language,
    service: &str,
    data: serde_json::Value,
) -> ServiceResponse {
    let lang = ctx.map_or(fallback, InstanceContext::language);
    let action = match service {
        SERVICE_REMOVE_ITEM => Action::Remove,
        _ => Action::Add,
    };

    let call: ItemCall = match serde_json::from_value(data) {
        Ok(call) => call,
        Err(e) => return reject(lang, action, AdapterError::InvalidCall(e.to_string()), ""),
    };
    let item = call.item.clone().unwrap_or_default();
    if let Err(err) = require_item(call.item.as_deref()) {
        return reject(lang, action, err, &item);
    }
    let Some(ctx) = ctx else {
        return reject(lang, action, AdapterError::NotConfigured, &item);
    };

    match service {
        SERVICE_ADD_ITEM => match add_item(ctx, &call).await {
            Ok(added) => accept(messages::added(lang, &added.name)),
            Err(err) => reject(lang, action, err, &item),
        },
        SERVICE_REMOVE_ITEM => match remove_item(ctx, &call).await {
            Ok(removed) => accept(messages::removed(lang, &removed.name)),
            Err(err) => reject(lang, action, err, &item),
        },
        other => reject(
            lang,
            action,
            AdapterError::InvalidCall(format!("unknown service '{other}'")),
            &item,
        ),
    }
}

fn accept(message: String) -> ServiceResponse {
    ServiceResponse {
        success: true,
        message,
    }
}

fn reject(lang: Language, action: Action, err: AdapterError, item: &str) -> ServiceResponse {
    tracing::error!("Koplista service call failed: {err}");
    ServiceResponse {
        success: false,
        message: messages::failure(lang, action, &err, item),
    }
}
