//! Voice intent `KoplistaAddItem`.

use std::collections::HashMap;

use crate::context::{require_item, InstanceContext};
use crate::error::AdapterError;
use crate::messages::{self, Action};
use crate::options::Language;

pub const INTENT_ADD_ITEM: &str = "KoplistaAddItem";

/// A matched intent as the host hands it over.
#[derive(Debug, Clone, Default)]
pub struct Intent {
    pub slots: HashMap<String, String>,
    /// Conversation language tag, e.g. `sv-SE`.
    pub language: Option<String>,
}

impl Intent {
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentResponse {
    pub language: Language,
    pub success: bool,
    pub speech: String,
}

/// Handle `KoplistaAddItem`. Slots: `item` (required), `list_id`.
///
/// The reply language comes from the intent's tag, then the entry, then
/// `fallback`. Blank tags count as missing.
pub async fn handle_add_item(
    ctx: Option<&InstanceContext>,
    fallback: Language,
    intent: &Intent,
) -> IntentResponse {
    let language = intent
        .language
        .as_deref()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(Language::from_tag)
        .or_else(|| ctx.map(InstanceContext::language))
        .unwrap_or(fallback);
    let item = intent.slot("item").unwrap_or_default().trim().to_string();

    match add(ctx, intent).await {
        Ok(name) => {
            tracing::info!("Added item '{name}' via intent");
            IntentResponse {
                language,
                success: true,
                speech: messages::added(language, &name),
            }
        }
        Err(err) => {
            if !err.is_input_error() {
                tracing::error!("Error adding item via intent: {err}");
            }
            IntentResponse {
                language,
                success: false,
                speech: messages::failure(language, Action::Add, &err, &item),
            }
        }
    }
}

async fn add(ctx: Option<&InstanceContext>, intent: &Intent) -> Result<String, AdapterError> {
    let name = require_item(intent.slot("item"))?;
    let ctx = ctx.ok_or(AdapterError::NotConfigured)?;
    let list_id = ctx.resolve_list_id(intent.slot("list_id"))?;

    ctx.client().add_item(&list_id, &name).await?;
    ctx.coordinator().request_refresh().await;
    Ok(name)
}
