//! Checklist entity: one per shopping list.
//!
//! Items render from the coordinator's snapshot (bought => completed). Every
//! mutation goes through the API client and is followed by a refresh; the
//! entity never edits the snapshot itself.

use std::ops::BitOr;

use crate::context::{require_item, InstanceContext};
use crate::error::AdapterError;
use crate::messages::{self, Action};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoItemStatus {
    NeedsAction,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    /// `None` for items the host is about to create.
    pub uid: Option<String>,
    pub summary: String,
    pub status: TodoItemStatus,
}

/// Operations a checklist entity supports, as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoListEntityFeature(u8);

impl TodoListEntityFeature {
    pub const CREATE_TODO_ITEM: Self = Self(1);
    pub const DELETE_TODO_ITEM: Self = Self(1 << 1);
    pub const UPDATE_TODO_ITEM: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TodoListEntityFeature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug)]
pub struct TodoListEntity {
    ctx: InstanceContext,
    list_id: String,
    unique_id: String,
}

/// One entity per list in the current snapshot.
pub fn entities_for(ctx: &InstanceContext) -> Vec<TodoListEntity> {
    ctx.coordinator()
        .snapshot()
        .lists()
        .iter()
        .map(|entry| TodoListEntity::new(ctx.clone(), &entry.info.id))
        .collect()
}

impl TodoListEntity {
    pub fn new(ctx: InstanceContext, list_id: &str) -> Self {
        Self {
            ctx,
            list_id: list_id.to_string(),
            unique_id: format!("koplista_{list_id}"),
        }
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> String {
        let snapshot = self.ctx.coordinator().snapshot();
        let list_name = snapshot
            .list(&self.list_id)
            .map_or("Shopping List", |entry| entry.info.name.as_str());
        format!("Koplista {list_name}")
    }

    pub fn supported_features(&self) -> TodoListEntityFeature {
        TodoListEntityFeature::CREATE_TODO_ITEM
            | TodoListEntityFeature::DELETE_TODO_ITEM
            | TodoListEntityFeature::UPDATE_TODO_ITEM
    }

    /// False while the last poll failed.
    pub fn available(&self) -> bool {
        self.ctx.coordinator().last_update_success()
    }

    pub fn todo_items(&self) -> Vec<TodoItem> {
        let snapshot = self.ctx.coordinator().snapshot();
        let Some(entry) = snapshot.list(&self.list_id) else {
            return Vec::new();
        };
        entry
            .items
            .iter()
            .map(|item| TodoItem {
                uid: Some(item.id.clone()),
                summary: item.name.clone(),
                status: if item.bought {
                    TodoItemStatus::Completed
                } else {
                    TodoItemStatus::NeedsAction
                },
            })
            .collect()
    }

    pub async fn create_todo_item(&self, item: &TodoItem) -> Result<(), AdapterError> {
        let name = require_item(Some(&item.summary))?;
        self.ctx.client().add_item(&self.list_id, &name).await?;
        self.ctx.coordinator().request_refresh().await;
        Ok(())
    }

    /// Only the status is pushed to the service; it has no rename endpoint.
    pub async fn update_todo_item(&self, item: &TodoItem) -> Result<(), AdapterError> {
        let uid = item.uid.as_deref().ok_or_else(|| AdapterError::UnknownItem {
            list: self.list_id.clone(),
            item: item.summary.clone(),
        })?;
        let bought = item.status == TodoItemStatus::Completed;
        self.ctx.client().mark_bought(uid, bought).await?;
        self.ctx.coordinator().request_refresh().await;
        Ok(())
    }

    /// One remove per uid, then a single refresh. The first failure stops
    /// the batch; items already removed stay removed.
    pub async fn delete_todo_items(&self, uids: &[String]) -> Result<(), AdapterError> {
        let mut result = Ok(());
        for uid in uids {
            if let Err(err) = self.ctx.client().remove_item(uid).await {
                tracing::error!(list_id = %self.list_id, uid, "Failed to delete item: {err}");
                result = Err(err.into());
                break;
            }
        }
        self.ctx.coordinator().request_refresh().await;
        result
    }

    /// Localized message for a failed entity operation.
    pub fn describe_failure(&self, action: Action, err: &AdapterError, item: &str) -> String {
        messages::failure(self.ctx.language(), action, err, item)
    }
}
