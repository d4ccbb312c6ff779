//! Wire DTOs for the Koplista external API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently so
//! integration tests catch drift. Identifiers are kept as strings; the
//! service has been seen to send numeric ids, so both forms are accepted.

use serde::{Deserialize, Serialize};

/// A shopping list as returned by the lists endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingList {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub name: String,
}

/// A line entry on a shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    #[serde(deserialize_with = "string_or_number::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bought: bool,
}

/// Request payload for the add-item endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItem {
    pub list_id: String,
    pub item_name: String,
}

/// Request payload for the item-bought endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetBought {
    pub bought: bool,
}

/// Accepts `"42"` and `42` alike and yields `"42"`.
mod string_or_number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Int(n) => n.to_string(),
            Raw::Uint(n) => n.to_string(),
        })
    }
}
