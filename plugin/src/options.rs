//! Entry data and plugin options.
//!
//! `EntryData` is what the host stores for one configured entry. Options
//! carry the fixed intervals and the response language; they default to the
//! values the integration has always shipped with.

use std::time::Duration;

use koplista_core::{ConfigError, ConnectionConfig, DEFAULT_REQUEST_TIMEOUT};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Stored config entry: `{"url": "...", "api_key": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryData {
    pub url: String,
    pub api_key: String,
}

impl EntryData {
    pub fn connection(&self) -> Result<ConnectionConfig, ConfigError> {
        ConnectionConfig::new(&self.url, &self.api_key)
    }
}

/// Language for user-facing replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "sv")]
    Swedish,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Any tag starting with `sv` is Swedish; everything else is English.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("sv") {
            Language::Swedish
        } else {
            Language::English
        }
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Language::from_tag(&tag))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    pub scan_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub language: Language,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            scan_interval_secs: DEFAULT_SCAN_INTERVAL.as_secs(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            language: Language::default(),
        }
    }
}

impl PluginOptions {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
