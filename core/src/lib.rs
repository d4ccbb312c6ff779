//! API client for the Koplista shopping-list service.
//!
//! # Overview
//! `KoplistaClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. `Transport` performs the round-trip
//! with a fixed per-request timeout, and `ApiClient` composes the two into
//! the async operations the plugin calls.
//!
//! # Design
//! - Every request carries `X-API-Key` and a JSON content type.
//! - 401, 404 and other error statuses map to distinct `ApiError` variants;
//!   network failures map to `ApiError::Connectivity`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ApiClient;
pub use client::{KoplistaClient, Reachability};
pub use config::{ConnectionConfig, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
pub use types::{AddItem, Item, SetBought, ShoppingList};
