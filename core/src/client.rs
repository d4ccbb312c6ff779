//! Stateless HTTP request builder and response parser for the Koplista API.
//!
//! # Design
//! `KoplistaClient` holds only the validated connection config. Each operation
//! is split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. `ApiClient` wires the
//! two halves to a real transport; tests drive them directly.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ConnectionConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, API_KEY_HEADER, JSON_CONTENT_TYPE};
use crate::types::{AddItem, Item, SetBought, ShoppingList};

pub const LISTS_PATH: &str = "/api/external/lists";
pub const ADD_ITEM_PATH: &str = "/api/external/add-item";
pub const ITEMS_PATH: &str = "/api/external/items";

/// Outcome of the setup-time connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// The service answered with anything but 401/404.
    Reachable,
    /// The service answered 401.
    Unauthorized,
    /// The service answered 404: wrong base URL or an older deployment.
    EndpointMissing,
    /// Timeout or connection failure.
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        self == Reachability::Reachable
    }
}

/// Sans-IO client for the Koplista external API.
#[derive(Debug, Clone)]
pub struct KoplistaClient {
    config: ConnectionConfig,
}

impl KoplistaClient {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn build_list_lists(&self) -> HttpRequest {
        self.request(HttpMethod::Get, LISTS_PATH.to_string(), None)
    }

    pub fn build_list_items(&self, list_id: &str) -> HttpRequest {
        let path = format!("{LISTS_PATH}/{}/items", urlencoding::encode(list_id));
        self.request(HttpMethod::Get, path, None)
    }

    pub fn build_add_item(&self, input: &AddItem) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, ADD_ITEM_PATH.to_string(), Some(body)))
    }

    pub fn build_remove_item(&self, item_id: &str) -> HttpRequest {
        let path = format!("{ITEMS_PATH}/{}", urlencoding::encode(item_id));
        self.request(HttpMethod::Delete, path, None)
    }

    pub fn build_mark_bought(&self, item_id: &str, bought: bool) -> Result<HttpRequest, ApiError> {
        let body = to_json(&SetBought { bought })?;
        let path = format!("{ITEMS_PATH}/{}/bought", urlencoding::encode(item_id));
        Ok(self.request(HttpMethod::Put, path, Some(body)))
    }

    /// An add-item request with an empty payload. The service rejects it as
    /// invalid, which is enough to prove it is reachable and the key works.
    pub fn build_probe(&self) -> HttpRequest {
        self.request(HttpMethod::Post, ADD_ITEM_PATH.to_string(), Some("{}".to_string()))
    }

    pub fn parse_list_lists(&self, response: HttpResponse) -> Result<Vec<ShoppingList>, ApiError> {
        Ok(parse_payload(response)?.unwrap_or_default())
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        Ok(parse_payload(response)?.unwrap_or_default())
    }

    /// `None` when the service answers 204 instead of echoing the item.
    pub fn parse_add_item(&self, response: HttpResponse) -> Result<Option<Item>, ApiError> {
        parse_payload(response)
    }

    pub fn parse_remove_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_mark_bought(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn classify_probe(&self, response: &HttpResponse) -> Reachability {
        match response.status {
            401 => Reachability::Unauthorized,
            404 => Reachability::EndpointMissing,
            _ => Reachability::Reachable,
        }
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.config.base_url()),
            headers: vec![
                (API_KEY_HEADER.to_string(), self.config.api_key().to_string()),
                ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ],
            body,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Map error statuses to the matching `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        401 => Err(ApiError::Auth),
        404 => Err(ApiError::NotFound),
        status if status >= 400 => Err(ApiError::Api {
            status,
            body: response.body.clone(),
        }),
        _ => Ok(()),
    }
}

fn parse_payload<T: DeserializeOwned>(response: HttpResponse) -> Result<Option<T>, ApiError> {
    check_status(&response)?;
    if response.status == 204 {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> KoplistaClient {
        KoplistaClient::new(ConnectionConfig::new("http://localhost:3000", "key-123").unwrap())
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(status, body)
    }

    #[test]
    fn every_request_carries_key_and_content_type() {
        let c = client();
        let requests = vec![
            c.build_list_lists(),
            c.build_list_items("L1"),
            c.build_add_item(&AddItem {
                list_id: "L1".to_string(),
                item_name: "Milk".to_string(),
            })
            .unwrap(),
            c.build_remove_item("i1"),
            c.build_mark_bought("i1", true).unwrap(),
            c.build_probe(),
        ];
        for req in requests {
            assert_eq!(req.header("x-api-key"), Some("key-123"), "{}", req.url);
            assert_eq!(req.header("content-type"), Some("application/json"), "{}", req.url);
        }
    }

    #[test]
    fn build_list_items_encodes_list_id() {
        let req = client().build_list_items("my list/2");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/external/lists/my%20list%2F2/items");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_add_item_produces_camel_case_body() {
        let input = AddItem {
            list_id: "default".to_string(),
            item_name: "Mjölk".to_string(),
        };
        let req = client().build_add_item(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/external/add-item");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"listId": "default", "itemName": "Mjölk"}));
    }

    #[test]
    fn build_mark_bought_targets_item() {
        let req = client().build_mark_bought("i-9", false).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/api/external/items/i-9/bought");
        assert_eq!(req.body.as_deref(), Some(r#"{"bought":false}"#));
    }

    #[test]
    fn build_remove_item_has_no_body() {
        let req = client().build_remove_item("i-9");
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/api/external/items/i-9");
        assert!(req.body.is_none());
    }

    #[test]
    fn unauthorized_maps_to_auth_for_every_operation() {
        let c = client();
        assert!(matches!(c.parse_list_lists(response(401, "")), Err(ApiError::Auth)));
        assert!(matches!(c.parse_list_items(response(401, "")), Err(ApiError::Auth)));
        assert!(matches!(c.parse_add_item(response(401, "")), Err(ApiError::Auth)));
        assert!(matches!(c.parse_remove_item(response(401, "")), Err(ApiError::Auth)));
        assert!(matches!(c.parse_mark_bought(response(401, "")), Err(ApiError::Auth)));
    }

    #[test]
    fn missing_resource_maps_to_not_found_for_every_operation() {
        let c = client();
        assert!(matches!(c.parse_list_lists(response(404, "")), Err(ApiError::NotFound)));
        assert!(matches!(c.parse_list_items(response(404, "")), Err(ApiError::NotFound)));
        assert!(matches!(c.parse_add_item(response(404, "")), Err(ApiError::NotFound)));
        assert!(matches!(c.parse_remove_item(response(404, "")), Err(ApiError::NotFound)));
        assert!(matches!(c.parse_mark_bought(response(404, "")), Err(ApiError::NotFound)));
    }

    #[test]
    fn other_error_statuses_carry_status_and_body() {
        for status in [400u16, 403, 409, 422, 429, 500, 502, 503] {
            let err = client().parse_remove_item(response(status, "nope")).unwrap_err();
            match err {
                ApiError::Api { status: s, body } => {
                    assert_eq!(s, status);
                    assert_eq!(body, "nope");
                }
                other => panic!("status {status}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn no_content_yields_none_without_parsing() {
        assert!(client().parse_add_item(response(204, "")).unwrap().is_none());
        assert!(client().parse_list_lists(response(204, "")).unwrap().is_empty());
        assert!(client().parse_remove_item(response(204, "")).is_ok());
    }

    #[test]
    fn parse_add_item_returns_created_item() {
        let item = client()
            .parse_add_item(response(201, r#"{"id":"i1","name":"Milk","bought":false}"#))
            .unwrap()
            .unwrap();
        assert_eq!(item.name, "Milk");
        assert!(!item.bought);
    }

    #[test]
    fn parse_list_lists_bad_json() {
        let err = client().parse_list_lists(response(200, "<html>")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn probe_classification() {
        let c = client();
        assert_eq!(c.classify_probe(&response(400, "")), Reachability::Reachable);
        assert_eq!(c.classify_probe(&response(422, "")), Reachability::Reachable);
        assert_eq!(c.classify_probe(&response(500, "")), Reachability::Reachable);
        assert_eq!(c.classify_probe(&response(200, "")), Reachability::Reachable);
        assert_eq!(c.classify_probe(&response(401, "")), Reachability::Unauthorized);
        assert_eq!(c.classify_probe(&response(404, "")), Reachability::EndpointMissing);
        assert!(!Reachability::Unauthorized.is_reachable());
    }

    #[test]
    fn probe_posts_empty_object() {
        let req = client().build_probe();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/external/add-item");
        assert_eq!(req.body.as_deref(), Some("{}"));
    }
}
