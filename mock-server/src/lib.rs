//! In-memory stand-in for the Koplista external API.
//!
//! Serves the same routes as the real service, checks `X-API-Key` on every
//! request, and records each request so tests can count calls. A forced
//! status can be set to simulate an outage.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub bought: bool,
}

/// Both fields are optional so an empty probe body gets a 400 from the
/// handler rather than an extractor rejection.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemInput {
    #[serde(default)]
    pub list_id: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
}

#[derive(Deserialize)]
pub struct SetBought {
    pub bought: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
}

#[derive(Default)]
struct Store {
    lists: Vec<ShoppingList>,
    items: HashMap<String, Vec<Item>>,
}

pub struct MockState {
    api_key: String,
    store: RwLock<Store>,
    requests: Mutex<Vec<RecordedRequest>>,
    // 0 means "serve normally".
    forced_status: AtomicU16,
    failing_paths: Mutex<HashMap<String, u16>>,
}

pub type SharedState = Arc<MockState>;

impl MockState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            store: RwLock::new(Store::default()),
            requests: Mutex::new(Vec::new()),
            forced_status: AtomicU16::new(0),
            failing_paths: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_list(mut self, id: &str, name: &str) -> Self {
        let store = self.store.get_mut();
        store.lists.push(ShoppingList {
            id: id.to_string(),
            name: name.to_string(),
        });
        store.items.entry(id.to_string()).or_default();
        self
    }

    /// Items for an unknown list are dropped.
    pub fn with_item(mut self, list_id: &str, id: &str, name: &str, bought: bool) -> Self {
        if let Some(items) = self.store.get_mut().items.get_mut(list_id) {
            items.push(Item {
                id: id.to_string(),
                name: name.to_string(),
                bought,
            });
        }
        self
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Answer every request with `status` until `recover` is called.
    pub fn fail_with(&self, status: u16) {
        self.forced_status.store(status, Ordering::SeqCst);
    }

    /// Answer requests for exactly `path` with `status`, any method.
    pub fn fail_path(&self, path: &str, status: u16) {
        self.failing_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), status);
    }

    /// Clear `fail_with` and every `fail_path`.
    pub fn recover(&self) {
        self.forced_status.store(0, Ordering::SeqCst);
        self.failing_paths.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn forced_status_for(&self, path: &str) -> Option<u16> {
        let by_path = self
            .failing_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied();
        by_path.or(match self.forced_status.load(Ordering::SeqCst) {
            0 => None,
            status => Some(status),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of recorded requests with exactly this method and path.
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn count_method(&self, method: &str) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    pub async fn items(&self, list_id: &str) -> Vec<Item> {
        self.store.read().await.items.get(list_id).cloned().unwrap_or_default()
    }

    fn record(&self, method: &str, path: &str) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                method: method.to_string(),
                path: path.to_string(),
            });
    }
}

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/api/external/lists", get(list_lists))
        .route("/api/external/lists/{list_id}/items", get(list_items))
        .route("/api/external/add-item", post(add_item))
        .route("/api/external/items/{item_id}", delete(remove_item))
        .route("/api/external/items/{item_id}/bought", put(set_bought))
        .layer(middleware::from_fn_with_state(state.clone(), guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Serve `state` on an ephemeral localhost port in the background.
pub async fn spawn(state: SharedState) -> Result<SocketAddr, std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = run(listener, state).await {
            tracing::error!("mock server stopped: {e}");
        }
    });
    Ok(addr)
}

async fn guard(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    state.record(req.method().as_str(), req.uri().path());

    if let Some(forced) = state.forced_status_for(req.uri().path()) {
        let status = StatusCode::from_u16(forced).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "forced failure").into_response();
    }

    let authorized = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == state.api_key);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "invalid API key").into_response();
    }

    next.run(req).await
}

async fn list_lists(State(state): State<SharedState>) -> Json<Vec<ShoppingList>> {
    Json(state.store.read().await.lists.clone())
}

async fn list_items(
    State(state): State<SharedState>,
    Path(list_id): Path<String>,
) -> Result<Json<Vec<Item>>, StatusCode> {
    let store = state.store.read().await;
    store.items.get(&list_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn add_item(
    State(state): State<SharedState>,
    Json(input): Json<AddItemInput>,
) -> Result<(StatusCode, Json<Item>), (StatusCode, &'static str)> {
    let (Some(list_id), Some(item_name)) = (input.list_id, input.item_name) else {
        return Err((StatusCode::BAD_REQUEST, "listId and itemName are required"));
    };
    if item_name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "itemName must not be empty"));
    }

    let mut store = state.store.write().await;
    let items = store
        .items
        .get_mut(&list_id)
        .ok_or((StatusCode::NOT_FOUND, "list not found"))?;
    let item = Item {
        id: Uuid::new_v4().to_string(),
        name: item_name,
        bought: false,
    };
    items.push(item.clone());
    Ok((StatusCode::CREATED, Json(item)))
}

async fn remove_item(State(state): State<SharedState>, Path(item_id): Path<String>) -> StatusCode {
    let mut store = state.store.write().await;
    for items in store.items.values_mut() {
        if let Some(pos) = items.iter().position(|i| i.id == item_id) {
            items.remove(pos);
            return StatusCode::NO_CONTENT;
        }
    }
    StatusCode::NOT_FOUND
}

async fn set_bought(
    State(state): State<SharedState>,
    Path(item_id): Path<String>,
    Json(input): Json<SetBought>,
) -> StatusCode {
    let mut store = state.store.write().await;
    let item = store
        .items
        .values_mut()
        .flat_map(|items| items.iter_mut())
        .find(|i| i.id == item_id);
    match item {
        Some(item) => {
            item.bought = input.bought;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
