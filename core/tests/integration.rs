//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on an ephemeral port and drives
//! `ApiClient` over real HTTP, so request building, the reqwest transport and
//! response parsing are checked together.

use std::time::Duration;

use koplista_core::{ApiClient, ApiError, ConnectionConfig, Reachability};
use mock_server::{MockState, SharedState};

const KEY: &str = "secret";

async fn start(state: SharedState) -> ApiClient {
    let addr = mock_server::spawn(state).await.unwrap();
    let config = ConnectionConfig::new(&format!("http://{addr}/"), KEY).unwrap();
    ApiClient::new(config).unwrap()
}

fn seeded() -> SharedState {
    MockState::new(KEY)
        .with_list("L1", "Groceries")
        .with_item("L1", "i1", "Milk", false)
        .shared()
}

#[tokio::test]
async fn item_lifecycle() {
    let state = seeded();
    let client = start(state.clone()).await;

    let lists = client.list_lists().await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].name, "Groceries");

    let created = client.add_item("L1", "Bread").await.unwrap().unwrap();
    assert_eq!(created.name, "Bread");
    assert!(!created.bought);

    client.mark_bought(&created.id, true).await.unwrap();
    let items = client.list_items("L1").await.unwrap();
    let bread = items.iter().find(|i| i.id == created.id).unwrap();
    assert!(bread.bought);

    client.remove_item(&created.id).await.unwrap();
    let items = client.list_items("L1").await.unwrap();
    assert_eq!(items.len(), 1);

    let err = client.remove_item(&created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn every_request_is_authenticated() {
    let state = MockState::new("right-key").with_list("L1", "Groceries").shared();
    let addr = mock_server::spawn(state).await.unwrap();
    let config = ConnectionConfig::new(&format!("http://{addr}"), "wrong-key").unwrap();
    let client = ApiClient::new(config).unwrap();

    assert!(matches!(client.list_lists().await, Err(ApiError::Auth)));
    assert!(matches!(client.add_item("L1", "Milk").await, Err(ApiError::Auth)));
    assert!(matches!(client.remove_item("x").await, Err(ApiError::Auth)));
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let state = seeded();
    let client = start(state.clone()).await;
    state.fail_with(502);

    match client.list_items("L1").await.unwrap_err() {
        ApiError::Api { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "forced failure");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn probe_classifies_responses() {
    let state = seeded();
    let client = start(state.clone()).await;
    assert_eq!(client.test_connection().await, Reachability::Reachable);
    // The probe must not create anything.
    assert_eq!(state.items("L1").await.len(), 1);

    state.fail_with(401);
    assert_eq!(client.test_connection().await, Reachability::Unauthorized);
    state.fail_with(404);
    assert_eq!(client.test_connection().await, Reachability::EndpointMissing);
}

#[tokio::test]
async fn refused_connection_is_a_connectivity_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ConnectionConfig::new(&format!("http://{addr}"), KEY).unwrap();
    let client = ApiClient::new(config).unwrap();

    let err = client.list_lists().await.unwrap_err();
    assert!(err.is_connectivity(), "{err:?}");
    assert_eq!(client.test_connection().await, Reachability::Unreachable);
}

#[tokio::test]
async fn slow_server_hits_the_request_timeout() {
    // Accepts connections but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = ConnectionConfig::new(&format!("http://{addr}"), KEY).unwrap();
    let client = ApiClient::with_timeout(config, Duration::from_millis(200)).unwrap();

    let err = client.add_item("L1", "Milk").await.unwrap_err();
    assert!(err.is_connectivity(), "{err:?}");
    assert!(err.to_string().contains("timed out"), "{err}");
}
