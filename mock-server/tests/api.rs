use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Item, MockState, SharedState, ShoppingList};
use tower::ServiceExt;

const KEY: &str = "test-key";

fn state() -> SharedState {
    MockState::new(KEY)
        .with_list("L1", "Groceries")
        .with_list("L2", "Hardware")
        .with_item("L1", "i1", "Milk", false)
        .with_item("L1", "i2", "Bread", true)
        .shared()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", KEY)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", KEY)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_key_returns_401() {
    let resp = app(state())
        .oneshot(
            Request::builder()
                .uri("/api/external/lists")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app(state())
        .oneshot(
            Request::builder()
                .uri("/api/external/lists")
                .header("X-API-Key", "other")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- lists ---

#[tokio::test]
async fn lists_keep_insertion_order() {
    let resp = app(state()).oneshot(request("GET", "/api/external/lists")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let lists: Vec<ShoppingList> = body_json(resp).await;
    let ids: Vec<_> = lists.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["L1", "L2"]);
}

#[tokio::test]
async fn items_for_unknown_list_returns_404() {
    let resp = app(state())
        .oneshot(request("GET", "/api/external/lists/nope/items"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- add ---

#[tokio::test]
async fn add_item_returns_201() {
    let resp = app(state())
        .oneshot(json_request(
            "POST",
            "/api/external/add-item",
            r#"{"listId":"L2","itemName":"Screws"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Item = body_json(resp).await;
    assert_eq!(item.name, "Screws");
    assert!(!item.bought);
}

#[tokio::test]
async fn empty_add_item_body_returns_400() {
    let resp = app(state())
        .oneshot(json_request("POST", "/api/external/add-item", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_item_to_unknown_list_returns_404() {
    let resp = app(state())
        .oneshot(json_request(
            "POST",
            "/api/external/add-item",
            r#"{"listId":"nope","itemName":"Milk"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- forced failures ---

#[tokio::test]
async fn forced_status_overrides_every_route() {
    let state = state();
    state.fail_with(503);
    let resp = app(state.clone())
        .oneshot(request("GET", "/api/external/lists"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body_bytes(resp).await[..], b"forced failure");

    state.recover();
    let resp = app(state).oneshot(request("GET", "/api/external/lists")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full lifecycle ---

#[tokio::test]
async fn item_lifecycle() {
    use tower::Service;

    let state = state();
    let mut app = app(state.clone()).into_service();

    // add
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/external/add-item",
            r#"{"listId":"L1","itemName":"Eggs"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Item = body_json(resp).await;
    let id = created.id;

    // list items: seeded two plus the new one, in order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/api/external/lists/L1/items"))
        .await
        .unwrap();
    let items: Vec<Item> = body_json(resp).await;
    let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Milk", "Bread", "Eggs"]);

    // mark bought
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/external/items/{id}/bought"),
            r#"{"bought":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(state.items("L1").await.iter().any(|i| i.id == id && i.bought));

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/api/external/items/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // delete again: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/api/external/items/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // mark bought after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/external/items/{id}/bought"),
            r#"{"bought":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(state.count_method("DELETE"), 2);
    assert_eq!(state.count("GET", "/api/external/lists/L1/items"), 1);
}
