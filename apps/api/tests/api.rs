//! End-to-end tests: the full router over an in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shopagg_api::{build_router, AppState};
use shopagg_core::BULK_PRODUCT_FRUIT;
use shopagg_db::{Database, DbConfig};
use tower::ServiceExt; // for `oneshot`

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Registers `login` and returns a session token.
async fn sign_up(app: &Router, login: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/create-user",
        None,
        Some(json!({
            "login": login,
            "email": format!("{login}@example.com"),
            "password": "secret"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "login": login, "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn paris_shop(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/store/create-store",
        Some(token),
        Some(json!({
            "company_name": "Acme",
            "store_type": "shop",
            "store_name": "Acme Paris",
            "address": "1 rue A",
            "zip_code": "75001",
            "city": "Paris",
            "country": "FR",
            "url": "ignored"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["url"], "");
    body["data"]["store_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn public_routes_answer_without_token() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/init", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "app initialisation");
    assert_eq!(body["data"]["bulk_products"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/bill/get-all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "unauthorized" }));

    let (status, _) = send(&app, Method::GET, "/bill/get-all", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_flow() {
    let app = app().await;
    let token = sign_up(&app, "alice").await;
    assert_eq!(token.len(), 128);

    let (status, body) = send(&app, Method::GET, "/user/get", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["login"], "alice");
    assert!(body["data"].get("password_hash").is_none());

    // Bearer prefix is accepted too.
    let bearer = format!("Bearer {token}");
    let (status, _) = send(&app, Method::GET, "/user/get", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "login": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid password");

    let (status, _) = send(&app, Method::POST, "/user/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/user/get", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app().await;
    sign_up(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/create-user",
        None,
        Some(json!({ "login": "other", "email": "alice@example.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user exist for email alice@example.com");
}

#[tokio::test]
async fn get_last_bill_is_no_content_without_open_bill() {
    let app = app().await;
    let token = sign_up(&app, "alice").await;

    let (status, body) = send(&app, Method::GET, "/bill/get-last", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn bill_lifecycle() {
    let app = app().await;
    let token = sign_up(&app, "alice").await;
    let store_id = paris_shop(&app, &token).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/bill/start",
        Some(&token),
        Some(json!({ "store_id": store_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "bill started");
    assert_eq!(body["data"]["state"], "create");
    assert_eq!(body["data"]["store"]["company_name"], "Acme");
    let bill_id = body["data"]["bill_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/user-product/create-user-product",
        Some(&token),
        Some(json!({
            "product_id": BULK_PRODUCT_FRUIT,
            "bill_id": bill_id,
            "price": "3.20",
            "quantity": 1,
            "product_type": "bulk_product",
            "product_size": "1",
            "size_format": "kg"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["product_name"], "Fruit");
    let item_id = body["data"]["user_product_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user-product/quantity",
        Some(&token),
        Some(json!({
            "bill_id": bill_id,
            "user_product_id": item_id,
            "product_type": "bulk_product",
            "product_size": "1",
            "size_format": "kg",
            "quantity": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 5);

    let (status, body) = send(&app, Method::GET, "/bill/get-last", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bill_id"], bill_id.as_str());
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        "/bill/stop",
        Some(&token),
        Some(json!({ "bill_id": bill_id, "amount": "42.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/bill/get-last", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/bill/get-all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let bills = body["data"].as_array().unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0]["state"], "complete");
    assert_eq!(bills[0]["amount"], "42.50");

    // Closing again: no bill is open any more.
    let (status, body) = send(
        &app,
        Method::POST,
        "/bill/stop",
        Some(&token),
        Some(json!({ "bill_id": bill_id, "amount": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bill error");
}

#[tokio::test]
async fn bill_closes_with_weighed_total() {
    let app = app().await;
    let token = sign_up(&app, "alice").await;
    let store_id = paris_shop(&app, &token).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/bill/start",
        Some(&token),
        Some(json!({ "store_id": store_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let bill_id = body["data"]["bill_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/bill/stop",
        Some(&token),
        Some(json!({ "bill_id": bill_id, "amount": "1.995" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = send(&app, Method::GET, "/bill/get-last", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/bill/get-all", Some(&token), None).await;
    assert_eq!(body["data"][0]["state"], "complete");
    assert_eq!(body["data"][0]["amount"], "1.995");
}

#[tokio::test]
async fn malformed_input_is_a_bad_request() {
    let app = app().await;
    let token = sign_up(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/bill/start",
        Some(&token),
        Some(json!({ "store_id": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("store_id"));

    let (status, _) = send(&app, Method::POST, "/bill/start", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/store/get/market/750", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_lookup_by_ean() {
    let app = app().await;
    let token = sign_up(&app, "alice").await;

    let (status, _) = send(&app, Method::GET, "/product/get/000", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Method::POST,
        "/product/create-product",
        Some(&token),
        Some(json!({ "ean": "111", "product_name": "A", "brand_name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let first = body["data"].clone();

    let (_, body) = send(
        &app,
        Method::POST,
        "/product/create-product",
        Some(&token),
        Some(json!({ "ean": "111", "product_name": "B", "brand_name": "Y" })),
    )
    .await;
    assert_eq!(body["data"], first);

    let (status, body) = send(&app, Method::GET, "/product/get/111", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product_name"], "A");

    let (status, body) = send(&app, Method::GET, "/brand/get/X", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn store_search() {
    let app = app().await;
    let token = sign_up(&app, "alice").await;
    let store_id = paris_shop(&app, &token).await;

    let (status, body) = send(&app, Method::GET, "/store/get/shop/750", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let stores = body["data"].as_array().unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0]["store_id"], store_id.as_str());

    let (_, body) = send(&app, Method::GET, "/company/get/Ac", Some(&token), None).await;
    assert_eq!(body["data"][0]["company_name"], "Acme");
}
