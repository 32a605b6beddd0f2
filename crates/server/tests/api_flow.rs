use std::path::PathBuf;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::auth::CredentialHasher;
use tower::ServiceExt;
use uuid::Uuid;

use server::routes;
use server::startup::build_cors;
use server::state::AppState;

struct TestApp {
    router: Router,
    data_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn build_app() -> anyhow::Result<TestApp> {
    // Use isolated temp files per test
    let data_dir = std::env::temp_dir().join(format!("server_api_{}", Uuid::new_v4()));
    let stores = service::runtime::open_file_stores(&data_dir).await?;
    let state = AppState::new(stores, CredentialHasher::new(8, 1, 1)?);
    let router = routes::build_router(state, build_cors(configs::DEFAULT_CORS_ORIGIN)?, Duration::from_secs(30));
    Ok(TestApp { router, data_dir })
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn register_login_delete_flow() -> anyhow::Result<()> {
    let app = build_app().await?;

    // Register
    let (status, body) = send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com", "password": "p"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = as_json(&body);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["email"], "a@x.com");
    // hash never leaves the server
    assert!(created.get("password").is_none() && created.get("password_hash").is_none());

    // Duplicate email
    let (status, body) = send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com", "password": "q"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Email already exists");

    // Login
    let (status, body) = send(&app, Method::POST, "/login", Some(json!({"email": "a@x.com", "password": "p"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), created);

    let (status, body) = send(&app, Method::POST, "/login", Some(json!({"email": "a@x.com", "password": "wrong"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, b"Wrong password");

    let (status, body) = send(&app, Method::POST, "/login", Some(json!({"email": "b@x.com", "password": "p"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, b"User not found");

    // Delete, then read back
    let (status, _) = send(&app, Method::DELETE, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
    Ok(())
}

#[tokio::test]
async fn user_list_and_update_rules() -> anyhow::Result<()> {
    let app = build_app().await?;

    // empty listing is reported as 404
    let (status, _) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, a) = send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com", "password": "p"}))).await;
    let (_, b) = send(&app, Method::POST, "/users", Some(json!({"email": "b@x.com", "password": "p"}))).await;
    let (a, b) = (as_json(&a), as_json(&b));

    let (status, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([a, b]));

    // taking another user's email
    let (status, body) = send(&app, Method::PUT, &format!("/users/{}", b["id"]), Some(json!({"email": "a@x.com", "password": "p"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Email already exists");

    let (status, body) = send(&app, Method::PUT, &format!("/users/{}", b["id"]), Some(json!({"email": "c@x.com", "password": "new"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body)["email"], "c@x.com");

    let (status, _) = send(&app, Method::POST, "/login", Some(json!({"email": "c@x.com", "password": "new"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::PUT, "/users/999", Some(json!({"email": "z@x.com", "password": "p"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn calculation_crud() -> anyhow::Result<()> {
    let app = build_app().await?;

    let (status, body) = send(&app, Method::GET, "/calculations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([]));

    let (status, body) = send(&app, Method::POST, "/calculations", Some(json!({"id": 77, "expression": "2*3", "result": 6}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = as_json(&body);
    let id = created["id"].as_i64().unwrap();
    assert_ne!(id, 77);
    assert_eq!(created["expression"], "2*3");

    let (status, body) = send(&app, Method::GET, &format!("/calculations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), created);

    let (status, body) = send(&app, Method::PUT, &format!("/calculations/{id}"), Some(json!({"expression": "2*4", "result": 8}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!({"id": id, "expression": "2*4", "result": 8}));

    let (status, _) = send(&app, Method::PUT, "/calculations/12345", Some(json!({"expression": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/calculations/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/calculations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    // deleting an absent id is still 204
    let (status, _) = send(&app, Method::DELETE, &format!("/calculations/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn cors_allows_only_configured_origin() -> anyhow::Result<()> {
    let app = build_app().await?;

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/users")
        .header(header::ORIGIN, configs::DEFAULT_CORS_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())?;
    let res = app.router.clone().oneshot(preflight).await?;
    assert_eq!(
        res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
        Some(configs::DEFAULT_CORS_ORIGIN.as_bytes())
    );

    let foreign = Request::builder()
        .method(Method::GET)
        .uri("/calculations")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())?;
    let res = app.router.clone().oneshot(foreign).await?;
    // the allowed origin is always the configured one, so browsers reject any other
    let allowed = res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes());
    assert_ne!(allowed, Some("http://evil.example".as_bytes()));
    assert_eq!(allowed, Some(configs::DEFAULT_CORS_ORIGIN.as_bytes()));
    Ok(())
}

#[tokio::test]
async fn slow_request_times_out() -> anyhow::Result<()> {
    let data_dir = std::env::temp_dir().join(format!("server_timeout_{}", Uuid::new_v4()));
    let stores = service::runtime::open_file_stores(&data_dir).await?;
    // full-cost hashing cannot finish within 1ms
    let state = AppState::new(stores, CredentialHasher::default());
    let router = routes::build_router(state, build_cors(configs::DEFAULT_CORS_ORIGIN)?, Duration::from_millis(1));
    let app = TestApp { router, data_dir };

    let (status, _) = send(&app, Method::POST, "/users", Some(json!({"email": "slow@x.com", "password": "p"}))).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    Ok(())
}
