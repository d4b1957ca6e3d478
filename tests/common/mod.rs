#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use vocab_tutor::{AppState, DbPool, config::AppConfig, data::db, routes};

/// A pool over a fresh on-disk database. Keep the `TempDir` alive for the
/// duration of the test.
pub fn test_pool(pool_size: u32) -> (DbPool, AppConfig, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database_url: dir.path().join("tutor.db").to_string_lossy().into_owned(),
        pool_size,
        ..Default::default()
    };
    let pool = db::build_pool(&config).unwrap();
    db::run_migrations(&mut pool.get().unwrap()).unwrap();
    (pool, config, dir)
}

pub fn test_app() -> (Router, TempDir) {
    let (pool, config, dir) = test_pool(2);
    (routes::app(AppState::new(pool, config)), dir)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}
