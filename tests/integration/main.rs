//! Integration tests driving the router in-process against the in-memory store

mod api_tests;
mod kiosk_tests;

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use toolcrib_server::{
    api,
    config::{AppConfig, RfidConfig},
    repository::{memory::MemorySheetStore, SheetStore},
    AppState,
};

/// Configuration with a silent simulated reader
pub fn test_config() -> AppConfig {
    AppConfig {
        rfid: RfidConfig {
            read_probability: 0.0,
            ..RfidConfig::default()
        },
        ..AppConfig::default()
    }
}

pub fn app_with_store(store: Arc<dyn SheetStore>) -> Router {
    api::create_router(AppState::new(test_config(), store))
}

/// Router over the demo inventory, plus the store for direct inspection
pub fn seeded_app() -> (Router, Arc<MemorySheetStore>) {
    let store = Arc::new(MemorySheetStore::seeded(&test_config().store));
    (app_with_store(store.clone()), store)
}

/// Router over a single tool `T1` (tag `TAG1`) and a single user `U1`
pub fn minimal_app() -> (Router, Arc<MemorySheetStore>) {
    let config = test_config();
    let row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    let mut sheets = HashMap::new();
    sheets.insert(
        config.store.tools_sheet.clone(),
        vec![row(&["T1", "Martelo", "TAG1", "disponível", "Manual", "Armário A"])],
    );
    sheets.insert(
        config.store.users_sheet.clone(),
        vec![row(&["U1", "Ana Souza", "Mecânica", "BADGE-U1", "user"])],
    );
    let store = Arc::new(MemorySheetStore::with_sheets(sheets));
    (app_with_store(store.clone()), store)
}

/// Send one request and decode the JSON body (`Null` when empty)
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(json) => send_text(app, method, uri, &json.to_string()).await,
        None => dispatch(app, Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()).await,
    }
}

/// Send a body as-is, labelled as JSON
pub async fn send_text(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}
