//! API integration tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use serde_json::json;

use toolcrib_server::{
    error::{AppError, AppResult},
    repository::{SheetRange, SheetStore},
};

use crate::{app_with_store, get, minimal_app, post, seeded_app, send_text};

/// Store whose backend is unreachable
struct OfflineStore;

#[async_trait]
impl SheetStore for OfflineStore {
    async fn read_rows(&self, _range: &SheetRange) -> AppResult<Vec<Vec<String>>> {
        Err(AppError::Store("connection refused".into()))
    }

    async fn append_row(&self, _range: &SheetRange, _row: Vec<String>) -> AppResult<()> {
        Err(AppError::Store("connection refused".into()))
    }

    async fn update_row(&self, _range: &SheetRange, _index: usize, _row: Vec<String>) -> AppResult<()> {
        Err(AppError::Store("connection refused".into()))
    }
}

async fn transaction_rows(store: &dyn SheetStore) -> Vec<Vec<String>> {
    store
        .read_rows(&SheetRange::new("Transações", 8))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = seeded_app();

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/api/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_ready_reports_unreachable_store() {
    let app = app_with_store(Arc::new(OfflineStore));
    let (status, body) = get(&app, "/api/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn test_list_tools_and_users() {
    let (app, _) = seeded_app();

    let (status, body) = get(&app, "/api/sheets?action=tools").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"][0]["rfidUid"], "A1B2C3D4E5F6");
    assert_eq!(body["data"][3]["status"], "manutenção");

    let (status, body) = get(&app, "/api/sheets?action=users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
    assert_eq!(body["data"][2]["accessLevel"], "supervisor");
}

#[tokio::test]
async fn test_lookup_by_tag() {
    let (app, _) = seeded_app();

    let (status, body) = get(&app, "/api/sheets?action=user-by-rfid&rfid=USER-002").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Marina Costa");

    let (status, body) = get(&app, "/api/sheets?action=tool-by-rfid&rfid=NOPE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());

    // Legacy path
    let (status, body) = get(&app, "/api/google-sheets?action=tool-by-rfid&rfid=B2C3D4E5F6A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "TOOL-002");
}

#[tokio::test]
async fn test_missing_or_unknown_action() {
    let (app, _) = seeded_app();

    let (status, body) = get(&app, "/api/sheets").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, body) = get(&app, "/api/sheets?action=everything").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = get(&app, "/api/sheets?action=tool-by-rfid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collect_records_and_borrows() {
    let (app, store) = minimal_app();

    let (status, body) = post(
        &app,
        "/api/sheets",
        json!({"action": "coleta", "toolId": "T1", "userId": "U1", "userName": "Ana Souza", "rfidUid": "TAG1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());
    assert_eq!(body["data"]["action"], "coleta");
    assert!(body["data"]["id"].as_str().unwrap().starts_with("TXN-"));
    // Tool name defaults when the client leaves it out
    assert_eq!(body["data"]["toolName"], "Ferramenta");

    let rows = transaction_rows(store.as_ref()).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][3], "T1");
    assert_eq!(rows[0][5], "coleta");
    assert_eq!(rows[0][7], "TAG1");

    let (_, body) = get(&app, "/api/sheets?action=tool-by-rfid&rfid=TAG1").await;
    assert_eq!(body["data"]["status"], "emprestada");
    assert_eq!(body["data"]["borrowedBy"], "Ana Souza");
    assert!(body["data"]["borrowedDate"].is_string());

    let (_, body) = get(&app, "/api/sheets?action=user-tools&userId=U1").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = post(
        &app,
        "/api/sheets",
        json!({"action": "devolução", "toolId": "T1", "userId": "U1", "rfidUid": "TAG1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/api/sheets?action=tool-by-rfid&rfid=TAG1").await;
    assert_eq!(body["data"]["status"], "disponível");
    assert!(body["data"]["borrowedBy"].is_null());
    assert_eq!(transaction_rows(store.as_ref()).await.len(), 2);
}

#[tokio::test]
async fn test_incomplete_transaction_is_rejected() {
    let (app, store) = minimal_app();

    let (status, body) = post(&app, "/api/sheets", json!({"action": "coleta", "toolId": "T1"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 2);
    assert!(body["error"].as_str().unwrap().contains("Incomplete data"));

    let (status, _) = post(
        &app,
        "/api/sheets",
        json!({"action": "reporte_dano", "toolId": "T1", "userId": "U1", "rfidUid": "TAG1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(transaction_rows(store.as_ref()).await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let (app, store) = minimal_app();

    let (status, body) = send_text(&app, Method::POST, "/api/sheets", "{\"action\": \"coleta\",").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 2);
    assert!(body["error"].is_string());

    let (status, body) = send_text(&app, Method::POST, "/api/tools/collect", "[]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = send_text(&app, Method::POST, "/api/arduino/rfid", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    assert!(transaction_rows(store.as_ref()).await.is_empty());
}

#[tokio::test]
async fn test_damage_report_marks_tool_damaged() {
    let (app, _) = minimal_app();

    let (status, body) = post(
        &app,
        "/api/sheets",
        json!({
            "action": "reporte_dano",
            "toolId": "T1",
            "userId": "U1",
            "rfidUid": "TAG1",
            "damageDescription": "Cabo rachado",
            "damageType": "quebrada",
            "urgency": "alta"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["action"], "reporte_dano");

    let (_, body) = get(&app, "/api/sheets?action=tool-by-rfid&rfid=TAG1").await;
    assert_eq!(body["data"]["status"], "danificada");
}

#[tokio::test]
async fn test_unknown_tool_keeps_log_row() {
    let (app, store) = minimal_app();

    let (status, body) = post(
        &app,
        "/api/sheets",
        json!({"action": "coleta", "toolId": "T404", "userId": "U1", "rfidUid": "TAG404"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(transaction_rows(store.as_ref()).await.len(), 1);
}

#[tokio::test]
async fn test_store_failure_is_hidden() {
    let app = app_with_store(Arc::new(OfflineStore));

    let (status, body) = get(&app, "/api/sheets?action=tools").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().contains("connection refused"));

    let (status, _) = post(
        &app,
        "/api/sheets",
        json!({"action": "coleta", "toolId": "T1", "userId": "U1", "rfidUid": "TAG1"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_rfid_reader() {
    let (app, _) = seeded_app();

    let (status, body) = get(&app, "/api/arduino/rfid").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], "");

    let (status, body) = post(&app, "/api/arduino/rfid", json!({"command": "scan", "uid": "C3D4E5F6A1B2"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = get(&app, "/api/arduino/rfid").await;
    assert_eq!(body["uid"], "C3D4E5F6A1B2");
    assert!(body["timestamp"].is_string());

    // A tool tag comes back with the tool it belongs to
    post(&app, "/api/arduino/rfid", json!({"command": "scan", "uid": "A1B2C3D4E5F6"})).await;
    let (_, body) = get(&app, "/api/arduino/rfid").await;
    assert_eq!(body["uid"], "A1B2C3D4E5F6");
    assert_eq!(body["toolId"], "TOOL-001");
    assert_eq!(body["toolName"], "Martelo de Borracha");
    assert_eq!(body["status"], "disponível");

    // A badge does not
    post(&app, "/api/arduino/rfid", json!({"command": "scan", "uid": "USER-001"})).await;
    let (_, body) = get(&app, "/api/arduino/rfid").await;
    assert_eq!(body["uid"], "USER-001");
    assert!(body.get("toolId").is_none());

    let (status, body) = post(&app, "/api/arduino/rfid", json!({"command": "enable"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Command sent to reader");

    let (status, body) = post(&app, "/api/arduino/rfid", json!({"command": "selfdestruct"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_collect_shortcut() {
    let (app, _) = seeded_app();
    let request = json!({"toolId": "TOOL-001", "userId": "USER-001", "rfidUid": "A1B2C3D4E5F6"});

    let (status, body) = post(&app, "/api/tools/collect", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userName"], "Carlos Pereira");
    assert_eq!(body["data"]["toolName"], "Martelo de Borracha");

    let (status, body) = post(&app, "/api/tools/collect", request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5);

    let (status, _) = post(
        &app,
        "/api/tools/collect",
        json!({"toolId": "TOOL-404", "userId": "USER-001", "rfidUid": "X"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/tools/collect").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = seeded_app();
    let (status, body) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/sheets"].is_object());
}
