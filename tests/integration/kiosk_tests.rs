//! Kiosk session integration tests

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::{get, post, seeded_app, send, send_text};

async fn open(app: &axum::Router, flow: &str) -> String {
    let (status, body) = post(app, "/api/kiosk/sessions", json!({ "flow": flow })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["step"], "auth");
    body["id"].as_str().unwrap().to_string()
}

async fn event(app: &axum::Router, id: &str, name: &str, body: Option<Value>) -> (StatusCode, Value) {
    send(app, Method::POST, &format!("/api/kiosk/sessions/{}/{}", id, name), body).await
}

#[tokio::test]
async fn test_collect_session_until_exit() {
    let (app, _) = seeded_app();
    let id = open(&app, "collect").await;

    let (status, body) = event(&app, &id, "scan", Some(json!({"uid": "NOBODY"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "auth");
    assert_eq!(body["error"], "User not found");

    let (_, body) = event(&app, &id, "scan", Some(json!({"uid": "USER-001"}))).await;
    assert_eq!(body["step"], "operation-choice");
    assert_eq!(body["user"]["name"], "Carlos Pereira");

    let (status, _) = event(&app, &id, "operation", Some(json!({"operation": {"type": "collect"}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = event(
        &app,
        &id,
        "operation",
        Some(json!({"operation": {"type": "collect"}, "termsAccepted": true})),
    )
    .await;
    assert_eq!(body["step"], "scan");

    let (_, body) = event(&app, &id, "scan", Some(json!({"uid": "B2C3D4E5F6A1"}))).await;
    assert_eq!(body["step"], "confirm");
    assert_eq!(body["tool"]["id"], "TOOL-002");

    let (status, body) = event(&app, &id, "confirm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "complete");
    assert_eq!(body["collected"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/api/sheets?action=tool-by-rfid&rfid=B2C3D4E5F6A1").await;
    assert_eq!(body["data"]["status"], "emprestada");

    let (_, body) = event(&app, &id, "exit", None).await;
    assert_eq!(body["step"], "exit-verification");
    assert_eq!(body["outstanding"][0]["id"], "TOOL-002");
    assert!(body["error"].as_str().unwrap().contains("Chave de Fenda Phillips"));

    let (_, body) = event(&app, &id, "reset", None).await;
    assert_eq!(body["step"], "auth");
    assert!(body["user"].is_null());
}

#[tokio::test]
async fn test_report_session_needs_description() {
    let (app, _) = seeded_app();
    let id = open(&app, "report").await;

    event(&app, &id, "scan", Some(json!({"uid": "USER-002"}))).await;
    let (_, body) = event(&app, &id, "scan", Some(json!({"uid": "E5F6A1B2C3D4"}))).await;
    assert_eq!(body["step"], "confirm");
    assert_eq!(body["operation"]["type"], "damage_report");

    let (status, _) = event(&app, &id, "confirm", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = event(
        &app,
        &id,
        "confirm",
        Some(json!({"description": "Display trincado", "damageType": "danificada", "urgency": "média"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "complete");

    let (_, body) = get(&app, "/api/sheets?action=tool-by-rfid&rfid=E5F6A1B2C3D4").await;
    assert_eq!(body["data"]["status"], "danificada");

    // Nothing was collected, so the badge holder may leave
    let (_, body) = event(&app, &id, "exit", None).await;
    assert_eq!(body["step"], "auth");
    assert_eq!(body["success"], "Exit authorized");
}

#[tokio::test]
async fn test_scan_falls_back_to_reader() {
    let (app, _) = seeded_app();
    let id = open(&app, "collect").await;

    let (_, body) = event(&app, &id, "scan", None).await;
    assert_eq!(body["step"], "auth");

    post(&app, "/api/arduino/rfid", json!({"command": "scan", "uid": "ADMIN-001"})).await;
    let (_, body) = event(&app, &id, "scan", None).await;
    assert_eq!(body["step"], "operation-choice");
    assert_eq!(body["user"]["accessLevel"], "admin");
}

#[tokio::test]
async fn test_out_of_order_events_conflict() {
    let (app, _) = seeded_app();
    let id = open(&app, "return").await;

    let (status, body) = event(&app, &id, "confirm", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4);

    let (_, body) = get(&app, &format!("/api/kiosk/sessions/{}", id)).await;
    assert_eq!(body["step"], "auth");
}

#[tokio::test]
async fn test_close_session() {
    let (app, _) = seeded_app();
    let id = open(&app, "collect").await;
    let uri = format!("/api/kiosk/sessions/{}", id);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_return_collected_tool_before_exit() {
    let (app, _) = seeded_app();
    let id = open(&app, "collect").await;

    event(&app, &id, "scan", Some(json!({"uid": "USER-001"}))).await;
    event(
        &app,
        &id,
        "operation",
        Some(json!({"operation": {"type": "collect"}, "termsAccepted": true})),
    )
    .await;
    event(&app, &id, "scan", Some(json!({"uid": "A1B2C3D4E5F6"}))).await;
    event(&app, &id, "confirm", None).await;

    let (_, body) = event(&app, &id, "exit", None).await;
    assert_eq!(body["step"], "exit-verification");

    let (status, body) = event(&app, &id, "operation", Some(json!({"operation": {"type": "return"}}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "scan");
    assert_eq!(body["operation"]["type"], "return");

    event(&app, &id, "scan", Some(json!({"uid": "A1B2C3D4E5F6"}))).await;
    let (status, body) = event(&app, &id, "confirm", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["outstanding"].as_array().unwrap().is_empty());

    let (_, body) = event(&app, &id, "exit", None).await;
    assert_eq!(body["step"], "auth");
    assert_eq!(body["success"], "Exit authorized");

    let (_, body) = get(&app, "/api/sheets?action=tool-by-rfid&rfid=A1B2C3D4E5F6").await;
    assert_eq!(body["data"]["status"], "disponível");
}

#[tokio::test]
async fn test_reader_read_waits_for_scan_step() {
    let (app, _) = seeded_app();
    let id = open(&app, "collect").await;
    event(&app, &id, "scan", Some(json!({"uid": "USER-001"}))).await;

    post(&app, "/api/arduino/rfid", json!({"command": "scan", "uid": "A1B2C3D4E5F6"})).await;
    let (status, body) = event(&app, &id, "scan", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4);

    let (_, body) = get(&app, "/api/arduino/rfid").await;
    assert_eq!(body["uid"], "A1B2C3D4E5F6");
}

#[tokio::test]
async fn test_malformed_confirm_body_is_rejected() {
    let (app, _) = seeded_app();
    let id = open(&app, "report").await;
    event(&app, &id, "scan", Some(json!({"uid": "USER-002"}))).await;
    event(&app, &id, "scan", Some(json!({"uid": "E5F6A1B2C3D4"}))).await;

    let uri = format!("/api/kiosk/sessions/{}/confirm", id);
    let (status, body) = send_text(&app, Method::POST, &uri, "{\"description\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 2);

    let (_, body) = get(&app, &format!("/api/kiosk/sessions/{}", id)).await;
    assert_eq!(body["step"], "confirm");

    let (status, body) = send_text(&app, Method::POST, &format!("/api/kiosk/sessions/{}/scan", id), "{uid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);
}
