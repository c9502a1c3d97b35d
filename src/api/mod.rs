//! API handlers for Toolcrib REST endpoints

pub mod collect;
pub mod health;
pub mod kiosk;
pub mod openapi;
pub mod rfid;
pub mod sheets;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections use the error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// JSON body that may be left out entirely. A present but malformed body
/// is still rejected.
pub struct OptionalJson<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(None));
        }

        serde_json::from_slice(&body)
            .map(|value| OptionalJson(Some(value)))
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
    }
}

/// Success envelope used by the sheet and reader endpoints
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Sheet lookups and transaction recording
        .route("/sheets", get(sheets::query).post(sheets::record_transaction))
        .route("/google-sheets", get(sheets::query).post(sheets::record_transaction))
        // RFID reader
        .route("/arduino/rfid", get(rfid::last_read).post(rfid::send_command))
        // Collect shortcut
        .route("/tools/collect", get(collect::history).post(collect::collect_tool))
        // Kiosk sessions
        .route("/kiosk/sessions", post(kiosk::create_session))
        .route(
            "/kiosk/sessions/:id",
            get(kiosk::get_session).delete(kiosk::close_session),
        )
        .route("/kiosk/sessions/:id/scan", post(kiosk::scan))
        .route("/kiosk/sessions/:id/operation", post(kiosk::choose_operation))
        .route("/kiosk/sessions/:id/confirm", post(kiosk::confirm))
        .route("/kiosk/sessions/:id/cancel", post(kiosk::cancel))
        .route("/kiosk/sessions/:id/continue", post(kiosk::continue_scanning))
        .route("/kiosk/sessions/:id/exit", post(kiosk::verify_exit))
        .route("/kiosk/sessions/:id/reset", post(kiosk::reset))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
