//! Kiosk session endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::transaction::{DamageDetails, Operation},
    services::{kiosk::SessionView, wizard::Flow},
    AppState,
};

use super::{ApiJson, OptionalJson};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    pub flow: Flow,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Tag read by the kiosk; the pending reader read is used when absent
    pub uid: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub operation: Operation,
    #[serde(default)]
    pub terms_accepted: bool,
}

/// Open a kiosk session
#[utoipa::path(
    post,
    path = "/kiosk/sessions",
    tag = "kiosk",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = SessionView)
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateSessionRequest>,
) -> (StatusCode, Json<SessionView>) {
    (StatusCode::CREATED, Json(state.services.kiosk.create(request.flow).await))
}

/// Current state of a session
#[utoipa::path(
    get,
    path = "/kiosk/sessions/{id}",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Unknown or expired session", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SessionView>> {
    Ok(Json(state.services.kiosk.get(id).await?))
}

/// Feed a badge or tool tag to the session
#[utoipa::path(
    post,
    path = "/kiosk/sessions/{id}/scan",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Session state after the read", body = SessionView),
        (status = 409, description = "No read expected in this step", body = crate::error::ErrorResponse)
    )
)]
pub async fn scan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(request): OptionalJson<ScanRequest>,
) -> AppResult<Json<SessionView>> {
    let request = request.unwrap_or_default();
    Ok(Json(state.services.kiosk.scan(id, request.uid).await?))
}

/// Choose the operation (collect page only). Also offered after a
/// confirmed transaction, e.g. to return a tool before leaving.
#[utoipa::path(
    post,
    path = "/kiosk/sessions/{id}/operation",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = OperationRequest,
    responses(
        (status = 200, description = "Operation chosen", body = SessionView),
        (status = 400, description = "Terms of use not accepted", body = crate::error::ErrorResponse),
        (status = 409, description = "No operation choice at this step", body = crate::error::ErrorResponse)
    )
)]
pub async fn choose_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<OperationRequest>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(
        state
            .services
            .kiosk
            .choose_operation(id, request.operation, request.terms_accepted)
            .await?,
    ))
}

/// Confirm the operation on the scanned tool
#[utoipa::path(
    post,
    path = "/kiosk/sessions/{id}/confirm",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body(content = DamageDetails, description = "Damage details for a report, optional"),
    responses(
        (status = 200, description = "Operation recorded", body = SessionView),
        (status = 400, description = "Malformed body or damage description missing", body = crate::error::ErrorResponse),
        (status = 409, description = "Nothing to confirm", body = crate::error::ErrorResponse),
        (status = 502, description = "Spreadsheet store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJson(details): OptionalJson<DamageDetails>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.services.kiosk.confirm(id, details).await?))
}

/// Drop the scanned tool and scan again
#[utoipa::path(
    post,
    path = "/kiosk/sessions/{id}/cancel",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Back to scanning", body = SessionView)
    )
)]
pub async fn cancel(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SessionView>> {
    Ok(Json(state.services.kiosk.cancel(id).await?))
}

/// Scan another tool
#[utoipa::path(
    post,
    path = "/kiosk/sessions/{id}/continue",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Back to scanning", body = SessionView)
    )
)]
pub async fn continue_scanning(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    Ok(Json(state.services.kiosk.continue_scanning(id).await?))
}

/// Exit verification
#[utoipa::path(
    post,
    path = "/kiosk/sessions/{id}/exit",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Exit authorized (back to auth) or unreturned tools warning", body = SessionView)
    )
)]
pub async fn verify_exit(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SessionView>> {
    Ok(Json(state.services.kiosk.verify_exit(id).await?))
}

/// Start over for the next badge holder
#[utoipa::path(
    post,
    path = "/kiosk/sessions/{id}/reset",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session reset", body = SessionView)
    )
)]
pub async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<SessionView>> {
    Ok(Json(state.services.kiosk.reset(id).await?))
}

/// Close a session
#[utoipa::path(
    delete,
    path = "/kiosk/sessions/{id}",
    tag = "kiosk",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Unknown session", body = crate::error::ErrorResponse)
    )
)]
pub async fn close_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.services.kiosk.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
