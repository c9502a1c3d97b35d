//! RFID reader endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::rfid::{RfidCommand, RfidRead},
    AppState,
};

use super::ApiJson;

#[derive(Serialize, ToSchema)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
}

/// Last tag read, `{uid: ""}` when nothing was read
#[utoipa::path(
    get,
    path = "/arduino/rfid",
    tag = "rfid",
    responses(
        (status = 200, description = "Last read", body = RfidRead)
    )
)]
pub async fn last_read(State(state): State<AppState>) -> Json<RfidRead> {
    Json(state.services.rfid.poll().await)
}

/// Send a command to the reader
#[utoipa::path(
    post,
    path = "/arduino/rfid",
    tag = "rfid",
    request_body = RfidCommand,
    responses(
        (status = 200, description = "Command accepted", body = CommandResponse),
        (status = 400, description = "Unknown command", body = crate::error::ErrorResponse)
    )
)]
pub async fn send_command(
    State(state): State<AppState>,
    ApiJson(command): ApiJson<RfidCommand>,
) -> AppResult<Json<CommandResponse>> {
    let message = state
        .services
        .rfid
        .command(&command.command, command.uid.as_deref())
        .await?;
    Ok(Json(CommandResponse { success: true, message }))
}
