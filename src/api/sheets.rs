//! Sheet lookups and transaction recording (`/sheets`, aliased as `/google-sheets`)

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{transaction::TransactionRequest, user::User},
    AppState,
};

use super::{ApiJson, ApiResponse};

/// Lookup query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetsQuery {
    /// `tools`, `users`, `tool-by-rfid`, `user-by-rfid` or `user-tools`
    pub action: Option<String>,
    /// Tag identifier for the `*-by-rfid` lookups
    pub rfid: Option<String>,
    /// User identifier for `user-tools`
    pub user_id: Option<String>,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Parameter {} is required", name)))
}

/// Read tools and users from the spreadsheet
#[utoipa::path(
    get,
    path = "/sheets",
    tag = "sheets",
    params(SheetsQuery),
    responses(
        (status = 200, description = "`{success: true, data}`; data is null when nothing matches"),
        (status = 400, description = "Missing or unknown action", body = crate::error::ErrorResponse),
        (status = 502, description = "Spreadsheet store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn query(State(state): State<AppState>, Query(query): Query<SheetsQuery>) -> AppResult<Response> {
    let lookup = &state.services.lookup;
    let action = required(&query.action, "action")?;

    let response = match action {
        "tools" => Json(ApiResponse::ok(lookup.list_tools().await?)).into_response(),
        "users" => Json(ApiResponse::ok(lookup.list_users().await?)).into_response(),
        "tool-by-rfid" => {
            let rfid = required(&query.rfid, "rfid")?;
            Json(ApiResponse::ok(lookup.find_tool_by_tag(rfid).await?)).into_response()
        }
        "user-by-rfid" => {
            let rfid = required(&query.rfid, "rfid")?;
            Json(ApiResponse::ok(lookup.find_user_by_tag(rfid).await?)).into_response()
        }
        "user-tools" => {
            let user_id = required(&query.user_id, "userId")?;
            let user = lookup
                .find_user_by_id(user_id)
                .await?
                .unwrap_or_else(|| User {
                    id: user_id.to_string(),
                    ..User::default()
                });
            Json(ApiResponse::ok(lookup.tools_held_by(&user).await?)).into_response()
        }
        other => return Err(AppError::BadRequest(format!("Unknown action: {}", other))),
    };
    Ok(response)
}

/// Record a transaction and update the tool status
#[utoipa::path(
    post,
    path = "/sheets",
    tag = "sheets",
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "`{success, message, data: transaction}`"),
        (status = 400, description = "Incomplete data", body = crate::error::ErrorResponse),
        (status = 404, description = "Tool not found", body = crate::error::ErrorResponse),
        (status = 502, description = "Spreadsheet store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn record_transaction(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TransactionRequest>,
) -> AppResult<Response> {
    let transaction = state.services.transactions.submit(request).await?;
    Ok(Json(ApiResponse::with_message("Transaction recorded", transaction)).into_response())
}
