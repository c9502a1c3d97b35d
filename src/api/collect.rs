//! Collect shortcut endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::transaction::{CollectRequest, Transaction},
    AppState,
};

use super::{ApiJson, ApiResponse};

/// Collect an available tool by identifier
#[utoipa::path(
    post,
    path = "/tools/collect",
    tag = "tools",
    request_body = CollectRequest,
    responses(
        (status = 200, description = "`{success, message, data: transaction}`"),
        (status = 400, description = "Incomplete data", body = crate::error::ErrorResponse),
        (status = 404, description = "Tool not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Tool not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn collect_tool(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CollectRequest>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    let transaction = state.services.transactions.collect(request).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Tool {} collected", transaction.tool_name),
        transaction,
    )))
}

/// Collect transactions recorded so far
#[utoipa::path(
    get,
    path = "/tools/collect",
    tag = "tools",
    responses(
        (status = 200, description = "`{success, data: [transaction]}`")
    )
)]
pub async fn history(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Transaction>>>> {
    Ok(Json(ApiResponse::ok(state.services.transactions.collect_history().await?)))
}
