//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{collect, health, kiosk, rfid, sheets};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Toolcrib API",
        version = "0.3.0",
        description = "RFID tool-lending kiosk REST API"
    ),
    servers(
        (url = "/api", description = "Kiosk API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Sheets
        sheets::query,
        sheets::record_transaction,
        // RFID reader
        rfid::last_read,
        rfid::send_command,
        // Collect shortcut
        collect::collect_tool,
        collect::history,
        // Kiosk
        kiosk::create_session,
        kiosk::get_session,
        kiosk::scan,
        kiosk::choose_operation,
        kiosk::confirm,
        kiosk::cancel,
        kiosk::continue_scanning,
        kiosk::verify_exit,
        kiosk::reset,
        kiosk::close_session,
    ),
    components(
        schemas(
            // Models
            crate::models::tool::Tool,
            crate::models::tool::ToolStatus,
            crate::models::user::User,
            crate::models::user::AccessLevel,
            crate::models::transaction::Transaction,
            crate::models::transaction::TransactionAction,
            crate::models::transaction::TransactionRequest,
            crate::models::transaction::CollectRequest,
            crate::models::transaction::Operation,
            crate::models::transaction::DamageDetails,
            crate::models::transaction::DamageType,
            crate::models::transaction::Urgency,
            crate::models::rfid::RfidRead,
            crate::models::rfid::RfidCommand,
            // Sheets
            sheets::SheetsQuery,
            // RFID
            rfid::CommandResponse,
            // Kiosk
            kiosk::CreateSessionRequest,
            kiosk::ScanRequest,
            kiosk::OperationRequest,
            crate::services::kiosk::SessionView,
            crate::services::wizard::WizardView,
            crate::services::wizard::WizardStep,
            crate::services::wizard::Flow,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sheets", description = "Tool and user lookups, transaction recording"),
        (name = "rfid", description = "RFID reader"),
        (name = "tools", description = "Collect shortcut"),
        (name = "kiosk", description = "Kiosk wizard sessions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
