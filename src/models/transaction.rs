//! Transaction log model and request payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::tool::ToolStatus;

/// Action recorded in the transaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TransactionAction {
    #[serde(rename = "coleta", alias = "collect")]
    Collect,
    #[serde(rename = "devolução", alias = "devolucao", alias = "return")]
    Return,
    #[serde(rename = "reporte_dano", alias = "damage_report")]
    DamageReport,
}

impl TransactionAction {
    /// Label written to the spreadsheet
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionAction::Collect => "coleta",
            TransactionAction::Return => "devolução",
            TransactionAction::DamageReport => "reporte_dano",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "coleta" | "collect" => Some(TransactionAction::Collect),
            "devolução" | "devolucao" | "return" => Some(TransactionAction::Return),
            "reporte_dano" | "damage_report" => Some(TransactionAction::DamageReport),
            _ => None,
        }
    }

    /// Tool status after this action has been recorded
    pub fn resulting_status(&self) -> ToolStatus {
        match self {
            TransactionAction::Collect => ToolStatus::Borrowed,
            TransactionAction::Return => ToolStatus::Available,
            TransactionAction::DamageReport => ToolStatus::Damaged,
        }
    }
}

impl std::fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable entry of the Transactions sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Generated at record time (`TXN-...`)
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub tool_id: String,
    pub tool_name: String,
    pub action: TransactionAction,
    /// RFC 3339 timestamp in UTC
    pub timestamp: String,
    pub rfid_uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_description: Option<String>,
}

/// Kind of damage selected on the report screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Quebrada,
    Danificada,
    Desgastada,
    Outro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Urgency {
    #[serde(rename = "baixa")]
    Low,
    #[serde(rename = "média", alias = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

/// Damage details attached to a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DamageDetails {
    #[serde(default)]
    pub description: String,
    pub damage_type: Option<DamageType>,
    pub urgency: Option<Urgency>,
}

/// Operation performed on a scanned tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Collect,
    Return,
    #[serde(rename_all = "camelCase")]
    DamageReport {
        #[serde(default)]
        description: String,
        damage_type: Option<DamageType>,
        urgency: Option<Urgency>,
    },
}

impl Operation {
    /// Damage report carrying the given details
    pub fn damage_report(details: DamageDetails) -> Self {
        Operation::DamageReport {
            description: details.description,
            damage_type: details.damage_type,
            urgency: details.urgency,
        }
    }

    pub fn action(&self) -> TransactionAction {
        match self {
            Operation::Collect => TransactionAction::Collect,
            Operation::Return => TransactionAction::Return,
            Operation::DamageReport { .. } => TransactionAction::DamageReport,
        }
    }
}

/// Transaction recording request (`POST /sheets`)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// `coleta`, `devolução` or `reporte_dano`
    #[serde(default)]
    #[validate(length(min = 1, message = "action is required"))]
    pub action: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "toolId is required"))]
    pub tool_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    pub user_name: Option<String>,
    pub tool_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "rfidUid is required"))]
    pub rfid_uid: String,
    pub damage_description: Option<String>,
    pub damage_type: Option<DamageType>,
    pub urgency: Option<Urgency>,
}

/// Collect shortcut request (`POST /tools/collect`)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "toolId is required"))]
    pub tool_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "rfidUid is required"))]
    pub rfid_uid: String,
    /// Client-side read time, informational only
    pub timestamp: Option<String>,
}
