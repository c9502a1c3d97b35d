//! Tool model and lending status

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lending status of a tool, stored in the sheet with its Portuguese label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ToolStatus {
    #[default]
    #[serde(rename = "disponível", alias = "available", alias = "disponivel")]
    Available,
    #[serde(rename = "emprestada", alias = "borrowed")]
    Borrowed,
    #[serde(rename = "manutenção", alias = "maintenance", alias = "manutencao")]
    Maintenance,
    #[serde(rename = "danificada", alias = "damaged")]
    Damaged,
}

impl ToolStatus {
    /// Label written to the spreadsheet
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Available => "disponível",
            ToolStatus::Borrowed => "emprestada",
            ToolStatus::Maintenance => "manutenção",
            ToolStatus::Damaged => "danificada",
        }
    }

    /// Parse a status label; accepts the stored labels, unaccented spellings
    /// and English names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "disponível" | "disponivel" | "available" => Some(ToolStatus::Available),
            "emprestada" | "borrowed" => Some(ToolStatus::Borrowed),
            "manutenção" | "manutencao" | "maintenance" | "in-maintenance" => {
                Some(ToolStatus::Maintenance)
            }
            "danificada" | "damaged" => Some(ToolStatus::Damaged),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tool row from the Tools sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    /// RFID tag identifier attached to the tool
    pub rfid_uid: String,
    pub status: ToolStatus,
    pub category: String,
    pub location: String,
    /// Name of the user holding the tool while borrowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_maintenance: Option<String>,
}

impl Tool {
    pub fn is_available(&self) -> bool {
        self.status == ToolStatus::Available
    }
}
