//! Badge holder model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access level granted to a badge holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    User,
    Supervisor,
    Admin,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::User => "user",
            AccessLevel::Supervisor => "supervisor",
            AccessLevel::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "user" => Some(AccessLevel::User),
            "supervisor" => Some(AccessLevel::Supervisor),
            "admin" => Some(AccessLevel::Admin),
            _ => None,
        }
    }
}

/// User row from the Users sheet
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Job function / role shown on the kiosk
    pub function: String,
    /// RFID badge identifier
    pub rfid_uid: String,
    pub access_level: AccessLevel,
}
