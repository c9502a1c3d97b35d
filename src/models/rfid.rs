//! RFID reader payloads

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A tag read delivered by the reader. An empty `uid` means no read yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RfidRead {
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Signal strength in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<u8>,
    /// Tool registered under the tag, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RfidRead {
    pub fn is_empty(&self) -> bool {
        self.uid.is_empty()
    }
}

/// Command sent to the reader
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RfidCommand {
    /// `enable`, `disable` or `scan`
    pub command: String,
    /// Tag to report when simulating a `scan`
    pub uid: Option<String>,
}
