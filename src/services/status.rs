//! Tool status updates

use chrono::{SecondsFormat, Utc};

use crate::{
    error::{AppError, AppResult},
    models::tool::{Tool, ToolStatus},
    repository::Repository,
};

/// Current time in the format written to the sheets
pub fn sheet_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Apply a status change to a tool record.
///
/// Borrowed tools must have a borrower; every other status clears it.
pub fn apply_status(mut tool: Tool, status: ToolStatus, borrower: Option<&str>, now: &str) -> AppResult<Tool> {
    tool.status = status;
    if status == ToolStatus::Borrowed {
        let borrower = borrower
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| AppError::Validation("A borrowed tool needs a borrower".to_string()))?;
        tool.borrowed_by = Some(borrower.to_string());
        tool.borrowed_date = Some(now.to_string());
        tool.return_date = None;
    } else {
        tool.borrowed_by = None;
        tool.return_date = Some(now.to_string());
    }
    Ok(tool)
}

#[derive(Clone)]
pub struct StatusUpdater {
    repository: Repository,
}

impl StatusUpdater {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Overwrite status, borrower and dates of the tool with this identifier
    pub async fn update_status(&self, tool_id: &str, status: ToolStatus, borrower: Option<&str>) -> AppResult<Tool> {
        let tool = self
            .repository
            .tools
            .find_by_id(tool_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", tool_id)))?;

        let updated = apply_status(tool, status, borrower, &sheet_timestamp())?;
        self.repository.tools.replace(&updated).await?;

        tracing::info!(tool = %tool_id, status = %status, "Tool status updated");
        Ok(updated)
    }
}
