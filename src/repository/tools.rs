//! Tools sheet accessor

use super::{
    rows::{row_to_tool, tool_to_row, ID_COLUMN},
    SheetTable,
};
use crate::{
    error::{AppError, AppResult},
    models::tool::Tool,
};

#[derive(Clone)]
pub struct ToolsRepository {
    table: SheetTable,
}

impl ToolsRepository {
    pub fn new(table: SheetTable) -> Self {
        Self { table }
    }

    /// All tools, in sheet order
    pub async fn list(&self) -> AppResult<Vec<Tool>> {
        let rows = self.table.rows().await?;
        Ok(rows.iter().map(|row| row_to_tool(row)).collect())
    }

    /// First tool carrying the tag
    pub async fn find_by_rfid(&self, rfid_uid: &str) -> AppResult<Option<Tool>> {
        Ok(self.list().await?.into_iter().find(|t| t.rfid_uid == rfid_uid))
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Tool>> {
        Ok(self.list().await?.into_iter().find(|t| t.id == id))
    }

    /// Overwrite the row of `tool.id` with the given record
    pub async fn replace(&self, tool: &Tool) -> AppResult<()> {
        let written = self
            .table
            .update_by_key(ID_COLUMN, &tool.id, tool_to_row(tool))
            .await?;
        if !written {
            return Err(AppError::NotFound(format!("Tool {} not found", tool.id)));
        }
        Ok(())
    }
}
