//! In-memory spreadsheet, used for development kiosks and tests

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    rows::{tool_to_row, user_to_row},
    SheetRange, SheetStore,
};
use crate::{
    config::StoreConfig,
    error::AppResult,
    models::{
        tool::{Tool, ToolStatus},
        user::{AccessLevel, User},
    },
};

/// Sheets keyed by name, each a list of data rows
#[derive(Default)]
pub struct MemorySheetStore {
    sheets: RwLock<HashMap<String, Vec<Vec<String>>>>,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given sheets
    pub fn with_sheets(sheets: HashMap<String, Vec<Vec<String>>>) -> Self {
        Self {
            sheets: RwLock::new(sheets),
        }
    }

    /// Store holding a demo workshop inventory
    pub fn seeded(config: &StoreConfig) -> Self {
        let mut sheets = HashMap::new();
        sheets.insert(
            config.tools_sheet.clone(),
            demo_tools().iter().map(tool_to_row).collect(),
        );
        sheets.insert(
            config.users_sheet.clone(),
            demo_users().iter().map(user_to_row).collect(),
        );
        sheets.insert(config.transactions_sheet.clone(), Vec::new());
        Self::with_sheets(sheets)
    }

    /// Replace the content of a sheet
    pub async fn put_sheet(&self, sheet: &str, rows: Vec<Vec<String>>) {
        self.sheets.write().await.insert(sheet.to_string(), rows);
    }
}

fn fit(range: &SheetRange, mut row: Vec<String>) -> Vec<String> {
    row.truncate(range.width);
    row
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn read_rows(&self, range: &SheetRange) -> AppResult<Vec<Vec<String>>> {
        let sheets = self.sheets.read().await;
        Ok(sheets.get(&range.sheet).cloned().unwrap_or_default())
    }

    async fn append_row(&self, range: &SheetRange, row: Vec<String>) -> AppResult<()> {
        let mut sheets = self.sheets.write().await;
        sheets
            .entry(range.sheet.clone())
            .or_default()
            .push(fit(range, row));
        Ok(())
    }

    async fn update_row(&self, range: &SheetRange, index: usize, row: Vec<String>) -> AppResult<()> {
        let mut sheets = self.sheets.write().await;
        let rows = sheets.entry(range.sheet.clone()).or_default();
        if rows.len() <= index {
            rows.resize(index + 1, Vec::new());
        }
        rows[index] = fit(range, row);
        Ok(())
    }

    /// Find and overwrite under a single write lock, so a row cannot move
    /// between the lookup and the write.
    async fn update_row_by_key(
        &self,
        range: &SheetRange,
        key_column: usize,
        key: &str,
        row: Vec<String>,
    ) -> AppResult<bool> {
        let mut sheets = self.sheets.write().await;
        let Some(rows) = sheets.get_mut(&range.sheet) else {
            return Ok(false);
        };
        match rows
            .iter_mut()
            .find(|r| r.get(key_column).map(String::as_str) == Some(key))
        {
            Some(existing) => {
                *existing = fit(range, row);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn demo_tool(id: &str, name: &str, rfid_uid: &str, category: &str, location: &str) -> Tool {
    Tool {
        id: id.to_string(),
        name: name.to_string(),
        rfid_uid: rfid_uid.to_string(),
        status: ToolStatus::Available,
        category: category.to_string(),
        location: location.to_string(),
        ..Tool::default()
    }
}

fn demo_tools() -> Vec<Tool> {
    let mut drill = demo_tool("TOOL-004", "Furadeira de Impacto", "D4E5F6A1B2C3", "Elétrica", "Armário B");
    drill.status = ToolStatus::Maintenance;
    drill.last_maintenance = Some("2024-03-12".to_string());

    vec![
        demo_tool("TOOL-001", "Martelo de Borracha", "A1B2C3D4E5F6", "Manual", "Armário A"),
        demo_tool("TOOL-002", "Chave de Fenda Phillips", "B2C3D4E5F6A1", "Manual", "Armário A"),
        demo_tool("TOOL-003", "Alicate Universal", "C3D4E5F6A1B2", "Manual", "Armário A"),
        drill,
        demo_tool("TOOL-005", "Multímetro Digital", "E5F6A1B2C3D4", "Medição", "Bancada 2"),
    ]
}

fn demo_users() -> Vec<User> {
    let user = |id: &str, name: &str, function: &str, rfid_uid: &str, access_level| User {
        id: id.to_string(),
        name: name.to_string(),
        function: function.to_string(),
        rfid_uid: rfid_uid.to_string(),
        access_level,
    };

    vec![
        user("USER-001", "Carlos Pereira", "Mecânico", "USER-001", AccessLevel::User),
        user("USER-002", "Marina Costa", "Eletricista", "USER-002", AccessLevel::User),
        user("USER-003", "Roberto Alves", "Supervisor de Manutenção", "USER-003", AccessLevel::Supervisor),
        user("ADMIN-001", "Administrador", "Almoxarifado", "ADMIN-001", AccessLevel::Admin),
    ]
}
