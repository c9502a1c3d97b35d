//! Mapping between raw sheet rows and typed records
//!
//! Rows coming back from the spreadsheet are ragged: trailing empty cells are
//! dropped by the backend. Every reader here defaults missing cells instead of
//! failing.

use crate::models::{
    tool::{Tool, ToolStatus},
    transaction::{Transaction, TransactionAction},
    user::{AccessLevel, User},
};

/// id, name, rfidUid, status, category, location, borrowedBy, borrowedDate, returnDate, lastMaintenance
pub const TOOL_COLUMNS: usize = 10;
/// id, name, function, rfidUid, accessLevel
pub const USER_COLUMNS: usize = 5;
/// id, userId, userName, toolId, toolName, action, timestamp, rfidUid
pub const TRANSACTION_COLUMNS: usize = 8;

/// Column holding the identifier in every table
pub const ID_COLUMN: usize = 0;

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

fn optional_cell(row: &[String], index: usize) -> Option<String> {
    row.get(index).filter(|value| !value.is_empty()).cloned()
}

pub fn row_to_tool(row: &[String]) -> Tool {
    Tool {
        id: cell(row, 0),
        name: cell(row, 1),
        rfid_uid: cell(row, 2),
        status: row
            .get(3)
            .and_then(|value| ToolStatus::parse(value))
            .unwrap_or_default(),
        category: cell(row, 4),
        location: cell(row, 5),
        borrowed_by: optional_cell(row, 6),
        borrowed_date: optional_cell(row, 7),
        return_date: optional_cell(row, 8),
        last_maintenance: optional_cell(row, 9),
    }
}

pub fn tool_to_row(tool: &Tool) -> Vec<String> {
    vec![
        tool.id.clone(),
        tool.name.clone(),
        tool.rfid_uid.clone(),
        tool.status.as_str().to_string(),
        tool.category.clone(),
        tool.location.clone(),
        tool.borrowed_by.clone().unwrap_or_default(),
        tool.borrowed_date.clone().unwrap_or_default(),
        tool.return_date.clone().unwrap_or_default(),
        tool.last_maintenance.clone().unwrap_or_default(),
    ]
}

pub fn row_to_user(row: &[String]) -> User {
    User {
        id: cell(row, 0),
        name: cell(row, 1),
        function: cell(row, 2),
        rfid_uid: cell(row, 3),
        access_level: row
            .get(4)
            .and_then(|value| AccessLevel::parse(value))
            .unwrap_or_default(),
    }
}

pub fn user_to_row(user: &User) -> Vec<String> {
    vec![
        user.id.clone(),
        user.name.clone(),
        user.function.clone(),
        user.rfid_uid.clone(),
        user.access_level.as_str().to_string(),
    ]
}

/// Log rows with an unreadable action are skipped (`None`).
/// The damage description is not part of the persisted layout.
pub fn row_to_transaction(row: &[String]) -> Option<Transaction> {
    let action = TransactionAction::parse(row.get(5)?)?;
    Some(Transaction {
        id: cell(row, 0),
        user_id: cell(row, 1),
        user_name: cell(row, 2),
        tool_id: cell(row, 3),
        tool_name: cell(row, 4),
        action,
        timestamp: cell(row, 6),
        rfid_uid: cell(row, 7),
        damage_description: None,
    })
}

pub fn transaction_to_row(transaction: &Transaction) -> Vec<String> {
    vec![
        transaction.id.clone(),
        transaction.user_id.clone(),
        transaction.user_name.clone(),
        transaction.tool_id.clone(),
        transaction.tool_name.clone(),
        transaction.action.as_str().to_string(),
        transaction.timestamp.clone(),
        transaction.rfid_uid.clone(),
    ]
}
