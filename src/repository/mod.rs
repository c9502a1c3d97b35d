//! Repository layer over the spreadsheet store

pub mod google_sheets;
pub mod memory;
pub mod rows;
pub mod tools;
pub mod transactions;
pub mod users;

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    config::{StoreBackend, StoreConfig},
    error::{AppError, AppResult},
};

/// Data rows of one sheet. Row 1 holds the header, so data starts at row 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: String,
    /// Number of columns, starting at column A
    pub width: usize,
}

impl SheetRange {
    pub fn new(sheet: impl Into<String>, width: usize) -> Self {
        Self {
            sheet: sheet.into(),
            width: width.clamp(1, 26),
        }
    }

    fn last_column(&self) -> char {
        (b'A' + (self.width - 1) as u8) as char
    }

    fn quoted_sheet(&self) -> String {
        format!("'{}'", self.sheet.replace('\'', "''"))
    }

    /// A1 notation covering every data row, e.g. `'Ferramentas'!A2:J`
    pub fn a1(&self) -> String {
        format!("{}!A2:{}", self.quoted_sheet(), self.last_column())
    }

    /// A1 notation of the data row at a zero-based index
    pub fn row_a1(&self, index: usize) -> String {
        let row = index + 2;
        format!("{}!A{}:{}{}", self.quoted_sheet(), row, self.last_column(), row)
    }
}

/// Spreadsheet storage engine: read, append and overwrite rows of a range
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn read_rows(&self, range: &SheetRange) -> AppResult<Vec<Vec<String>>>;

    async fn append_row(&self, range: &SheetRange, row: Vec<String>) -> AppResult<()>;

    /// Overwrite the data row at a zero-based index
    async fn update_row(&self, range: &SheetRange, index: usize, row: Vec<String>) -> AppResult<()>;

    /// Overwrite the first row whose `key_column` equals `key`.
    /// Returns false when no row carries the key.
    async fn update_row_by_key(
        &self,
        range: &SheetRange,
        key_column: usize,
        key: &str,
        row: Vec<String>,
    ) -> AppResult<bool> {
        let rows = self.read_rows(range).await?;
        let position = rows
            .iter()
            .position(|r| r.get(key_column).map(String::as_str) == Some(key));
        match position {
            Some(index) => {
                self.update_row(range, index, row).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// One table of the spreadsheet, with every store call bounded by a timeout
#[derive(Clone)]
pub struct SheetTable {
    store: Arc<dyn SheetStore>,
    range: SheetRange,
    timeout: Duration,
}

impl SheetTable {
    pub fn new(store: Arc<dyn SheetStore>, range: SheetRange, timeout: Duration) -> Self {
        Self { store, range, timeout }
    }

    pub fn range(&self) -> &SheetRange {
        &self.range
    }

    async fn bounded<T>(&self, operation: &str, call: impl Future<Output = AppResult<T>>) -> AppResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(AppError::StoreTimeout(format!(
                "{} on sheet {} exceeded {:?}",
                operation, self.range.sheet, self.timeout
            ))),
        }
    }

    pub async fn rows(&self) -> AppResult<Vec<Vec<String>>> {
        self.bounded("read", self.store.read_rows(&self.range)).await
    }

    pub async fn append(&self, row: Vec<String>) -> AppResult<()> {
        self.bounded("append", self.store.append_row(&self.range, row)).await
    }

    pub async fn update_by_key(&self, key_column: usize, key: &str, row: Vec<String>) -> AppResult<bool> {
        self.bounded(
            "update",
            self.store.update_row_by_key(&self.range, key_column, key, row),
        )
        .await
    }
}

/// Main repository struct holding one accessor per sheet
#[derive(Clone)]
pub struct Repository {
    pub tools: tools::ToolsRepository,
    pub users: users::UsersRepository,
    pub transactions: transactions::TransactionsRepository,
}

impl Repository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn SheetStore>, config: &StoreConfig) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
        let table = |sheet: &str, width: usize| {
            SheetTable::new(store.clone(), SheetRange::new(sheet, width), timeout)
        };

        Self {
            tools: tools::ToolsRepository::new(table(&config.tools_sheet, rows::TOOL_COLUMNS)),
            users: users::UsersRepository::new(table(&config.users_sheet, rows::USER_COLUMNS)),
            transactions: transactions::TransactionsRepository::new(table(
                &config.transactions_sheet,
                rows::TRANSACTION_COLUMNS,
            )),
        }
    }
}

/// Build the store selected by the configuration
pub fn build_store(config: &StoreConfig) -> AppResult<Arc<dyn SheetStore>> {
    match config.backend {
        StoreBackend::Memory => {
            let store = if config.seed_demo_data {
                memory::MemorySheetStore::seeded(config)
            } else {
                memory::MemorySheetStore::new()
            };
            Ok(Arc::new(store))
        }
        StoreBackend::GoogleSheets => {
            Ok(Arc::new(google_sheets::GoogleSheetsStore::from_config(config)?))
        }
    }
}
