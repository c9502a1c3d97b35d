//! Transactions sheet accessor (append-only log)

use super::{
    rows::{row_to_transaction, transaction_to_row},
    SheetTable,
};
use crate::{error::AppResult, models::transaction::Transaction};

#[derive(Clone)]
pub struct TransactionsRepository {
    table: SheetTable,
}

impl TransactionsRepository {
    pub fn new(table: SheetTable) -> Self {
        Self { table }
    }

    pub async fn append(&self, transaction: &Transaction) -> AppResult<()> {
        self.table.append(transaction_to_row(transaction)).await
    }

    /// Logged transactions, oldest first. Unreadable rows are skipped.
    pub async fn list(&self) -> AppResult<Vec<Transaction>> {
        let rows = self.table.rows().await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                let transaction = row_to_transaction(row);
                if transaction.is_none() {
                    tracing::debug!("Skipping unreadable transaction row {:?}", row.first());
                }
                transaction
            })
            .collect())
    }
}
