//! Transaction log recording

use crate::{error::AppResult, models::transaction::Transaction, repository::Repository};

#[derive(Clone)]
pub struct TransactionRecorder {
    repository: Repository,
}

impl TransactionRecorder {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Append one row to the log. No retry on failure.
    pub async fn record(&self, transaction: &Transaction) -> AppResult<()> {
        self.repository.transactions.append(transaction).await?;
        tracing::info!(
            id = %transaction.id,
            action = %transaction.action,
            tool = %transaction.tool_id,
            user = %transaction.user_id,
            "Transaction recorded"
        );
        Ok(())
    }

    pub async fn list(&self) -> AppResult<Vec<Transaction>> {
        self.repository.transactions.list().await
    }
}
