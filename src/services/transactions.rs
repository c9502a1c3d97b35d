//! Transaction workflow: validate, record, then update the tool status

use snowflaked::sync::Generator;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::transaction::{CollectRequest, Transaction, TransactionAction, TransactionRequest},
    services::{
        lookup::LookupService,
        recorder::TransactionRecorder,
        status::{sheet_timestamp, StatusUpdater},
    },
};

static TRANSACTION_IDS: Generator = Generator::new(0);

const DEFAULT_USER_NAME: &str = "Usuário";
const DEFAULT_TOOL_NAME: &str = "Ferramenta";

fn next_transaction_id() -> String {
    format!("TXN-{}", TRANSACTION_IDS.generate::<u64>())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct TransactionService {
    lookup: LookupService,
    recorder: TransactionRecorder,
    status: StatusUpdater,
}

impl TransactionService {
    pub fn new(lookup: LookupService, recorder: TransactionRecorder, status: StatusUpdater) -> Self {
        Self { lookup, recorder, status }
    }

    /// Build the log entry for a request; nothing touches the store here
    pub fn build(request: TransactionRequest) -> AppResult<Transaction> {
        request.validate()?;

        let action = TransactionAction::parse(&request.action)
            .ok_or_else(|| AppError::Validation(format!("Unknown action: {}", request.action)))?;

        let damage_description = match action {
            TransactionAction::DamageReport => Some(
                non_blank(request.damage_description)
                    .ok_or_else(|| AppError::Validation("A damage report needs a description".to_string()))?,
            ),
            _ => None,
        };

        Ok(Transaction {
            id: next_transaction_id(),
            user_id: request.user_id,
            user_name: non_blank(request.user_name).unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            tool_id: request.tool_id,
            tool_name: non_blank(request.tool_name).unwrap_or_else(|| DEFAULT_TOOL_NAME.to_string()),
            action,
            timestamp: sheet_timestamp(),
            rfid_uid: request.rfid_uid,
            damage_description,
        })
    }

    /// Record the transaction, then move the tool to the status the action implies.
    ///
    /// The log is append-only: when the status update fails after the record
    /// succeeded, the error is returned and the log row stays.
    pub async fn submit(&self, request: TransactionRequest) -> AppResult<Transaction> {
        let damage_type = request.damage_type;
        let urgency = request.urgency;
        let transaction = Self::build(request)?;

        self.recorder.record(&transaction).await?;

        let borrower = match transaction.action {
            TransactionAction::Collect => Some(transaction.user_name.as_str()),
            _ => None,
        };
        self.status
            .update_status(&transaction.tool_id, transaction.action.resulting_status(), borrower)
            .await?;

        if transaction.action == TransactionAction::DamageReport {
            tracing::warn!(
                tool = %transaction.tool_id,
                damage_type = ?damage_type,
                urgency = ?urgency,
                "Damage reported: {}",
                transaction.damage_description.as_deref().unwrap_or_default()
            );
        }

        Ok(transaction)
    }

    /// Collect a tool by identifier: the tool must exist and be available
    pub async fn collect(&self, request: CollectRequest) -> AppResult<Transaction> {
        request.validate()?;

        let tool = self
            .lookup
            .find_tool_by_id(&request.tool_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", request.tool_id)))?;
        if !tool.is_available() {
            return Err(AppError::Conflict(format!(
                "Tool {} is not available ({})",
                tool.id, tool.status
            )));
        }
        let user = self.lookup.find_user_by_id(&request.user_id).await?;

        self.submit(TransactionRequest {
            action: TransactionAction::Collect.as_str().to_string(),
            tool_id: tool.id,
            user_id: request.user_id,
            user_name: user.map(|u| u.name),
            tool_name: Some(tool.name),
            rfid_uid: request.rfid_uid,
            ..TransactionRequest::default()
        })
        .await
    }

    /// Collect transactions recorded so far
    pub async fn collect_history(&self) -> AppResult<Vec<Transaction>> {
        let transactions = self.recorder.list().await?;
        Ok(transactions
            .into_iter()
            .filter(|t| t.action == TransactionAction::Collect)
            .collect())
    }
}
