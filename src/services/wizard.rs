//! Kiosk wizard state machine
//!
//! One wizard drives one kiosk session through
//! `auth -> operation-choice -> scan -> confirm -> complete`, with an
//! optional `exit-verification` step before the badge holder leaves.
//! Lookup misses keep the current step and set a user-facing error; events
//! that do not fit the current step are rejected without touching the state.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        tool::Tool,
        transaction::{DamageDetails, Operation, TransactionAction, TransactionRequest},
        user::User,
    },
    services::{lookup::LookupService, transactions::TransactionService},
};

const RETRY_MESSAGE: &str = "Could not reach the tool register, please try again";

/// Which kiosk page the session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Collect page: the badge holder chooses the operation
    Collect,
    /// Return page: operation fixed to return
    Return,
    /// Damage report page: operation fixed to damage report
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Auth,
    OperationChoice,
    Scan,
    Confirm,
    Complete,
    ExitVerification,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Auth => "auth",
            WizardStep::OperationChoice => "operation-choice",
            WizardStep::Scan => "scan",
            WizardStep::Confirm => "confirm",
            WizardStep::Complete => "complete",
            WizardStep::ExitVerification => "exit-verification",
        }
    }
}

/// Outcome of the exit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitVerdict {
    Authorized,
    ToolsOutstanding(Vec<Tool>),
}

/// Snapshot of a wizard for kiosk clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub flow: Flow,
    pub step: WizardStep,
    pub user: Option<User>,
    pub tool: Option<Tool>,
    pub operation: Option<Operation>,
    pub collected: Vec<Tool>,
    pub returned: Vec<Tool>,
    /// Tools the badge holder had borrowed when badging in (return flow)
    pub held: Vec<Tool>,
    /// Collected in this session and not returned since
    pub outstanding: Vec<Tool>,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    flow: Flow,
    step: WizardStep,
    user: Option<User>,
    tool: Option<Tool>,
    operation: Option<Operation>,
    collected: Vec<Tool>,
    returned: Vec<Tool>,
    held: Vec<Tool>,
    error: Option<String>,
    success: Option<String>,
}

impl Wizard {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            step: WizardStep::Auth,
            user: None,
            tool: None,
            operation: None,
            collected: Vec::new(),
            returned: Vec::new(),
            held: Vec::new(),
            error: None,
            success: None,
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn tool(&self) -> Option<&Tool> {
        self.tool.as_ref()
    }

    pub fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn collected(&self) -> &[Tool] {
        &self.collected
    }

    pub fn returned(&self) -> &[Tool] {
        &self.returned
    }

    /// Tools collected during the session that have not been returned since
    pub fn outstanding(&self) -> Vec<Tool> {
        self.collected
            .iter()
            .filter(|tool| !self.returned.iter().any(|r| r.id == tool.id))
            .cloned()
            .collect()
    }

    /// Whether a tag read is meaningful at the current step
    pub fn accepts_scan(&self) -> bool {
        matches!(self.step, WizardStep::Auth | WizardStep::Scan)
    }

    fn expect_step(&self, allowed: &[WizardStep], event: &str) -> AppResult<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(AppError::InvalidTransition(format!(
                "{} is not possible during {}",
                event,
                self.step.as_str()
            )))
        }
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }

    /// Handle a tag read: badge during `auth`, tool during `scan`.
    /// An empty tag means nothing was read yet and is ignored.
    pub async fn scan(&mut self, uid: &str, lookup: &LookupService) -> AppResult<()> {
        self.expect_step(&[WizardStep::Auth, WizardStep::Scan], "scan")?;
        let uid = uid.trim();
        if uid.is_empty() {
            return Ok(());
        }
        self.clear_messages();

        if self.step == WizardStep::Auth {
            self.authenticate(uid, lookup).await
        } else {
            self.identify_tool(uid, lookup).await
        }
    }

    async fn authenticate(&mut self, uid: &str, lookup: &LookupService) -> AppResult<()> {
        let user = match lookup.find_user_by_tag(uid).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.error = Some("User not found".to_string());
                return Ok(());
            }
            Err(e) => {
                self.error = Some(RETRY_MESSAGE.to_string());
                return Err(e);
            }
        };

        match self.flow {
            Flow::Collect => {
                self.step = WizardStep::OperationChoice;
            }
            Flow::Return => {
                self.held = lookup.tools_held_by(&user).await.unwrap_or_else(|e| {
                    tracing::warn!("Could not load tools held by {}: {}", user.id, e);
                    Vec::new()
                });
                self.operation = Some(Operation::Return);
                self.step = WizardStep::Scan;
            }
            Flow::Report => {
                self.operation = Some(Operation::damage_report(DamageDetails::default()));
                self.step = WizardStep::Scan;
            }
        }
        self.success = Some(format!("User identified: {}", user.name));
        self.user = Some(user);
        Ok(())
    }

    async fn identify_tool(&mut self, uid: &str, lookup: &LookupService) -> AppResult<()> {
        match lookup.find_tool_by_tag(uid).await {
            Ok(Some(tool)) => {
                self.success = Some(format!("Tool identified: {}", tool.name));
                self.tool = Some(tool);
                self.step = WizardStep::Confirm;
                Ok(())
            }
            Ok(None) => {
                self.error = Some("Tool not found".to_string());
                Ok(())
            }
            Err(e) => {
                self.error = Some(RETRY_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Pick the operation on the collect page. Collecting requires the terms
    /// of use to be accepted.
    ///
    /// The collect page may switch operation again after a confirmed
    /// transaction, so a badge holder warned at the exit can return what
    /// they collected without leaving the session.
    pub fn choose_operation(&mut self, operation: Operation, terms_accepted: bool) -> AppResult<()> {
        if self.flow == Flow::Collect {
            self.expect_step(
                &[
                    WizardStep::OperationChoice,
                    WizardStep::Complete,
                    WizardStep::ExitVerification,
                ],
                "choosing an operation",
            )?;
        } else {
            self.expect_step(&[WizardStep::OperationChoice], "choosing an operation")?;
        }
        if operation == Operation::Collect && !terms_accepted {
            return Err(AppError::Validation(
                "The terms of use must be accepted before collecting".to_string(),
            ));
        }
        self.clear_messages();
        self.operation = Some(operation);
        self.step = WizardStep::Scan;
        Ok(())
    }

    /// Record the operation on the scanned tool. `details` fills in a damage
    /// report entered on the confirmation screen.
    pub async fn confirm(
        &mut self,
        details: Option<DamageDetails>,
        transactions: &TransactionService,
    ) -> AppResult<()> {
        self.expect_step(&[WizardStep::Confirm], "confirming")?;

        let (Some(user), Some(tool), Some(operation)) = (&self.user, &self.tool, &self.operation) else {
            return Err(AppError::Internal("confirm step without user, tool or operation".to_string()));
        };

        let operation = match (operation, details) {
            (Operation::DamageReport { .. }, Some(details)) => Operation::damage_report(details),
            (operation, _) => operation.clone(),
        };

        let mut request = TransactionRequest {
            action: operation.action().as_str().to_string(),
            tool_id: tool.id.clone(),
            user_id: user.id.clone(),
            user_name: Some(user.name.clone()),
            tool_name: Some(tool.name.clone()),
            rfid_uid: tool.rfid_uid.clone(),
            ..TransactionRequest::default()
        };
        if let Operation::DamageReport { description, damage_type, urgency } = &operation {
            if description.trim().is_empty() {
                return Err(AppError::Validation("Describe the damage before confirming".to_string()));
            }
            request.damage_description = Some(description.clone());
            request.damage_type = *damage_type;
            request.urgency = *urgency;
        }

        self.clear_messages();
        if let Err(e) = transactions.submit(request).await {
            if !matches!(e, AppError::Validation(_)) {
                self.error = Some("Failed to register the operation, please try again".to_string());
            }
            return Err(e);
        }

        let Some(tool) = self.tool.take() else {
            return Ok(());
        };
        self.success = Some(match operation.action() {
            TransactionAction::Collect => format!("Collect registered: {}", tool.name),
            TransactionAction::Return => format!("Return registered: {}", tool.name),
            TransactionAction::DamageReport => format!("Damage report registered: {}", tool.name),
        });
        match operation.action() {
            TransactionAction::Collect => self.collected.push(tool),
            TransactionAction::Return => {
                self.held.retain(|held| held.id != tool.id);
                self.returned.push(tool);
            }
            TransactionAction::DamageReport => {
                self.operation = Some(Operation::damage_report(DamageDetails::default()));
            }
        }
        self.step = WizardStep::Complete;
        Ok(())
    }

    /// Drop the scanned tool and scan again
    pub fn cancel(&mut self) -> AppResult<()> {
        self.expect_step(&[WizardStep::Confirm], "cancelling")?;
        self.clear_messages();
        self.tool = None;
        self.step = WizardStep::Scan;
        Ok(())
    }

    /// Go back to scanning another tool
    pub fn continue_scanning(&mut self) -> AppResult<()> {
        self.expect_step(
            &[WizardStep::Complete, WizardStep::ExitVerification],
            "scanning another tool",
        )?;
        self.clear_messages();
        self.step = WizardStep::Scan;
        Ok(())
    }

    /// Check the badge holder out of the kiosk. Outstanding collected tools
    /// raise a warning and keep the session in `exit-verification`;
    /// otherwise the session resets for the next badge holder.
    pub fn verify_exit(&mut self) -> AppResult<ExitVerdict> {
        self.expect_step(
            &[WizardStep::Complete, WizardStep::ExitVerification],
            "exit verification",
        )?;
        self.clear_messages();

        let outstanding = self.outstanding();
        if outstanding.is_empty() {
            self.reset();
            self.success = Some("Exit authorized".to_string());
            return Ok(ExitVerdict::Authorized);
        }

        let names: Vec<&str> = outstanding.iter().map(|t| t.name.as_str()).collect();
        tracing::warn!(
            user = ?self.user.as_ref().map(|u| &u.id),
            "Exit with unreturned tools: {}",
            names.join(", ")
        );
        self.error = Some(format!("Unreturned tools detected: {}", names.join(", ")));
        self.step = WizardStep::ExitVerification;
        Ok(ExitVerdict::ToolsOutstanding(outstanding))
    }

    /// Back to `auth` with every session field cleared
    pub fn reset(&mut self) {
        *self = Self::new(self.flow);
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            flow: self.flow,
            step: self.step,
            user: self.user.clone(),
            tool: self.tool.clone(),
            operation: self.operation.clone(),
            collected: self.collected.clone(),
            returned: self.returned.clone(),
            held: self.held.clone(),
            outstanding: self.outstanding(),
            error: self.error.clone(),
            success: self.success.clone(),
        }
    }
}
