//! Kiosk sessions
//!
//! Each kiosk screen opens a session holding its own wizard. Sessions live in
//! memory and are dropped after `session_ttl_secs` without activity.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    config::KioskConfig,
    error::{AppError, AppResult},
    models::transaction::{DamageDetails, Operation},
    services::{
        lookup::LookupService,
        rfid::RfidService,
        transactions::TransactionService,
        wizard::{ExitVerdict, Flow, Wizard, WizardView},
    },
};

/// Wizard snapshot tagged with its session id
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    #[serde(flatten)]
    pub wizard: WizardView,
}

impl SessionView {
    fn new(id: Uuid, wizard: &Wizard) -> Self {
        Self {
            id,
            wizard: wizard.view(),
        }
    }
}

struct Session {
    wizard: Mutex<Wizard>,
    /// Unix millis of the last request touching the session
    last_seen: AtomicI64,
}

impl Session {
    fn new(flow: Flow) -> Self {
        Self {
            wizard: Mutex::new(Wizard::new(flow)),
            last_seen: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    fn touch(&self) {
        self.last_seen.store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }
}

#[derive(Clone)]
pub struct KioskService {
    lookup: LookupService,
    transactions: TransactionService,
    rfid: RfidService,
    ttl_millis: i64,
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl KioskService {
    pub fn new(
        lookup: LookupService,
        transactions: TransactionService,
        rfid: RfidService,
        config: &KioskConfig,
    ) -> Self {
        Self {
            lookup,
            transactions,
            rfid,
            ttl_millis: i64::try_from(config.session_ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn purge_expired(&self) {
        let now = Utc::now().timestamp_millis();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| now - session.last_seen.load(Ordering::Relaxed) <= self.ttl_millis);
        let dropped = before - sessions.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} idle kiosk session(s)", dropped);
        }
    }

    async fn session(&self, id: Uuid) -> AppResult<Arc<Session>> {
        self.purge_expired().await;
        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Kiosk session {} not found", id)))?;
        session.touch();
        Ok(session)
    }

    /// Run a synchronous wizard event and return the resulting view
    async fn apply<F>(&self, id: Uuid, event: F) -> AppResult<SessionView>
    where
        F: FnOnce(&mut Wizard) -> AppResult<()>,
    {
        let session = self.session(id).await?;
        let mut wizard = session.wizard.lock().await;
        event(&mut wizard)?;
        Ok(SessionView::new(id, &wizard))
    }

    pub async fn create(&self, flow: Flow) -> SessionView {
        self.purge_expired().await;
        let id = Uuid::new_v4();
        let session = Arc::new(Session::new(flow));
        let view = SessionView::new(id, &*session.wizard.lock().await);
        self.sessions.write().await.insert(id, session);
        tracing::info!(session = %id, flow = ?flow, "Kiosk session opened");
        view
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SessionView> {
        self.apply(id, |_| Ok(())).await
    }

    /// Feed a tag read to the wizard. Without an explicit uid the pending
    /// reader read is consumed; with neither the session is left as is.
    /// The reader is only drained when the wizard can take a read.
    pub async fn scan(&self, id: Uuid, uid: Option<String>) -> AppResult<SessionView> {
        let session = self.session(id).await?;
        let mut wizard = session.wizard.lock().await;

        let uid = match uid.filter(|uid| !uid.trim().is_empty()) {
            Some(uid) => uid,
            None if wizard.accepts_scan() => self.rfid.take().await.map(|read| read.uid).unwrap_or_default(),
            None => String::new(),
        };
        wizard.scan(&uid, &self.lookup).await?;
        Ok(SessionView::new(id, &wizard))
    }

    pub async fn choose_operation(
        &self,
        id: Uuid,
        operation: Operation,
        terms_accepted: bool,
    ) -> AppResult<SessionView> {
        self.apply(id, |wizard| wizard.choose_operation(operation, terms_accepted))
            .await
    }

    pub async fn confirm(&self, id: Uuid, details: Option<DamageDetails>) -> AppResult<SessionView> {
        let session = self.session(id).await?;
        let mut wizard = session.wizard.lock().await;
        wizard.confirm(details, &self.transactions).await?;
        Ok(SessionView::new(id, &wizard))
    }

    pub async fn cancel(&self, id: Uuid) -> AppResult<SessionView> {
        self.apply(id, Wizard::cancel).await
    }

    pub async fn continue_scanning(&self, id: Uuid) -> AppResult<SessionView> {
        self.apply(id, Wizard::continue_scanning).await
    }

    pub async fn verify_exit(&self, id: Uuid) -> AppResult<SessionView> {
        self.apply(id, |wizard| {
            if let ExitVerdict::ToolsOutstanding(tools) = wizard.verify_exit()? {
                tracing::warn!(session = %id, "{} tool(s) leaving unreturned", tools.len());
            }
            Ok(())
        })
        .await
    }

    pub async fn reset(&self, id: Uuid) -> AppResult<SessionView> {
        self.apply(id, |wizard| {
            wizard.reset();
            Ok(())
        })
        .await
    }

    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| tracing::info!(session = %id, "Kiosk session closed"))
            .ok_or_else(|| AppError::NotFound(format!("Kiosk session {} not found", id)))
    }
}
