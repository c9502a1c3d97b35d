//! Simulated RFID reader

use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::{
    config::RfidConfig,
    error::{AppError, AppResult},
    models::rfid::RfidRead,
    services::{lookup::LookupService, status::sheet_timestamp},
};

#[derive(Clone)]
pub struct RfidService {
    config: RfidConfig,
    lookup: LookupService,
    last_read: Arc<RwLock<Option<RfidRead>>>,
}

impl RfidService {
    pub fn new(config: RfidConfig, lookup: LookupService) -> Self {
        Self {
            config,
            lookup,
            last_read: Arc::new(RwLock::new(None)),
        }
    }

    /// Build a read for `uid`, naming the tool registered under the tag.
    /// A tag that is not a tool, or a store that cannot be reached, leaves
    /// the tool fields out.
    async fn read_for(&self, uid: &str, signal_strength: u8) -> RfidRead {
        let mut read = RfidRead {
            uid: uid.to_string(),
            timestamp: Some(sheet_timestamp()),
            signal_strength: Some(signal_strength),
            ..RfidRead::default()
        };
        match self.lookup.find_tool_by_tag(uid).await {
            Ok(Some(tool)) => {
                read.status = Some(tool.status.as_str().to_string());
                read.tool_id = Some(tool.id);
                read.tool_name = Some(tool.name);
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("Could not resolve tag {}: {}", uid, e),
        }
        read
    }

    /// Roll the dice for a fresh simulated read
    async fn simulate(&self) -> Option<RfidRead> {
        let signal_strength = {
            let mut rng = rand::thread_rng();
            if rng.gen::<f64>() >= self.config.read_probability {
                return None;
            }
            rng.gen_range(0..100)
        };
        Some(self.read_for(&self.config.simulated_uid, signal_strength).await)
    }

    /// Last read known to the reader, possibly refreshed by a simulated read.
    /// Returns an empty read when nothing was ever seen.
    pub async fn poll(&self) -> RfidRead {
        let fresh = self.simulate().await;
        let mut last = self.last_read.write().await;
        if let Some(read) = fresh {
            *last = Some(read);
        }
        last.clone().unwrap_or_default()
    }

    /// Report a tag as if it had been presented to the reader
    pub async fn inject(&self, uid: &str) -> RfidRead {
        let read = self.read_for(uid, 100).await;
        *self.last_read.write().await = Some(read.clone());
        tracing::debug!("RFID read injected: {}", uid);
        read
    }

    /// Consume the pending read, if any
    pub async fn take(&self) -> Option<RfidRead> {
        self.last_read.write().await.take().filter(|read| !read.is_empty())
    }

    /// Handle a reader command and return the acknowledgement message
    pub async fn command(&self, command: &str, uid: Option<&str>) -> AppResult<String> {
        match command {
            "scan" => {
                let uid = uid
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| AppError::Validation("scan needs a uid".to_string()))?;
                self.inject(uid).await;
                Ok(format!("Tag {} read", uid))
            }
            "clear" => {
                self.last_read.write().await.take();
                Ok("Reader cleared".to_string())
            }
            "enable" | "disable" => {
                tracing::info!("RFID reader command: {}", command);
                Ok("Command sent to reader".to_string())
            }
            other => Err(AppError::BadRequest(format!("Unknown reader command: {}", other))),
        }
    }
}
