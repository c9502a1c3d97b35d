//! Business logic services

pub mod kiosk;
pub mod lookup;
pub mod recorder;
pub mod rfid;
pub mod status;
pub mod transactions;
pub mod wizard;

use crate::{
    config::{KioskConfig, RfidConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub lookup: lookup::LookupService,
    pub recorder: recorder::TransactionRecorder,
    pub status: status::StatusUpdater,
    pub transactions: transactions::TransactionService,
    pub rfid: rfid::RfidService,
    pub kiosk: kiosk::KioskService,
    repository: Repository,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: Repository, rfid_config: RfidConfig, kiosk_config: &KioskConfig) -> Self {
        let lookup = lookup::LookupService::new(repository.clone());
        let recorder = recorder::TransactionRecorder::new(repository.clone());
        let status = status::StatusUpdater::new(repository.clone());
        let transactions =
            transactions::TransactionService::new(lookup.clone(), recorder.clone(), status.clone());
        let rfid = rfid::RfidService::new(rfid_config, lookup.clone());
        let kiosk = kiosk::KioskService::new(lookup.clone(), transactions.clone(), rfid.clone(), kiosk_config);

        Self {
            lookup,
            recorder,
            status,
            transactions,
            rfid,
            kiosk,
            repository,
        }
    }

    /// Check that the spreadsheet store answers a read
    pub async fn store_reachable(&self) -> bool {
        match self.repository.tools.list().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Store readiness check failed: {}", e);
                false
            }
        }
    }
}
