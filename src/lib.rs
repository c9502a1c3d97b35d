//! Toolcrib tool-lending kiosk
//!
//! REST JSON backend for an RFID tool crib: badge holders collect, return
//! and report damaged tools at a kiosk, with the Tools, Users and
//! Transactions tables kept in a spreadsheet.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire the services over a store according to the configuration
    pub fn new(config: AppConfig, store: Arc<dyn repository::SheetStore>) -> Self {
        let repository = repository::Repository::new(store, &config.store);
        let services = services::Services::new(repository, config.rfid.clone(), &config.kiosk);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
