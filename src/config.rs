//! Configuration management for Toolcrib server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which spreadsheet backend holds the Tools / Users / Transactions tables
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    GoogleSheets,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub spreadsheet_id: Option<String>,
    /// Service account key, either the JSON document itself or a path to it
    pub service_account_key: Option<String>,
    /// Upper bound for every call made against the store
    pub request_timeout_secs: u64,
    /// Seed the in-memory backend with demo tools and users
    pub seed_demo_data: bool,
    pub tools_sheet: String,
    pub users_sheet: String,
    pub transactions_sheet: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RfidConfig {
    /// Probability that a poll of the simulated reader produces a fresh read
    pub read_probability: f64,
    /// Tag identifier reported by simulated reads
    pub simulated_uid: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KioskConfig {
    /// Idle kiosk sessions are dropped after this many seconds
    pub session_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub rfid: RfidConfig,
    #[serde(default)]
    pub kiosk: KioskConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix TOOLCRIB_, e.g. TOOLCRIB_STORE__BACKEND)
            .add_source(
                Environment::with_prefix("TOOLCRIB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Variable names used by existing kiosk deployments
            .set_override_option(
                "store.spreadsheet_id",
                env::var("GOOGLE_SHEETS_SPREADSHEET_ID").ok(),
            )?
            .set_override_option(
                "store.service_account_key",
                env::var("GOOGLE_SERVICE_ACCOUNT_KEY").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            spreadsheet_id: None,
            service_account_key: None,
            request_timeout_secs: 10,
            seed_demo_data: true,
            tools_sheet: "Ferramentas".to_string(),
            users_sheet: "Usuários".to_string(),
            transactions_sheet: "Transações".to_string(),
        }
    }
}

impl Default for RfidConfig {
    fn default() -> Self {
        Self {
            read_probability: 0.3,
            simulated_uid: "A1B2C3D4E5F6".to_string(),
        }
    }
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 15 * 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
