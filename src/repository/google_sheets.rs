//! Google Sheets REST v4 backend authenticated with a service account

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::{SheetRange, SheetStore};
use crate::{
    config::StoreConfig,
    error::{AppError, AppResult},
};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Tokens are renewed this many seconds before Google expires them
const TOKEN_MARGIN_SECS: i64 = 60;

/// Fields of a service-account key file used for the JWT bearer grant
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Accepts the key JSON itself or a path to the key file
    pub fn load(source: &str) -> AppResult<Self> {
        let text = if source.trim_start().starts_with('{') {
            source.to_string()
        } else {
            std::fs::read_to_string(source).map_err(|e| {
                AppError::Internal(format!("Failed to read service account key {}: {}", source, e))
            })?
        };
        serde_json::from_str(&text)
            .map_err(|e| AppError::Internal(format!("Invalid service account key: {}", e)))
    }
}

#[derive(Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: i64,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Cells come back formatted as strings, but numbers and booleans are
/// tolerated as well.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub struct GoogleSheetsStore {
    http: Client,
    spreadsheet_id: String,
    key: ServiceAccountKey,
    token: RwLock<Option<CachedToken>>,
}

impl GoogleSheetsStore {
    pub fn new(spreadsheet_id: String, key: ServiceAccountKey, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            spreadsheet_id,
            key,
            token: RwLock::new(None),
        })
    }

    pub fn from_config(config: &StoreConfig) -> AppResult<Self> {
        let spreadsheet_id = config
            .spreadsheet_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Internal("store.spreadsheet_id is not configured".to_string()))?;
        let key_source = config
            .service_account_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("store.service_account_key is not configured".to_string()))?;
        let key = ServiceAccountKey::load(key_source)?;

        Self::new(
            spreadsheet_id,
            key,
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    /// Current access token, fetching a new one when the cached token is stale
    async fn access_token(&self) -> AppResult<String> {
        let now = Utc::now().timestamp();
        if let Some(token) = self.token.read().await.as_ref() {
            if token.expires_at - TOKEN_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let mut slot = self.token.write().await;
        if let Some(token) = slot.as_ref() {
            if token.expires_at - TOKEN_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let claims = GrantClaims {
            iss: &self.key.client_email,
            scope: SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| AppError::Internal(format!("Invalid service account private key: {}", e)))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token request: {}", e)))?;

        let response: TokenResponse = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Store(format!("Failed to obtain Google access token: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Invalid Google token response: {}", e)))?;

        tracing::debug!("Obtained Google Sheets access token for {}", self.key.client_email);

        let value = response.access_token.clone();
        *slot = Some(CachedToken {
            value: response.access_token,
            expires_at: now + response.expires_in,
        });
        Ok(value)
    }

    /// `.../spreadsheets/{id}/values/{range}{suffix}` with the range percent-encoded
    fn values_url(&self, range: &str, suffix: &str) -> AppResult<Url> {
        let mut url = Url::parse(SHEETS_API)
            .map_err(|e| AppError::Internal(format!("Invalid Sheets API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Sheets API URL cannot be a base".to_string()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", range, suffix));
        Ok(url)
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsStore {
    async fn read_rows(&self, range: &SheetRange) -> AppResult<Vec<Vec<String>>> {
        let token = self.access_token().await?;
        let url = self.values_url(&range.a1(), "")?;

        let body: ValueRange = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Store(format!("Failed to read {}: {}", range.sheet, e)))?
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Invalid rows from {}: {}", range.sheet, e)))?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn append_row(&self, range: &SheetRange, row: Vec<String>) -> AppResult<()> {
        let token = self.access_token().await?;
        let url = self.values_url(&range.a1(), ":append")?;

        self.http
            .post(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Store(format!("Failed to append to {}: {}", range.sheet, e)))?;
        Ok(())
    }

    async fn update_row(&self, range: &SheetRange, index: usize, row: Vec<String>) -> AppResult<()> {
        let token = self.access_token().await?;
        let target = range.row_a1(index);
        let url = self.values_url(&target, "")?;

        self.http
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "range": target, "values": [row] }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Store(format!("Failed to update {}: {}", target, e)))?;
        Ok(())
    }
}
