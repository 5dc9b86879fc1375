//! Account resource client

use super::decode_entity;
use crate::client::HttpClient;
use crate::error::ChutesError;
use crate::validate::ShapeSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client for account operations.
#[derive(Debug, Clone)]
pub struct AccountClient {
    client: Arc<HttpClient>,
}

impl AccountClient {
    /// Create a new account client.
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Get the authenticated account.
    pub async fn me(&self) -> Result<Account, ChutesError> {
        let payload = self.client.get("/users/me").await?;
        decode_entity(payload.into_json()?, &ShapeSpec::new().require("username"))
    }

    /// Get developer deposit details for funding the account.
    pub async fn developer_deposit(&self) -> Result<DepositInfo, ChutesError> {
        let payload = self.client.get("/developer_deposit").await?;
        decode_entity(payload.into_json()?, &ShapeSpec::new())
    }
}

/// The authenticated platform account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    /// Account username.
    pub username: String,
    #[serde(default)]
    /// Opaque account identifier.
    pub user_id: Option<String>,
    #[serde(default)]
    /// Current balance in USD, when reported.
    pub balance_usd: Option<f64>,
    #[serde(default)]
    /// Account creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// Deposit details for funding developer usage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepositInfo {
    #[serde(default)]
    /// Deposit address, when the platform issues one.
    pub address: Option<String>,
    #[serde(default)]
    /// Minimum deposit in USD.
    pub minimum_usd: Option<f64>,
    #[serde(default)]
    /// Free-form instructions.
    pub instructions: Option<String>,
}
