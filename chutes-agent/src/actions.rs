//! Intent dispatch
//!
//! Turns a parsed [`Intent`] into SDK calls and renders the outcome as
//! chat text. Every reply describing a failure starts with a stable tag
//! (`"Chutes API error: ..."`, `"Authentication error: ..."`) so calling
//! UIs can pattern-match without inspecting internals.

use crate::intent::{Intent, IntentTable};
use chutes_sdk::{ChutesApiClient, ChutesConfig, ChutesError, TokenBucket};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Reply sent when the rate limiter denies an action.
pub const RATE_LIMIT_MESSAGE: &str =
    "Rate limit reached for Chutes actions, please retry in a moment.";

/// Default action budget: 30 actions per minute.
const DEFAULT_ACTIONS_PER_MINUTE: u32 = 30;

/// Format an SDK failure with its stable user-facing tag.
pub fn format_error(error: &ChutesError) -> String {
    if error.is_auth_error() {
        format!("Authentication error: {error}")
    } else {
        format!("Chutes API error: {error}")
    }
}

/// The agent-side runtime: one API client plus the action rate limiter.
///
/// The token bucket is the only persistent mutable state; it is owned
/// here and mutated only through its `check_limit` call, serialized by
/// the mutex.
pub struct AgentRuntime {
    table: IntentTable,
    client: ChutesApiClient,
    limiter: Mutex<TokenBucket>,
}

impl AgentRuntime {
    /// Create a runtime from an explicit configuration.
    pub fn new(config: ChutesConfig) -> Result<Self, ChutesError> {
        Ok(Self {
            table: IntentTable::new(),
            client: ChutesApiClient::new(config)?,
            limiter: Mutex::new(TokenBucket::new(
                DEFAULT_ACTIONS_PER_MINUTE,
                Duration::from_secs(60),
            )),
        })
    }

    /// Create a runtime from `CHUTES_API_KEY` / `CHUTES_API_BASE_URL`.
    pub fn from_env() -> Result<Self, ChutesError> {
        Self::new(ChutesConfig::from_env()?)
    }

    /// Handle one chat message.
    ///
    /// Returns `None` when the text matches no intent, so the framework
    /// can pass the message on to other handlers.
    pub async fn handle_message(&self, text: &str) -> Option<String> {
        let intent = self.table.parse(text)?;
        debug!(?intent, "matched chat intent");

        let allowed = {
            let mut limiter = self
                .limiter
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            limiter.check_limit()
        };
        if !allowed {
            return Some(RATE_LIMIT_MESSAGE.to_string());
        }

        match self.dispatch(intent).await {
            Ok(reply) => Some(reply),
            Err(error) => Some(format_error(&error)),
        }
    }

    async fn dispatch(&self, intent: Intent) -> Result<String, ChutesError> {
        match intent {
            Intent::ListChutes => {
                let chutes = self.client.chutes().list().await?;
                if chutes.is_empty() {
                    return Ok("No chutes deployed.".to_string());
                }
                let mut reply = format!("{} chute(s) deployed:\n", chutes.len());
                for chute in chutes {
                    reply.push_str(&format!(
                        "- {} ({}){}\n",
                        chute.name,
                        chute.id,
                        chute
                            .status
                            .map(|status| format!(" [{status}]"))
                            .unwrap_or_default()
                    ));
                }
                Ok(reply.trim_end().to_string())
            }
            Intent::GetChute { id } => {
                let chute = self.client.chutes().get(&id).await?;
                Ok(format!(
                    "Chute {} ({}): status {}, public: {}",
                    chute.name,
                    chute.id,
                    chute.status.as_deref().unwrap_or("unknown"),
                    chute.public
                ))
            }
            Intent::DeployChute { name, image } => {
                let request = chutes_sdk::DeployChuteRequest::new(name, image);
                let chute = self.client.chutes().deploy(request).await?;
                Ok(format!(
                    "Deployed chute {} ({}), status {}",
                    chute.name,
                    chute.id,
                    chute.status.as_deref().unwrap_or("pending")
                ))
            }
            Intent::DeleteChute { id } => {
                self.client.chutes().remove(&id).await?;
                Ok(format!("Deleted chute {id}."))
            }
            Intent::ListCords { chute_id } => {
                let cords = self.client.chutes().cords(&chute_id).await?;
                if cords.is_empty() {
                    return Ok(format!("Chute {chute_id} exposes no cords."));
                }
                let names: Vec<&str> = cords.iter().map(|cord| cord.name.as_str()).collect();
                Ok(format!(
                    "Chute {chute_id} exposes {} cord(s): {}",
                    cords.len(),
                    names.join(", ")
                ))
            }
            Intent::InvokeCord { chute_id, cord } => {
                let result = self
                    .client
                    .chutes()
                    .invoke_cord(&chute_id, &cord, Value::Null)
                    .await?;
                Ok(format!("Cord {cord} returned: {result}"))
            }
            Intent::ListImages => {
                let images = self.client.images().list().await?;
                if images.is_empty() {
                    return Ok("No images available.".to_string());
                }
                let names: Vec<String> = images
                    .iter()
                    .map(|image| match &image.tag {
                        Some(tag) => format!("{}:{tag}", image.name),
                        None => image.name.clone(),
                    })
                    .collect();
                Ok(format!(
                    "{} image(s) available: {}",
                    images.len(),
                    names.join(", ")
                ))
            }
            Intent::GetImage { id } => {
                let image = self.client.images().get(&id).await?;
                Ok(format!(
                    "Image {} ({}), public: {}",
                    image.name, image.id, image.public
                ))
            }
            Intent::Balance => {
                let account = self.client.account().me().await?;
                let deposit = self.client.account().developer_deposit().await?;
                let balance = account
                    .balance_usd
                    .map(|usd| format!("${usd:.2}"))
                    .unwrap_or_else(|| "unknown".to_string());
                let mut reply = format!("Balance for {}: {balance}", account.username);
                if let Some(address) = deposit.address {
                    reply.push_str(&format!("\nDeposit address: {address}"));
                }
                Ok(reply)
            }
            Intent::Whoami => {
                let account = self.client.account().me().await?;
                Ok(format!(
                    "Authenticated as {}{}",
                    account.username,
                    account
                        .user_id
                        .map(|id| format!(" ({id})"))
                        .unwrap_or_default()
                ))
            }
        }
    }
}
