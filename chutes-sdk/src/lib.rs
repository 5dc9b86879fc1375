//! Chutes SDK
//!
//! This crate provides a Rust client for the Chutes GPU-serving platform
//! API: listing, deploying, and deleting chutes, invoking cords, and
//! inspecting images and the authenticated account.
//!
//! The heart of the crate is the resilient request layer: every call runs
//! through a single executor that composes a per-attempt deadline, an
//! exponential-backoff retry loop, and rotation across fallback base URLs,
//! then validates status and content type and stamps latency/retry metrics
//! on the outcome.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chutes_sdk::{ChutesApiClient, ChutesConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ChutesConfig::new("cpk_your_real_key");
//!     let client = ChutesApiClient::new(config)?;
//!
//!     let chutes = client.chutes().list().await?;
//!     println!("{} chutes deployed", chutes.len());
//!
//!     let result = client
//!         .chutes()
//!         .invoke_cord("chute-id", "generate", serde_json::json!({"prompt": "a rocket"}))
//!         .await?;
//!     println!("{result}");
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```rust,no_run
//! use chutes_sdk::ChutesConfig;
//! use std::time::Duration;
//!
//! let config = ChutesConfig::new("cpk_your_real_key")
//!     .with_base_url("https://api.chutes.ai")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_max_retries(3)
//!     .with_fallback_endpoints(vec!["https://backup.chutes.ai".to_string()]);
//! ```
//!
//! `ChutesConfig::from_env()` reads `CHUTES_API_KEY` and the optional
//! `CHUTES_API_BASE_URL` override.
//!
//! # Error Handling
//!
//! All failures are classified once, at construction, into
//! [`ChutesError`] variants; retry eligibility and status extraction work
//! off the variant, never off message text.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod observer;
pub mod outcome;
pub mod policy;
pub mod rate_limit;
pub mod resources;
pub mod retry;
pub mod timeout;
pub mod validate;

// Re-export main types for convenience
pub use client::{HttpClient, Payload};
pub use config::{ChutesConfig, DEFAULT_BASE_URL, ENV_API_KEY, ENV_BASE_URL};
pub use error::{ChutesError, SdkResult};
pub use observer::{NullObserver, RequestObserver, TracingObserver};
pub use outcome::{Completed, RequestFailure, RequestMetrics, RequestResult};
pub use policy::{RequestPolicy, StatusPredicate};
pub use rate_limit::TokenBucket;
pub use validate::ShapeSpec;

// Re-export resource clients and entities
pub use resources::account::{Account, AccountClient, DepositInfo};
pub use resources::chutes::{Chute, ChutesClient, Cord, DeployChuteRequest};
pub use resources::images::{Image, ImagesClient};

use std::sync::Arc;

/// The main client for the Chutes platform API.
///
/// Provides access to all API resources through dedicated sub-clients
/// sharing one [`HttpClient`] (and therefore one connection pool, one
/// policy, one observer).
#[derive(Debug, Clone)]
pub struct ChutesApiClient {
    http_client: Arc<HttpClient>,
    chutes: ChutesClient,
    images: ImagesClient,
    account: AccountClient,
}

impl ChutesApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ChutesConfig) -> SdkResult<Self> {
        let http_client = Arc::new(HttpClient::new(config)?);
        Ok(Self::from_http_client(http_client))
    }

    /// Create a new client from environment variables.
    pub fn from_env() -> SdkResult<Self> {
        Self::new(ChutesConfig::from_env()?)
    }

    /// Wrap an already-constructed HTTP client.
    pub fn from_http_client(http_client: Arc<HttpClient>) -> Self {
        Self {
            chutes: ChutesClient::new(Arc::clone(&http_client)),
            images: ImagesClient::new(Arc::clone(&http_client)),
            account: AccountClient::new(Arc::clone(&http_client)),
            http_client,
        }
    }

    /// Get the chutes client.
    pub fn chutes(&self) -> &ChutesClient {
        &self.chutes
    }

    /// Get the images client.
    pub fn images(&self) -> &ImagesClient {
        &self.images
    }

    /// Get the account client.
    pub fn account(&self) -> &AccountClient {
        &self.account
    }

    /// Get the underlying HTTP client, for custom requests.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the configured primary base URL.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}
