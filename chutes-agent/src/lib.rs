//! Chutes agent glue
//!
//! Maps chat text onto Chutes API calls: a declarative intent table does
//! the matching, an [`AgentRuntime`] does the dispatching, and a token
//! bucket keeps a chatty channel from hammering the API. All network
//! resilience lives in `chutes-sdk`; this crate only parses, dispatches,
//! and renders.
//!
//! ```rust,no_run
//! use chutes_agent::AgentRuntime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runtime = AgentRuntime::from_env()?;
//!     if let Some(reply) = runtime.handle_message("list chutes").await {
//!         println!("{reply}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod actions;
pub mod intent;

pub use actions::{format_error, AgentRuntime, RATE_LIMIT_MESSAGE};
pub use intent::{Intent, IntentTable};
