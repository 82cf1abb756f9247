//! chatline - streaming chat session controller
//!
//! This library provides the pieces behind the `chatline` binary: profile
//! selection, per-profile conversation state, a streaming HTTP backend, and
//! direction-aware rendering of the reply as it arrives.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `profile`: Profiles, text direction, and the profile catalog
//! - `session`: Messages and the per-profile conversation
//! - `controller`: Turn lifecycle, streaming, and profile switching
//! - `backend`: The chat backend seam, its HTTP client, and a scripted fake
//! - `decode`: Incremental UTF-8 decoding of reply chunks
//! - `render`: Line layout with right-to-left isolation
//! - `observer`: Session events delivered to the presentation layer
//! - `presenter`: Terminal observer used by the binary
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chatline::{ChatController, Config, HttpBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let backend = Arc::new(HttpBackend::from_config(&config.endpoint)?);
//!     let mut controller = ChatController::new(backend, config.catalog()?);
//!     let reply = controller.submit("What are the visiting hours?").await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod decode;
pub mod error;
pub mod observer;
pub mod presenter;
pub mod profile;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use backend::{ChatBackend, ChatRequest, FakeBackend, HttpBackend};
pub use config::Config;
pub use controller::{ChatController, TurnPhase};
pub use error::{ChatlineError, Result};
pub use observer::{SessionEvent, SessionObserver};
pub use profile::{Profile, ProfileCatalog, TextDirection};
pub use session::{Message, Role, Session};

#[cfg(test)]
pub mod test_utils;
