//! Account portal core
//!
//! Registration, login, profile management and gaming-platform linking for a
//! single unified account, plus the interface label table. State lives in
//! memory and is mirrored to a durable key-value surface after every change.
//!
//! ```rust,no_run
//! use portal::{AppContext, PortalConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PortalConfig::from_env()?;
//!     let context = AppContext::init(&config)?;
//!     if context.identity.login("player@dots.games", "secret").await? {
//!         context.identity.link_platform("steam", "player_one").await?;
//!     }
//!     context.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod i18n;
pub mod identity;
pub mod models;
pub mod repositories;
pub mod validation;

pub use config::PortalConfig;
pub use context::AppContext;
pub use error::{PortalError, PortalResult};
pub use i18n::{Language, LocalizationStore};
pub use identity::{IdentityStore, SessionState};
