//! Portal configuration

use std::time::Duration;

use common::StorageConfig;

use crate::error::PortalResult;
use crate::identity::DEFAULT_LATENCY;

/// Portal configuration
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Where the stores persist their snapshots
    pub storage: StorageConfig,
    /// Simulated round-trip latency of every identity operation
    pub latency: Duration,
    /// Locale used to pick the language when none was persisted
    pub locale: Option<String>,
}

impl PortalConfig {
    /// Create a new PortalConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PORTAL_LATENCY_MS`: Simulated latency in milliseconds (default: 1000)
    /// - `PORTAL_LOCALE`: Locale hint, falls back to `LANG`
    /// - storage variables: see [`StorageConfig::from_env`]
    pub fn from_env() -> PortalResult<Self> {
        let storage = StorageConfig::from_env()?;

        let latency = std::env::var("PORTAL_LATENCY_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LATENCY);

        let locale = std::env::var("PORTAL_LOCALE")
            .or_else(|_| std::env::var("LANG"))
            .ok()
            .filter(|s| !s.is_empty());

        Ok(PortalConfig {
            storage,
            latency,
            locale,
        })
    }
}
