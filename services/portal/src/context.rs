//! Application context shared by every view

use std::sync::Arc;

use common::KeyValueStore;
use tracing::info;

use crate::config::PortalConfig;
use crate::error::PortalResult;
use crate::i18n::LocalizationStore;
use crate::identity::IdentityStore;

/// Both portal stores, built once at start and handed to every consumer
#[derive(Clone)]
pub struct AppContext {
    pub identity: Arc<IdentityStore>,
    pub localization: Arc<LocalizationStore>,
}

impl AppContext {
    /// Open the configured storage backend and rehydrate both stores
    pub fn init(config: &PortalConfig) -> PortalResult<Self> {
        let storage = config.storage.open()?;
        Self::with_storage(storage, config)
    }

    /// Rehydrate both stores from an already opened backend
    pub fn with_storage(storage: Arc<dyn KeyValueStore>, config: &PortalConfig) -> PortalResult<Self> {
        let identity = IdentityStore::init(storage.clone(), config.latency)?;
        let localization = LocalizationStore::init(storage, config.locale.as_deref())?;

        info!("Portal context initialized");

        Ok(Self {
            identity: Arc::new(identity),
            localization: Arc::new(localization),
        })
    }

    /// Let queued identity operations finish, then release the context
    ///
    /// Every write is synchronous, so nothing is left to flush afterwards.
    pub async fn shutdown(self) {
        self.identity.drain().await;
        info!("Portal context shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{MemoryStore, StorageBackend, StorageConfig};
    use std::time::Duration;

    fn config() -> PortalConfig {
        PortalConfig {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
            },
            latency: Duration::from_millis(20),
            locale: Some("ja-JP".to_string()),
        }
    }

    #[tokio::test]
    async fn test_init_builds_both_stores() {
        let context = AppContext::init(&config()).unwrap();
        assert!(!context.identity.is_authenticated());
        assert_eq!(context.localization.t("auth.logout"), "ログアウト");
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_queued_operations() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let context = AppContext::with_storage(storage.clone(), &config()).unwrap();

        let identity = context.identity.clone();
        let registering =
            tokio::spawn(async move { identity.register("a@x.io", "alice", "pw").await });
        tokio::time::sleep(Duration::from_millis(5)).await;

        context.shutdown().await;
        assert!(storage.get("user").unwrap().is_some());
        assert!(registering.await.unwrap().unwrap());
    }
}
