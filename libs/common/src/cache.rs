//! Redis-backed key-value storage for the portal
//!
//! This module provides a [`KeyValueStore`] that keeps each portal key as a
//! Redis string, namespaced by a configurable prefix.

use redis::{Client, Commands};
use tracing::info;

use crate::error::{StorageError, StorageResult};
use crate::storage::KeyValueStore;

/// Configuration for Redis connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
    /// Prefix prepended to every portal key
    pub key_prefix: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    /// - `REDIS_KEY_PREFIX`: Namespace for portal keys (default: "portal:")
    pub fn from_env() -> StorageResult<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let key_prefix =
            std::env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "portal:".to_string());

        Ok(RedisConfig { url, key_prefix })
    }
}

/// Redis key-value store
pub struct RedisStore {
    client: Client,
    key_prefix: String,
}

impl RedisStore {
    /// Create a new Redis store; no connection is made until first use
    pub fn new(config: &RedisConfig) -> StorageResult<Self> {
        let client = Client::open(config.url.clone()).map_err(|e| {
            StorageError::Configuration(format!("Invalid Redis URL {}: {}", config.url, e))
        })?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisStore {
            client,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn get_connection(&self) -> StorageResult<redis::Connection> {
        self.client.get_connection().map_err(StorageError::Backend)
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    /// Check if Redis is reachable
    pub fn health_check(&self) -> StorageResult<bool> {
        let mut conn = self.get_connection()?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(StorageError::Backend)?;
        Ok(pong == "PONG")
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.get_connection()?;
        conn.get(self.namespaced(key))
            .map_err(StorageError::Backend)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let _: () = conn
            .set(self.namespaced(key), value)
            .map_err(StorageError::Backend)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut conn = self.get_connection()?;
        let _: u64 = conn
            .del(self.namespaced(key))
            .map_err(StorageError::Backend)?;
        Ok(())
    }
}
