//! Common library for the portal application
//!
//! This crate provides the durable key-value surface the portal stores
//! persist to, with in-memory, file and Redis backends.

pub mod cache;
pub mod error;
pub mod storage;

pub use cache::{RedisConfig, RedisStore};
pub use error::{StorageError, StorageResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageBackend, StorageConfig};
