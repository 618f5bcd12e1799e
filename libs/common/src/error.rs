//! Custom error types for the common library
//!
//! This module defines the errors raised by the durable key-value
//! storage backends.

use std::io::Error as IoError;
use std::path::PathBuf;

use redis::RedisError;
use thiserror::Error;

/// Custom error type for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while reading or writing a file-backed key
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Error reported by the Redis backend
    #[error("Storage backend error: {0}")]
    Backend(#[source] RedisError),

    /// The key cannot be mapped onto the backend
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Configuration error
    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
