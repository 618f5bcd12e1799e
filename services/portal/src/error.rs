//! Error types for the portal stores
//!
//! Precondition failures (unknown email, duplicate email, no session) are not
//! errors: the store operations report them as `Ok(false)`. The variants here
//! are the internal failures a caller has to map to a generic message.

use common::StorageError;
use thiserror::Error;

/// Custom error type for portal operations
#[derive(Error, Debug)]
pub enum PortalError {
    /// The durable key-value surface failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A snapshot could not be encoded or decoded
    #[error("Failed to (de)serialize key '{key}': {source}")]
    Serialization {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted snapshot decoded but violates a model invariant
    #[error("Corrupt snapshot under key '{key}': {message}")]
    Corrupt { key: &'static str, message: String },

    /// The platform id is not one of the fixed linkable platforms
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Type alias for Result with PortalError
pub type PortalResult<T> = Result<T, PortalError>;
