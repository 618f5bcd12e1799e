//! Snapshot repositories over the durable key-value surface
//!
//! Each repository owns one key and converts between the in-memory
//! collection and its JSON snapshot. The identity store decides what to
//! change; repositories only load and persist.

pub mod platform;
pub mod session;
pub mod user;

use std::sync::Arc;

use common::KeyValueStore;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{PortalError, PortalResult};

pub use platform::PlatformRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

fn read_json<T: DeserializeOwned>(
    storage: &Arc<dyn KeyValueStore>,
    key: &'static str,
) -> PortalResult<Option<T>> {
    match storage.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| PortalError::Serialization { key, source }),
        None => Ok(None),
    }
}

fn write_json<T: Serialize + ?Sized>(
    storage: &Arc<dyn KeyValueStore>,
    key: &'static str,
    value: &T,
) -> PortalResult<()> {
    let raw =
        serde_json::to_string(value).map_err(|source| PortalError::Serialization { key, source })?;
    storage.set(key, &raw)?;
    Ok(())
}
