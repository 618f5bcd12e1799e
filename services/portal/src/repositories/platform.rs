//! Repository for the linked-platform set

use std::sync::Arc;

use common::KeyValueStore;
use tracing::{info, warn};

use super::{read_json, write_json};
use crate::error::{PortalError, PortalResult};
use crate::models::PlatformLink;

/// Storage key of the platform set
pub const PLATFORMS_KEY: &str = "platforms";

/// Platform repository
#[derive(Clone)]
pub struct PlatformRepository {
    storage: Arc<dyn KeyValueStore>,
}

impl PlatformRepository {
    /// Create a new platform repository
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Load the platform set
    ///
    /// The result always starts from the fixed template; persisted link
    /// state is laid over it by platform id, so the set has every platform
    /// exactly once in the fixed order whatever the snapshot contains.
    pub fn load(&self) -> PortalResult<Vec<PlatformLink>> {
        let mut platforms = PlatformLink::template();

        let Some(stored) = read_json::<Vec<PlatformLink>>(&self.storage, PLATFORMS_KEY)? else {
            return Ok(platforms);
        };

        for record in &stored {
            record
                .check_consistency()
                .map_err(|message| PortalError::Corrupt {
                    key: PLATFORMS_KEY,
                    message,
                })?;
        }

        for platform in &mut platforms {
            match stored.iter().find(|record| record.id == platform.id) {
                Some(record) => platform.adopt_link_state(record),
                None => warn!("Platform {} missing from snapshot, starting unlinked", platform.id),
            }
        }

        Ok(platforms)
    }

    /// Replace the persisted platform set
    pub fn save(&self, platforms: &[PlatformLink]) -> PortalResult<()> {
        let linked = platforms.iter().filter(|p| p.is_linked()).count();
        info!("Persisting platform set ({} linked)", linked);
        write_json(&self.storage, PLATFORMS_KEY, platforms)
    }
}
