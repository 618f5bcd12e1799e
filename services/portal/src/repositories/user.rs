//! Repository for the registered-users collection

use std::sync::Arc;

use common::KeyValueStore;
use tracing::{debug, info};

use super::{read_json, write_json};
use crate::error::PortalResult;
use crate::models::StoredUser;

/// Storage key of the full user collection, secrets included
pub const USERS_KEY: &str = "users";

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    storage: Arc<dyn KeyValueStore>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Load every registered user, in registration order
    pub fn load_all(&self) -> PortalResult<Vec<StoredUser>> {
        let users: Vec<StoredUser> = read_json(&self.storage, USERS_KEY)?.unwrap_or_default();
        debug!("Loaded {} registered users", users.len());
        Ok(users)
    }

    /// Replace the persisted user collection
    pub fn save_all(&self, users: &[StoredUser]) -> PortalResult<()> {
        info!("Persisting {} registered users", users.len());
        write_json(&self.storage, USERS_KEY, users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortalError;
    use crate::models::NewUser;
    use common::MemoryStore;

    #[test]
    fn test_missing_key_loads_empty() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_order_and_secrets() {
        let repo = UserRepository::new(Arc::new(MemoryStore::new()));
        let users: Vec<StoredUser> = ["a@x.io", "b@x.io"]
            .into_iter()
            .map(|email| {
                StoredUser::new(NewUser {
                    email: email.to_string(),
                    username: email.to_string(),
                    password: "pw".to_string(),
                })
            })
            .collect();

        repo.save_all(&users).unwrap();
        assert_eq!(repo.load_all().unwrap(), users);
    }

    #[test]
    fn test_garbage_snapshot_is_a_serialization_error() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(USERS_KEY, "not json").unwrap();

        let repo = UserRepository::new(storage);
        assert!(matches!(
            repo.load_all(),
            Err(PortalError::Serialization { key: "users", .. })
        ));
    }
}
