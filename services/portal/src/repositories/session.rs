//! Repository for the current-user snapshot

use std::sync::Arc;

use common::KeyValueStore;
use tracing::info;

use super::{read_json, write_json};
use crate::error::PortalResult;
use crate::models::User;

/// Storage key of the secret-free current user
pub const USER_KEY: &str = "user";

/// Session repository
#[derive(Clone)]
pub struct SessionRepository {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// The persisted current user, if a session was left open
    pub fn load(&self) -> PortalResult<Option<User>> {
        read_json(&self.storage, USER_KEY)
    }

    /// Persist `user` as the current session
    pub fn save(&self, user: &User) -> PortalResult<()> {
        info!("Persisting session for user: {}", user.id);
        write_json(&self.storage, USER_KEY, user)
    }

    /// Drop the persisted session
    pub fn clear(&self) -> PortalResult<()> {
        info!("Clearing persisted session");
        self.storage.remove(USER_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::MemoryStore;

    #[test]
    fn test_save_load_clear() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let repo = SessionRepository::new(storage.clone());
        assert_eq!(repo.load().unwrap(), None);

        let user = User {
            id: "user-1".to_string(),
            email: "a@x.io".to_string(),
            username: "a".to_string(),
            profile_image: None,
            created_at: Utc::now(),
        };
        repo.save(&user).unwrap();
        assert_eq!(repo.load().unwrap(), Some(user));

        repo.clear().unwrap();
        assert_eq!(repo.load().unwrap(), None);
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }
}
