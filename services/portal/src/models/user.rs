//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity as seen by the rest of the application, without its secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full user record as kept in the registered-users collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    /// Build a fresh record with a newly generated id
    pub fn new(new_user: NewUser) -> Self {
        Self {
            id: format!("user-{}", Uuid::new_v4().simple()),
            email: new_user.email,
            username: new_user.username,
            password: new_user.password,
            profile_image: None,
            created_at: Utc::now(),
        }
    }

    /// Plaintext comparison; secrets are not hashed in this portal
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }

    /// Copy of this record with the secret stripped
    pub fn without_password(&self) -> User {
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
            profile_image: self.profile_image.clone(),
            created_at: self.created_at,
        }
    }

    /// Merge a profile update into this record
    pub fn apply(&mut self, update: &UpdateUser) {
        update.merge_into(&mut self.username, &mut self.email, &mut self.profile_image);
    }
}

impl User {
    /// Merge a profile update into this record
    pub fn apply(&mut self, update: &UpdateUser) {
        update.merge_into(&mut self.username, &mut self.email, &mut self.profile_image);
    }
}

/// New user registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// User profile update payload
///
/// `profile_image` is doubly optional: `None` leaves the image untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<Option<String>>,
}

impl UpdateUser {
    fn merge_into(
        &self,
        username: &mut String,
        email: &mut String,
        profile_image: &mut Option<String>,
    ) {
        if let Some(new_username) = &self.username {
            *username = new_username.clone();
        }
        if let Some(new_email) = &self.email {
            *email = new_email.clone();
        }
        if let Some(new_image) = &self.profile_image {
            *profile_image = new_image.clone();
        }
    }

    /// Whether the update carries no field at all
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.profile_image.is_none()
    }
}
