//! Portal models

pub mod platform;
pub mod user;

// Re-export for convenience
pub use platform::{PlatformId, PlatformLink};
pub use user::{NewUser, StoredUser, UpdateUser, User};
