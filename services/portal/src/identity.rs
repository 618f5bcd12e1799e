//! Identity store: who is logged in and which platforms are linked
//!
//! The store holds the registered users, the current session and the fixed
//! platform set in memory, and mirrors every change to the durable key-value
//! surface through the snapshot repositories.
//!
//! Every async operation first takes its place in a FIFO operation queue,
//! then waits out the simulated round-trip latency, then runs to completion
//! without suspending again. Overlapping callers therefore never observe
//! state from before an earlier operation finished. The synchronous getters
//! read the in-memory state directly and never wait on the queue; at most
//! they wait for the synchronous snapshot write of a committing operation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use common::KeyValueStore;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::error::PortalResult;
use crate::models::{NewUser, PlatformId, PlatformLink, StoredUser, UpdateUser, User};
use crate::repositories::{PlatformRepository, SessionRepository, UserRepository};

/// Default simulated round-trip latency
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

/// Whether a user is currently logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug)]
struct IdentityState {
    current_user: Option<User>,
    users: Vec<StoredUser>,
    platforms: Vec<PlatformLink>,
}

struct PendingGuard<'a>(&'a AtomicUsize);

impl<'a> PendingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Held for the whole duration of one queued operation
struct InFlight<'a> {
    _gate: MutexGuard<'a, ()>,
    _pending: PendingGuard<'a>,
}

/// Identity store
pub struct IdentityStore {
    state: RwLock<IdentityState>,
    gate: Mutex<()>,
    pending: AtomicUsize,
    latency: Duration,
    users: UserRepository,
    session: SessionRepository,
    platforms: PlatformRepository,
}

impl IdentityStore {
    /// Create the store and rehydrate it from `storage`
    ///
    /// A missing `user` key means no session, a missing `users` key means no
    /// registered users, and a missing `platforms` key means the unlinked
    /// template.
    pub fn init(storage: Arc<dyn KeyValueStore>, latency: Duration) -> PortalResult<Self> {
        let users = UserRepository::new(storage.clone());
        let session = SessionRepository::new(storage.clone());
        let platforms = PlatformRepository::new(storage);

        let state = IdentityState {
            current_user: session.load()?,
            users: users.load_all()?,
            platforms: platforms.load()?,
        };

        match &state.current_user {
            Some(user) => info!("Restored session for user: {}", user.id),
            None => info!("No persisted session"),
        }

        Ok(Self {
            state: RwLock::new(state),
            gate: Mutex::new(()),
            pending: AtomicUsize::new(0),
            latency,
            users,
            session,
            platforms,
        })
    }

    // Guards are only held for synchronous sections. Mutations hold the write
    // guard from their precondition check through the snapshot write to the
    // in-memory commit, so `logout` cannot interleave with them.
    fn read(&self) -> RwLockReadGuard<'_, IdentityState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, IdentityState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    async fn begin(&self, operation: &'static str) -> InFlight<'_> {
        let pending = PendingGuard::enter(&self.pending);
        let gate = self.gate.lock().await;
        debug!("Starting {} after queue", operation);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        InFlight {
            _gate: gate,
            _pending: pending,
        }
    }

    /// Authenticate by exact email match and plaintext password
    ///
    /// Returns `false` for an unknown email and for a wrong password alike.
    pub async fn login(&self, email: &str, password: &str) -> PortalResult<bool> {
        info!("Login attempt for email: {}", email);
        let _op = self.begin("login").await;

        let mut state = self.write();
        let user = match state.users.iter().find(|u| u.email == email) {
            Some(found) if found.password_matches(password) => found.without_password(),
            _ => {
                info!("Login rejected for email: {}", email);
                return Ok(false);
            }
        };

        self.session.save(&user)?;
        info!("User {} logged in", user.id);
        state.current_user = Some(user);

        Ok(true)
    }

    /// Register a new account and log it in
    ///
    /// Returns `false` when `email` is already registered. No format or
    /// strength checks happen here.
    pub async fn register(&self, email: &str, username: &str, password: &str) -> PortalResult<bool> {
        info!("Registration attempt for email: {}", email);
        let _op = self.begin("register").await;

        let mut state = self.write();
        if state.users.iter().any(|u| u.email == email) {
            info!("Registration rejected, email already in use: {}", email);
            return Ok(false);
        }
        let stored = StoredUser::new(NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });

        let mut users = state.users.clone();
        users.push(stored.clone());
        self.users.save_all(&users)?;
        state.users = users;

        let user = stored.without_password();
        self.session.save(&user)?;
        info!("Registered user {} ({})", user.id, user.username);
        state.current_user = Some(user);

        Ok(true)
    }

    /// End the current session; safe to call when already logged out
    pub fn logout(&self) -> PortalResult<()> {
        let mut state = self.write();
        self.session.clear()?;
        match state.current_user.take() {
            Some(user) => info!("User {} logged out", user.id),
            None => debug!("Logout without an active session"),
        }
        Ok(())
    }

    /// Report whether a password reset can be started for `email`
    ///
    /// Nothing is reset; delivering the reset email is outside this store.
    pub async fn reset_password(&self, email: &str) -> PortalResult<bool> {
        info!("Password reset requested for email: {}", email);
        let _op = self.begin("reset_password").await;

        let known = self.read().users.iter().any(|u| u.email == email);
        if !known {
            info!("Password reset rejected, unknown email: {}", email);
        }
        Ok(known)
    }

    /// Merge `update` into the current user and its registered record
    ///
    /// Returns `false` when nobody is logged in, or when the new email is
    /// already used by another account. An update without any field
    /// succeeds without writing. The `user` snapshot is written before the
    /// `users` snapshot; there is no transaction across the two.
    pub async fn update_profile(&self, update: UpdateUser) -> PortalResult<bool> {
        let _op = self.begin("update_profile").await;

        let mut state = self.write();
        let Some(current) = state.current_user.clone() else {
            warn!("Profile update without an active session");
            return Ok(false);
        };
        if update.is_empty() {
            debug!("Empty profile update for user {}", current.id);
            return Ok(true);
        }
        if let Some(email) = &update.email {
            let taken = state
                .users
                .iter()
                .any(|u| &u.email == email && u.id != current.id);
            if taken {
                info!("Profile update rejected, email already in use: {}", email);
                return Ok(false);
            }
        }

        let mut updated = current;
        updated.apply(&update);
        self.session.save(&updated)?;
        state.current_user = Some(updated.clone());

        let mut users = state.users.clone();
        match users.iter_mut().find(|u| u.id == updated.id) {
            Some(record) => record.apply(&update),
            None => warn!("User {} missing from the registered users", updated.id),
        }
        self.users.save_all(&users)?;
        state.users = users;

        info!("Updated profile for user {}", updated.id);
        Ok(true)
    }

    /// Link `platform_id` to the account under the platform-side `username`
    ///
    /// Returns `false` when nobody is logged in. An id outside the fixed
    /// platform set is an [`crate::error::PortalError::UnknownPlatform`].
    pub async fn link_platform(&self, platform_id: &str, username: &str) -> PortalResult<bool> {
        let _op = self.begin("link_platform").await;
        self.update_platform(platform_id, |platform| {
            platform.link(username, Utc::now());
            info!("Linked platform {} as {}", platform.id, username);
        })
    }

    /// Clear the link to `platform_id`
    ///
    /// Returns `false` when nobody is logged in. An id outside the fixed
    /// platform set is an [`crate::error::PortalError::UnknownPlatform`].
    pub async fn unlink_platform(&self, platform_id: &str) -> PortalResult<bool> {
        let _op = self.begin("unlink_platform").await;
        self.update_platform(platform_id, |platform| {
            platform.unlink();
            info!("Unlinked platform {}", platform.id);
        })
    }

    // The write guard spans check, persist and commit, so a concurrent
    // logout lands either before the check or after the commit.
    fn update_platform(
        &self,
        platform_id: &str,
        change: impl FnOnce(&mut PlatformLink),
    ) -> PortalResult<bool> {
        let mut state = self.write();
        if state.current_user.is_none() {
            warn!("Platform change for {} without an active session", platform_id);
            return Ok(false);
        }

        let id: PlatformId = platform_id.parse()?;
        let mut platforms = state.platforms.clone();
        if let Some(platform) = platforms.iter_mut().find(|p| p.id == id) {
            change(platform);
        }

        self.platforms.save(&platforms)?;
        state.platforms = platforms;
        Ok(true)
    }

    /// Wait until every operation queued so far has completed
    pub async fn drain(&self) {
        let _gate = self.gate.lock().await;
        debug!("Operation queue drained");
    }

    /// Linked platforms, in the fixed platform order
    pub fn linked_platforms(&self) -> Vec<PlatformLink> {
        self.read()
            .platforms
            .iter()
            .filter(|p| p.is_linked())
            .cloned()
            .collect()
    }

    /// Every platform, linked or not, in the fixed platform order
    pub fn all_platforms(&self) -> Vec<PlatformLink> {
        self.read().platforms.clone()
    }

    /// The logged-in user, without secret
    pub fn current_user(&self) -> Option<User> {
        self.read().current_user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().current_user.is_some()
    }

    pub fn session_state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    /// Whether any async operation is queued or running
    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }
}
