//! Session state: who is signed in and whether the dashboard may render.
//!
//! `Uninitialized → Loading → {Authenticated, Unauthenticated}`. The only
//! authenticated→unauthenticated edge is [`Session::logout`]; re-entering
//! `Loading` from `Authenticated` only happens through an explicit
//! [`Session::check_auth`]. A successful login additionally raises a timed
//! post-login overlay that the shell renders as a blocking transition.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::storage::{self, SharedStore, StorageError, ACCESS_TOKEN_KEY, USER_KEY};
use crate::transition::{Transition, TransitionTicket};

/// How long the post-login transition view stays up
pub const POST_LOGIN_TRANSITION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Profile of the signed-in user, persisted under the `user` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

impl UserProfile {
    /// Derive a profile from the login name. Same input, same profile.
    pub fn from_username(username: &str) -> Self {
        let digest = Sha256::digest(username.as_bytes());
        // First 6 bytes keep the id within JSON's safe integer range
        let id = u64::from_str_radix(&hex::encode(&digest[..6]), 16).unwrap_or_default();

        let mut chars = username.chars();
        let display_name = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        Self {
            id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            display_name,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Usuario y contraseña son obligatorios.")]
    MissingCredentials,
    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

/// The session object, created once at application start
pub struct Session {
    store: SharedStore,
    phase: SessionPhase,
    user: Option<UserProfile>,
    access_token: Option<String>,
    post_login: Transition,
}

impl Session {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            phase: SessionPhase::Uninitialized,
            user: None,
            access_token: None,
            post_login: Transition::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// True until the persisted session has been inspected
    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Uninitialized | SessionPhase::Loading
        )
    }

    pub fn is_post_login_transition(&self) -> bool {
        self.post_login.is_active()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Hydrate from storage. Never fails: unreadable or corrupt state is
    /// cleared and the session ends up logged out.
    pub fn check_auth(&mut self) {
        self.phase = SessionPhase::Loading;

        let token = match self.store.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read access token: {}", e);
                None
            }
        };
        let profile = storage::load_json::<UserProfile>(self.store.as_ref(), USER_KEY);

        match (token, profile) {
            (Some(token), Ok(Some(profile))) => {
                tracing::info!("Restored session for {}", profile.username);
                self.access_token = Some(token);
                self.user = Some(profile);
                self.phase = SessionPhase::Authenticated;
            }
            (_, Err(e)) => {
                tracing::warn!("Discarding stored session: {}", e);
                self.clear_persisted();
                self.reset();
            }
            _ => {
                tracing::debug!("No stored session");
                self.reset();
            }
        }
    }

    /// Sign in.
    ///
    /// Mock-only: any non-empty credential pair is accepted and the profile
    /// is fabricated from the username. A real credential check belongs
    /// here once an authentication backend exists.
    ///
    /// Returns the ticket that ends the post-login transition after
    /// [`POST_LOGIN_TRANSITION`].
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<TransitionTicket, SessionError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let profile = UserProfile::from_username(username);
        let token = format!("mock_token_{}", chrono::Utc::now().timestamp_millis());

        if let Err(e) = self.persist(&token, &profile) {
            tracing::warn!("Login failed for {}: {}", username, e);
            self.clear_persisted();
            self.reset();
            return Err(e.into());
        }

        tracing::info!("Logged in as {}", profile.username);
        self.access_token = Some(token);
        self.user = Some(profile);
        self.phase = SessionPhase::Authenticated;
        Ok(self.post_login.start())
    }

    /// End the post-login overlay. Stale tickets are ignored.
    pub fn finish_post_login_transition(&mut self, ticket: TransitionTicket) -> bool {
        self.post_login.finish(ticket)
    }

    /// Clear persisted state and drop back to logged-out defaults
    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            tracing::info!("Logging out {}", user.username);
        }
        self.clear_persisted();
        self.reset();
    }

    fn persist(&self, token: &str, profile: &UserProfile) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, token)?;
        storage::save_json(self.store.as_ref(), USER_KEY, profile)
    }

    fn clear_persisted(&self) {
        for key in [ACCESS_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to remove {}: {}", key, e);
            }
        }
    }

    fn reset(&mut self) {
        self.phase = SessionPhase::Unauthenticated;
        self.user = None;
        self.access_token = None;
        self.post_login.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::rc::Rc;

    fn session_with(store: MemoryStore) -> (Session, Rc<MemoryStore>) {
        let store = Rc::new(store);
        (Session::new(store.clone()), store)
    }

    #[test]
    fn test_profile_is_deterministic() {
        let a = UserProfile::from_username("alice");
        let b = UserProfile::from_username("alice");
        assert_eq!(a, b);
        assert_eq!(a.email, "alice@example.com");
        assert_eq!(a.display_name, "Alice");
        assert_ne!(a.id, UserProfile::from_username("bob").id);
    }

    #[test]
    fn test_profile_serializes_display_name_as_name() {
        let json = serde_json::to_value(UserProfile::from_username("bob")).unwrap();
        assert_eq!(json["name"], "Bob");
        assert_eq!(json["username"], "bob");
    }

    #[test]
    fn test_starts_uninitialized_and_loading() {
        let (session, _) = session_with(MemoryStore::new());
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert!(session.is_loading());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_check_auth_without_state() {
        let (mut session, _) = session_with(MemoryStore::new());
        session.check_auth();
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_check_auth_restores_login() {
        let (mut first, store) = session_with(MemoryStore::new());
        first.login("alice", "x").unwrap();

        let mut restored = Session::new(store);
        restored.check_auth();
        assert!(restored.is_authenticated());
        assert_eq!(restored.user().unwrap().username, "alice");
        assert!(restored.access_token().unwrap().starts_with("mock_token_"));
        // The overlay only follows an interactive login
        assert!(!restored.is_post_login_transition());
    }

    #[test]
    fn test_check_auth_token_without_profile_is_logged_out() {
        let (mut session, _) =
            session_with(MemoryStore::new().with_entry(ACCESS_TOKEN_KEY, "mock_token_1"));
        session.check_auth();
        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
    }

    #[test]
    fn test_check_auth_corrupt_profile_clears_storage() {
        let (mut session, store) = session_with(
            MemoryStore::new()
                .with_entry(ACCESS_TOKEN_KEY, "mock_token_1")
                .with_entry(USER_KEY, "{broken"),
        );
        session.check_auth();
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!store.contains(ACCESS_TOKEN_KEY));
        assert!(!store.contains(USER_KEY));
    }

    #[test]
    fn test_check_auth_is_idempotent() {
        let (mut session, _) = session_with(MemoryStore::new());
        session.login("alice", "x").unwrap();
        session.check_auth();
        session.check_auth();
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().username, "alice");
    }

    #[test]
    fn test_login_rejects_empty_credentials() {
        let (mut session, store) = session_with(MemoryStore::new());
        session.check_auth();
        assert!(matches!(
            session.login("", "x"),
            Err(SessionError::MissingCredentials)
        ));
        assert!(matches!(
            session.login("alice", ""),
            Err(SessionError::MissingCredentials)
        ));
        assert!(store.is_empty());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_persistence_failure_resets() {
        let (mut session, _) = session_with(MemoryStore::read_only());
        session.check_auth();
        let err = session.login("alice", "x").unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.access_token().is_none());
        assert!(!session.is_post_login_transition());
    }

    #[test]
    fn test_login_raises_transition_until_ticket_returns() {
        let (mut session, _) = session_with(MemoryStore::new());
        let ticket = session.login("alice", "x").unwrap();
        assert!(session.is_post_login_transition());
        assert!(session.finish_post_login_transition(ticket));
        assert!(!session.is_post_login_transition());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_stale_transition_ticket_after_relogin() {
        let (mut session, _) = session_with(MemoryStore::new());
        let first = session.login("alice", "x").unwrap();
        session.logout();
        let second = session.login("bob", "y").unwrap();

        assert!(!session.finish_post_login_transition(first));
        assert!(session.is_post_login_transition());
        assert!(session.finish_post_login_transition(second));
    }

    #[test]
    fn test_logout_clears_everything() {
        let (mut session, store) = session_with(MemoryStore::new());
        session.login("alice", "x").unwrap();
        store.set("userLocation", "{}").unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(session.access_token().is_none());
        assert!(!session.is_post_login_transition());
        assert!(!store.contains(ACCESS_TOKEN_KEY));
        assert!(!store.contains(USER_KEY));
        // Unrelated keys survive
        assert!(store.contains("userLocation"));
    }
}
