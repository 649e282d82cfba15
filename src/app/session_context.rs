//! Session context shared by every view.
//!
//! Wraps the single [`Session`] in a signal. Created once at the app root;
//! pages reach it through [`use_session`].

use dioxus::dioxus_core::spawn_forever;
use dioxus::prelude::*;

use crate::session::{Session, SessionError, SessionPhase, UserProfile, POST_LOGIN_TRANSITION};
use crate::storage::SharedStore;
use crate::timer;

#[derive(Clone, Copy)]
pub struct SessionContext {
    session: Signal<Session>,
}

impl SessionContext {
    pub fn phase(&self) -> SessionPhase {
        self.session.read().phase()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.session.read().is_loading()
    }

    pub fn is_post_login_transition(&self) -> bool {
        self.session.read().is_post_login_transition()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.read().user().cloned()
    }

    /// Sign in and arm the post-login overlay timer.
    ///
    /// The timer runs on the root scope: the login page that called this is
    /// unmounted as soon as the session flips.
    pub fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let mut session = self.session;
        let ticket = session.write().login(username, password)?;
        spawn_forever(async move {
            timer::sleep(POST_LOGIN_TRANSITION).await;
            session.write().finish_post_login_transition(ticket);
        });
        Ok(())
    }

    /// Navigation reacts to the auth change and selects Login
    pub fn logout(&self) {
        let mut session = self.session;
        session.write().logout();
    }

    pub fn check_auth(&self) {
        let mut session = self.session;
        session.write().check_auth();
    }
}

/// Initialize session context provider - call once at app root
pub fn use_session_provider(store: SharedStore) -> SessionContext {
    let session = use_signal(move || Session::new(store));
    let ctx = SessionContext { session };
    use_context_provider(|| ctx);

    // Hydrate from storage once the client is running
    use_effect(move || {
        ctx.check_auth();
    });

    ctx
}

/// Get session context - use in any component
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}
