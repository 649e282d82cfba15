//! Navigation context: the selected menu, kept in step with history.

use dioxus::prelude::*;

use crate::app::session_context::SessionContext;
use crate::navigation::{MenuKey, Navigator, PlatformHistory};
use crate::session::SessionPhase;

#[derive(Clone, Copy)]
pub struct NavigationContext {
    navigator: Signal<Navigator<PlatformHistory>>,
}

impl NavigationContext {
    pub fn selected(&self) -> MenuKey {
        self.navigator.read().selected()
    }

    pub fn select(&self, menu: MenuKey) {
        let mut navigator = self.navigator;
        navigator.write().select(menu);
    }

    pub fn request(&self, menu: MenuKey) {
        let mut navigator = self.navigator;
        navigator.write().request(menu);
    }

    pub fn on_popstate(&self) {
        let mut navigator = self.navigator;
        let resolved = navigator.write().on_popstate();
        if resolved.is_none() {
            tracing::debug!("popstate to an unmapped path, keeping selection");
        }
    }
}

/// Initialize navigation context provider - call once at app root, after
/// the session provider
pub fn use_navigation_provider(session: SessionContext) -> NavigationContext {
    let navigator = use_signal(|| Navigator::new(PlatformHistory::default()));
    let ctx = NavigationContext { navigator };
    use_context_provider(|| ctx);

    // Mount once the session settles, then follow sign-in/sign-out
    use_effect(move || {
        let authenticated = match session.phase() {
            SessionPhase::Uninitialized | SessionPhase::Loading => return,
            SessionPhase::Authenticated => true,
            SessionPhase::Unauthenticated => false,
        };
        let mut navigator = navigator;
        navigator.write().on_auth_changed(authenticated);
    });

    ctx
}

/// Get navigation context - use in any component
pub fn use_navigation() -> NavigationContext {
    use_context::<NavigationContext>()
}
