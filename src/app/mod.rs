//! Dioxus application root.
//!
//! Provides the shared contexts (session, navigation, bus, theme, panels)
//! and picks the view from the session phase and the selected menu.

use dioxus::prelude::*;

pub mod components;
pub mod events;
pub mod navigation_context;
pub mod pages;
pub mod panels_context;
pub mod session_context;
pub mod theme;

use components::{DoorTransition, Layout};
use events::use_event_bus_provider;
use navigation_context::{use_navigation, use_navigation_provider};
use pages::{
    Chat, Configuration, Devices, Home, House3d, Login, Music, RecoverPassword, Routines, Security,
};
use panels_context::use_panels_provider;
use session_context::{use_session, use_session_provider};
use theme::use_theme_provider;

use crate::navigation::MenuKey;
use crate::storage::{self, SharedStore};

/// Root app component
#[component]
pub fn App() -> Element {
    let store: SharedStore = use_hook(storage::platform_store);

    // Order matters: navigation watches the session, the bus drives both
    let session = use_session_provider(store.clone());
    let navigation = use_navigation_provider(session);
    use_event_bus_provider(session, navigation);
    use_theme_provider(store.clone());
    use_panels_provider(store);

    rsx! {
        document::Link {
            rel: "stylesheet",
            href: asset!("/public/dashboard.css")
        }
        Shell {}
    }
}

/// Picks overlay, auth page or dashboard
#[component]
fn Shell() -> Element {
    let session = use_session();
    let navigation = use_navigation();
    let selected = navigation.selected();

    if session.is_loading() {
        return rsx! {
            DoorTransition { greeting: None }
        };
    }

    if session.is_post_login_transition() {
        let greeting = session.user().map(|u| u.display_name);
        return rsx! {
            DoorTransition { greeting }
        };
    }

    if !session.is_authenticated() {
        return rsx! {
            if selected == MenuKey::RecoverPassword {
                RecoverPassword {}
            } else {
                Login {}
            }
        };
    }

    rsx! {
        Layout { active: selected,
            {match selected {
                MenuKey::Home | MenuKey::Login | MenuKey::RecoverPassword => rsx! { Home {} },
                MenuKey::House3d => rsx! { House3d {} },
                MenuKey::Devices => rsx! { Devices {} },
                MenuKey::Security => rsx! { Security {} },
                MenuKey::Music => rsx! { Music {} },
                MenuKey::Chat => rsx! { Chat {} },
                MenuKey::Routines => rsx! { Routines {} },
                MenuKey::Config => rsx! { Configuration {} },
            }}
        }
    }
}
