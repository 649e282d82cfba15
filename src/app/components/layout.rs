//! Layout component wrapping every dashboard page.

use dioxus::prelude::*;

use super::nav::Nav;
use super::notification_tray::NotificationBell;
use crate::app::events::use_event_bus;
use crate::app::panels_context::use_panels;
use crate::app::session_context::use_session;
use crate::app::theme::use_theme;
use crate::navigation::MenuKey;

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Panel being shown (title and active nav item)
    pub active: MenuKey,
    /// Page content
    pub children: Element,
}

/// Main layout: sidebar, header with the bell and user menu, content.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("SHD_VERSION");
    let git_sha = env!("SHD_GIT_SHA");
    let full_title = format!("{} - Casa Inteligente", props.active.label());

    let session = use_session();
    let bus = use_event_bus();
    let panels = use_panels();
    let theme = use_theme();

    let user_name = session
        .user()
        .map(|u| u.display_name)
        .unwrap_or_else(|| "Usuario".to_string());
    let theme_class = theme.css_class();

    // Initial fetch for the badge
    use_effect(move || {
        spawn(panels.refresh_notifications());
    });

    rsx! {
        document::Title { "{full_title}" }

        div { class: "app {theme_class}",
            Nav {}
            div { class: "content",
                header { class: "topbar",
                    h1 { "{props.active.label()}" }
                    div { class: "topbar-actions",
                        NotificationBell {}
                        span { class: "user-name", "{user_name}" }
                        button {
                            class: "btn-secondary",
                            onclick: move |_| {
                                bus.request_logout();
                            },
                            "Cerrar sesión"
                        }
                    }
                }
                main { {props.children} }
                footer {
                    small { class: "text-muted", "Casa Inteligente v{version} ({git_sha})" }
                }
            }
        }
    }
}
