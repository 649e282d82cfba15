//! Sidebar navigation.

use dioxus::prelude::*;

use crate::app::navigation_context::use_navigation;
use crate::navigation::MenuKey;

fn icon(menu: MenuKey) -> &'static str {
    match menu {
        MenuKey::Home => "🏠",
        MenuKey::House3d => "🧊",
        MenuKey::Devices => "💡",
        MenuKey::Security => "🛡",
        MenuKey::Music => "🎵",
        MenuKey::Chat => "💬",
        MenuKey::Routines => "⏱",
        MenuKey::Config => "⚙",
        MenuKey::RecoverPassword | MenuKey::Login => "",
    }
}

/// Sidebar listing every dashboard panel. Links carry real paths so they
/// also work without the client, but clicks are handled in place.
#[component]
pub fn Nav() -> Element {
    let navigation = use_navigation();
    let active = navigation.selected();
    let mut collapsed = use_signal(|| false);

    let class = if collapsed() { "sidebar collapsed" } else { "sidebar" };

    rsx! {
        nav { class: "{class}",
            button {
                class: "sidebar-toggle",
                "aria-label": if collapsed() { "Abrir menú" } else { "Cerrar menú" },
                onclick: move |_| collapsed.toggle(),
                "☰"
            }
            ul {
                for menu in MenuKey::SIDEBAR {
                    li { key: "{menu.path()}",
                        a {
                            href: menu.path(),
                            class: if menu == active { "nav-item active" } else { "nav-item" },
                            "aria-current": if menu == active { "page" } else { "false" },
                            onclick: move |e: MouseEvent| {
                                e.prevent_default();
                                navigation.select(menu);
                            },
                            span { class: "nav-icon", "{icon(menu)}" }
                            span { class: "nav-label", "{menu.label()}" }
                        }
                    }
                }
            }
        }
    }
}
