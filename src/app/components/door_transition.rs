//! Full-screen overlay shown while the session loads and right after login.

use dioxus::prelude::*;

#[component]
pub fn DoorTransition(
    /// Name to greet; `None` while the session is still loading
    greeting: Option<String>,
) -> Element {
    rsx! {
        div { class: "door-transition",
            div { class: "door door-left" }
            div { class: "door door-right" }
            div { class: "door-caption",
                if let Some(name) = greeting {
                    h2 { "Bienvenido, {name}" }
                    p { class: "text-muted", "Preparando tu hogar..." }
                } else {
                    p { class: "text-muted", "Cargando..." }
                }
            }
        }
    }
}
