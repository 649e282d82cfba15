//! Panels without a backend yet.

use dioxus::prelude::*;

#[component]
fn ComingSoon(icon: &'static str, description: &'static str) -> Element {
    rsx! {
        div { class: "card placeholder",
            p { class: "placeholder-icon", "{icon}" }
            p { class: "text-muted", "{description}" }
            small { class: "text-muted", "Disponible próximamente" }
        }
    }
}

#[component]
pub fn House3d() -> Element {
    rsx! {
        ComingSoon { icon: "🧊", description: "Vista 3D interactiva de tu casa" }
    }
}

#[component]
pub fn Music() -> Element {
    rsx! {
        ComingSoon { icon: "🎵", description: "Reproduce música en cualquier habitación" }
    }
}

#[component]
pub fn Chat() -> Element {
    rsx! {
        ComingSoon { icon: "💬", description: "Habla con tu asistente del hogar" }
    }
}
