//! Modal dialog with a backdrop that closes on click.

use dioxus::prelude::*;

#[component]
pub fn Modal(
    title: String,
    is_open: bool,
    on_close: EventHandler<()>,
    children: Element,
) -> Element {
    if !is_open {
        return rsx! {};
    }

    rsx! {
        div { class: "modal",
            div { class: "modal-backdrop", onclick: move |_| on_close.call(()) }
            div { class: "modal-panel", role: "dialog",
                header { class: "modal-header",
                    h3 { "{title}" }
                    button {
                        class: "btn-ghost",
                        "aria-label": "Cerrar",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                div { class: "modal-body", {children} }
            }
        }
    }
}
