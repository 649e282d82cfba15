//! Dismissable inline message for validation and backend errors.

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum MessageKind {
    #[default]
    Error,
    Success,
}

/// A message box with a close button, shown above the form it refers to.
#[component]
pub fn InlineMessage(
    /// Text to display
    message: String,
    #[props(default)] kind: MessageKind,
    /// Called when the dismiss button is clicked
    on_dismiss: EventHandler<()>,
) -> Element {
    let class = match kind {
        MessageKind::Error => "inline-message error",
        MessageKind::Success => "inline-message success",
    };

    rsx! {
        div { class: "{class}", role: "alert",
            span { "{message}" }
            button {
                class: "btn-ghost",
                "aria-label": "Cerrar",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}
