//! Reusable form input components.

use dioxus::prelude::*;

/// A labeled text (or password) input.
#[component]
pub fn TextInput(
    /// Input label
    label: &'static str,
    /// Current value
    value: String,
    /// Called on every keystroke
    on_input: EventHandler<String>,
    #[props(default = "text")] input_type: &'static str,
    #[props(default)] placeholder: &'static str,
) -> Element {
    rsx! {
        label { class: "field",
            span { class: "field-label", "{label}" }
            input {
                class: "input",
                r#type: input_type,
                placeholder: placeholder,
                value: "{value}",
                oninput: move |e| on_input.call(e.value()),
            }
        }
    }
}

/// A labeled toggle switch with description.
#[component]
pub fn ToggleInput(
    /// Input label
    label: String,
    /// Description text shown below label
    #[props(default)]
    description: String,
    /// Current checked state
    checked: bool,
    #[props(default = false)] disabled: bool,
    /// Called when the toggle changes
    on_change: EventHandler<bool>,
) -> Element {
    rsx! {
        div { class: "toggle-row",
            div { class: "toggle-text",
                span { class: "field-label", "{label}" }
                if !description.is_empty() {
                    p { class: "text-muted", "{description}" }
                }
            }
            input {
                class: "toggle",
                r#type: "checkbox",
                checked: checked,
                disabled: disabled,
                onchange: move |e| on_change.call(e.checked()),
            }
        }
    }
}
