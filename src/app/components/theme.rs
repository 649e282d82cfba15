//! Theme switcher for auto/light/dark modes.

use dioxus::prelude::*;

use crate::app::theme::{use_theme, Theme};

/// Segmented control over the three theme options.
#[component]
pub fn ThemeSwitcher() -> Element {
    let theme = use_theme();
    let current = theme.get();

    rsx! {
        div { class: "theme-switcher",
            for option in Theme::ALL {
                button {
                    key: "{option.as_str()}",
                    class: if option == current { "active" } else { "" },
                    onclick: move |_| theme.set(option),
                    "{option.label()}"
                }
            }
        }
    }
}
