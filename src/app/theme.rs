//! Theme management with storage persistence.
//!
//! `Auto` follows the clock: light from 06:00 to 18:59, dark otherwise.
//! A root task re-resolves it at each switch.

use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use dioxus::prelude::*;

use crate::storage::{SharedStore, THEME_KEY};

/// Theme options
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Auto, Theme::Light, Theme::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::Auto,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Auto => "Automático",
            Theme::Light => "Claro",
            Theme::Dark => "Oscuro",
        }
    }

    /// Concrete theme at the given local hour
    pub fn resolve(&self, hour: u32) -> Theme {
        match self {
            Theme::Auto if (DAY_START..NIGHT_START).contains(&hour) => Theme::Light,
            Theme::Auto => Theme::Dark,
            other => *other,
        }
    }

    /// Concrete theme right now
    pub fn resolve_now(&self) -> Theme {
        self.resolve(chrono::Local::now().hour())
    }

    /// CSS class for :root
    pub fn css_class(&self) -> &'static str {
        match self.resolve_now() {
            Theme::Light => "theme-light",
            _ => "theme-dark",
        }
    }
}

const DAY_START: u32 = 6;
const NIGHT_START: u32 = 19;

/// Time from `now` until `Auto` next changes (06:00 or 19:00).
/// Sub-second precision is dropped, so the wait never ends early.
pub fn until_next_switch(now: NaiveTime) -> Duration {
    let next_hour = match now.hour() {
        h if h < DAY_START => DAY_START,
        h if h < NIGHT_START => NIGHT_START,
        _ => 24 + DAY_START,
    };
    let remaining = next_hour * 3600 - now.num_seconds_from_midnight();
    Duration::from_secs(u64::from(remaining))
}

/// Global theme state shared via context
#[derive(Clone, Copy)]
pub struct ThemeContext {
    pub current: Signal<Theme>,
    /// `current` with `Auto` resolved against the clock
    resolved: Signal<Theme>,
    store: Signal<SharedStore>,
}

impl ThemeContext {
    /// Get current theme
    pub fn get(&self) -> Theme {
        (self.current)()
    }

    /// CSS class of the theme in effect; re-renders at each `Auto` switch
    pub fn css_class(&self) -> &'static str {
        (self.resolved)().css_class()
    }

    /// Set and persist theme
    pub fn set(&self, theme: Theme) {
        let mut current = self.current;
        current.set(theme);
        let mut resolved = self.resolved;
        resolved.set(theme.resolve_now());

        if let Err(e) = self.store.peek().set(THEME_KEY, theme.as_str()) {
            tracing::warn!("Failed to save theme: {}", e);
        }

        #[cfg(target_arch = "wasm32")]
        apply_theme_to_dom(theme);
    }

    /// Re-resolve `Auto` against the clock
    pub fn refresh_auto(&self) {
        let next = self.current.peek().resolve_now();
        if *self.resolved.peek() != next {
            tracing::debug!("Auto theme switched to {}", next.as_str());
            let mut resolved = self.resolved;
            resolved.set(next);
            #[cfg(target_arch = "wasm32")]
            apply_theme_to_dom(next);
        }
    }
}

/// Initialize theme context provider - call once at app root
pub fn use_theme_provider(store: SharedStore) {
    let current = use_signal(|| Theme::Auto);
    let resolved = use_signal(|| Theme::Auto.resolve_now());
    let store = use_signal(move || store);

    let ctx = ThemeContext {
        current,
        resolved,
        store,
    };
    use_context_provider(|| ctx);

    // Client-side only: load the saved choice and apply
    #[cfg(target_arch = "wasm32")]
    {
        use_effect(move || {
            let saved = match store.peek().get(THEME_KEY) {
                Ok(Some(value)) => Theme::parse(&value),
                _ => Theme::Auto,
            };
            let mut current = current;
            current.set(saved);
            let mut resolved = resolved;
            resolved.set(saved.resolve_now());
            apply_theme_to_dom(saved);
        });

        // Lives as long as the root scope
        use_hook(move || {
            spawn(async move {
                loop {
                    let wait = until_next_switch(chrono::Local::now().time());
                    crate::timer::sleep(wait).await;
                    ctx.refresh_auto();
                }
            })
        });
    }
}

/// Get theme context - use in any component
pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>()
}

#[cfg(target_arch = "wasm32")]
fn apply_theme_to_dom(theme: Theme) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(root) = document.document_element() {
                let _ = root.class_list().remove_2("theme-light", "theme-dark");
                let _ = root.class_list().add_1(theme.css_class());
            }
        }
    }
}
