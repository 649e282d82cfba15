//! `window.history` / `window.location` backend and the popstate hook.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use super::History;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHistory;

impl History for BrowserHistory {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&mut self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.history() {
            Ok(history) => {
                if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                    tracing::warn!("pushState({}) failed: {:?}", path, e);
                }
            }
            Err(e) => tracing::warn!("History API unavailable: {:?}", e),
        }
    }
}

/// Keeps a `popstate` listener registered until dropped
pub struct PopStateListener {
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl PopStateListener {
    pub fn register(mut on_pop: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| on_pop());
        if let Err(e) = window
            .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to listen for popstate: {:?}", e);
            return None;
        }
        Some(Self { callback })
    }
}

impl Drop for PopStateListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                "popstate",
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}
