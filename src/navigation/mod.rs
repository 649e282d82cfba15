//! Navigation state machine: selected menu ⇄ address bar ⇄ history.
//!
//! Inputs are explicit menu selections, `popstate` (back/forward), in-app
//! navigation requests and authentication changes. After every change of
//! selection the machine pushes the selection's path, but only when it
//! differs from the last path it recorded, so reacting to the browser's own
//! navigation never re-pushes the entry the browser is already on.

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserHistory, PopStateListener};

/// History backing the running app
#[cfg(target_arch = "wasm32")]
pub type PlatformHistory = BrowserHistory;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformHistory = MemoryHistory;

/// Top-level dashboard panels. Serialized with their display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuKey {
    #[serde(rename = "Inicio")]
    Home,
    #[serde(rename = "Casa 3D")]
    House3d,
    #[serde(rename = "Gestión de Dispositivos")]
    Devices,
    #[serde(rename = "Monitoreo y Seguridad")]
    Security,
    #[serde(rename = "Música")]
    Music,
    #[serde(rename = "Chat")]
    Chat,
    #[serde(rename = "Rutinas")]
    Routines,
    #[serde(rename = "Configuración")]
    Config,
    #[serde(rename = "Recuperar Contraseña")]
    RecoverPassword,
    #[serde(rename = "Login")]
    Login,
}

impl MenuKey {
    pub const ALL: [MenuKey; 10] = [
        MenuKey::Home,
        MenuKey::House3d,
        MenuKey::Devices,
        MenuKey::Security,
        MenuKey::Music,
        MenuKey::Chat,
        MenuKey::Routines,
        MenuKey::Config,
        MenuKey::RecoverPassword,
        MenuKey::Login,
    ];

    /// Entries shown in the sidebar, in display order
    pub const SIDEBAR: [MenuKey; 8] = [
        MenuKey::Home,
        MenuKey::House3d,
        MenuKey::Devices,
        MenuKey::Security,
        MenuKey::Music,
        MenuKey::Chat,
        MenuKey::Routines,
        MenuKey::Config,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuKey::Home => "Inicio",
            MenuKey::House3d => "Casa 3D",
            MenuKey::Devices => "Gestión de Dispositivos",
            MenuKey::Security => "Monitoreo y Seguridad",
            MenuKey::Music => "Música",
            MenuKey::Chat => "Chat",
            MenuKey::Routines => "Rutinas",
            MenuKey::Config => "Configuración",
            MenuKey::RecoverPassword => "Recuperar Contraseña",
            MenuKey::Login => "Login",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            MenuKey::Home => "/inicio",
            MenuKey::House3d => "/casa3d",
            MenuKey::Devices => "/dispositivos",
            MenuKey::Security => "/seguridad",
            MenuKey::Music => "/musica",
            MenuKey::Chat => "/chat",
            MenuKey::Routines => "/rutinas",
            MenuKey::Config => "/configuracion",
            MenuKey::RecoverPassword => "/recuperar",
            MenuKey::Login => "/login",
        }
    }

    /// Look up the menu for a path. Query and fragment are ignored, as is a
    /// trailing slash.
    pub fn from_path(path: &str) -> Option<MenuKey> {
        let path = normalize_path(path);
        MenuKey::ALL.into_iter().find(|menu| menu.path() == path)
    }

    /// Panels reachable without a session
    pub fn is_public(self) -> bool {
        matches!(self, MenuKey::Login | MenuKey::RecoverPassword)
    }
}

/// Reduce a path or URL to its bare path: `/rutinas/?x=1#top` → `/rutinas`
pub fn normalize_path(raw: &str) -> String {
    let parsed = url::Url::parse("http://localhost/").and_then(|base| base.join(raw));
    let path = match &parsed {
        Ok(u) => u.path(),
        Err(_) => raw,
    };
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// The slice of browser history the navigation machine needs
pub trait History {
    /// Path currently shown in the address bar
    fn current_path(&self) -> String;
    /// Add a history entry and make it current
    fn push(&mut self, path: &str);
}

/// In-memory history with back/forward, for SSR and tests
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial_path: &str) -> Self {
        Self {
            entries: vec![initial_path.to_string()],
            index: 0,
        }
    }

    /// Move back one entry; the caller then delivers `popstate`
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Simulate the user typing a URL (no popstate)
    pub fn visit(&mut self, path: &str) {
        self.push(path);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn current_path(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push(&mut self, path: &str) {
        // Pushing discards any forward entries, like the browser does
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index = self.entries.len() - 1;
    }
}

/// Selected menu plus the bookkeeping that keeps it in step with history
pub struct Navigator<H: History> {
    history: H,
    selected: MenuKey,
    last_pushed: Option<String>,
    authenticated: Option<bool>,
}

impl<H: History> Navigator<H> {
    pub fn new(history: H) -> Self {
        Self {
            history,
            selected: MenuKey::Home,
            last_pushed: None,
            authenticated: None,
        }
    }

    pub fn selected(&self) -> MenuKey {
        self.selected
    }

    /// Whether [`Navigator::mount`] has run
    pub fn is_mounted(&self) -> bool {
        self.authenticated.is_some()
    }

    pub fn last_pushed_path(&self) -> Option<&str> {
        self.last_pushed.as_deref()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Resolve the initial selection from the address bar. Unmapped paths
    /// fall back to Home when signed in, Login otherwise.
    pub fn mount(&mut self, authenticated: bool) -> MenuKey {
        let current = normalize_path(&self.history.current_path());
        let resolved = MenuKey::from_path(&current);
        self.authenticated = Some(authenticated);
        self.selected = resolved.unwrap_or(if authenticated {
            MenuKey::Home
        } else {
            MenuKey::Login
        });

        if resolved.is_some() {
            // Already on the right entry
            self.last_pushed = Some(current);
        }

        if authenticated {
            // A signed-in user landing on /login or /recuperar goes to Home
            if self.selected.is_public() {
                self.selected = MenuKey::Home;
            }
        } else if !self.selected.is_public() {
            self.selected = MenuKey::Login;
        }
        self.sync_history();
        tracing::debug!("Navigation mounted at {:?}", self.selected);
        self.selected
    }

    /// Explicit selection from the UI. Returns true if a history entry was
    /// pushed.
    pub fn select(&mut self, menu: MenuKey) -> bool {
        self.selected = menu;
        self.sync_history()
    }

    /// In-app navigation request. Always carries a valid key.
    pub fn request(&mut self, menu: MenuKey) -> bool {
        tracing::debug!("Navigation requested: {:?}", menu);
        self.select(menu)
    }

    /// Back/forward happened: follow the address bar if it maps to a menu,
    /// otherwise keep the current selection.
    pub fn on_popstate(&mut self) -> Option<MenuKey> {
        let current = normalize_path(&self.history.current_path());
        let menu = MenuKey::from_path(&current)?;
        self.selected = menu;
        // The browser is already on this entry
        self.last_pushed = Some(current);
        self.sync_history();
        Some(menu)
    }

    /// React to an authentication change. Signing in while on `/login`
    /// selects Home; signing out selects Login unconditionally. Repeats of
    /// the same state are ignored so unrelated session updates do not move
    /// the user.
    pub fn on_auth_changed(&mut self, authenticated: bool) {
        match self.authenticated {
            None => {
                self.mount(authenticated);
                return;
            }
            Some(previous) if previous == authenticated => return,
            Some(_) => {}
        }
        self.authenticated = Some(authenticated);

        if authenticated {
            let current = normalize_path(&self.history.current_path());
            if current == MenuKey::Login.path() {
                self.selected = MenuKey::Home;
            }
        } else {
            self.selected = MenuKey::Login;
        }
        self.sync_history();
    }

    fn sync_history(&mut self) -> bool {
        let path = self.selected.path();
        if self.last_pushed.as_deref() == Some(path) {
            return false;
        }
        tracing::debug!("Pushing history entry {}", path);
        self.history.push(path);
        self.last_pushed = Some(path.to_string());
        true
    }
}
