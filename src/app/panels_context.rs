//! Panel state shared across pages.
//!
//! Held at the root so switching menus keeps device states, routines and
//! the notification list. Backend calls release the signal borrow while the
//! call is in flight.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::panels::backend::{DeviceBackend, MockBackend, NotificationBackend};
use crate::panels::devices::{DeviceId, DevicePanel};
use crate::panels::family::FamilyPanel;
use crate::panels::location::LocationPanel;
use crate::panels::notifications::{
    archive_all, NotificationId, NotificationTray, TrayToggle, BELL_ANIMATION, CLOSE_ANIMATION,
};
use crate::panels::routines::RoutineStore;
use crate::panels::security::SecurityPanel;
use crate::panels::PanelError;
use crate::storage::SharedStore;
use crate::timer;

#[derive(Clone, Copy)]
pub struct PanelsContext {
    pub devices: Signal<DevicePanel>,
    pub security: Signal<SecurityPanel>,
    pub routines: Signal<RoutineStore>,
    pub family: Signal<FamilyPanel>,
    pub location: Signal<LocationPanel>,
    pub tray: Signal<NotificationTray>,
    backend: Signal<Rc<MockBackend>>,
}

impl PanelsContext {
    pub fn backend(&self) -> Rc<MockBackend> {
        self.backend.peek().clone()
    }

    /// Optimistic toggle; the flip is visible while the backend call runs
    pub async fn toggle_device(self, id: DeviceId) -> Result<(), PanelError> {
        let mut devices = self.devices;
        let pending = devices.write().begin_toggle(id)?;
        let result = self.backend().update_device(id, pending.requested).await;
        let committed = devices.write().finish_toggle(pending, result);
        committed
    }

    pub async fn refresh_notifications(self) {
        let mut tray = self.tray;
        let list = match self.backend().fetch_notifications().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Keeping notifications: {}", e);
                return;
            }
        };
        let bell = tray.write().set_notifications(list);
        if let Some(ticket) = bell {
            timer::sleep(BELL_ANIMATION).await;
            tray.write().finish_bell(ticket);
        }
    }

    pub async fn toggle_tray(self) {
        let mut tray = self.tray;
        let toggled = tray.write().toggle();
        match toggled {
            TrayToggle::Opened => self.refresh_notifications().await,
            TrayToggle::Closing(ticket) => {
                timer::sleep(CLOSE_ANIMATION).await;
                tray.write().finish_closing(ticket);
            }
        }
    }

    pub async fn remove_notification(self, id: NotificationId) -> bool {
        let mut tray = self.tray;
        let archived = self.backend().archive(id).await;
        let removed = tray.write().apply_removal(id, archived);
        removed
    }

    pub async fn clear_notifications(self) -> bool {
        let mut tray = self.tray;
        let ids = tray.peek().ids();
        let backend = self.backend();
        let results = archive_all(backend.as_ref(), ids).await;
        let cleared = tray.write().apply_clear_all(&results);
        cleared
    }
}

/// Initialize panel state - call once at app root
pub fn use_panels_provider(store: SharedStore) -> PanelsContext {
    let devices = use_signal(DevicePanel::with_mock_data);
    let security = use_signal(SecurityPanel::with_mock_data);
    let routines = use_signal(RoutineStore::with_mock_data);
    // Whoever signs in on this device owns the household
    let family = use_signal(|| FamilyPanel::new(true));
    let location = use_signal(move || LocationPanel::load(store));
    let tray = use_signal(NotificationTray::default);
    let backend = use_signal(|| Rc::new(MockBackend::default()));

    let ctx = PanelsContext {
        devices,
        security,
        routines,
        family,
        location,
        tray,
        backend,
    };
    use_context_provider(|| ctx);
    ctx
}

/// Get panel state - use in any page
pub fn use_panels() -> PanelsContext {
    use_context::<PanelsContext>()
}
