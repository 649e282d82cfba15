//! Notification tray: list, open/closing animation and the bell badge.
//!
//! The async operations (`refresh`, `remove`, `clear_all`) are also exposed
//! as split steps so a UI can release its borrow of the tray while the
//! backend call is in flight.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::backend::NotificationBackend;
use super::PanelError;
use crate::transition::{Transition, TransitionTicket};

pub type NotificationId = u32;

/// Tray close animation
pub const CLOSE_ANIMATION: Duration = Duration::from_millis(350);
/// Bell shake when new notifications arrive
pub const BELL_ANIMATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Visual category picked from the free-form `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Light,
    Security,
    User,
    General,
}

impl NotificationCategory {
    pub fn css_class(self) -> &'static str {
        match self {
            NotificationCategory::Light => "notif-light",
            NotificationCategory::Security => "notif-security",
            NotificationCategory::User => "notif-user",
            NotificationCategory::General => "notif-general",
        }
    }
}

impl Notification {
    pub fn category(&self) -> NotificationCategory {
        let kind = self.kind.as_deref().unwrap_or_default().to_lowercase();
        if kind.contains("luz") {
            NotificationCategory::Light
        } else if kind.contains("seg") {
            NotificationCategory::Security
        } else if kind.contains("user") {
            NotificationCategory::User
        } else {
            NotificationCategory::General
        }
    }
}

pub fn mock_notifications() -> Vec<Notification> {
    let now = Utc::now();
    vec![
        Notification {
            id: 1,
            message: "Bienvenido al sistema IoT".to_string(),
            kind: Some("info".to_string()),
            title: Some("Bienvenida".to_string()),
            timestamp: Some(now),
        },
        Notification {
            id: 2,
            message: "Sistema funcionando correctamente".to_string(),
            kind: Some("success".to_string()),
            title: Some("Estado del Sistema".to_string()),
            timestamp: Some(now - chrono::Duration::hours(1)),
        },
    ]
}

/// Outcome of [`NotificationTray::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayToggle {
    /// Tray opened; the caller should refresh the list
    Opened,
    /// Close animation started; finish with the ticket after [`CLOSE_ANIMATION`]
    Closing(TransitionTicket),
}

#[derive(Debug, Clone, Default)]
pub struct NotificationTray {
    notifications: Vec<Notification>,
    open: bool,
    closing: Transition,
    bell: Transition,
}

impl NotificationTray {
    pub fn new(notifications: Vec<Notification>) -> Self {
        Self {
            notifications,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Badge count
    pub fn unread(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_closing(&self) -> bool {
        self.closing.is_active()
    }

    pub fn is_bell_animating(&self) -> bool {
        self.bell.is_active()
    }

    pub fn toggle(&mut self) -> TrayToggle {
        if self.open {
            TrayToggle::Closing(self.closing.start())
        } else {
            self.closing.cancel();
            self.open = true;
            TrayToggle::Opened
        }
    }

    /// Complete a close animation. Stale tickets are ignored.
    pub fn finish_closing(&mut self, ticket: TransitionTicket) -> bool {
        if self.closing.finish(ticket) {
            self.open = false;
            true
        } else {
            false
        }
    }

    /// Replace the list. Returns a bell ticket when the count grew.
    pub fn set_notifications(&mut self, list: Vec<Notification>) -> Option<TransitionTicket> {
        let grew = list.len() > self.notifications.len();
        self.notifications = list;
        grew.then(|| self.bell.start())
    }

    pub fn finish_bell(&mut self, ticket: TransitionTicket) -> bool {
        self.bell.finish(ticket)
    }

    /// Settle both animations once the timers that would finish them are
    /// gone. A pending close completes and the bell stops; outstanding
    /// tickets become stale.
    pub fn reset_transitions(&mut self) {
        if self.closing.is_active() {
            self.closing.cancel();
            self.open = false;
        }
        self.bell.cancel();
    }

    /// Apply the result of archiving `id`; the entry goes only on success
    pub fn apply_removal(&mut self, id: NotificationId, archived: bool) -> bool {
        if !archived {
            tracing::warn!("Archiving notification {} failed, keeping it", id);
            return false;
        }
        self.notifications.retain(|n| n.id != id);
        true
    }

    /// Ids to archive for a clear-all
    pub fn ids(&self) -> Vec<NotificationId> {
        self.notifications.iter().map(|n| n.id).collect()
    }

    /// Commit a clear-all only if every archive call succeeded
    pub fn apply_clear_all(&mut self, results: &[bool]) -> bool {
        if results.iter().all(|ok| *ok) {
            self.notifications.clear();
            self.open = false;
            self.closing.cancel();
            true
        } else {
            let failed = results.iter().filter(|ok| !**ok).count();
            tracing::warn!(
                "Clear-all aborted: {} of {} archive calls failed",
                failed,
                results.len()
            );
            false
        }
    }

    pub async fn refresh(
        &mut self,
        backend: &dyn NotificationBackend,
    ) -> Result<Option<TransitionTicket>, PanelError> {
        let list = backend.fetch_notifications().await?;
        Ok(self.set_notifications(list))
    }

    pub async fn remove(&mut self, backend: &dyn NotificationBackend, id: NotificationId) -> bool {
        let archived = backend.archive(id).await;
        self.apply_removal(id, archived)
    }

    /// Archive everything concurrently; all-or-nothing
    pub async fn clear_all(&mut self, backend: &dyn NotificationBackend) -> bool {
        let results = archive_all(backend, self.ids()).await;
        self.apply_clear_all(&results)
    }
}

/// Archive `ids` concurrently, results in input order
pub async fn archive_all(backend: &dyn NotificationBackend, ids: Vec<NotificationId>) -> Vec<bool> {
    join_all(ids.into_iter().map(|id| backend.archive(id))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::backend::MockBackend;

    #[test]
    fn test_toggle_open_then_close() {
        let mut tray = NotificationTray::new(mock_notifications());
        assert_eq!(tray.toggle(), TrayToggle::Opened);
        assert!(tray.is_open());

        let TrayToggle::Closing(ticket) = tray.toggle() else {
            panic!("expected close animation");
        };
        assert!(tray.is_open());
        assert!(tray.is_closing());

        assert!(tray.finish_closing(ticket));
        assert!(!tray.is_open());
        assert!(!tray.is_closing());
    }

    #[test]
    fn test_repeated_close_ignores_old_timer() {
        let mut tray = NotificationTray::default();
        tray.toggle();
        let TrayToggle::Closing(ticket) = tray.toggle() else {
            panic!("expected close animation");
        };
        // Closing does not flip `open`, so a toggle now restarts the close
        let TrayToggle::Closing(second) = tray.toggle() else {
            panic!("expected close animation");
        };
        assert!(!tray.finish_closing(ticket));
        assert!(tray.is_open());
        assert!(tray.finish_closing(second));
    }

    #[test]
    fn test_reset_completes_close_left_without_timer() {
        let mut tray = NotificationTray::new(mock_notifications());
        tray.toggle();
        let TrayToggle::Closing(orphaned) = tray.toggle() else {
            panic!("expected close animation");
        };

        // The scope holding the close timer went away
        tray.reset_transitions();
        assert!(!tray.is_open());
        assert!(!tray.is_closing());

        // Next click opens instead of starting another close
        assert_eq!(tray.toggle(), TrayToggle::Opened);
        assert!(!tray.finish_closing(orphaned));
        assert!(tray.is_open());
    }

    #[test]
    fn test_reset_stops_bell_and_keeps_open_tray() {
        let mut tray = NotificationTray::new(Vec::new());
        tray.toggle();
        let ticket = tray.set_notifications(mock_notifications()).unwrap();

        tray.reset_transitions();
        assert!(!tray.is_bell_animating());
        assert!(tray.is_open());
        assert_eq!(tray.unread(), 2);
        assert!(!tray.finish_bell(ticket));
    }

    #[test]
    fn test_bell_only_when_count_grows() {
        let mut tray = NotificationTray::new(Vec::new());
        let ticket = tray.set_notifications(mock_notifications()).unwrap();
        assert!(tray.is_bell_animating());
        assert!(tray.finish_bell(ticket));

        assert!(tray.set_notifications(mock_notifications()).is_none());
        assert!(tray.set_notifications(Vec::new()).is_none());
        assert!(!tray.is_bell_animating());
    }

    #[test]
    fn test_category() {
        let mut n = mock_notifications().remove(0);
        n.kind = Some("Luz encendida".to_string());
        assert_eq!(n.category(), NotificationCategory::Light);
        n.kind = Some("seguridad".to_string());
        assert_eq!(n.category(), NotificationCategory::Security);
        n.kind = None;
        assert_eq!(n.category(), NotificationCategory::General);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::json!({"id": 7, "message": "hola", "type": "user"});
        let n: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(n.kind.as_deref(), Some("user"));
        assert!(n.title.is_none());
    }

    #[tokio::test]
    async fn test_remove_only_on_success() {
        let backend = MockBackend::instant();
        backend.fail_archive(1);
        let mut tray = NotificationTray::new(mock_notifications());

        assert!(!tray.remove(&backend, 1).await);
        assert_eq!(tray.unread(), 2);

        assert!(tray.remove(&backend, 2).await);
        assert_eq!(tray.ids(), vec![1]);
    }

    #[tokio::test]
    async fn test_clear_all_commits_and_closes() {
        let backend = MockBackend::instant();
        let mut tray = NotificationTray::new(mock_notifications());
        tray.toggle();

        assert!(tray.clear_all(&backend).await);
        assert_eq!(tray.unread(), 0);
        assert!(!tray.is_open());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_list() {
        let backend = MockBackend::instant();
        backend.fail_fetch(true);
        let mut tray = NotificationTray::new(Vec::new());
        assert!(tray.refresh(&backend).await.is_err());
        assert_eq!(tray.unread(), 0);

        backend.heal();
        assert!(tray.refresh(&backend).await.unwrap().is_some());
        assert_eq!(tray.unread(), 2);
    }
}
