//! Header bell with badge and the notification tray it opens.

use dioxus::prelude::*;

use crate::app::panels_context::use_panels;
use crate::panels::notifications::Notification;

#[component]
pub fn NotificationBell() -> Element {
    let panels = use_panels();

    // Close and bell timers are spawned in this scope and die with it
    use_drop(move || {
        let mut tray = panels.tray;
        if let Ok(mut state) = tray.try_write() {
            state.reset_transitions();
        };
    });

    let tray = panels.tray.read();

    let count = tray.unread();
    let open = tray.is_open();
    let bell_class = if tray.is_bell_animating() { "bell ringing" } else { "bell" };
    let tray_class = if tray.is_closing() { "tray closing" } else { "tray" };
    let notifications = tray.notifications().to_vec();
    drop(tray);

    rsx! {
        div { class: "notification-bell",
            button {
                class: "{bell_class}",
                "aria-label": "Notificaciones",
                onclick: move |_| {
                    spawn(panels.toggle_tray());
                },
                "🔔"
                if count > 0 {
                    span { class: "badge", "{count}" }
                }
            }
            if open {
                div { class: "{tray_class}",
                    header { class: "tray-header",
                        strong { "Notificaciones" }
                        if count > 0 {
                            button {
                                class: "btn-ghost",
                                title: "Borrar todas",
                                onclick: move |_| {
                                    spawn(async move {
                                        panels.clear_notifications().await;
                                    });
                                },
                                "🗑"
                            }
                        }
                    }
                    if notifications.is_empty() {
                        p { class: "text-muted", "No hay notificaciones" }
                    }
                    ul {
                        for n in notifications {
                            TrayItem { key: "{n.id}", notification: n }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TrayItem(notification: Notification) -> Element {
    let panels = use_panels();
    let id = notification.id;
    let class = format!("tray-item {}", notification.category().css_class());
    let title = notification.title.clone();
    let message = notification.message.clone();
    let stamp = notification
        .timestamp
        .map(|ts| ts.format("%d/%m %H:%M").to_string());

    rsx! {
        li { class: "{class}",
            div {
                if let Some(title) = title {
                    strong { "{title}" }
                }
                p { "{message}" }
                if let Some(stamp) = stamp {
                    small { class: "text-muted", "{stamp}" }
                }
            }
            button {
                class: "btn-ghost",
                "aria-label": "Archivar",
                onclick: move |_| {
                    spawn(async move {
                        panels.remove_notification(id).await;
                    });
                },
                "×"
            }
        }
    }
}
