//! Home page: greeting and a summary of every panel.

use chrono::Timelike;
use dioxus::prelude::*;

use crate::app::events::use_event_bus;
use crate::app::navigation_context::use_navigation;
use crate::app::panels_context::use_panels;
use crate::app::session_context::use_session;
use crate::navigation::MenuKey;
use crate::panels::routines::describe_trigger;

/// Routines previewed on the home page
const ROUTINE_PREVIEW: usize = 3;

fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Buenos días",
        12..=18 => "Buenas tardes",
        _ => "Buenas noches",
    }
}

#[component]
pub fn Home() -> Element {
    let session = use_session();
    let panels = use_panels();
    let navigation = use_navigation();
    let bus = use_event_bus();

    let name = session
        .user()
        .map(|u| u.display_name)
        .unwrap_or_else(|| "Usuario".to_string());
    let salutation = greeting(chrono::Local::now().hour());

    let devices = panels.devices.read();
    let active_devices = devices.active_count();
    let total_devices = devices.devices().len();
    let usage = devices.energy.current_usage();
    drop(devices);

    let security = panels.security.read();
    let system_on = security.system_on();
    let active_cameras = security.active_count();
    drop(security);

    let previews: Vec<(String, String, String)> = panels
        .routines
        .read()
        .routines()
        .iter()
        .take(ROUTINE_PREVIEW)
        .map(|r| (r.id.clone(), r.name.clone(), describe_trigger(&r.trigger)))
        .collect();

    let location = panels
        .location
        .read()
        .location()
        .map(|l| l.name.clone());

    rsx! {
        section { class: "hero",
            h2 { "{salutation}, {name}" }
            if let Some(place) = location {
                p { class: "text-muted", "📍 {place}" }
            }
        }

        div { class: "grid",
            div { class: "card",
                h3 { "Dispositivos" }
                p { class: "stat", "{active_devices} / {total_devices}" }
                p { class: "text-muted", "encendidos · {usage} W ahora" }
                button {
                    class: "btn-link",
                    onclick: move |_| navigation.select(MenuKey::Devices),
                    "Gestionar"
                }
            }
            div { class: "card",
                h3 { "Seguridad" }
                p { class: "stat", if system_on { "Activo" } else { "Inactivo" } }
                p { class: "text-muted", "{active_cameras} cámaras encendidas" }
                button {
                    class: "btn-link",
                    onclick: move |_| navigation.select(MenuKey::Security),
                    "Ver cámaras"
                }
            }
        }

        section { class: "card",
            h3 { "Rutinas" }
            if previews.is_empty() {
                p { class: "text-muted", "Aún no tienes rutinas" }
            }
            ul { class: "list",
                for (id, name, trigger) in previews {
                    li { key: "{id}",
                        strong { "{name}" }
                        span { class: "text-muted", " · {trigger}" }
                    }
                }
            }
            button {
                class: "btn-link",
                onclick: move |_| {
                    bus.navigate(MenuKey::Routines);
                },
                "Ver todas las rutinas"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_by_hour() {
        assert_eq!(greeting(7), "Buenos días");
        assert_eq!(greeting(15), "Buenas tardes");
        assert_eq!(greeting(23), "Buenas noches");
        assert_eq!(greeting(2), "Buenas noches");
    }
}
