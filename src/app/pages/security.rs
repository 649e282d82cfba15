//! Camera monitoring page.

use dioxus::prelude::*;

use crate::app::components::ToggleInput;
use crate::app::panels_context::use_panels;

#[component]
pub fn Security() -> Element {
    let panels = use_panels();
    let mut security = panels.security;

    let panel = security.read();
    let system_on = panel.system_on();
    let active = panel.active_count();
    let cameras: Vec<(String, String, bool, bool)> = panel
        .cameras()
        .iter()
        .map(|c| {
            (
                c.id.clone(),
                c.label.clone(),
                panel.is_camera_active(&c.id),
                c.recognition_enabled,
            )
        })
        .collect();
    drop(panel);

    rsx! {
        section { class: "card",
            ToggleInput {
                label: "Sistema de seguridad".to_string(),
                description: format!("{} cámaras activas", active),
                checked: system_on,
                on_change: move |on| security.write().set_system(on),
            }
        }

        div { class: "grid",
            for (id, label, is_active, recognition) in cameras {
                CameraCard {
                    key: "{id}",
                    id: id.clone(),
                    label,
                    is_active,
                    recognition,
                    system_on,
                }
            }
        }
    }
}

#[component]
fn CameraCard(
    id: String,
    label: String,
    is_active: bool,
    recognition: bool,
    system_on: bool,
) -> Element {
    let mut security = use_panels().security;
    let class = if is_active { "card camera live" } else { "card camera" };
    let description = if recognition {
        "Reconocimiento facial".to_string()
    } else {
        String::new()
    };

    rsx! {
        div { class: "{class}",
            div { class: "camera-feed",
                if is_active {
                    span { class: "live-dot", "● EN VIVO" }
                } else {
                    span { class: "text-muted", "Sin señal" }
                }
            }
            ToggleInput {
                label,
                description,
                checked: is_active,
                disabled: !system_on,
                on_change: move |_| {
                    security.write().toggle_camera(&id);
                },
            }
        }
    }
}
