//! Device management page: filters, toggles and the energy estimate.

use dioxus::prelude::*;

use crate::app::components::InlineMessage;
use crate::app::panels_context::use_panels;
use crate::panels::devices::{Device, DeviceKind, StatusFilter};

#[component]
pub fn Devices() -> Element {
    let panels = use_panels();
    let mut devices = panels.devices;
    let mut error = use_signal(|| None::<String>);

    let panel = devices.read();
    let visible: Vec<Device> = panel.visible().into_iter().cloned().collect();
    let kinds = panel.kinds();
    let kind_value = panel.kind_filter.map(|k| k.as_str()).unwrap_or("Todos");
    let status_value = panel.status_filter.label();
    let energy = panel.energy.clone();
    drop(panel);

    let max_reading = energy.history.iter().copied().max().unwrap_or(1).max(1);
    let daily = format!("${:.2}", energy.daily_cost());
    let monthly = format!("${:.2}", energy.monthly_cost());
    let annual = format!("${:.2}", energy.annual_cost());
    let usage = energy.current_usage();

    rsx! {
        if let Some(message) = error() {
            InlineMessage { message, on_dismiss: move |_| error.set(None) }
        }

        div { class: "filters",
            label {
                "Tipo "
                select {
                    value: "{kind_value}",
                    onchange: move |e| devices.write().kind_filter = DeviceKind::parse(&e.value()),
                    option { value: "Todos", "Todos" }
                    for kind in kinds {
                        option { key: "{kind.as_str()}", value: kind.as_str(), "{kind.as_str()}" }
                    }
                }
            }
            label {
                "Estado "
                select {
                    value: "{status_value}",
                    onchange: move |e| devices.write().status_filter = StatusFilter::parse(&e.value()),
                    for filter in [StatusFilter::All, StatusFilter::On, StatusFilter::Off] {
                        option { key: "{filter.label()}", value: filter.label(), "{filter.label()}" }
                    }
                }
            }
        }

        if visible.is_empty() {
            p { class: "text-muted", "Ningún dispositivo coincide con los filtros" }
        }
        div { class: "grid",
            for device in visible {
                DeviceCard {
                    key: "{device.id}",
                    device,
                    on_error: move |message| error.set(Some(message)),
                }
            }
        }

        section { class: "card",
            h3 { "Consumo de energía" }
            p { class: "stat", "{usage} W" }
            div { class: "bars",
                for (hour, watts) in energy.history.iter().copied().enumerate() {
                    div {
                        key: "{hour}",
                        class: "bar",
                        title: "{watts} W",
                        style: "height: {watts * 100 / max_reading}%",
                    }
                }
            }
            div { class: "row",
                div { small { class: "text-muted", "Diario" } p { "{daily}" } }
                div { small { class: "text-muted", "Mensual" } p { "{monthly}" } }
                div { small { class: "text-muted", "Anual" } p { "{annual}" } }
            }
        }
    }
}

#[component]
fn DeviceCard(device: Device, on_error: EventHandler<String>) -> Element {
    let panels = use_panels();
    let id = device.id;
    let state = if device.on { "Encendido" } else { "Apagado" };
    let class = if device.on { "card device on" } else { "card device" };

    rsx! {
        div { class: "{class}",
            h4 { "{device.name}" }
            p { class: "text-muted", "{device.kind.as_str()} · {device.power}" }
            p { "{state}" }
            input {
                class: "toggle",
                r#type: "checkbox",
                checked: device.on,
                onchange: move |_| {
                    spawn(async move {
                        if let Err(e) = panels.toggle_device(id).await {
                            on_error.call(format!("No se pudo cambiar el dispositivo: {}", e));
                        }
                    });
                },
            }
        }
    }
}
