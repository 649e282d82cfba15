//! Routines page: list, learned suggestions and the editor.

use dioxus::prelude::*;

use crate::app::components::inline_message::MessageKind;
use crate::app::components::{InlineMessage, Modal, TextInput, ToggleInput};
use crate::app::panels_context::use_panels;
use crate::panels::PanelError;
use crate::panels::routines::{
    available_actions, describe_trigger, device_option, Routine, RoutineFilter, RoutineForm,
    Suggestion, TriggerKind, DAY_LABELS, DEVICE_OPTIONS,
};

/// Which routine the editor is working on
#[derive(Clone, Debug, PartialEq)]
enum Editing {
    New,
    Existing(String),
}

#[component]
pub fn Routines() -> Element {
    let panels = use_panels();
    let mut routines = panels.routines;

    let mut editing = use_signal(|| None::<Editing>);
    let mut form = use_signal(RoutineForm::default);
    let mut form_error = use_signal(|| None::<String>);
    let mut notice = use_signal(|| None::<(String, MessageKind)>);

    let store = routines.read();
    let current_filter = store.filter;
    let listed: Vec<Routine> = store.filtered().into_iter().cloned().collect();
    let suggestions: Vec<Suggestion> = store.suggestions().to_vec();
    drop(store);

    let open_new = move |_| {
        form.set(RoutineForm::default());
        form_error.set(None);
        editing.set(Some(Editing::New));
    };

    let save = move |_| {
        let target = editing.peek().clone();
        let result = match target {
            Some(Editing::New) => routines.write().create(&form.read()).map(|_| ()),
            Some(Editing::Existing(id)) => routines.write().update(&id, &form.read()),
            None => Ok(()),
        };
        match result {
            Ok(()) => {
                editing.set(None);
                notice.set(Some(("Rutina guardada".to_string(), MessageKind::Success)));
            }
            Err(e) => form_error.set(Some(e.to_string())),
        }
    };

    let title = match editing() {
        Some(Editing::Existing(_)) => "Editar rutina".to_string(),
        _ => "Nueva rutina".to_string(),
    };

    rsx! {
        if let Some((message, kind)) = notice() {
            InlineMessage {
                message,
                kind,
                on_dismiss: move |_| notice.set(None),
            }
        }

        div { class: "toolbar",
            div { class: "segmented",
                for filter in RoutineFilter::ALL {
                    button {
                        key: "{filter.label()}",
                        class: if filter == current_filter { "active" } else { "" },
                        onclick: move |_| routines.write().filter = filter,
                        "{filter.label()}"
                    }
                }
            }
            button { class: "btn-secondary", onclick: move |_| routines.write().generate_suggestions(), "Sugerir rutinas" }
            button { class: "btn-primary", onclick: open_new, "Nueva rutina" }
        }

        if listed.is_empty() {
            p { class: "text-muted", "No hay rutinas para mostrar" }
        }
        div { class: "grid",
            for routine in listed {
                RoutineCard {
                    key: "{routine.id}",
                    routine,
                    on_edit: move |r: Routine| {
                        form.set(RoutineForm::from_routine(&r));
                        form_error.set(None);
                        editing.set(Some(Editing::Existing(r.id)));
                    },
                    on_notice: move |m| notice.set(Some(m)),
                }
            }
        }

        if !suggestions.is_empty() {
            section { class: "card",
                h3 { "Sugerencias" }
                for suggestion in suggestions {
                    SuggestionRow {
                        key: "{suggestion.id}",
                        suggestion,
                        on_notice: move |m| notice.set(Some(m)),
                    }
                }
            }
        }

        Modal {
            title,
            is_open: editing().is_some(),
            on_close: move |_| editing.set(None),
            if let Some(message) = form_error() {
                InlineMessage { message, on_dismiss: move |_| form_error.set(None) }
            }
            RoutineEditor { form }
            div { class: "row",
                button { class: "btn-secondary", onclick: move |_| editing.set(None), "Cancelar" }
                button { class: "btn-primary", onclick: save, "Guardar" }
            }
        }
    }
}

/// Page notice for the outcome of a store action
fn notice_for<T>(
    result: Result<T, PanelError>,
    success: impl FnOnce(T) -> String,
) -> (String, MessageKind) {
    match result {
        Ok(value) => (success(value), MessageKind::Success),
        Err(e) => (e.to_string(), MessageKind::Error),
    }
}

#[component]
fn RoutineCard(
    routine: Routine,
    on_edit: EventHandler<Routine>,
    on_notice: EventHandler<(String, MessageKind)>,
) -> Element {
    let mut routines = use_panels().routines;
    let id = routine.id.clone();
    let trigger = describe_trigger(&routine.trigger);
    let badge = if routine.confirmed { "Confirmada" } else { "Pendiente" };
    let actions: Vec<String> = routine
        .actions
        .iter()
        .map(|a| match a.tts_message() {
            Some(message) => format!("🔊 {}", message),
            None => a.name.clone(),
        })
        .collect();

    let (toggle_id, confirm_id, reject_id, run_id, delete_id) =
        (id.clone(), id.clone(), id.clone(), id.clone(), id);
    let edited = routine.clone();

    rsx! {
        div { class: "card routine",
            header { class: "row",
                h4 { "{routine.name}" }
                span { class: "chip", "{badge}" }
            }
            if !routine.description.is_empty() {
                p { class: "text-muted", "{routine.description}" }
            }
            p { "{trigger}" }
            ul { class: "list",
                for (i, action) in actions.into_iter().enumerate() {
                    li { key: "{i}", "{action}" }
                }
            }
            ToggleInput {
                label: "Activa".to_string(),
                checked: routine.enabled,
                on_change: move |_| {
                    let toggled = routines.write().toggle_enabled(&toggle_id);
                    on_notice.call(notice_for(toggled, |on| {
                        let state = if on { "activada" } else { "desactivada" };
                        format!("Rutina {}", state)
                    }));
                },
            }
            div { class: "row",
                if !routine.confirmed {
                    button {
                        class: "btn-primary",
                        onclick: move |_| {
                            let confirmed = routines.write().confirm(&confirm_id);
                            on_notice.call(notice_for(confirmed, |_| "Rutina confirmada".to_string()));
                        },
                        "Confirmar"
                    }
                    button {
                        class: "btn-secondary",
                        onclick: move |_| {
                            let rejected = routines.write().reject(&reject_id);
                            on_notice.call(notice_for(rejected, |r| format!("Rutina descartada: {}", r.name)));
                        },
                        "Rechazar"
                    }
                }
                button {
                    class: "btn-secondary",
                    onclick: move |_| {
                        let ran = routines.write().run_now(&run_id);
                        on_notice.call(notice_for(ran, |ran| format!("Ejecutado: {}", ran.join(", "))));
                    },
                    "Ejecutar ahora"
                }
                button { class: "btn-secondary", onclick: move |_| on_edit.call(edited.clone()), "Editar" }
                button {
                    class: "btn-danger",
                    onclick: move |_| {
                        let deleted = routines.write().delete(&delete_id);
                        on_notice.call(notice_for(deleted, |r| format!("Rutina eliminada: {}", r.name)));
                    },
                    "Eliminar"
                }
            }
        }
    }
}

#[component]
fn SuggestionRow(suggestion: Suggestion, on_notice: EventHandler<(String, MessageKind)>) -> Element {
    let mut routines = use_panels().routines;
    let percent = suggestion.confidence_percent();
    let trigger = describe_trigger(&suggestion.trigger);
    let level = match percent {
        70.. => "high",
        50..=69 => "medium",
        _ => "low",
    };
    let accept_id = suggestion.id.clone();
    let reject_id = suggestion.id.clone();

    rsx! {
        div { class: "suggestion",
            div {
                strong { "{suggestion.name}" }
                p { class: "text-muted", "{trigger}" }
                div { class: "confidence {level}",
                    div { class: "confidence-fill", style: "width: {percent}%" }
                }
                small { "{percent}%" }
            }
            div { class: "row",
                button {
                    class: "btn-primary",
                    onclick: move |_| {
                        let accepted = routines.write().accept_suggestion(&accept_id).map(|r| r.name.clone());
                        on_notice.call(notice_for(accepted, |name| format!("Rutina creada: {}", name)));
                    },
                    "Aceptar"
                }
                button {
                    class: "btn-secondary",
                    onclick: move |_| {
                        routines.write().reject_suggestion(&reject_id);
                    },
                    "Descartar"
                }
            }
        }
    }
}

#[component]
fn RoutineEditor(form: Signal<RoutineForm>) -> Element {
    let mut form = form;
    let f = form.read().clone();
    let device_events: Vec<&'static str> = device_option(&f.device_id)
        .map(|d| d.events.to_vec())
        .unwrap_or_default();
    let actions: Vec<(String, String, bool)> = available_actions()
        .into_iter()
        .map(|a| {
            let checked = f.action_ids.contains(&a.id);
            (a.id, a.name, checked)
        })
        .collect();

    rsx! {
        TextInput {
            label: "Nombre",
            value: f.name.clone(),
            on_input: move |v| form.write().name = v,
        }
        TextInput {
            label: "Descripción",
            value: f.description.clone(),
            on_input: move |v| form.write().description = v,
        }
        ToggleInput {
            label: "Habilitada".to_string(),
            checked: f.enabled,
            on_change: move |v| form.write().enabled = v,
        }

        label { class: "field",
            span { class: "field-label", "Disparador" }
            select {
                value: "{f.trigger_kind.as_str()}",
                onchange: move |e| {
                    if let Some(kind) = TriggerKind::parse(&e.value()) {
                        form.write().trigger_kind = kind;
                    }
                },
                for kind in TriggerKind::ALL {
                    option { key: "{kind.as_str()}", value: kind.as_str(), "{kind.label()}" }
                }
            }
        }

        {match f.trigger_kind {
            TriggerKind::Nlp => rsx! {
                TextInput {
                    label: "Frase",
                    placeholder: "enciende la sala",
                    value: f.nlp_phrase.clone(),
                    on_input: move |v| form.write().nlp_phrase = v,
                }
            },
            TriggerKind::Tiempo => rsx! {
                TextInput {
                    label: "Hora (HH:MM)",
                    input_type: "time",
                    value: f.time_hour.clone(),
                    on_input: move |v| form.write().time_hour = v,
                }
                div { class: "days",
                    for (day, day_label) in DAY_LABELS {
                        label { key: "{day}", class: "chip",
                            input {
                                r#type: "checkbox",
                                checked: f.time_days.iter().any(|d| d == day),
                                onchange: move |_| form.write().toggle_day(day),
                            }
                            "{day_label}"
                        }
                    }
                }
                TextInput {
                    label: "Fecha (opcional)",
                    input_type: "date",
                    value: f.time_date.clone(),
                    on_input: move |v| form.write().time_date = v,
                }
            },
            TriggerKind::Evento => rsx! {
                label { class: "field",
                    span { class: "field-label", "Dispositivo" }
                    select {
                        value: "{f.device_id}",
                        onchange: move |e| form.write().select_device(&e.value()),
                        option { value: "", "Selecciona..." }
                        for device in DEVICE_OPTIONS {
                            option { key: "{device.id}", value: device.id, "{device.name}" }
                        }
                    }
                }
                label { class: "field",
                    span { class: "field-label", "Evento" }
                    select {
                        value: "{f.device_event}",
                        onchange: move |e| form.write().device_event = e.value(),
                        option { value: "", "Selecciona..." }
                        for event in device_events {
                            option { key: "{event}", value: event, "{event}" }
                        }
                    }
                }
            },
        }}

        fieldset {
            legend { "Acciones" }
            for (id, name, checked) in actions {
                label { key: "{name}", class: "chip",
                    input {
                        r#type: "checkbox",
                        checked,
                        onchange: move |_| form.write().toggle_action(&id),
                    }
                    "{name}"
                }
            }
        }

        fieldset {
            legend { "Mensajes de voz" }
            div { class: "row",
                input {
                    class: "input",
                    value: "{f.tts_input}",
                    placeholder: "Bienvenido a casa",
                    oninput: move |e| form.write().tts_input = e.value(),
                }
                button {
                    class: "btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        form.write().add_tts_message();
                    },
                    "Agregar"
                }
            }
            ul { class: "list",
                for (i, message) in f.tts_messages.iter().enumerate() {
                    li { key: "{i}",
                        "🔊 {message}"
                        button {
                            class: "btn-ghost",
                            r#type: "button",
                            onclick: move |_| form.write().remove_tts_message(i),
                            "×"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::routines::RoutineStore;

    #[test]
    fn test_action_on_vanished_routine_is_reported() {
        let mut store = RoutineStore::with_mock_data();
        let id = store.routines()[0].id.clone();
        store.delete(&id).unwrap();

        let (message, kind) = notice_for(store.toggle_enabled(&id), |_| String::new());
        assert_eq!(kind, MessageKind::Error);
        assert!(message.contains(&id));

        let (_, kind) = notice_for(store.confirm(&id), |_| String::new());
        assert_eq!(kind, MessageKind::Error);
        let (_, kind) = notice_for(store.accept_suggestion("missing").map(|r| r.name.clone()), |n| n);
        assert_eq!(kind, MessageKind::Error);
    }

    #[test]
    fn test_successful_action_uses_its_message() {
        let mut store = RoutineStore::with_mock_data();
        let id = store.routines()[0].id.clone();
        let (message, kind) = notice_for(store.delete(&id), |r| format!("Rutina eliminada: {}", r.name));
        assert_eq!(kind, MessageKind::Success);
        assert!(message.starts_with("Rutina eliminada: "));
    }
}
