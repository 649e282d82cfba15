//! Configuration page: owner profile and enrollment, household members,
//! automatic routines, notifications, location and theme.

use dioxus::prelude::*;

use crate::app::components::inline_message::MessageKind;
use crate::app::components::{InlineMessage, Modal, TextInput, ThemeSwitcher, ToggleInput};
use crate::app::panels_context::use_panels;
use crate::panels::enrollment::{FaceEnrollment, VoiceEnrollment};
use crate::panels::family::{AutoRoutine, FamilyMember, NewMember};
use crate::panels::location::PRESETS;

use super::enrollment::{FaceDialog, VoiceDialog};

#[component]
pub fn Configuration() -> Element {
    let panels = use_panels();
    let mut family = panels.family;

    let panel = family.read();
    let owner_name = panel.owner_name().to_string();
    let is_owner = panel.is_owner();
    let notifications_enabled = panel.notifications_enabled;
    let auto_routines = panel.auto_routines;
    let admins: Vec<FamilyMember> = panel.admins().into_iter().cloned().collect();
    let relatives: Vec<FamilyMember> = panel.family().into_iter().cloned().collect();
    drop(panel);

    let mut renaming = use_signal(|| false);
    let mut name_draft = use_signal(String::new);
    let mut rename_error = use_signal(|| None::<String>);

    let mut adding = use_signal(|| false);
    let mut new_member = use_signal(NewMember::default);
    let mut add_error = use_signal(|| None::<String>);

    let mut member_error = use_signal(|| None::<String>);

    let voice = use_signal(VoiceEnrollment::new);
    let face = use_signal(FaceEnrollment::new);
    let mut voice_open = use_signal(|| false);
    let mut face_open = use_signal(|| false);
    let has_voice = voice.read().is_registered();
    let has_face = face.read().is_registered();

    let open_rename = move |_| {
        name_draft.set(family.peek().owner_name().to_string());
        rename_error.set(None);
        renaming.set(true);
    };

    let save_name = move |_| {
        let result = family.write().rename_owner(&name_draft.read());
        match result {
            Ok(()) => renaming.set(false),
            Err(e) => rename_error.set(Some(e.to_string())),
        }
    };

    let open_add = move |_| {
        new_member.set(NewMember::default());
        add_error.set(None);
        adding.set(true);
    };

    let save_member = move |_| {
        let result = family.write().add_member(&new_member.read()).map(|_| ());
        match result {
            Ok(()) => adding.set(false),
            Err(e) => add_error.set(Some(e.to_string())),
        }
    };

    let form = new_member.read().clone();

    rsx! {
        if let Some(message) = member_error() {
            InlineMessage { message, on_dismiss: move |_| member_error.set(None) }
        }

        section { class: "card",
            h3 { "Propietario" }
            div { class: "row",
                p { class: "stat", "{owner_name}" }
                button { class: "btn-secondary", onclick: open_rename, "Editar nombre" }
            }
            div { class: "row",
                button { class: "btn-secondary", onclick: move |_| voice_open.set(true), "Agregar voz" }
                if has_voice {
                    span { class: "chip", "Voz registrada" }
                }
                button { class: "btn-secondary", onclick: move |_| face_open.set(true), "Agregar rostro" }
                if has_face {
                    span { class: "chip", "Rostro registrado" }
                }
            }
        }

        section { class: "card",
            header { class: "row",
                h3 { "Miembros del hogar" }
                if is_owner {
                    button { class: "btn-primary", onclick: open_add, "Agregar miembro" }
                }
            }
            MemberGroup {
                title: "Administradores",
                members: admins,
                editable: is_owner,
                on_error: move |m| member_error.set(Some(m)),
            }
            MemberGroup {
                title: "Familiares",
                members: relatives,
                editable: is_owner,
                on_error: move |m| member_error.set(Some(m)),
            }
        }

        section { class: "card",
            h3 { "Rutinas automáticas" }
            p { class: "text-muted", "Configura rutinas para automatizar tu hogar" }
            for routine in AutoRoutine::ALL {
                ToggleInput {
                    key: "{routine.label()}",
                    label: format!("{} · {}", routine.label(), routine.schedule()),
                    description: routine.summary().to_string(),
                    checked: auto_routines.is_enabled(routine),
                    on_change: move |_| {
                        family.write().auto_routines.toggle(routine);
                    },
                }
            }
        }

        section { class: "card",
            h3 { "Notificaciones" }
            ToggleInput {
                label: "Recibir notificaciones".to_string(),
                description: "Alertas de seguridad y avisos de tus dispositivos".to_string(),
                checked: notifications_enabled,
                on_change: move |on| family.write().notifications_enabled = on,
            }
        }

        LocationSection {}

        section { class: "card",
            h3 { "Tema" }
            ThemeSwitcher {}
        }

        VoiceDialog { voice, is_open: voice_open(), on_close: move |_| voice_open.set(false) }
        FaceDialog { face, is_open: face_open(), on_close: move |_| face_open.set(false) }

        Modal {
            title: "Editar nombre".to_string(),
            is_open: renaming(),
            on_close: move |_| renaming.set(false),
            if let Some(message) = rename_error() {
                InlineMessage { message, on_dismiss: move |_| rename_error.set(None) }
            }
            TextInput {
                label: "Nombre",
                value: name_draft(),
                on_input: move |v| name_draft.set(v),
            }
            div { class: "row",
                button { class: "btn-secondary", onclick: move |_| renaming.set(false), "Cancelar" }
                button { class: "btn-primary", onclick: save_name, "Guardar" }
            }
        }

        Modal {
            title: "Nuevo miembro".to_string(),
            is_open: adding(),
            on_close: move |_| adding.set(false),
            if let Some(message) = add_error() {
                InlineMessage { message, on_dismiss: move |_| add_error.set(None) }
            }
            TextInput {
                label: "Usuario",
                value: form.username.clone(),
                on_input: move |v| new_member.write().username = v,
            }
            TextInput {
                label: "Contraseña",
                input_type: "password",
                value: form.password.clone(),
                on_input: move |v| new_member.write().password = v,
            }
            TextInput {
                label: "Confirmar contraseña",
                input_type: "password",
                value: form.confirm_password.clone(),
                on_input: move |v| new_member.write().confirm_password = v,
            }
            ToggleInput {
                label: "Administrador".to_string(),
                description: "Puede gestionar miembros y dispositivos".to_string(),
                checked: form.is_admin,
                on_change: move |on| new_member.write().is_admin = on,
            }
            div { class: "row",
                button { class: "btn-secondary", onclick: move |_| adding.set(false), "Cancelar" }
                button { class: "btn-primary", onclick: save_member, "Registrar" }
            }
        }
    }
}

#[component]
fn MemberGroup(
    title: &'static str,
    members: Vec<FamilyMember>,
    editable: bool,
    on_error: EventHandler<String>,
) -> Element {
    rsx! {
        h4 { "{title}" }
        if members.is_empty() {
            p { class: "text-muted", "Sin miembros" }
        }
        ul { class: "list",
            for member in members {
                MemberRow { key: "{member.id}", member, editable, on_error }
            }
        }
    }
}

#[component]
fn MemberRow(member: FamilyMember, editable: bool, on_error: EventHandler<String>) -> Element {
    let mut family = use_panels().family;
    let role_id = member.id.clone();
    let delete_id = member.id.clone();
    let mut privileges = Vec::new();
    if member.privileges.control_devices {
        privileges.push("Dispositivos");
    }
    if member.privileges.view_camera {
        privileges.push("Cámaras");
    }
    let privileges = privileges.join(" · ");

    rsx! {
        li { class: "member",
            div {
                strong { "{member.name}" }
                span { class: "chip", "{member.role.label()}" }
                if !privileges.is_empty() {
                    small { class: "text-muted", " {privileges}" }
                }
            }
            if editable {
                div { class: "row",
                    button {
                        class: "btn-secondary",
                        onclick: move |_| {
                            let result = family.write().toggle_role(&role_id);
                            if let Err(e) = result {
                                on_error.call(e.to_string());
                            }
                        },
                        "Cambiar rol"
                    }
                    button {
                        class: "btn-danger",
                        onclick: move |_| {
                            let result = family.write().delete_member(&delete_id);
                            if let Err(e) = result {
                                on_error.call(e.to_string());
                            }
                        },
                        "Eliminar"
                    }
                }
            }
        }
    }
}

#[component]
fn LocationSection() -> Element {
    let mut location = use_panels().location;
    let saved = location
        .read()
        .location()
        .map(|l| format!("📍 {} ({:.4}, {:.4})", l.name, l.latitude, l.longitude));

    let mut latitude = use_signal(String::new);
    let mut longitude = use_signal(String::new);
    let mut name = use_signal(String::new);
    let mut message = use_signal(|| None::<(String, MessageKind)>);

    let save = move |_| {
        let lat = latitude.read().trim().parse::<f64>();
        let lon = longitude.read().trim().parse::<f64>();
        let (Ok(lat), Ok(lon)) = (lat, lon) else {
            message.set(Some((
                "Ingresa coordenadas numéricas".to_string(),
                MessageKind::Error,
            )));
            return;
        };
        let result = location.write().save(lat, lon, &name.read());
        match result {
            Ok(()) => message.set(Some(("Ubicación guardada".to_string(), MessageKind::Success))),
            Err(e) => message.set(Some((e.to_string(), MessageKind::Error))),
        }
    };

    rsx! {
        section { class: "card",
            h3 { "Ubicación" }
            if let Some(saved) = saved {
                p { class: "text-muted", "{saved}" }
            } else {
                p { class: "text-muted", "Sin ubicación guardada" }
            }
            if let Some((text, kind)) = message() {
                InlineMessage { message: text, kind, on_dismiss: move |_| message.set(None) }
            }
            div { class: "row",
                for (preset, lat, lon) in PRESETS {
                    button {
                        key: "{preset}",
                        class: "btn-ghost",
                        onclick: move |_| {
                            latitude.set(lat.to_string());
                            longitude.set(lon.to_string());
                            name.set(preset.to_string());
                        },
                        "{preset}"
                    }
                }
            }
            TextInput {
                label: "Nombre",
                placeholder: "Casa",
                value: name(),
                on_input: move |v| name.set(v),
            }
            TextInput {
                label: "Latitud",
                value: latitude(),
                on_input: move |v| latitude.set(v),
            }
            TextInput {
                label: "Longitud",
                value: longitude(),
                on_input: move |v| longitude.set(v),
            }
            button { class: "btn-primary", onclick: save, "Guardar ubicación" }
        }
    }
}
