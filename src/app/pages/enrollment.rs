//! Voice and face enrollment dialogs opened from the owner card.
//!
//! The enrollment state belongs to the Configuration page; these dialogs
//! drive it and arm the simulated listening and upload timers.

use dioxus::prelude::*;

use crate::app::components::{InlineMessage, Modal, TextInput};
use crate::panels::enrollment::{
    FaceEnrollment, VoiceEnrollment, VoiceStep, MAX_FACE_PHOTOS, UPLOAD_DELAY, VOICE_LISTEN,
    VOICE_PHRASE,
};
use crate::timer;

#[component]
pub fn VoiceDialog(
    voice: Signal<VoiceEnrollment>,
    is_open: bool,
    on_close: EventHandler<()>,
) -> Element {
    let mut voice = voice;
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let state = voice.read();
    let step = state.step();
    let verified = state.is_verified();
    let busy = state.is_busy();
    let transcript = state.transcript().map(str::to_string);
    drop(state);
    let phrase = VOICE_PHRASE;

    let mut close = move || {
        voice.write().close();
        password.set(String::new());
        error.set(None);
        on_close.call(());
    };

    let verify = move |_| {
        let result = voice.write().verify_password(&password.read());
        error.set(result.err().map(|e| e.to_string()));
    };

    let listen = move |_| {
        let started = voice.write().start_listening();
        match started {
            Ok(ticket) => {
                error.set(None);
                spawn(async move {
                    timer::sleep(VOICE_LISTEN).await;
                    voice.write().finish_listening(ticket);
                });
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let save = move |_| {
        let started = voice.write().start_upload();
        match started {
            Ok(ticket) => {
                spawn(async move {
                    timer::sleep(UPLOAD_DELAY).await;
                    voice.write().finish_upload(ticket);
                });
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    rsx! {
        Modal {
            title: "Agregar reconocimiento de voz".to_string(),
            is_open,
            on_close: move |_| close(),
            if let Some(message) = error() {
                InlineMessage { message, on_dismiss: move |_| error.set(None) }
            }
            TextInput {
                label: "Contraseña actual",
                input_type: "password",
                placeholder: "Confirma tu contraseña",
                value: password(),
                on_input: move |v| password.set(v),
            }
            button { class: "btn-secondary", disabled: busy, onclick: verify, "Verificar contraseña" }

            p { "Di la siguiente frase para registrar tu voz:" }
            p { class: "voice-phrase", "\"{phrase}\"" }
            button {
                class: if step == VoiceStep::Listening { "btn-danger listening" } else { "btn-primary" },
                disabled: !verified || busy,
                onclick: listen,
                if step == VoiceStep::Listening { "Escuchando..." } else { "Iniciar escucha" }
            }
            if let Some(status) = step.status() {
                p { class: "text-muted", "{status}" }
            }
            if let Some(transcript) = transcript {
                p { "🗣️ Detectado: \"{transcript}\"" }
            }

            div { class: "row",
                button { class: "btn-secondary", onclick: move |_| close(), "Cancelar" }
                if matches!(step, VoiceStep::Captured | VoiceStep::Uploading) {
                    button {
                        class: "btn-primary",
                        disabled: busy,
                        onclick: save,
                        if step == VoiceStep::Uploading { "Guardando voz..." } else { "Guardar voz" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn FaceDialog(
    face: Signal<FaceEnrollment>,
    is_open: bool,
    on_close: EventHandler<()>,
) -> Element {
    let mut face = face;
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let state = face.read();
    let verified = state.is_verified();
    let count = state.photos().len();
    let detected = state.face_detected();
    let complete = state.is_complete();
    let uploading = state.is_uploading();
    drop(state);

    let mut close = move || {
        face.write().close();
        password.set(String::new());
        error.set(None);
        on_close.call(());
    };

    let verify = move |_| {
        let result = face.write().verify_password(&password.read());
        error.set(result.err().map(|e| e.to_string()));
    };

    let take_photo = move |_| {
        let taken = face.write().take_photo();
        if let Err(e) = taken {
            error.set(Some(e.to_string()));
        }
    };

    let save = move |_| {
        let started = face.write().start_upload();
        match started {
            Ok(ticket) => {
                spawn(async move {
                    timer::sleep(UPLOAD_DELAY).await;
                    let finished = face.write().finish_upload(ticket);
                    if finished {
                        close();
                    }
                });
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    rsx! {
        Modal {
            title: "Agregar reconocimiento facial".to_string(),
            is_open,
            on_close: move |_| close(),
            if let Some(message) = error() {
                InlineMessage { message, on_dismiss: move |_| error.set(None) }
            }
            TextInput {
                label: "Contraseña actual",
                input_type: "password",
                placeholder: "Confirma tu contraseña",
                value: password(),
                on_input: move |v| password.set(v),
            }
            button { class: "btn-secondary", disabled: uploading, onclick: verify, "Verificar contraseña" }
            if verified {
                p { class: "text-muted", "✅ Contraseña verificada. Puedes agregar tu rostro." }
            }

            p { "Usa la cámara para registrar el reconocimiento de tu rostro." }
            div { class: "camera-feed", "📷" }
            div { class: "row",
                button {
                    class: "btn-primary",
                    disabled: !verified || complete || uploading,
                    onclick: take_photo,
                    "Tomar foto"
                }
                span { "Fotos: {count}/{MAX_FACE_PHOTOS}" }
            }
            if detected {
                p { class: "text-muted", "Rostro detectado correctamente" }
            }

            div { class: "row",
                button { class: "btn-secondary", onclick: move |_| close(), "Cancelar" }
                if complete {
                    button {
                        class: "btn-primary",
                        disabled: uploading,
                        onclick: save,
                        if uploading { "Cargando rostro..." } else { "Guardar rostro" }
                    }
                }
            }
        }
    }
}
