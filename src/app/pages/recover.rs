//! Password recovery wizard page.

use dioxus::prelude::*;

use crate::app::components::{InlineMessage, TextInput};
use crate::app::navigation_context::use_navigation;
use crate::navigation::MenuKey;
use crate::panels::recovery::{RecoveryStep, RecoveryWizard};

#[component]
pub fn RecoverPassword() -> Element {
    let navigation = use_navigation();
    let mut wizard = use_signal(RecoveryWizard::new);
    let mut email = use_signal(String::new);
    let mut code = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let step = wizard.read().step();
    let sent_to = wizard.read().email().to_string();
    let progress = format!("Paso {} de 3 · {}", step.number(), step.title());

    let advance = move |e: FormEvent| {
        e.prevent_default();
        let current = wizard.peek().step();
        let result = match current {
            RecoveryStep::RequestCode => wizard.write().send_code(&email.read()),
            RecoveryStep::VerifyCode => wizard.write().verify_code(&code.read()),
            RecoveryStep::ResetPassword => wizard
                .write()
                .reset_password(&password.read(), &confirm.read()),
            RecoveryStep::Done => Ok(()),
        };
        error.set(result.err().map(|e| e.to_string()));
    };

    let back_to_login = move |e: MouseEvent| {
        e.prevent_default();
        navigation.select(MenuKey::Login);
    };

    rsx! {
        document::Title { "Recuperar contraseña - Casa Inteligente" }

        div { class: "auth-page",
            form { class: "card auth-card", onsubmit: advance,
                h1 { "Recuperar contraseña" }
                p { class: "text-muted", "{progress}" }

                if let Some(message) = error() {
                    InlineMessage { message, on_dismiss: move |_| error.set(None) }
                }

                {match step {
                    RecoveryStep::RequestCode => rsx! {
                        TextInput {
                            label: "Correo electrónico",
                            input_type: "email",
                            value: email(),
                            on_input: move |v| email.set(v),
                        }
                        button { class: "btn-primary", r#type: "submit", "Enviar código" }
                    },
                    RecoveryStep::VerifyCode => rsx! {
                        p { "Enviamos un código de 6 dígitos a {sent_to}" }
                        TextInput {
                            label: "Código",
                            value: code(),
                            on_input: move |v| code.set(v),
                        }
                        div { class: "row",
                            button {
                                class: "btn-secondary",
                                r#type: "button",
                                onclick: move |_| wizard.write().back(),
                                "Atrás"
                            }
                            button { class: "btn-primary", r#type: "submit", "Verificar" }
                        }
                    },
                    RecoveryStep::ResetPassword => rsx! {
                        TextInput {
                            label: "Nueva contraseña",
                            input_type: "password",
                            value: password(),
                            on_input: move |v| password.set(v),
                        }
                        TextInput {
                            label: "Confirmar contraseña",
                            input_type: "password",
                            value: confirm(),
                            on_input: move |v| confirm.set(v),
                        }
                        button { class: "btn-primary", r#type: "submit", "Cambiar contraseña" }
                    },
                    RecoveryStep::Done => rsx! {
                        p { "Tu contraseña fue actualizada." }
                        button {
                            class: "btn-primary",
                            r#type: "button",
                            onclick: back_to_login,
                            "Volver al inicio de sesión"
                        }
                    },
                }}

                if step != RecoveryStep::Done {
                    a { href: MenuKey::Login.path(), onclick: back_to_login, "Volver al inicio de sesión" }
                }
            }
        }
    }
}
