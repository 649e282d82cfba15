//! Login page.

use dioxus::prelude::*;

use crate::app::components::{InlineMessage, TextInput};
use crate::app::navigation_context::use_navigation;
use crate::app::session_context::use_session;
use crate::navigation::MenuKey;

#[component]
pub fn Login() -> Element {
    let session = use_session();
    let navigation = use_navigation();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let submit = move |e: FormEvent| {
        e.prevent_default();
        if let Err(err) = session.login(&username.read(), &password.read()) {
            error.set(Some(err.to_string()));
        }
    };

    rsx! {
        document::Title { "Iniciar sesión - Casa Inteligente" }

        div { class: "auth-page",
            form { class: "card auth-card", onsubmit: submit,
                h1 { "Casa Inteligente" }
                p { class: "text-muted", "Inicia sesión para controlar tu hogar" }

                if let Some(message) = error() {
                    InlineMessage { message, on_dismiss: move |_| error.set(None) }
                }

                TextInput {
                    label: "Usuario",
                    value: username(),
                    on_input: move |v| username.set(v),
                }
                TextInput {
                    label: "Contraseña",
                    input_type: "password",
                    value: password(),
                    on_input: move |v| password.set(v),
                }
                button { class: "btn-primary", r#type: "submit", "Ingresar" }
                a {
                    href: MenuKey::RecoverPassword.path(),
                    onclick: move |e: MouseEvent| {
                        e.prevent_default();
                        navigation.select(MenuKey::RecoverPassword);
                    },
                    "¿Olvidaste tu contraseña?"
                }
            }
        }
    }
}
