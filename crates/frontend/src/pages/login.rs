use dioxus::prelude::*;
use leakwatch_shared::models::Role;

use crate::Session;

#[component]
pub fn LoginPage(on_login: EventHandler<Session>) -> Element {
    let mut email = use_signal(String::new);
    let mut role = use_signal(|| Role::Citizen);
    let mut error = use_signal(|| None::<String>);

    rsx! {
        div { class: "login-screen",
            div { class: "login-card",
                div { class: "login-title",
                    h1 { "\u{1f525} Chennai Leak Monitor" }
                    p { "Sign in to continue" }
                }
                form {
                    onsubmit: move |evt: Event<FormData>| {
                        evt.prevent_default();
                        let address = email.read().trim().to_string();
                        if address.is_empty() {
                            error.set(Some("Email is required.".to_string()));
                            return;
                        }
                        error.set(None);
                        on_login.call(Session {
                            email: address,
                            role: *role.read(),
                        });
                    },

                    label { r#for: "email", "Email Address" }
                    input {
                        id: "email",
                        r#type: "email",
                        placeholder: "you@example.com",
                        value: "{email}",
                        oninput: move |evt: Event<FormData>| email.set(evt.value().to_string()),
                    }

                    label { "Sign in as" }
                    div { class: "role-toggle",
                        button {
                            r#type: "button",
                            class: if *role.read() == Role::Citizen { "active" } else { "" },
                            onclick: move |_| role.set(Role::Citizen),
                            "Citizen"
                        }
                        button {
                            r#type: "button",
                            class: if *role.read() == Role::Responder { "active" } else { "" },
                            onclick: move |_| role.set(Role::Responder),
                            "Responder"
                        }
                    }

                    if let Some(message) = error.read().clone() {
                        p { class: "form-error", "{message}" }
                    }

                    button { r#type: "submit", class: "login-submit", "Sign In" }
                }
            }
        }
    }
}
