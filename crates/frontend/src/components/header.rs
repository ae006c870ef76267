use dioxus::prelude::*;
use leakwatch_shared::models::Role;

#[component]
pub fn Header(email: String, role: Role, on_logout: EventHandler<()>) -> Element {
    rsx! {
        header { class: "app-header",
            h1 { class: "app-title", "\u{1f525} Chennai Leak Monitor" }
            div { class: "header-user",
                div { class: "header-identity",
                    p { class: "header-email", "{email}" }
                    p { class: "header-role", "{role}" }
                }
                button {
                    class: "header-logout",
                    onclick: move |_| on_logout.call(()),
                    "Logout"
                }
            }
        }
    }
}
