mod api;
mod components;
mod geo;
mod map;
mod pages;

use dioxus::prelude::*;
use leakwatch_shared::models::Role;
use leakwatch_shared::store::IncidentStore;

use components::header::Header;
use pages::citizen::CitizenPage;
use pages::login::LoginPage;
use pages::responder::ResponderPage;

/// The signed-in identity for this browser session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    let store = use_signal(IncidentStore::seeded);
    let mut session = use_signal(|| None::<Session>);

    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        if let Some(user) = session.read().clone() {
            div { class: "app-shell",
                Header {
                    email: user.email.clone(),
                    role: user.role,
                    on_logout: move |_| session.set(None),
                }
                main { class: "app-main",
                    if user.role == Role::Responder {
                        ResponderPage { store }
                    } else {
                        CitizenPage { store, reporter: user.email.clone() }
                    }
                }
            }
        } else {
            LoginPage { on_login: move |user| session.set(Some(user)) }
        }
    }
}

fn main() {
    launch(App);
}
