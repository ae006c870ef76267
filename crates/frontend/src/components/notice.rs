use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;

/// How long a transient notice stays up before auto-dismissing.
const NOTICE_MS: u32 = 5_000;

/// Transient diagnostic banner for routing/geolocation failures and
/// submission confirmations.
#[component]
pub fn NoticeBar(message: Signal<Option<String>>) -> Element {
    // Each shown message bumps the epoch; a timer only clears the message
    // it was armed for, so a newer notice is never cut short by an older
    // timer.
    let mut epoch = use_signal(|| 0u64);

    use_effect(move || {
        if message.read().is_some() {
            let armed = epoch.peek().wrapping_add(1);
            epoch.set(armed);
            spawn(async move {
                TimeoutFuture::new(NOTICE_MS).await;
                if *epoch.peek() == armed {
                    message.set(None);
                }
            });
        }
    });

    rsx! {
        if let Some(text) = message.read().clone() {
            div { class: "notice-bar",
                span { "{text}" }
                button {
                    class: "notice-dismiss",
                    onclick: move |_| message.set(None),
                    "\u{d7}"
                }
            }
        }
    }
}
