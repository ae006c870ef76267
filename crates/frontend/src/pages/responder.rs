use std::collections::HashSet;

use dioxus::prelude::*;
use leakwatch_shared::models::{Role, Severity};
use leakwatch_shared::store::IncidentStore;
use leakwatch_shared::style::severity_class;
use uuid::Uuid;

use crate::components::notice::NoticeBar;
use crate::geo;
use crate::map::interaction::InteractionState;
use crate::map::MapView;

/// Responder view: analytics, severity filters, geolocation, and the map
/// with resolve/route actions.
#[component]
pub fn ResponderPage(store: Signal<IncidentStore>) -> Element {
    let mut interaction = use_signal(InteractionState::new);
    let mut filters = use_signal(|| Severity::ALL.into_iter().collect::<HashSet<_>>());
    let mut notice = use_signal(|| None::<String>);

    let counts = use_memo(move || store.read().open_counts());
    // Only incidents whose severity filter is on reach the reconciler;
    // toggling a chip removes and recreates their overlays.
    let filtered = use_memo(move || {
        let enabled = filters.read();
        store
            .read()
            .reports()
            .iter()
            .filter(|r| enabled.contains(&r.severity))
            .cloned()
            .collect::<Vec<_>>()
    });

    let locating = interaction.read().locating();
    let has_position = interaction.read().responder_position().is_some();

    rsx! {
        div { class: "responder-page",
            aside { class: "sidebar",
                h2 { "Responder Dashboard" }

                div { class: "panel",
                    button {
                        class: "locate-button",
                        disabled: locating,
                        onclick: move |_| {
                            // Busy flag: drop re-entrant requests while one
                            // geolocation lookup is in flight.
                            if !interaction.write().begin_locating() {
                                return;
                            }
                            geo::request_position(move |result| {
                                let mut state = interaction.write();
                                state.end_locating();
                                match result {
                                    Ok(position) => {
                                        state.set_responder_position(position);
                                        drop(state);
                                        notice.set(Some(
                                            "Location found. Your position is marked on the map."
                                                .to_string(),
                                        ));
                                    }
                                    Err(message) => {
                                        drop(state);
                                        notice.set(Some(message));
                                    }
                                }
                            });
                        },
                        if locating { "Finding\u{2026}" } else { "Find My Location" }
                    }
                    if has_position && !locating {
                        p { class: "locate-active", "Your location is active." }
                    }
                }

                div { class: "panel",
                    h3 { "Analytics" }
                    div { class: "stat-grid",
                        StatCard {
                            title: "Open Reports",
                            count: counts.read().total,
                            icon: "\u{1f4ca}",
                            accent: "accent-open",
                        }
                        StatCard {
                            title: "High Severity",
                            count: counts.read().high,
                            icon: "\u{1f534}",
                            accent: "accent-high",
                        }
                        StatCard {
                            title: "Fire Reports",
                            count: counts.read().fire,
                            icon: "\u{1f525}",
                            accent: "accent-fire",
                        }
                        StatCard {
                            title: "Low Severity",
                            count: counts.read().low,
                            icon: "\u{1f7e1}",
                            accent: "accent-low",
                        }
                    }
                }

                div { class: "panel",
                    h3 { "Filters" }
                    div { class: "filter-chips",
                        for severity in Severity::ALL {
                            button {
                                class: if filters.read().contains(&severity) {
                                    format!("chip chip-{} active", severity_class(severity))
                                } else {
                                    format!("chip chip-{}", severity_class(severity))
                                },
                                onclick: move |_| {
                                    let mut enabled = filters.write();
                                    if !enabled.remove(&severity) {
                                        enabled.insert(severity);
                                    }
                                },
                                "{severity}"
                            }
                        }
                    }
                }
            }

            div { class: "map-panel",
                NoticeBar { message: notice }
                MapView {
                    reports: filtered.into(),
                    role: Role::Responder,
                    interaction,
                    on_notice: move |message: String| notice.set(Some(message)),
                    on_resolve: move |id: Uuid| store.write().resolve(id),
                }
            }
        }
    }
}

#[component]
fn StatCard(title: String, count: usize, icon: String, accent: String) -> Element {
    rsx! {
        div { class: "stat-card",
            div { class: "stat-icon {accent}", span { "{icon}" } }
            div {
                p { class: "stat-title", "{title}" }
                p { class: "stat-count", "{count}" }
            }
        }
    }
}
