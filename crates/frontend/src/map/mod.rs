//! The live incident map: overlay canvas, synchronization engine, and the
//! Dioxus component that wires them to DOM events.

pub mod interaction;
pub mod project;
pub mod reconciler;
pub mod route;
pub mod surface;
pub mod view;

use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use leakwatch_shared::models::{IncidentReport, LatLng, ReportStatus, Role};
use leakwatch_shared::style::severity_class;
use uuid::Uuid;

use interaction::{ActionOutcome, InteractionState, PopupAction};
use project::{Viewport, VIEW_H, VIEW_W};
use reconciler::OverlayReconciler;
use route::{RouteCommand, RoutePlan};
use surface::{MapSurface, MarkerId};

const MAP_CONTAINER_ID: &str = "incident-map-container";

/// Drag threshold in pixels — movement below this is treated as a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// Default view: central Chennai.
fn default_center() -> LatLng {
    LatLng::new(13.05, 80.24).expect("default center is in range")
}

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

/// Get the bounding client rect of the map container element.
fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

/// Convert viewport (client) coordinates to logical view coordinates.
fn client_to_view(client_x: f64, client_y: f64) -> Option<(f64, f64)> {
    let rect = container_rect()?;
    project::container_to_view(
        client_x - rect.left(),
        client_y - rect.top(),
        rect.width(),
        rect.height(),
    )
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    reports: ReadSignal<Vec<IncidentReport>>,
    role: Role,
    interaction: Signal<InteractionState>,
    on_notice: EventHandler<String>,
    on_resolve: Option<EventHandler<Uuid>>,
    on_map_pick: Option<EventHandler<LatLng>>,
    center_on: Option<ReadSignal<Option<LatLng>>>,
) -> Element {
    let mut surface = use_signal(|| MapSurface::new(default_center(), project::DEFAULT_ZOOM));
    let mut reconciler = use_signal(OverlayReconciler::new);
    let mut route_plan = use_signal(RoutePlan::new);

    // Reconcile marker overlays against the incident list on every change.
    use_effect(move || {
        let list = reports.read();
        {
            let mut surf = surface.write();
            reconciler.write().reconcile(Some(&mut surf), &list);
        }
        // A popup whose incident vanished from the index is stale: close it.
        if let Some(selected) = interaction.peek().selected() {
            if !reconciler.peek().contains(selected) {
                interaction.write().close(&mut surface.write());
            }
        }
    });

    // Mirror the responder position into its marker.
    use_effect(move || {
        let position = interaction.read().responder_position();
        let mut surf = surface.write();
        match position {
            Some(p) => surf.set_responder_marker(p),
            None => surf.clear_responder_marker(),
        }
    });

    // Keep the route overlay in sync with the (origin, destination) pair.
    use_effect(move || {
        let (origin, destination) = {
            let state = interaction.read();
            (state.responder_position(), state.route_target())
        };
        match route_plan.write().update(origin, destination) {
            RouteCommand::Clear => surface.write().clear_path(),
            RouteCommand::Unchanged => {}
            RouteCommand::Request {
                origin,
                destination,
                ticket,
            } => {
                spawn(async move {
                    let outcome = crate::api::fetch_route(origin, destination).await;
                    let mut surf = surface.write();
                    if let Some(notice) = route_plan.write().complete(&mut surf, ticket, outcome) {
                        on_notice.call(notice);
                    }
                });
            }
        }
    });

    // Pan to a newly submitted report.
    use_effect(move || {
        if let Some(signal) = center_on {
            if let Some(point) = *signal.read() {
                surface.write().pan_to(point, project::STREET_ZOOM);
            }
        }
    });

    // Drag state
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_start_viewport = use_signal(|| None::<Viewport>);

    let svg_html = use_memo(move || {
        let surf = surface.read();
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {VIEW_W} {VIEW_H}" preserveAspectRatio="none" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;">{}</svg>"#,
            view::build_overlay_svg(&surf, VIEW_W, VIEW_H)
        )
    });

    // Snapshot the popup for rendering; its anchor position tracks the
    // viewport so it stays glued to its marker while panning.
    let popup_view = surface.read().popup().cloned();
    let popup_style = popup_view.as_ref().map(|popup| {
        let surf = surface.read();
        let (x, y) = project::geo_to_view(surf.viewport(), popup.anchor, VIEW_W, VIEW_H);
        format!(
            "left:{:.2}%;top:{:.2}%;",
            x / VIEW_W * 100.0,
            y / VIEW_H * 100.0
        )
    });

    let container_class = if *is_dragging.read() {
        "map-container dragging"
    } else if role == Role::Citizen {
        "map-container picking"
    } else {
        "map-container"
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_start_viewport.set(Some(*surface.peek().viewport()));
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let dx = client.x - sx;
                let dy = client.y - sy;

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let Some(rect) = container_rect() else { return };
                    let Some(start_vp) = *drag_start_viewport.read() else { return };
                    if rect.width() <= 0.0 || rect.height() <= 0.0 {
                        return;
                    }
                    let logical_dx = dx * VIEW_W / rect.width();
                    let logical_dy = dy * VIEW_H / rect.height();
                    surface
                        .write()
                        .set_viewport(project::pan_by_px(&start_vp, logical_dx, logical_dy));
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click
                if !was_dragging || was_drag {
                    return;
                }
                let client = evt.client_coordinates();
                let Some((vx, vy)) = client_to_view(client.x, client.y) else {
                    return;
                };

                // Delegated dispatch: hit-test once, then look up the
                // incident behind the marker handle.
                let hit = {
                    let surf = surface.read();
                    let vp = *surf.viewport();
                    let candidates: Vec<(MarkerId, (f64, f64))> = surf
                        .markers()
                        .map(|(id, m)| (id, project::geo_to_view(&vp, m.position, VIEW_W, VIEW_H)))
                        .collect();
                    project::find_nearest(&candidates, (vx, vy), project::HIT_RADIUS_PX)
                };

                if let Some(handle) = hit {
                    let clicked = reconciler
                        .peek()
                        .incident_of(handle)
                        .and_then(|id| reports.peek().iter().find(|r| r.id == id).cloned());
                    if let Some(report) = clicked {
                        interaction.write().select(&mut surface.write(), &report, role);
                    }
                } else {
                    let point = {
                        let surf = surface.read();
                        project::view_to_geo(surf.viewport(), vx, vy, VIEW_W, VIEW_H)
                    };
                    if let Some(point) = point {
                        if let Some(picked) = interaction.peek().map_click(role, point) {
                            if let Some(handler) = on_map_pick {
                                handler.call(picked);
                            }
                        }
                    }
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let delta_y = wheel_delta_y(evt.data().delta());
                if delta_y == 0.0 {
                    return;
                }
                let step = if delta_y < 0.0 {
                    project::ZOOM_STEP
                } else {
                    -project::ZOOM_STEP
                };
                let client = evt.data().client_coordinates();
                let Some(cursor) = client_to_view(client.x, client.y) else {
                    return;
                };
                let mut surf = surface.write();
                let vp = *surf.viewport();
                surf.set_viewport(project::zoom_about(&vp, vp.zoom + step, cursor, VIEW_W, VIEW_H));
            },

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                surface.write().reset_view(default_center());
            },

            div {
                dangerous_inner_html: "{svg_html}",
                style: "position:absolute;top:0;left:0;width:100%;height:100%;",
            }

            if let Some(popup) = popup_view {
                Popup {
                    content: popup.content,
                    style: popup_style.unwrap_or_default(),
                    interaction,
                    surface,
                    on_notice: move |message| on_notice.call(message),
                    on_resolve: move |id| {
                        if let Some(handler) = on_resolve {
                            handler.call(id);
                        }
                    },
                }
            }
        }
    }
}

/// The single info popup, anchored to its marker.
#[component]
fn Popup(
    content: surface::PopupContent,
    style: String,
    interaction: Signal<InteractionState>,
    surface: Signal<MapSurface>,
    on_notice: EventHandler<String>,
    on_resolve: EventHandler<Uuid>,
) -> Element {
    let incident = content.incident_id;
    let resolved = content.status == ReportStatus::Resolved;
    // A resolved report shows "Resolved" whatever its severity was.
    let status_class = if resolved {
        "popup-status-value resolved".to_string()
    } else {
        format!("popup-status-value {}", severity_class(content.severity))
    };
    let status_text = if resolved {
        "Resolved".to_string()
    } else {
        content.severity.to_string()
    };

    let mut dispatch = move |action: PopupAction| {
        let outcome = interaction
            .write()
            .dispatch(&mut surface.write(), incident, action);
        match outcome {
            Some(ActionOutcome::Resolved(id)) => on_resolve.call(id),
            Some(ActionOutcome::Rejected(message)) => on_notice.call(message.to_string()),
            Some(ActionOutcome::RouteSet) | None => {}
        }
    };

    rsx! {
        div { class: "map-popup", style: "{style}",
            div { class: "popup-header",
                h2 { "{content.location_name}" }
                button {
                    class: "popup-close",
                    onclick: move |_| {
                        interaction.write().close(&mut surface.write());
                    },
                    "\u{d7}"
                }
            }
            p { class: "popup-status",
                strong { "Status:" }
                span { class: "{status_class}", " {status_text}" }
            }
            if let Some(reported_at) = content.reported_at.clone() {
                p { class: "popup-meta", "{reported_at}" }
            }
            if let Some(reporter) = content.reporter.clone() {
                p { class: "popup-meta",
                    "Reported by: "
                    span { class: "popup-reporter", "{reporter}" }
                }
            }
            if content.actions {
                div { class: "popup-actions",
                    button {
                        class: "popup-resolve",
                        onclick: move |_| dispatch(PopupAction::Resolve),
                        "Mark as Resolved"
                    }
                    button {
                        class: "popup-route",
                        onclick: move |_| dispatch(PopupAction::ShowRoute),
                        "Show Route"
                    }
                }
            }
        }
    }
}
