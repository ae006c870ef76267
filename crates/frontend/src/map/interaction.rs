//! Transient UI state that is not part of the incident model: the single
//! open popup, the responder's own position, and the pending route target.
//!
//! Popup actions are dispatched through [`InteractionState::dispatch`],
//! keyed by incident id and action — there is no per-popup listener
//! registration to leak.

use leakwatch_shared::models::{IncidentReport, LatLng, ReportStatus, Role};
use uuid::Uuid;

use super::surface::{MapSurface, Popup, PopupContent};

pub const NO_ORIGIN_NOTICE: &str =
    "Use \"Find My Location\" first to set your starting point.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    Resolve,
    ShowRoute,
}

/// What a dispatched popup action asks the surrounding app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Invoke the resolve callback with this incident id.
    Resolved(Uuid),
    /// A route target was set; the route overlay reacts on its own.
    RouteSet,
    /// The action was rejected with a user-visible message.
    Rejected(&'static str),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    selected: Option<Uuid>,
    responder_position: Option<LatLng>,
    route_target: Option<LatLng>,
    locating: bool,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn responder_position(&self) -> Option<LatLng> {
        self.responder_position
    }

    pub fn route_target(&self) -> Option<LatLng> {
        self.route_target
    }

    pub fn locating(&self) -> bool {
        self.locating
    }

    /// Open the popup for a clicked marker, closing any previous popup
    /// first. The popup binds a snapshot of the report taken now; later
    /// store mutations do not rewrite an open popup.
    pub fn select(&mut self, surface: &mut MapSurface, report: &IncidentReport, role: Role) {
        surface.close_popup();
        self.selected = Some(report.id);
        surface.show_popup(Popup {
            anchor: report.position,
            content: popup_content(report, role),
        });
    }

    /// Explicit close, or teardown when the selection went stale.
    pub fn close(&mut self, surface: &mut MapSurface) {
        self.selected = None;
        surface.close_popup();
    }

    /// Dispatch a popup action keyed by `(incident, action)`. Actions whose
    /// incident no longer matches the open popup are dropped as stale.
    pub fn dispatch(
        &mut self,
        surface: &mut MapSurface,
        incident: Uuid,
        action: PopupAction,
    ) -> Option<ActionOutcome> {
        let popup = surface.popup()?;
        if popup.content.incident_id != incident {
            return None;
        }
        let destination = popup.anchor;

        match action {
            PopupAction::Resolve => {
                self.close(surface);
                Some(ActionOutcome::Resolved(incident))
            }
            PopupAction::ShowRoute => {
                if self.responder_position.is_none() {
                    // Rejected outright: popup stays open, no state changes.
                    return Some(ActionOutcome::Rejected(NO_ORIGIN_NOTICE));
                }
                self.route_target = Some(destination);
                self.close(surface);
                Some(ActionOutcome::RouteSet)
            }
        }
    }

    /// A map click on empty ground. Citizens get the point forwarded to the
    /// report form; for responders it does nothing.
    pub fn map_click(&self, role: Role, point: LatLng) -> Option<LatLng> {
        match role {
            Role::Citizen => Some(point),
            Role::Responder => None,
        }
    }

    pub fn set_responder_position(&mut self, position: LatLng) {
        self.responder_position = Some(position);
    }

    pub fn clear_responder_position(&mut self) {
        self.responder_position = None;
        self.route_target = None;
    }

    /// Gate for the geolocation request. Returns `false` when a request is
    /// already in flight.
    pub fn begin_locating(&mut self) -> bool {
        if self.locating {
            return false;
        }
        self.locating = true;
        true
    }

    pub fn end_locating(&mut self) {
        self.locating = false;
    }
}

/// Build the role-dependent popup body from a report snapshot.
pub fn popup_content(report: &IncidentReport, role: Role) -> PopupContent {
    let elevated = role == Role::Responder;
    PopupContent {
        incident_id: report.id,
        location_name: report.location_name.clone(),
        severity: report.severity,
        status: report.status,
        reporter: elevated.then(|| report.reporter.clone()),
        reported_at: elevated.then(|| report.created_at.format("%d %b %Y, %H:%M UTC").to_string()),
        actions: elevated && report.status == ReportStatus::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leakwatch_shared::models::Severity;

    use crate::map::project::DEFAULT_ZOOM;

    fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn report(name: &str, lat: f64, lng: f64, severity: Severity) -> IncidentReport {
        IncidentReport {
            id: Uuid::new_v4(),
            reporter: "user3@example.com".to_string(),
            location_name: name.to_string(),
            position: point(lat, lng),
            severity,
            created_at: Utc::now(),
            status: ReportStatus::Open,
        }
    }

    fn surface() -> MapSurface {
        MapSurface::new(point(13.05, 80.24), DEFAULT_ZOOM)
    }

    #[test]
    fn test_at_most_one_popup_open() {
        let mut surface = surface();
        let mut state = InteractionState::new();
        let a = report("A", 13.0, 80.2, Severity::Low);
        let b = report("B", 13.01, 80.21, Severity::High);

        state.select(&mut surface, &a, Role::Responder);
        assert_eq!(state.selected(), Some(a.id));

        // Selecting another incident supersedes the first popup.
        state.select(&mut surface, &b, Role::Responder);
        assert_eq!(state.selected(), Some(b.id));
        let popup = surface.popup().unwrap();
        assert_eq!(popup.content.incident_id, b.id);
    }

    #[test]
    fn test_explicit_close_clears_selection() {
        let mut surface = surface();
        let mut state = InteractionState::new();
        let a = report("A", 13.0, 80.2, Severity::Low);
        state.select(&mut surface, &a, Role::Citizen);
        state.close(&mut surface);
        assert_eq!(state.selected(), None);
        assert!(surface.popup().is_none());
    }

    #[test]
    fn test_citizen_popup_has_no_details_or_actions() {
        let a = report("A", 13.0, 80.2, Severity::High);
        let content = popup_content(&a, Role::Citizen);
        assert!(content.reporter.is_none());
        assert!(content.reported_at.is_none());
        assert!(!content.actions);
        assert_eq!(content.severity, Severity::High);
        assert_eq!(content.status, ReportStatus::Open);
    }

    #[test]
    fn test_responder_popup_shows_details_and_actions_while_open() {
        let mut a = report("A", 13.0, 80.2, Severity::Fire);
        let content = popup_content(&a, Role::Responder);
        assert_eq!(content.reporter.as_deref(), Some("user3@example.com"));
        assert!(content.reported_at.is_some());
        assert!(content.actions);

        // Resolution removes the action buttons from future popups.
        a.status = ReportStatus::Resolved;
        let content = popup_content(&a, Role::Responder);
        assert!(!content.actions);
    }

    #[test]
    fn test_resolve_action_emits_id_and_closes_popup() {
        let mut surface = surface();
        let mut state = InteractionState::new();
        let a = report("A", 13.0, 80.2, Severity::High);
        state.select(&mut surface, &a, Role::Responder);

        let outcome = state.dispatch(&mut surface, a.id, PopupAction::Resolve);
        assert_eq!(outcome, Some(ActionOutcome::Resolved(a.id)));
        assert!(surface.popup().is_none());
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_show_route_without_position_is_rejected() {
        let mut surface = surface();
        let mut state = InteractionState::new();
        let a = report("A", 13.0, 80.2, Severity::High);
        state.select(&mut surface, &a, Role::Responder);

        let outcome = state.dispatch(&mut surface, a.id, PopupAction::ShowRoute);
        assert_eq!(outcome, Some(ActionOutcome::Rejected(NO_ORIGIN_NOTICE)));
        // No other effect: popup stays open, no target set.
        assert!(surface.popup().is_some());
        assert_eq!(state.route_target(), None);
    }

    #[test]
    fn test_show_route_sets_target_to_incident_position() {
        let mut surface = surface();
        let mut state = InteractionState::new();
        state.set_responder_position(point(13.06, 80.25));

        let a = report("A", 13.00, 80.20, Severity::High);
        state.select(&mut surface, &a, Role::Responder);
        let outcome = state.dispatch(&mut surface, a.id, PopupAction::ShowRoute);

        assert_eq!(outcome, Some(ActionOutcome::RouteSet));
        assert_eq!(state.route_target(), Some(a.position));
        assert!(surface.popup().is_none());
    }

    #[test]
    fn test_stale_dispatch_is_dropped() {
        let mut surface = surface();
        let mut state = InteractionState::new();
        let a = report("A", 13.0, 80.2, Severity::High);
        let b = report("B", 13.01, 80.21, Severity::Low);
        state.select(&mut surface, &a, Role::Responder);

        // An action keyed to an incident other than the open popup's.
        assert_eq!(state.dispatch(&mut surface, b.id, PopupAction::Resolve), None);
        assert!(surface.popup().is_some());

        state.close(&mut surface);
        assert_eq!(state.dispatch(&mut surface, a.id, PopupAction::Resolve), None);
    }

    #[test]
    fn test_map_click_forwards_only_for_citizens() {
        let state = InteractionState::new();
        let p = point(13.02, 80.22);
        assert_eq!(state.map_click(Role::Citizen, p), Some(p));
        assert_eq!(state.map_click(Role::Responder, p), None);
    }

    #[test]
    fn test_locating_gate_blocks_reentrant_requests() {
        let mut state = InteractionState::new();
        assert!(state.begin_locating());
        assert!(!state.begin_locating());
        state.end_locating();
        assert!(state.begin_locating());
    }

    #[test]
    fn test_clearing_position_also_drops_route_target() {
        let mut state = InteractionState::new();
        state.set_responder_position(point(13.06, 80.25));
        let mut surface = surface();
        let a = report("A", 13.0, 80.2, Severity::High);
        state.select(&mut surface, &a, Role::Responder);
        state.dispatch(&mut surface, a.id, PopupAction::ShowRoute);
        assert!(state.route_target().is_some());

        state.clear_responder_position();
        assert_eq!(state.responder_position(), None);
        assert_eq!(state.route_target(), None);
    }
}
