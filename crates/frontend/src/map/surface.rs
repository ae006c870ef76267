//! The overlay canvas the sync engine draws on.
//!
//! The surface owns every overlay: incident markers keyed by opaque
//! [`MarkerId`] handles, the single info popup, the optional responder
//! marker, and the route path. Rendering is done elsewhere as a pure
//! function of this state; nothing here touches the DOM.

use std::collections::HashMap;

use leakwatch_shared::models::{LatLng, ReportStatus, Severity};
use leakwatch_shared::style::MarkerStyle;
use uuid::Uuid;

use super::project::{Viewport, DEFAULT_ZOOM, ZOOM_MAX, ZOOM_MIN};

/// Opaque handle to a marker slot. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub style: MarkerStyle,
    pub title: String,
}

/// Snapshot of an incident taken when its popup was opened.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub incident_id: Uuid,
    pub location_name: String,
    pub severity: Severity,
    pub status: ReportStatus,
    /// Responder-only detail lines.
    pub reporter: Option<String>,
    pub reported_at: Option<String>,
    /// Whether resolve/route actions are offered.
    pub actions: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub anchor: LatLng,
    pub content: PopupContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapSurface {
    viewport: Viewport,
    markers: HashMap<MarkerId, Marker>,
    next_marker: u64,
    popup: Option<Popup>,
    responder: Option<LatLng>,
    path: Option<Vec<LatLng>>,
}

impl MapSurface {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            viewport: Viewport::new(center, zoom),
            markers: HashMap::new(),
            next_marker: 0,
            popup: None,
            responder: None,
            path: None,
        }
    }

    // --- Markers ---

    pub fn add_marker(&mut self, marker: Marker) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(id, marker);
        id
    }

    /// Restyle a marker in place. Returns `false` for a dead handle.
    pub fn restyle_marker(&mut self, id: MarkerId, style: MarkerStyle) -> bool {
        match self.markers.get_mut(&id) {
            Some(marker) => {
                marker.style = style;
                true
            }
            None => false,
        }
    }

    /// Remove a marker. Returns `false` for a dead handle.
    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &Marker)> {
        self.markers.iter().map(|(id, m)| (*id, m))
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    // --- Popup ---

    pub fn show_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    // --- Responder marker ---

    pub fn set_responder_marker(&mut self, position: LatLng) {
        self.responder = Some(position);
    }

    pub fn clear_responder_marker(&mut self) {
        self.responder = None;
    }

    pub fn responder_marker(&self) -> Option<LatLng> {
        self.responder
    }

    // --- Route path ---

    pub fn set_path(&mut self, points: Vec<LatLng>) {
        self.path = Some(points);
    }

    pub fn clear_path(&mut self) {
        self.path = None;
    }

    pub fn path(&self) -> Option<&[LatLng]> {
        self.path.as_deref()
    }

    // --- Viewport ---

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn pan_to(&mut self, center: LatLng, zoom: f64) {
        self.viewport = Viewport::new(center, zoom.clamp(ZOOM_MIN, ZOOM_MAX));
    }

    pub fn reset_view(&mut self, center: LatLng) {
        self.viewport = Viewport::new(center, DEFAULT_ZOOM);
    }
}
