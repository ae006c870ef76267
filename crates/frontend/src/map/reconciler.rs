//! Reconciles the incident list against the marker overlays.
//!
//! The reconciler owns the only mapping from incident ids to marker handles.
//! Each pass makes the surface match the input list with the minimal set of
//! create/restyle/remove operations: markers are never torn down and
//! recreated for a style-only change, so an existing marker keeps its handle
//! (and the popup anchored to it keeps its anchor) across status flips.

use std::collections::{HashMap, HashSet};

use leakwatch_shared::models::IncidentReport;
use leakwatch_shared::style::marker_style;
use tracing::warn;
use uuid::Uuid;

use super::surface::{MapSurface, Marker, MarkerId};

#[derive(Debug, Default)]
pub struct OverlayReconciler {
    index: HashMap<Uuid, MarkerId>,
}

impl OverlayReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one reconciliation pass. Idempotent and safe on every render
    /// tick; a pass against an uninitialized surface is a no-op and is
    /// simply retried on the next invocation.
    pub fn reconcile(&mut self, surface: Option<&mut MapSurface>, reports: &[IncidentReport]) {
        let Some(surface) = surface else {
            return;
        };

        // Drop overlays whose incident is gone from the input (resolved away
        // by a filter, or otherwise no longer listed).
        let live: HashSet<Uuid> = reports.iter().map(|r| r.id).collect();
        self.index.retain(|incident, handle| {
            if live.contains(incident) {
                return true;
            }
            if !surface.remove_marker(*handle) {
                warn!(%incident, "removing marker that was already gone");
            }
            false
        });

        // Create markers for new incidents; restyle existing ones in place.
        for report in reports {
            let style = marker_style(report.severity, report.status);
            match self.index.get(&report.id) {
                Some(&handle) => {
                    if !surface.restyle_marker(handle, style) {
                        warn!(incident = %report.id, "restyle hit a dead marker handle");
                    }
                }
                None => {
                    let handle = surface.add_marker(Marker {
                        position: report.position,
                        style,
                        title: report.location_name.clone(),
                    });
                    self.index.insert(report.id, handle);
                }
            }
        }
    }

    pub fn contains(&self, incident: Uuid) -> bool {
        self.index.contains_key(&incident)
    }

    /// Reverse lookup used by hit-testing: which incident owns this marker?
    pub fn incident_of(&self, handle: MarkerId) -> Option<Uuid> {
        self.index
            .iter()
            .find(|(_, h)| **h == handle)
            .map(|(incident, _)| *incident)
    }

    pub fn handle_of(&self, incident: Uuid) -> Option<MarkerId> {
        self.index.get(&incident).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.index.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leakwatch_shared::models::{LatLng, ReportStatus, Severity};
    use leakwatch_shared::style::{marker_style, MarkerShape, RESOLVED_FILL};

    use crate::map::project::DEFAULT_ZOOM;

    fn report(name: &str, lat: f64, lng: f64, severity: Severity) -> IncidentReport {
        IncidentReport {
            id: Uuid::new_v4(),
            reporter: "user@example.com".to_string(),
            location_name: name.to_string(),
            position: LatLng::new(lat, lng).unwrap(),
            severity,
            created_at: Utc::now(),
            status: ReportStatus::Open,
        }
    }

    fn surface() -> MapSurface {
        MapSurface::new(LatLng::new(13.05, 80.24).unwrap(), DEFAULT_ZOOM)
    }

    fn index_ids(rec: &OverlayReconciler) -> HashSet<Uuid> {
        rec.ids().collect()
    }

    #[test]
    fn test_index_keys_match_live_ids_after_every_pass() {
        let mut surface = surface();
        let mut rec = OverlayReconciler::new();

        let a = report("A", 13.0, 80.2, Severity::Low);
        let b = report("B", 13.01, 80.21, Severity::High);
        let c = report("C", 13.02, 80.22, Severity::Fire);

        rec.reconcile(Some(&mut surface), &[a.clone(), b.clone(), c.clone()]);
        let expected: HashSet<Uuid> = [a.id, b.id, c.id].into_iter().collect();
        assert_eq!(index_ids(&rec), expected);
        assert_eq!(surface.marker_count(), 3);

        // Filtering B out destroys exactly its overlay.
        rec.reconcile(Some(&mut surface), &[a.clone(), c.clone()]);
        let expected: HashSet<Uuid> = [a.id, c.id].into_iter().collect();
        assert_eq!(index_ids(&rec), expected);
        assert_eq!(surface.marker_count(), 2);

        // Bringing B back creates exactly one new overlay.
        rec.reconcile(Some(&mut surface), &[a, b.clone(), c]);
        assert!(rec.contains(b.id));
        assert_eq!(surface.marker_count(), 3);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut surface = surface();
        let mut rec = OverlayReconciler::new();
        let reports = vec![report("A", 13.0, 80.2, Severity::Low)];

        rec.reconcile(Some(&mut surface), &reports);
        let handle = rec.handle_of(reports[0].id).unwrap();
        rec.reconcile(Some(&mut surface), &reports);
        rec.reconcile(Some(&mut surface), &reports);

        assert_eq!(rec.handle_of(reports[0].id), Some(handle));
        assert_eq!(surface.marker_count(), 1);
    }

    #[test]
    fn test_status_change_restyles_in_place_without_recreating() {
        let mut surface = surface();
        let mut rec = OverlayReconciler::new();
        let mut fire = report("Adyar River Crossing", 13.0044, 80.2562, Severity::Fire);

        rec.reconcile(Some(&mut surface), &[fire.clone()]);
        let handle = rec.handle_of(fire.id).unwrap();
        assert_eq!(
            surface.marker(handle).unwrap().style.shape,
            MarkerShape::Flame
        );

        fire.status = ReportStatus::Resolved;
        rec.reconcile(Some(&mut surface), &[fire.clone()]);

        // Same handle, new style: resolved wins over fire.
        assert_eq!(rec.handle_of(fire.id), Some(handle));
        let marker = surface.marker(handle).unwrap();
        assert_eq!(marker.style.fill, RESOLVED_FILL);
        assert_eq!(marker.style.shape, MarkerShape::Disc);
        assert_eq!(marker.position, fire.position);
    }

    #[test]
    fn test_uninitialized_surface_defers_without_error() {
        let mut rec = OverlayReconciler::new();
        let reports = vec![report("A", 13.0, 80.2, Severity::Low)];

        rec.reconcile(None, &reports);
        assert!(rec.is_empty());

        // Retried once the surface exists.
        let mut surface = surface();
        rec.reconcile(Some(&mut surface), &reports);
        assert_eq!(rec.len(), 1);
        assert_eq!(surface.marker_count(), 1);
    }

    #[test]
    fn test_empty_input_clears_everything() {
        let mut surface = surface();
        let mut rec = OverlayReconciler::new();
        rec.reconcile(
            Some(&mut surface),
            &[
                report("A", 13.0, 80.2, Severity::Low),
                report("B", 13.01, 80.21, Severity::High),
            ],
        );
        rec.reconcile(Some(&mut surface), &[]);
        assert!(rec.is_empty());
        assert_eq!(surface.marker_count(), 0);
    }

    #[test]
    fn test_externally_removed_marker_is_logged_not_fatal() {
        let mut surface = surface();
        let mut rec = OverlayReconciler::new();
        let a = report("A", 13.0, 80.2, Severity::Low);
        rec.reconcile(Some(&mut surface), &[a.clone()]);

        // Simulate a stale handle: the marker vanished behind our back.
        let handle = rec.handle_of(a.id).unwrap();
        surface.remove_marker(handle);

        // Restyle pass survives, and dropping the incident survives too.
        rec.reconcile(Some(&mut surface), &[a]);
        rec.reconcile(Some(&mut surface), &[]);
        assert!(rec.is_empty());
    }

    #[test]
    fn test_new_marker_styled_by_severity() {
        let mut surface = surface();
        let mut rec = OverlayReconciler::new();
        let high = report("Guindy Industrial Estate", 13.0099, 80.2115, Severity::High);
        rec.reconcile(Some(&mut surface), &[high.clone()]);

        let marker = surface.marker(rec.handle_of(high.id).unwrap()).unwrap();
        assert_eq!(marker.style, marker_style(Severity::High, ReportStatus::Open));
        assert_eq!(marker.title, "Guindy Industrial Estate");
    }

    #[test]
    fn test_incident_of_inverts_handle_of() {
        let mut surface = surface();
        let mut rec = OverlayReconciler::new();
        let a = report("A", 13.0, 80.2, Severity::Low);
        rec.reconcile(Some(&mut surface), &[a.clone()]);
        let handle = rec.handle_of(a.id).unwrap();
        assert_eq!(rec.incident_of(handle), Some(a.id));
    }
}
