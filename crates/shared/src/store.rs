use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::{IncidentReport, LatLng, ReportStatus, Severity};

/// Open-report tallies for the responder dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenCounts {
    pub total: usize,
    pub low: usize,
    pub high: usize,
    pub fire: usize,
}

/// The ordered collection of incident reports.
///
/// Append-only: reports are never removed, and the only in-place mutation is
/// the one-way `Open -> Resolved` status transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncidentStore {
    reports: Vec<IncidentReport>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the demo reports the app boots with.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let seed = |name: &str, lat: f64, lng: f64, severity, mins_ago: i64, reporter: &str| {
            IncidentReport {
                id: Uuid::new_v4(),
                reporter: reporter.to_string(),
                location_name: name.to_string(),
                position: LatLng::new(lat, lng).expect("seed coordinates are in range"),
                severity,
                created_at: now - Duration::minutes(mins_ago),
                status: ReportStatus::Open,
            }
        };

        Self {
            reports: vec![
                seed(
                    "T. Nagar Commercial Zone",
                    13.0415,
                    80.2319,
                    Severity::High,
                    15,
                    "user1@example.com",
                ),
                seed(
                    "Anna Nagar Residential Block",
                    13.0878,
                    80.2104,
                    Severity::Low,
                    45,
                    "user2@example.com",
                ),
                seed(
                    "Adyar River Crossing",
                    13.0044,
                    80.2562,
                    Severity::Fire,
                    5,
                    "user3@example.com",
                ),
                seed(
                    "Velachery Tech Park Vicinity",
                    12.9786,
                    80.2185,
                    Severity::Low,
                    120,
                    "user4@example.com",
                ),
                seed(
                    "Guindy Industrial Estate",
                    13.0099,
                    80.2115,
                    Severity::High,
                    25,
                    "user5@example.com",
                ),
                seed(
                    "Mylapore Temple Area",
                    13.0336,
                    80.2694,
                    Severity::Low,
                    90,
                    "user6@example.com",
                ),
            ],
        }
    }

    /// Append a new open report, assigning id and timestamp.
    pub fn add(
        &mut self,
        location_name: &str,
        position: LatLng,
        severity: Severity,
        reporter: &str,
    ) -> &IncidentReport {
        self.reports.push(IncidentReport {
            id: Uuid::new_v4(),
            reporter: reporter.to_string(),
            location_name: location_name.to_string(),
            position,
            severity,
            created_at: Utc::now(),
            status: ReportStatus::Open,
        });
        self.reports.last().expect("report was just appended")
    }

    /// Flip an open report to resolved. Unknown ids and already-resolved
    /// reports are silent no-ops.
    pub fn resolve(&mut self, id: Uuid) {
        if let Some(report) = self.reports.iter_mut().find(|r| r.id == id) {
            if report.status == ReportStatus::Open {
                report.status = ReportStatus::Resolved;
            }
        }
    }

    pub fn reports(&self) -> &[IncidentReport] {
        &self.reports
    }

    pub fn get(&self, id: Uuid) -> Option<&IncidentReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn open_counts(&self) -> OpenCounts {
        let mut counts = OpenCounts::default();
        for report in self.reports.iter().filter(|r| r.status == ReportStatus::Open) {
            counts.total += 1;
            match report.severity {
                Severity::Low => counts.low += 1,
                Severity::High => counts.high += 1,
                Severity::Fire => counts.fire += 1,
            }
        }
        counts
    }
}
