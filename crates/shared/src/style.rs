//! Marker styling for the map overlay.
//!
//! The style of a marker is a pure function of `(severity, status)`.
//! Resolution overrides severity entirely: a resolved fire report renders in
//! the resolved style, with no residual urgency styling.

use crate::models::{ReportStatus, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Plain disc, colored by severity or resolution.
    Disc,
    /// Flame glyph for ignited leaks — distinguishable without color vision.
    Flame,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub fill: &'static str,
    pub scale: f64,
}

pub const RESOLVED_FILL: &str = "#34d399";
pub const LOW_FILL: &str = "#fbbf24";
pub const HIGH_FILL: &str = "#f87171";
pub const FIRE_FILL: &str = "#fb923c";

/// Derive the marker style for a report. Resolved short-circuits severity.
pub fn marker_style(severity: Severity, status: ReportStatus) -> MarkerStyle {
    if status == ReportStatus::Resolved {
        return MarkerStyle {
            shape: MarkerShape::Disc,
            fill: RESOLVED_FILL,
            scale: 1.0,
        };
    }
    match severity {
        Severity::Low => MarkerStyle {
            shape: MarkerShape::Disc,
            fill: LOW_FILL,
            scale: 1.0,
        },
        Severity::High => MarkerStyle {
            shape: MarkerShape::Disc,
            fill: HIGH_FILL,
            scale: 1.0,
        },
        Severity::Fire => MarkerStyle {
            shape: MarkerShape::Flame,
            fill: FIRE_FILL,
            scale: 1.2,
        },
    }
}

/// CSS class suffix for severity-tinted UI (filter chips, popup status line).
pub fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "low",
        Severity::High => "high",
        Severity::Fire => "fire",
    }
}
