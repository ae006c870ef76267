use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// How serious a reported leak is. `Fire` means the leak has ignited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    High,
    Fire,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::High, Severity::Fire];

    /// Parse the label used in form selects and filter chips.
    pub fn from_label(label: &str) -> Option<Severity> {
        match label {
            "Low" => Some(Severity::Low),
            "High" => Some(Severity::High),
            "Fire" => Some(Severity::Fire),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::High => write!(f, "High"),
            Severity::Fire => write!(f, "Fire"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Open,
    Resolved,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Open => write!(f, "Open"),
            ReportStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

/// Who is looking at the map. Citizens report leaks; responders triage them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Citizen,
    Responder,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Citizen => write!(f, "Citizen"),
            Role::Responder => write!(f, "Responder"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Location name is required.")]
    EmptyLocationName,
    #[error("Latitude must be a number between -90 and 90.")]
    LatitudeOutOfRange,
    #[error("Longitude must be a number between -180 and 180.")]
    LongitudeOutOfRange,
}

/// A validated geographic point. Construction — including deserialization —
/// goes through the range check, so every `LatLng` in the system is in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = ValidationError;

    fn try_from(raw: RawLatLng) -> Result<Self, Self::Error> {
        LatLng::new(raw.lat, raw.lng)
    }
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Result<LatLng, ValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::LatitudeOutOfRange);
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(ValidationError::LongitudeOutOfRange);
        }
        Ok(LatLng { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    pub id: Uuid,
    pub reporter: String,
    pub location_name: String,
    pub position: LatLng,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlng_accepts_in_range() {
        let p = LatLng::new(13.05, 80.24).unwrap();
        assert!((p.lat() - 13.05).abs() < 1e-9);
        assert!((p.lng() - 80.24).abs() < 1e-9);
    }

    #[test]
    fn test_latlng_bounds_are_inclusive() {
        assert!(LatLng::new(90.0, 180.0).is_ok());
        assert!(LatLng::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_latlng_rejects_out_of_range_latitude() {
        assert_eq!(
            LatLng::new(90.01, 0.0),
            Err(ValidationError::LatitudeOutOfRange)
        );
        assert_eq!(
            LatLng::new(-91.0, 0.0),
            Err(ValidationError::LatitudeOutOfRange)
        );
    }

    #[test]
    fn test_latlng_rejects_out_of_range_longitude() {
        assert_eq!(
            LatLng::new(0.0, 180.5),
            Err(ValidationError::LongitudeOutOfRange)
        );
        assert_eq!(
            LatLng::new(0.0, -200.0),
            Err(ValidationError::LongitudeOutOfRange)
        );
    }

    #[test]
    fn test_latlng_rejects_non_finite() {
        assert!(LatLng::new(f64::NAN, 0.0).is_err());
        assert!(LatLng::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_latlng_deserialization_validates() {
        let ok: LatLng = serde_json::from_str(r#"{"lat": 13.05, "lng": 80.24}"#).unwrap();
        assert!((ok.lat() - 13.05).abs() < 1e-9);
        let bad: Result<LatLng, _> = serde_json::from_str(r#"{"lat": 113.0, "lng": 80.24}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_severity_labels_round_trip() {
        for s in Severity::ALL {
            assert_eq!(Severity::from_label(&s.to_string()), Some(s));
        }
        assert_eq!(Severity::from_label("Critical"), None);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = IncidentReport {
            id: Uuid::new_v4(),
            reporter: "user1@example.com".to_string(),
            location_name: "T. Nagar Commercial Zone".to_string(),
            position: LatLng::new(13.0415, 80.2319).unwrap(),
            severity: Severity::High,
            created_at: Utc::now(),
            status: ReportStatus::Open,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("locationName").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["severity"], "High");
        assert_eq!(json["status"], "Open");
    }
}
