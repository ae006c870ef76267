//! Route proxy.
//!
//! The frontend posts an origin/destination pair; we forward it to an
//! OSRM-compatible service and hand back the decoded path. Keeping the
//! provider behind the backend avoids CORS and keeps its URL configurable
//! in one place (`ROUTING_URL`).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use leakwatch_shared::models::LatLng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Public OSRM demo server; override with `ROUTING_URL`.
const DEFAULT_ROUTING_URL: &str = "https://router.project-osrm.org";

pub struct RoutingState {
    base_url: String,
    client: reqwest::Client,
}

impl RoutingState {
    pub fn from_env() -> Self {
        Self::new(std::env::var("ROUTING_URL").unwrap_or_else(|_| DEFAULT_ROUTING_URL.to_string()))
    }

    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub origin: LatLng,
    pub destination: LatLng,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePath {
    pub points: Vec<LatLng>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

// OSRM wire format. Geometry is GeoJSON, so coordinates come as [lng, lat].

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Build the OSRM request URL. OSRM wants `lng,lat` pairs.
pub fn osrm_route_url(base_url: &str, origin: LatLng, destination: LatLng) -> String {
    format!(
        "{}/route/v1/driving/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson&alternatives=false",
        base_url,
        origin.lng(),
        origin.lat(),
        destination.lng(),
        destination.lat()
    )
}

/// Decode an OSRM response body into a path.
pub fn parse_osrm_response(body: &str) -> Result<RoutePath, String> {
    let resp: OsrmResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed routing response: {e}"))?;
    if resp.code != "Ok" {
        return Err(resp.message.unwrap_or(resp.code));
    }
    let route = resp
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| "routing service returned no routes".to_string())?;
    let points = route
        .geometry
        .coordinates
        .iter()
        .map(|c| LatLng::new(c[1], c[0]).map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    if points.len() < 2 {
        return Err("routing service returned an empty route".to_string());
    }
    Ok(RoutePath {
        points,
        distance_meters: route.distance,
        duration_seconds: route.duration,
    })
}

pub async fn route_handler(
    State(state): State<Arc<RoutingState>>,
    Json(query): Json<RouteQuery>,
) -> Result<Json<RoutePath>, (StatusCode, String)> {
    let url = osrm_route_url(&state.base_url, query.origin, query.destination);

    let response = state
        .client
        .get(&url)
        .send()
        .await
        .map_err(|e| bad_gateway(&e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| bad_gateway(&e.to_string()))?;

    if !status.is_success() {
        // OSRM reports errors with a JSON body; prefer its message.
        let message = parse_osrm_response(&body)
            .err()
            .unwrap_or_else(|| format!("routing service returned {status}"));
        return Err(bad_gateway(&message));
    }

    parse_osrm_response(&body)
        .map(Json)
        .map_err(|message| bad_gateway(&message))
}

fn bad_gateway(message: &str) -> (StatusCode, String) {
    warn!(error = message, "route lookup failed");
    (StatusCode::BAD_GATEWAY, message.to_string())
}
