//! Backend API client. The only call the frontend makes is the route
//! lookup; everything else lives in the browser.

use leakwatch_shared::models::LatLng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct RouteRequest {
    pub origin: LatLng,
    pub destination: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub points: Vec<LatLng>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

fn api_url() -> String {
    // Same origin in production; the backend serves the bundle.
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{}/api/route", origin)
}

/// Ask the backend for a driving route. Errors come back as display
/// strings; the route overlay turns them into a transient notice.
pub async fn fetch_route(origin: LatLng, destination: LatLng) -> Result<Vec<LatLng>, String> {
    let request = RouteRequest { origin, destination };

    let resp = reqwest::Client::new()
        .post(api_url())
        .json(&request)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if body.is_empty() {
            return Err(format!("routing service returned {status}"));
        }
        return Err(body);
    }

    let route: RouteResponse = resp.json().await.map_err(|e| e.to_string())?;
    Ok(route.points)
}
