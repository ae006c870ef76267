//! SVG rendering of the overlay surface.
//!
//! Everything here is a pure function of surface state, returned as an SVG
//! string the map component injects into the DOM. Keeping it string-based
//! keeps the renderers unit-testable without a browser.

use leakwatch_shared::models::LatLng;
use leakwatch_shared::style::MarkerShape;

use super::project::{self, Viewport};
use super::surface::MapSurface;

/// Flame glyph for ignited leaks, drawn around the marker origin.
const FLAME_PATH: &str = "M0,7 C-3.9,7 -7,4.1 -7,0.5 C-7,-2.2 -5.5,-4.1 -3.9,-6 \
C-3.2,-6.9 -2.5,-7.8 -2,-8.9 C-0.7,-7.3 0.6,-5.9 1.6,-4.4 C2.4,-5.3 3,-6.4 3.3,-7.7 \
C5.4,-5.3 7,-2.8 7,0.5 C7,4.1 3.9,7 0,7 Z";

const ROUTE_STROKE: &str = "#4a90e2";
const RESPONDER_FILL: &str = "#4a90e2";
const MARKER_RADIUS: f64 = 7.0;

/// Margin (logical px) outside the view in which overlays still render, so
/// markers do not pop at the edge mid-pan.
const CULL_MARGIN: f64 = 48.0;

/// Render the whole overlay stack, bottom to top: graticule, route path,
/// incident markers, responder marker.
pub fn build_overlay_svg(surface: &MapSurface, w: f64, h: f64) -> String {
    let mut svg = String::with_capacity(8192);
    let viewport = *surface.viewport();

    build_graticule(&mut svg, &viewport, w, h);
    if let Some(points) = surface.path() {
        build_route_path(&mut svg, &viewport, points, w, h);
    }
    build_incident_markers(&mut svg, surface, w, h);
    if let Some(position) = surface.responder_marker() {
        build_responder_marker(&mut svg, &viewport, position, w, h);
    }
    svg
}

fn on_canvas(x: f64, y: f64, w: f64, h: f64) -> bool {
    x > -CULL_MARGIN && x < w + CULL_MARGIN && y > -CULL_MARGIN && y < h + CULL_MARGIN
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn build_graticule(svg: &mut String, vp: &Viewport, w: f64, h: f64) {
    let step = project::graticule_step(vp.zoom);
    let s = project::scale(vp.zoom);

    let half_lat = h / 2.0 / s;
    let lat_min = vp.center.lat() - half_lat;
    let lat_max = vp.center.lat() + half_lat;
    let mut k = (lat_min / step).ceil() as i64;
    while (k as f64) * step <= lat_max {
        let lat = k as f64 * step;
        if let Ok(p) = LatLng::new(lat.clamp(-90.0, 90.0), vp.center.lng()) {
            let (_, y) = project::geo_to_view(vp, p, w, h);
            svg.push_str(&format!(
                r#"<line x1="0" y1="{y:.1}" x2="{w}" y2="{y:.1}" stroke="rgba(148,163,184,0.12)" stroke-width="1"/>"#
            ));
            let label = project::format_degree(lat, step, 'N', 'S');
            svg.push_str(&format!(
                r#"<text x="6" y="{:.1}" fill="rgba(148,163,184,0.45)" font-size="11" font-family="monospace">{label}</text>"#,
                y - 4.0
            ));
        }
        k += 1;
    }

    let sx = s * vp.center.lat().to_radians().cos();
    if sx.abs() < 1e-9 {
        return;
    }
    let half_lng = w / 2.0 / sx;
    let lng_min = vp.center.lng() - half_lng;
    let lng_max = vp.center.lng() + half_lng;
    let mut k = (lng_min / step).ceil() as i64;
    while (k as f64) * step <= lng_max {
        let lng = k as f64 * step;
        if let Ok(p) = LatLng::new(vp.center.lat(), lng.clamp(-180.0, 180.0)) {
            let (x, _) = project::geo_to_view(vp, p, w, h);
            svg.push_str(&format!(
                r#"<line x1="{x:.1}" y1="0" x2="{x:.1}" y2="{h}" stroke="rgba(148,163,184,0.12)" stroke-width="1"/>"#
            ));
            let label = project::format_degree(lng, step, 'E', 'W');
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" fill="rgba(148,163,184,0.45)" font-size="11" font-family="monospace">{label}</text>"#,
                x + 4.0,
                h - 8.0
            ));
        }
        k += 1;
    }
}

fn build_route_path(svg: &mut String, vp: &Viewport, points: &[LatLng], w: f64, h: f64) {
    if points.len() < 2 {
        return;
    }
    let coords: Vec<String> = points
        .iter()
        .map(|p| {
            let (x, y) = project::geo_to_view(vp, *p, w, h);
            format!("{x:.1},{y:.1}")
        })
        .collect();
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{ROUTE_STROKE}" stroke-width="6" stroke-opacity="0.8" stroke-linecap="round" stroke-linejoin="round"/>"#,
        coords.join(" ")
    ));
}

fn build_incident_markers(svg: &mut String, surface: &MapSurface, w: f64, h: f64) {
    let vp = surface.viewport();
    for (_, marker) in surface.markers() {
        let (x, y) = project::geo_to_view(vp, marker.position, w, h);
        if !on_canvas(x, y, w, h) {
            continue;
        }
        let title = xml_escape(&marker.title);
        let fill = marker.style.fill;
        svg.push_str(&format!(r#"<g role="img"><title>{title}</title>"#));
        match marker.style.shape {
            MarkerShape::Disc => {
                let r = MARKER_RADIUS * marker.style.scale;
                svg.push_str(&format!(
                    r##"<circle cx="{x:.1}" cy="{y:.1}" r="{r}" fill="{fill}" stroke="#ffffff" stroke-width="2"/>"##
                ));
            }
            MarkerShape::Flame => {
                svg.push_str(&format!(
                    r##"<path d="{FLAME_PATH}" transform="translate({x:.1},{y:.1}) scale({})" fill="{fill}" stroke="#ffffff" stroke-width="1.5"/>"##,
                    marker.style.scale
                ));
            }
        }
        svg.push_str("</g>");
    }
}

fn build_responder_marker(svg: &mut String, vp: &Viewport, position: LatLng, w: f64, h: f64) {
    let (x, y) = project::geo_to_view(vp, position, w, h);
    if !on_canvas(x, y, w, h) {
        return;
    }
    svg.push_str(&format!(
        r##"<g role="img"><title>Your position</title><circle cx="{x:.1}" cy="{y:.1}" r="14" fill="{RESPONDER_FILL}" fill-opacity="0.25"/><circle cx="{x:.1}" cy="{y:.1}" r="8" fill="{RESPONDER_FILL}" stroke="#ffffff" stroke-width="2"/></g>"##
    ));
}
