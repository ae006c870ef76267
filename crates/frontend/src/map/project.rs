//! Viewport math for the overlay canvas.
//!
//! Overlays are laid out in a fixed logical view space (`VIEW_W` x `VIEW_H`);
//! the SVG stretches to the container, so all projection functions are pure
//! and independent of the live DOM size. Geographic points are projected
//! equirectangularly around the viewport center with a latitude-corrected
//! longitude scale.

use leakwatch_shared::models::LatLng;

/// Logical view-space dimensions. The rendered SVG uses these as its viewBox.
pub const VIEW_W: f64 = 1024.0;
pub const VIEW_H: f64 = 768.0;

pub const ZOOM_MIN: f64 = 3.0;
pub const ZOOM_MAX: f64 = 18.0;
/// Zoom-level increment per wheel tick.
pub const ZOOM_STEP: f64 = 0.4;
/// Zoom applied when centering on a newly submitted report.
pub const STREET_ZOOM: f64 = 15.0;
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Marker hit-test radius in logical pixels.
pub const HIT_RADIUS_PX: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
        }
    }
}

/// Logical pixels per degree of latitude at the given zoom level.
/// Follows the usual web-map convention of a 256px world tile at zoom 0.
pub fn scale(zoom: f64) -> f64 {
    256.0 * 2f64.powf(zoom) / 360.0
}

fn lng_scale(zoom: f64, at_lat: f64) -> f64 {
    scale(zoom) * at_lat.to_radians().cos()
}

/// Project a geographic point into logical view coordinates.
pub fn geo_to_view(vp: &Viewport, point: LatLng, w: f64, h: f64) -> (f64, f64) {
    let s = scale(vp.zoom);
    let sx = lng_scale(vp.zoom, vp.center.lat());
    let x = w / 2.0 + (point.lng() - vp.center.lng()) * sx;
    let y = h / 2.0 - (point.lat() - vp.center.lat()) * s;
    (x, y)
}

/// Invert `geo_to_view`. Returns `None` when the viewport is degenerate
/// (centered at a pole, where the longitude scale collapses).
pub fn view_to_geo(vp: &Viewport, x: f64, y: f64, w: f64, h: f64) -> Option<LatLng> {
    let s = scale(vp.zoom);
    let sx = lng_scale(vp.zoom, vp.center.lat());
    if sx.abs() < 1e-9 {
        return None;
    }
    let lat = (vp.center.lat() + (h / 2.0 - y) / s).clamp(-90.0, 90.0);
    let lng = (vp.center.lng() + (x - w / 2.0) / sx).clamp(-180.0, 180.0);
    LatLng::new(lat, lng).ok()
}

/// Move the viewport so the content appears dragged by `(dx, dy)` logical px.
pub fn pan_by_px(vp: &Viewport, dx: f64, dy: f64) -> Viewport {
    let s = scale(vp.zoom);
    let sx = lng_scale(vp.zoom, vp.center.lat());
    if sx.abs() < 1e-9 {
        return *vp;
    }
    let lat = (vp.center.lat() + dy / s).clamp(-85.0, 85.0);
    let lng = (vp.center.lng() - dx / sx).clamp(-180.0, 180.0);
    match LatLng::new(lat, lng) {
        Ok(center) => Viewport { center, zoom: vp.zoom },
        Err(_) => *vp,
    }
}

/// Change zoom while keeping the geographic point under the cursor fixed.
pub fn zoom_about(vp: &Viewport, new_zoom: f64, cursor: (f64, f64), w: f64, h: f64) -> Viewport {
    let new_zoom = new_zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    let Some(anchor) = view_to_geo(vp, cursor.0, cursor.1, w, h) else {
        return Viewport { center: vp.center, zoom: new_zoom };
    };

    let s = scale(new_zoom);
    let lat = (anchor.lat() - (h / 2.0 - cursor.1) / s).clamp(-85.0, 85.0);
    let sx = lng_scale(new_zoom, lat);
    if sx.abs() < 1e-9 {
        return Viewport { center: vp.center, zoom: new_zoom };
    }
    let lng = (anchor.lng() - (cursor.0 - w / 2.0) / sx).clamp(-180.0, 180.0);
    match LatLng::new(lat, lng) {
        Ok(center) => Viewport { center, zoom: new_zoom },
        Err(_) => Viewport { center: vp.center, zoom: new_zoom },
    }
}

/// Convert container-relative coordinates to logical view coordinates.
/// The SVG stretches to the container (`preserveAspectRatio="none"`), so both
/// axes scale independently.
pub fn container_to_view(cx: f64, cy: f64, rect_w: f64, rect_h: f64) -> Option<(f64, f64)> {
    if rect_w <= 0.0 || rect_h <= 0.0 {
        return None;
    }
    Some((cx * VIEW_W / rect_w, cy * VIEW_H / rect_h))
}

/// Find the candidate nearest to `click` within `threshold`, if any.
pub fn find_nearest<I: Copy>(
    candidates: &[(I, (f64, f64))],
    click: (f64, f64),
    threshold: f64,
) -> Option<I> {
    let mut best = None;
    let mut best_dist = threshold;
    for (id, pos) in candidates {
        let dx = pos.0 - click.0;
        let dy = pos.1 - click.1;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < best_dist {
            best_dist = dist;
            best = Some(*id);
        }
    }
    best
}

/// Degree spacing for graticule lines: the largest 1/2/5-ladder step that
/// keeps lines roughly 120 logical px apart.
pub fn graticule_step(zoom: f64) -> f64 {
    let target_deg = 120.0 / scale(zoom);
    let base = 10f64.powf(target_deg.log10().floor());
    let mantissa = target_deg / base;
    let snapped = if mantissa < 1.5 {
        1.0
    } else if mantissa < 3.5 {
        2.0
    } else if mantissa < 7.5 {
        5.0
    } else {
        10.0
    };
    snapped * base
}

/// Format a graticule label with enough decimals for the given step.
pub fn format_degree(value: f64, step: f64, positive: char, negative: char) -> String {
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    let hemisphere = if value < 0.0 { negative } else { positive };
    format!("{:.*}\u{b0}{}", decimals, value.abs(), hemisphere)
}
