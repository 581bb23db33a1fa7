//! Persisted per-sensor coverage configuration.
//!
//! Every field except `isInitialized` may be absent in a stored record;
//! `apply_defaults` fills only what is missing, so it is safe to run on every
//! load. Values are clamped at this boundary: callers (sidebar widgets, drag
//! handlers, file loads) may hand in anything.
//!
//! Invariants after `apply_defaults`
//! - `radius` in `[MIN_RADIUS_M, MAX_RADIUS_M] * pixels_per_meter`.
//! - `opacity` in `[0, 1]`.
//! - `full_circle` agrees with the angles: true iff `start == end`.
//! - A non-full cone spans at least `MIN_SPAN_DEG`; a stored `endAngle`
//!   closer to `startAngle` than that is clamped to `start + MIN_SPAN_DEG`.
//! - `fill_color` is a cache; it is rebuilt from `base_color` and `opacity`.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use crate::geom2::{angle_diff, normalize_deg};

/// Host scale fallback when a device reports none.
pub const DEFAULT_PIXELS_PER_METER: f64 = 17.5;
pub const DEFAULT_RADIUS_M: f64 = 10.0;
pub const MIN_RADIUS_M: f64 = 1.0;
pub const MAX_RADIUS_M: f64 = 500.0;
pub const DEFAULT_FILL: &str = "rgba(165,155,155,0.3)";
pub const DEFAULT_OPACITY: f64 = 0.3;
/// Default cone: 90 degrees pointing up.
pub const DEFAULT_START_ANGLE: f64 = 270.0;
pub const DEFAULT_END_ANGLE: f64 = 0.0;
const DEFAULT_BASE: Rgb = Rgb::new(165, 155, 155);
/// Width given to a cone when full-circle mode is switched off.
const DEFAULT_SPAN: f64 = 90.0;
/// Smallest span a non-full cone may have.
pub const MIN_SPAN_DEG: f64 = 1.0;

/// Outline style of the coverage polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Use the host scale if it is usable, the default otherwise.
#[inline]
pub fn sanitize_pixels_per_meter(ppm: Option<f64>) -> f64 {
    match ppm {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => DEFAULT_PIXELS_PER_METER,
    }
}

/// Clamp a pixel radius to the allowed meter range.
#[inline]
pub fn clamp_radius_px(px: f64, ppm: f64) -> f64 {
    let (lo, hi) = (MIN_RADIUS_M * ppm, MAX_RADIUS_M * ppm);
    if px.is_nan() {
        return DEFAULT_RADIUS_M * ppm;
    }
    px.clamp(lo, hi)
}

/// Opacity from UI input: NaN or negative falls back to the default.
#[inline]
pub fn sanitize_opacity(v: f64) -> f64 {
    if v.is_nan() || v < 0.0 {
        DEFAULT_OPACITY
    } else {
        v.min(1.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge_style: Option<EdgeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible: Option<bool>,
    /// Absent in records written before the flag existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_circle: Option<bool>,
    #[serde(default)]
    is_initialized: bool,
}

impl CoverageConfig {
    /// Fill unset fields. Set fields are only clamped: the radius to its
    /// meter range, opacity to `[0, 1]`, angles to `[0, 360)`, and the end
    /// angle to `start` (full circle) or to at least `start + MIN_SPAN_DEG`.
    pub fn apply_defaults(&mut self, pixels_per_meter: f64) {
        let ppm = sanitize_pixels_per_meter(Some(pixels_per_meter));
        let was_initialized = self.is_initialized;

        self.radius = Some(match self.radius {
            Some(r) => clamp_radius_px(r, ppm),
            None => DEFAULT_RADIUS_M * ppm,
        });

        let fill = self.fill_color.get_or_insert_with(|| DEFAULT_FILL.to_string());
        let parsed_fill = Rgb::parse(fill);
        if self.base_color.as_deref().and_then(Rgb::parse).is_none() {
            let base = parsed_fill.map(|(c, _)| c).unwrap_or(DEFAULT_BASE);
            self.base_color = Some(base.to_string());
        }
        let fill_alpha = parsed_fill.and_then(|(_, a)| a);
        self.opacity = Some(match self.opacity {
            Some(o) => sanitize_opacity(o),
            None => fill_alpha.unwrap_or(DEFAULT_OPACITY),
        });

        let start = normalize_finite(self.start_angle, DEFAULT_START_ANGLE);
        let end = normalize_finite(self.end_angle, DEFAULT_END_ANGLE);
        self.start_angle = Some(start);
        self.end_angle = Some(end);

        self.visible.get_or_insert(true);
        self.edge_style.get_or_insert(EdgeStyle::Solid);

        // Legacy records carry the full-circle bit only as angle equality,
        // which means a full circle only once the record was initialized.
        let full = match self.full_circle {
            Some(f) => f,
            None => angle_diff(start, end, was_initialized) >= 360.0,
        };
        if full {
            self.end_angle = Some(start);
        } else if angle_diff(start, end, false) < MIN_SPAN_DEG {
            self.end_angle = Some(normalize_deg(start + MIN_SPAN_DEG));
        }
        self.full_circle = Some(full);
        self.is_initialized = true;
    }

    /// Rebuild the fill from base color and logical opacity; returns the rendered alpha.
    ///
    /// `layer_opacity` is the externally owned layer multiplier. The previous
    /// fill never feeds into the result.
    pub fn refresh_fill(&mut self, layer_opacity: f64) -> f64 {
        let layer = if layer_opacity.is_finite() {
            layer_opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let alpha = self.opacity() * layer;
        self.fill_color = Some(self.base_color().with_alpha(alpha));
        alpha
    }

    // ---- getters (defaults stand in for unset fields) ----

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }
    pub fn radius(&self) -> f64 {
        self.radius.unwrap_or(DEFAULT_RADIUS_M * DEFAULT_PIXELS_PER_METER)
    }
    pub fn start_angle(&self) -> f64 {
        self.start_angle.unwrap_or(DEFAULT_START_ANGLE)
    }
    pub fn end_angle(&self) -> f64 {
        self.end_angle.unwrap_or(DEFAULT_END_ANGLE)
    }
    /// Clockwise span in degrees; 360 for a full circle.
    pub fn span(&self) -> f64 {
        angle_diff(self.start_angle(), self.end_angle(), self.is_initialized)
    }
    pub fn is_full_circle(&self) -> bool {
        self.full_circle.unwrap_or_else(|| self.span() >= 360.0)
    }
    pub fn base_color(&self) -> Rgb {
        self.base_color
            .as_deref()
            .and_then(Rgb::parse)
            .map(|(c, _)| c)
            .unwrap_or(DEFAULT_BASE)
    }
    pub fn opacity(&self) -> f64 {
        self.opacity.map(sanitize_opacity).unwrap_or(DEFAULT_OPACITY)
    }
    /// Last rendered fill (cache).
    pub fn fill_color(&self) -> &str {
        self.fill_color.as_deref().unwrap_or(DEFAULT_FILL)
    }
    pub fn edge_style(&self) -> EdgeStyle {
        self.edge_style.unwrap_or_default()
    }
    pub fn visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
    pub fn radius_meters(&self, pixels_per_meter: f64) -> f64 {
        self.radius() / sanitize_pixels_per_meter(Some(pixels_per_meter))
    }

    // ---- setters (sidebar, drag handlers) ----

    pub fn set_radius_px(&mut self, px: f64, pixels_per_meter: f64) {
        let ppm = sanitize_pixels_per_meter(Some(pixels_per_meter));
        if px.is_nan() {
            return;
        }
        self.radius = Some(clamp_radius_px(px, ppm));
    }
    pub fn set_radius_meters(&mut self, meters: f64, pixels_per_meter: f64) {
        let ppm = sanitize_pixels_per_meter(Some(pixels_per_meter));
        self.set_radius_px(meters * ppm, ppm);
    }
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = Some(sanitize_opacity(opacity));
    }
    /// Accepts any CSS color; an alpha channel is dropped. Returns false (and
    /// keeps the old color) if the string does not parse.
    pub fn set_base_color(&mut self, color: &str) -> bool {
        match Rgb::parse(color) {
            Some((rgb, _)) => {
                self.base_color = Some(rgb.to_string());
                true
            }
            None => false,
        }
    }
    pub fn set_edge_style(&mut self, style: EdgeStyle) {
        self.edge_style = Some(style);
    }
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = Some(visible);
    }
    /// Store both angles; equal angles select full-circle mode.
    pub fn set_angles(&mut self, start: f64, end: f64) {
        let start = normalize_finite(Some(start), self.start_angle());
        let end = normalize_finite(Some(end), self.end_angle());
        self.start_angle = Some(start);
        self.end_angle = Some(end);
        self.full_circle = Some(angle_diff(start, end, false) == 0.0);
    }
    /// Keep the start angle and set the clockwise span (`>= 360` is a full circle).
    pub fn set_span(&mut self, span: f64) {
        if span.is_nan() {
            return;
        }
        let start = self.start_angle();
        if span >= 360.0 {
            self.set_angles(start, start);
        } else {
            self.set_angles(start, start + span.max(MIN_SPAN_DEG));
        }
    }
    pub fn set_full_circle(&mut self, full: bool) {
        if full {
            self.set_span(360.0);
        } else if self.is_full_circle() {
            self.set_span(DEFAULT_SPAN);
        }
    }
}

fn normalize_finite(v: Option<f64>, fallback: f64) -> f64 {
    match v {
        Some(a) if a.is_finite() => normalize_deg(a),
        _ => normalize_deg(fallback),
    }
}
