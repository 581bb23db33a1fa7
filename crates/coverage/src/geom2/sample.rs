//! Visibility sampling: cast rays across the cone and clip them at walls.
//!
//! Model
//! - `span = angle_diff(start, end)`; spans `>= cfg.full_circle_deg` are a
//!   full circle (closed ring, no apex).
//! - Ray count `n = max(full ? 180 : ceil(span / 2), 20)`, capped at
//!   `MAX_SAMPLES`; step `span / n`.
//! - Each ray runs from the center to `2 * radius`; the nearest wall hit within
//!   `radius` clips it, otherwise the ray ends on the arc.
//! - Partial cones also cast the closing ray at `end` and get the center
//!   prepended as apex, so the polygon closes into a pie slice.

use super::angles::{angle_diff, direction};
use super::intersect::{segment_intersection, thick_intersection};
use super::types::{GeomCfg, Point, WallSegment};

/// Upper bound on the ray count of one cone.
pub const MAX_SAMPLES: usize = 3600;

/// Number of rays and whether the cone is a full circle.
///
/// Unusable sampling tunables (non-positive or non-finite step, zero ring
/// count) fall back to the defaults; the count is kept in `1..=MAX_SAMPLES`.
pub fn sample_plan(span: f64, cfg: GeomCfg) -> (usize, bool) {
    let defaults = GeomCfg::default();
    let full = span >= cfg.full_circle_deg;
    let n = if full {
        match cfg.full_circle_samples {
            0 => defaults.full_circle_samples,
            n => n,
        }
    } else {
        let step = if cfg.deg_per_sample.is_finite() && cfg.deg_per_sample > 0.0 {
            cfg.deg_per_sample
        } else {
            defaults.deg_per_sample
        };
        (span / step).ceil() as usize
    };
    (n.max(cfg.min_samples).clamp(1, MAX_SAMPLES), full)
}

/// Endpoint of the ray from `center` at `deg`, clipped by the nearest wall.
pub fn cast_ray(
    center: Point,
    deg: f64,
    radius: f64,
    walls: &[WallSegment],
    cfg: GeomCfg,
) -> Point {
    let dir = direction(deg);
    let far = center + dir * (2.0 * radius);
    let mut best: Option<(f64, Point)> = None;
    for w in walls.iter().filter(|w| w.is_finite()) {
        let hit = segment_intersection(center, far, w.a(), w.b(), cfg)
            .or_else(|| thick_intersection(center, far, w.a(), w.b(), w.stroke_width, radius, cfg));
        let Some(p) = hit else {
            continue;
        };
        let d = (p - center).norm();
        if d <= radius && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, p));
        }
    }
    match best {
        Some((_, p)) => p,
        None => center + dir * radius,
    }
}

/// Boundary polygon of a cone clipped against `walls`.
///
/// Returns ring vertices in clockwise screen order. A non-positive or
/// non-finite radius yields an empty polygon.
pub fn sample_boundary(
    start: f64,
    end: f64,
    center: Point,
    radius: f64,
    walls: &[WallSegment],
    is_initialized: bool,
    cfg: GeomCfg,
) -> Vec<Point> {
    if !radius.is_finite() || radius <= 0.0 || !center.x.is_finite() || !center.y.is_finite() {
        return Vec::new();
    }
    let span = angle_diff(start, end, is_initialized);
    let (n, full) = sample_plan(span, cfg);
    let step = span / n as f64;
    let rays = if full { n } else { n + 1 };
    let mut out = Vec::with_capacity(rays + 1);
    if !full {
        out.push(center);
    }
    for i in 0..rays {
        let deg = start + step * i as f64;
        out.push(cast_ray(center, deg, radius, walls, cfg));
    }
    out
}
