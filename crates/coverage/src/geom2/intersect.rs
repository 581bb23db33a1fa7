//! Ray/wall intersection tests.
//!
//! - `segment_intersection`: exact parametric test between two bounded segments.
//! - `thick_intersection`: tolerant fallback that treats the first segment as a
//!   ray and accepts wall endpoints lying within the rendered stroke.
//!
//! Degenerate inputs (parallel lines, zero-length rays, non-finite values)
//! are "no intersection", never errors.

use super::types::{GeomCfg, Point};

#[inline]
fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Intersection point of segments `p1→p2` and `p3→p4`, if any.
///
/// Returns `None` for (near) parallel segments, i.e. `|den| < cfg.eps_det`, or
/// when the intersection parameter leaves `[0, 1]` on either segment.
pub fn segment_intersection(
    p1: Point,
    p2: Point,
    p3: Point,
    p4: Point,
    cfg: GeomCfg,
) -> Option<Point> {
    let r = p2 - p1;
    let s = p4 - p3;
    let den = cross(r, s);
    if !den.is_finite() || den.abs() < cfg.eps_det {
        return None;
    }
    let qp = p3 - p1;
    let t = cross(qp, s) / den;
    let u = cross(qp, r) / den;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + r * t)
    } else {
        None
    }
}

/// Tolerant fallback for near misses against thick walls.
///
/// The ray starts at `p1` and points towards `p2` (unbounded). Each wall
/// endpoint `p3`, `p4` qualifies when its perpendicular distance to the ray is
/// at most `stroke_width / 2 + cfg.thick_tolerance_px` and its projection lies
/// in `[0, max_range]` along the ray. The nearer qualifying endpoint is
/// returned, projected onto the ray.
pub fn thick_intersection(
    p1: Point,
    p2: Point,
    p3: Point,
    p4: Point,
    stroke_width: f64,
    max_range: f64,
    cfg: GeomCfg,
) -> Option<Point> {
    let len = (p2 - p1).norm();
    if !len.is_finite() || len <= 0.0 {
        return None;
    }
    let dir = (p2 - p1) / len;
    let tolerance = stroke_width.max(0.0) / 2.0 + cfg.thick_tolerance_px;
    let mut best: Option<f64> = None;
    for e in [p3, p4] {
        let v = e - p1;
        let along = v.dot(&dir);
        if !(0.0..=max_range).contains(&along) {
            continue;
        }
        if cross(dir, v).abs() > tolerance {
            continue;
        }
        if best.is_none_or(|b| along < b) {
            best = Some(along);
        }
    }
    best.map(|along| p1 + dir * along)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn crossing_segments_meet() {
        let cfg = GeomCfg::default();
        let p = segment_intersection(
            vector![0.0, 0.0],
            vector![10.0, 10.0],
            vector![0.0, 10.0],
            vector![10.0, 0.0],
            cfg,
        )
        .unwrap();
        assert!((p - vector![5.0, 5.0]).norm() < 1e-12);
    }

    #[test]
    fn parallel_and_out_of_range_miss() {
        let cfg = GeomCfg::default();
        // parallel
        assert!(segment_intersection(
            vector![0.0, 0.0],
            vector![10.0, 0.0],
            vector![0.0, 1.0],
            vector![10.0, 1.0],
            cfg
        )
        .is_none());
        // lines cross at x=20, beyond the first segment
        assert!(segment_intersection(
            vector![0.0, 0.0],
            vector![10.0, 0.0],
            vector![20.0, -5.0],
            vector![20.0, 5.0],
            cfg
        )
        .is_none());
        // zero-length ray
        assert!(segment_intersection(
            vector![1.0, 1.0],
            vector![1.0, 1.0],
            vector![0.0, 0.0],
            vector![2.0, 2.0],
            cfg
        )
        .is_none());
    }

    #[test]
    fn thick_catches_endpoint_just_beside_ray() {
        let cfg = GeomCfg::default();
        // Wall ends 2px below the ray; stroke 4 -> tolerance 2 + 1.2.
        let p1 = vector![0.0, 0.0];
        let p2 = vector![100.0, 0.0];
        let p3 = vector![40.0, 2.0];
        let p4 = vector![40.0, 30.0];
        assert!(segment_intersection(p1, p2, p3, p4, cfg).is_none());
        let hit = thick_intersection(p1, p2, p3, p4, 4.0, 100.0, cfg).unwrap();
        assert!((hit - vector![40.0, 0.0]).norm() < 1e-12);
        // Thin stroke: 2 > 0.5 + 1.2, rejected.
        assert!(thick_intersection(p1, p2, p3, p4, 1.0, 100.0, cfg).is_none());
    }

    #[test]
    fn thick_respects_range_and_direction() {
        let cfg = GeomCfg::default();
        let p1 = vector![0.0, 0.0];
        let p2 = vector![1.0, 0.0];
        // Behind the origin.
        let (a, b) = (vector![-5.0, 0.5], vector![-5.0, 9.0]);
        assert!(thick_intersection(p1, p2, a, b, 2.0, 50.0, cfg).is_none());
        // Beyond max range.
        let (a, b) = (vector![60.0, 0.5], vector![60.0, 9.0]);
        assert!(thick_intersection(p1, p2, a, b, 2.0, 50.0, cfg).is_none());
        // Both endpoints qualify: nearer wins.
        let (a, b) = (vector![30.0, 0.5], vector![10.0, -0.5]);
        let hit = thick_intersection(p1, p2, a, b, 2.0, 50.0, cfg).unwrap();
        assert!((hit - vector![10.0, 0.0]).norm() < 1e-12);
    }
}
