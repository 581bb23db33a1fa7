//! Degree arithmetic for cone angles.

use super::types::Point;

/// Wrap any finite angle into `[0, 360)`.
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Clockwise span from `start` to `end`, in `[0, 360]`.
///
/// Equal angles (or a difference that is a multiple of 360) mean a full
/// circle once the coverage is initialized, and an empty span before that.
#[inline]
pub fn angle_diff(start: f64, end: f64, is_initialized: bool) -> f64 {
    let span = normalize_deg(end - start + 360.0);
    if is_initialized && span == 0.0 {
        360.0
    } else {
        span
    }
}

/// Unit direction for a screen angle (degrees, clockwise, y down).
#[inline]
pub fn direction(deg: f64) -> Point {
    let rad = deg.to_radians();
    Point::new(rad.cos(), rad.sin())
}

/// Screen angle of `p` seen from `center`, in `[0, 360)`.
#[inline]
pub fn angle_of(center: Point, p: Point) -> f64 {
    let d = p - center;
    normalize_deg(d.y.atan2(d.x).to_degrees())
}

/// Clockwise midpoint between `start` and `end`.
#[inline]
pub fn mid_angle(start: f64, end: f64, is_initialized: bool) -> f64 {
    normalize_deg(start + angle_diff(start, end, is_initialized) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_ways() {
        assert_eq!(normalize_deg(370.0), 10.0);
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(720.0), 0.0);
        assert_eq!(normalize_deg(-1e-18), 0.0);
    }

    #[test]
    fn screen_angles_are_clockwise() {
        let c = Point::new(100.0, 100.0);
        assert!((angle_of(c, Point::new(200.0, 100.0)) - 0.0).abs() < 1e-12);
        assert!((angle_of(c, Point::new(100.0, 200.0)) - 90.0).abs() < 1e-12);
        assert!((angle_of(c, Point::new(100.0, 0.0)) - 270.0).abs() < 1e-12);
        let up = direction(270.0);
        assert!(up.x.abs() < 1e-12 && (up.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn mid_angle_crosses_zero() {
        assert!((mid_angle(270.0, 0.0, true) - 315.0).abs() < 1e-12);
        assert!((mid_angle(350.0, 10.0, true) - 0.0).abs() < 1e-12);
        assert!((mid_angle(30.0, 30.0, true) - 210.0).abs() < 1e-12);
    }
}
