//! CSS color strings: `rgb(..)`, `rgba(..)`, `#rrggbb`, `#rgb`.
//!
//! Rendered fills are always rebuilt from an RGB base plus a fresh alpha;
//! nothing here scales an existing alpha.

use std::fmt;

/// Opaque RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS color; returns the RGB part and the alpha channel if one was given.
    pub fn parse(s: &str) -> Option<(Rgb, Option<f64>)> {
        let s = s.trim();
        if let Some(digits) = s.strip_prefix('#') {
            return parse_hex(digits).map(|c| (c, None));
        }
        let lower = s.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |p: &str| -> Option<u8> {
            let v: f64 = p.parse().ok()?;
            v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
        };
        let rgb = Rgb::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
        let alpha = match parts.get(3) {
            Some(p) => {
                let a: f64 = p.parse().ok()?;
                if !a.is_finite() {
                    return None;
                }
                Some(a.clamp(0.0, 1.0))
            }
            None => None,
        };
        Some((rgb, alpha))
    }

    /// `rgba(r, g, b, a)` with `a` clamped to `[0, 1]` and rounded to 3 decimals.
    pub fn with_alpha(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, round_alpha(alpha))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Alpha as written into fill strings.
pub fn round_alpha(alpha: f64) -> f64 {
    if !alpha.is_finite() {
        return 0.0;
    }
    (alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// `rrggbb` or `rgb` (each digit doubled), without the leading `#`.
fn parse_hex(s: &str) -> Option<Rgb> {
    let mut rgb = [0_u8; 3];
    match s.len() {
        3 => {
            let s = s.chars().flat_map(|c| [c, c]).collect::<String>();
            hex::decode_to_slice(s, &mut rgb).ok()?;
        }
        _ => hex::decode_to_slice(s, &mut rgb).ok()?,
    }
    let [r, g, b] = rgb;
    Some(Rgb::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_forms() {
        assert_eq!(Rgb::parse("rgb(1,2,3)"), Some((Rgb::new(1, 2, 3), None)));
        assert_eq!(
            Rgb::parse(" rgba(165, 155, 155, 0.3) "),
            Some((Rgb::new(165, 155, 155), Some(0.3)))
        );
        assert_eq!(Rgb::parse("#a59b9b"), Some((Rgb::new(165, 155, 155), None)));
        assert_eq!(Rgb::parse("#fff"), Some((Rgb::new(255, 255, 255), None)));
        assert_eq!(Rgb::parse("#A0c"), Some((Rgb::new(0xaa, 0x00, 0xcc), None)));
        assert_eq!(Rgb::parse("RGB(300, -4, 12.6)"), Some((Rgb::new(255, 0, 13), None)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Rgb::parse("red").is_none());
        assert!(Rgb::parse("rgb(1,2)").is_none());
        assert!(Rgb::parse("rgba(1,2,3,x)").is_none());
        assert!(Rgb::parse("#12345").is_none());
        assert!(Rgb::parse("#12g").is_none());
        assert!(Rgb::parse("#").is_none());
    }

    #[test]
    fn alpha_is_rounded_and_clamped() {
        let c = Rgb::new(10, 20, 30);
        assert_eq!(c.with_alpha(0.5 * 0.8), "rgba(10, 20, 30, 0.4)");
        assert_eq!(c.with_alpha(0.123456), "rgba(10, 20, 30, 0.123)");
        assert_eq!(c.with_alpha(3.0), "rgba(10, 20, 30, 1)");
        assert_eq!(c.with_alpha(f64::NAN), "rgba(10, 20, 30, 0)");
        assert_eq!(c.to_string(), "rgb(10, 20, 30)");
    }
}
