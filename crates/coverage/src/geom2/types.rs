//! Basic 2D types and tolerances used by the coverage kernel.
//!
//! - `GeomCfg`: centralizes epsilons and sampling tunables.
//! - `WallSegment`: read-only line obstacle supplied by the host.
//! - `Point`: plan coordinates in pixels, y pointing down (screen convention).
//!
//! Angles are degrees in `[0, 360)`, measured clockwise on screen, which is
//! `atan2(dy, dx)` with the y axis pointing down.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Plan coordinates in pixels.
pub type Point = Vector2<f64>;

/// Geometry configuration (tolerances and sampling density).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Parallel test for the exact segment intersection.
    pub eps_det: f64,
    /// Extra perpendicular slack (px) on top of half the wall stroke width.
    ///
    /// Tuned empirically against rendered wall thickness; keep the figure
    /// as is, saved projects render against it.
    pub thick_tolerance_px: f64,
    /// Spans at or above this count as a full circle.
    pub full_circle_deg: f64,
    /// Angular distance between rays for partial cones.
    pub deg_per_sample: f64,
    /// Lower bound on the ray count.
    pub min_samples: usize,
    /// Ray count for a full circle.
    pub full_circle_samples: usize,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-10,
            thick_tolerance_px: 1.2,
            full_circle_deg: 359.9,
            deg_per_sample: 2.0,
            min_samples: 20,
            full_circle_samples: 180,
        }
    }
}

/// Line obstacle `(x1,y1)-(x2,y2)` with its rendered stroke width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    1.0
}

impl WallSegment {
    #[inline]
    pub fn new(a: Point, b: Point, stroke_width: f64) -> Self {
        Self {
            x1: a.x,
            y1: a.y,
            x2: b.x,
            y2: b.y,
            stroke_width,
        }
    }
    #[inline]
    pub fn a(&self) -> Point {
        Point::new(self.x1, self.y1)
    }
    #[inline]
    pub fn b(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
    /// Non-finite coordinates make the wall unusable; the kernel skips it.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite()
            && self.y1.is_finite()
            && self.x2.is_finite()
            && self.y2.is_finite()
    }
}

/// Host-side source of obstacles, re-read on every recompute.
pub trait WallProvider {
    fn walls(&self) -> Vec<WallSegment>;
}

impl WallProvider for [WallSegment] {
    fn walls(&self) -> Vec<WallSegment> {
        self.to_vec()
    }
}

impl WallProvider for Vec<WallSegment> {
    fn walls(&self) -> Vec<WallSegment> {
        self.clone()
    }
}
