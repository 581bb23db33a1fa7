//! Geometry kernel for coverage cones (stateless).
//!
//! Purpose
//! - Angular span arithmetic, ray/wall intersection, and boundary sampling of
//!   a sensor's field of view clipped against line obstacles.
//! - Pure functions only; tolerances come in through `GeomCfg`.
//!
//! Conventions
//! - Screen coordinates (y down), angles in degrees measured clockwise.
//! - Walls are re-read by the caller on every recompute; nothing here caches.
//!
//! Code cross-refs: `crate::model::Sensor::create_or_update_coverage_area`

pub mod angles;
pub mod intersect;
pub mod rand;
mod sample;
mod types;

pub use angles::{angle_diff, angle_of, direction, mid_angle, normalize_deg};
pub use intersect::{segment_intersection, thick_intersection};
pub use sample::{cast_ray, sample_boundary, sample_plan, MAX_SAMPLES};
pub use types::{GeomCfg, Point, WallProvider, WallSegment};
