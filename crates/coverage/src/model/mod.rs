//! Coverage model: per-sensor configuration, cached boundary, and the
//! recompute entry points built on the geometry kernel.
//!
//! Opacity never compounds: the fill is rebuilt from `baseColor`, the
//! logical `opacity`, and the layer multiplier on every recompute.

mod color;
mod config;
mod host;
mod manager;
mod sensor;

pub use color::{round_alpha, Rgb};
pub use config::{
    clamp_radius_px, sanitize_opacity, sanitize_pixels_per_meter, CoverageConfig, EdgeStyle,
    DEFAULT_END_ANGLE, DEFAULT_FILL, DEFAULT_OPACITY, DEFAULT_PIXELS_PER_METER, DEFAULT_RADIUS_M,
    DEFAULT_START_ANGLE, MAX_RADIUS_M, MIN_RADIUS_M, MIN_SPAN_DEG,
};
pub use host::{DeviceInfo, DevicesLayer, HostView, SensorId};
pub use manager::{CoverageManager, SavedCoverage};
pub use sensor::Sensor;
