//! Coverage cones for directional sensors on a 2D floor plan.
//!
//! A sensor's field of view is sampled as rays, clipped against line
//! obstacles (walls), and handed to the host as a polygon. Three handles let
//! the user change the cone's edges, rotation and radius while the polygon
//! is recomputed on every pointer move.
//!
//! Layers (leaves first)
//! - `geom2`: stateless kernel (angles, intersections, boundary sampling).
//! - `model`: per-sensor config, recompute, defaults, opacity/color rules.
//! - `interact`: handle placement and the drag state machine.
//! - `render`: host scene-graph port, adapter, and an in-memory scene.
//!
//! Everything runs synchronously inside host event handlers. Nothing on the
//! interactive path panics or returns errors; bad input is clamped and
//! missing host primitives only cost interactivity.

pub mod api;
pub mod geom2;
pub mod interact;
pub mod model;
pub mod render;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom2::{angle_diff, sample_boundary, GeomCfg, Point, WallSegment};
    pub use crate::interact::{DragController, DragState, HandleKind};
    pub use crate::model::{
        CoverageConfig, CoverageManager, DeviceInfo, DevicesLayer, EdgeStyle, HostView, Sensor,
        SensorId,
    };
    pub use crate::render::{MemoryScene, PropertiesPanel, SceneGraph};
}
