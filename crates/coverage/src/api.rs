//! Curated surface for hosts embedding the coverage core.
//!
//! Hosts need three things: the registry (`CoverageManager`) with its
//! `add_coverage` entry point, the per-sensor warm path
//! (`Sensor::create_or_update_coverage_area`), and the ports they implement
//! (`SceneGraph`, `PropertiesPanel`, `WallProvider`).

pub use crate::geom2::{
    angle_diff, sample_boundary, segment_intersection, thick_intersection, GeomCfg, Point,
    WallProvider, WallSegment,
};
pub use crate::interact::{DragController, DragState, HandleKind, Handles};
pub use crate::model::{
    CoverageConfig, CoverageManager, DeviceInfo, DevicesLayer, EdgeStyle, HostView, SavedCoverage,
    Sensor, SensorId,
};
pub use crate::render::{HandlePose, PolygonStyle, PrimitiveId, PropertiesPanel, SceneGraph};

use crate::render::MemoryScene;

/// Add coverage to `device` in a fresh headless scene and return the boundary.
///
/// Convenience for tools that only need the polygon.
pub fn coverage_polygon(
    device: DeviceInfo,
    coverage: CoverageConfig,
    walls: &dyn WallProvider,
    cfg: GeomCfg,
) -> Vec<Point> {
    let walls = walls.walls();
    let mut scene = MemoryScene::new();
    let mut sensor = Sensor::with_coverage(device.id, coverage);
    let view = HostView {
        cfg,
        ..HostView::new(device, &walls)
    };
    sensor.add_coverage(&view, &mut scene);
    sensor.boundary().to_vec()
}
