//! Push coverage state onto host primitives.

use super::port::{PolygonStyle, PrimitiveId, SceneGraph};
use crate::geom2::Point;
use crate::interact::Handles;
use crate::model::{CoverageConfig, DeviceInfo, EdgeStyle};

/// Outline width of the coverage polygon (px).
pub const STROKE_WIDTH: f64 = 1.0;

/// Dash array for an edge style.
pub fn dash_pattern(style: EdgeStyle) -> Option<[f64; 2]> {
    match style {
        EdgeStyle::Solid => None,
        EdgeStyle::Dashed => Some([10.0, 5.0]),
        EdgeStyle::Dotted => Some([2.0, 2.0]),
    }
}

/// Style for the current config; reads the already refreshed fill.
pub fn polygon_style(config: &CoverageConfig, layer_visible: bool) -> PolygonStyle {
    PolygonStyle {
        fill: config.fill_color().to_string(),
        stroke: config.base_color().to_string(),
        stroke_width: STROKE_WIDTH,
        dash: dash_pattern(config.edge_style()),
        visible: config.visible() && layer_visible,
    }
}

/// Replace the polygon's vertex list and style.
pub fn push_cone<S: SceneGraph + ?Sized>(
    scene: &mut S,
    polygon: PrimitiveId,
    vertices: &[Point],
    style: &PolygonStyle,
) {
    scene.set_vertices(polygon, vertices);
    scene.set_polygon_style(polygon, style);
}

pub fn push_handles<S: SceneGraph + ?Sized>(scene: &mut S, handles: &Handles) {
    for h in handles.iter() {
        if let Some(id) = h.primitive {
            scene.set_handle_pose(id, h.pose);
        }
    }
}

/// Cone directly under the icon, label on the icon, visible handles on top.
///
/// The host does not keep draw order stable across additions and removals,
/// so this runs on every recompute.
pub fn reassert_z_order<S: SceneGraph + ?Sized>(
    scene: &mut S,
    polygon: PrimitiveId,
    device: &DeviceInfo,
    handles: Option<&Handles>,
) {
    if let Some(icon) = device.icon {
        scene.place_below(polygon, icon);
        if let Some(label) = device.label {
            scene.place_above(label, icon);
        }
    } else if let Some(label) = device.label {
        scene.place_above(label, polygon);
    }
    for h in handles.into_iter().flat_map(Handles::iter) {
        if let (Some(id), true) = (h.primitive, h.pose.visible) {
            scene.bring_to_front(id);
        }
    }
}
