//! Narrow port onto the host scene graph.
//!
//! The kernel and the model never see host types; everything that touches
//! drawable primitives goes through `SceneGraph` (and `PropertiesPanel` for
//! the one piece of sidebar UI the drag controller hides).

use crate::geom2::Point;
use crate::interact::HandleKind;
use crate::model::SensorId;

/// Host handle for a drawable primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u64);

/// Style pushed onto the coverage polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    /// `None` draws a solid outline.
    pub dash: Option<[f64; 2]>,
    pub visible: bool,
}

/// Placement of one handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandlePose {
    pub position: Point,
    /// Screen angle (degrees) the handle glyph is turned to.
    pub angle: f64,
    pub visible: bool,
}

impl Default for HandlePose {
    fn default() -> Self {
        Self {
            position: Point::zeros(),
            angle: 0.0,
            visible: false,
        }
    }
}

pub trait SceneGraph {
    /// Create an empty coverage polygon. `None` if the host could not create it.
    fn add_polygon(&mut self, owner: SensorId) -> Option<PrimitiveId>;
    /// Create a handle glyph. `None` if the host could not create it (e.g. its
    /// image failed to load).
    fn add_handle(&mut self, owner: SensorId, kind: HandleKind) -> Option<PrimitiveId>;
    fn remove(&mut self, id: PrimitiveId);

    fn set_vertices(&mut self, id: PrimitiveId, vertices: &[Point]);
    fn set_polygon_style(&mut self, id: PrimitiveId, style: &PolygonStyle);
    fn set_handle_pose(&mut self, id: PrimitiveId, pose: HandlePose);

    /// Route pointer down/move/up on `id` to the coverage core.
    fn subscribe_pointer(&mut self, id: PrimitiveId);
    fn unsubscribe_pointer(&mut self, id: PrimitiveId);

    /// Move `id` directly below `anchor` in draw order.
    fn place_below(&mut self, id: PrimitiveId, anchor: PrimitiveId);
    /// Move `id` directly above `anchor` in draw order.
    fn place_above(&mut self, id: PrimitiveId, anchor: PrimitiveId);
    fn bring_to_front(&mut self, id: PrimitiveId);

    /// Toggle pointer interactivity of walls and other drawings.
    fn set_drawings_evented(&mut self, evented: bool);
}

/// The host's properties sidebar.
pub trait PropertiesPanel {
    fn is_panel_visible(&self) -> bool;
    fn set_panel_visible(&mut self, visible: bool);
}
