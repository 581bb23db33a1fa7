//! Render adapter: the only code that talks to the host scene graph.
//!
//! - `port`: the narrow `SceneGraph`/`PropertiesPanel` traits the host implements.
//! - `adapter`: pushes vertices, fill, dash pattern and handle poses, and
//!   reasserts draw order (cone under icon, label and handles above).
//! - `memory`: headless `SceneGraph` used by the CLI and tests.

mod adapter;
mod memory;
mod port;

pub use adapter::{
    dash_pattern, polygon_style, push_cone, push_handles, reassert_z_order, STROKE_WIDTH,
};
pub use memory::{MemoryScene, Primitive, PrimitiveData};
pub use port::{HandlePose, PolygonStyle, PrimitiveId, PropertiesPanel, SceneGraph};
