//! Interaction controller: three handles and the drag state machine that
//! turns pointer movement into coverage edits.
//!
//! Rotation and radius share the rotate handle on purpose (one control less
//! on screen); `DragState::Rotating` changes both together.

mod drag;
mod handles;

pub use drag::{
    drag_edge, rotate_and_resize, DragController, DragState, RESTORE_DELAY, SNAP_HALF_WIDTH_DEG,
};
pub use handles::{handle_angles, Handle, HandleKind, Handles, HANDLE_OFFSET_DEG};

#[cfg(test)]
mod tests;
