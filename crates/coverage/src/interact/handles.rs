//! The three draggable handles and where they sit.
//!
//! - Left sits at `start`, right at `end`, rotate at the clockwise midpoint,
//!   all on the cone's outer arc.
//! - For spans of at most `HANDLE_OFFSET_DEG` (and for full circles) the edge
//!   handles are pushed `HANDLE_OFFSET_DEG` outwards so they stay apart.

use crate::geom2::{direction, normalize_deg, Point};
use crate::render::{HandlePose, PrimitiveId};

/// Angular offset keeping edge handles apart on narrow or full cones.
pub const HANDLE_OFFSET_DEG: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandleKind {
    /// Drags `start_angle`.
    Left,
    /// Drags `end_angle`.
    Right,
    /// Rotates the cone and sets its radius.
    Rotate,
}

impl HandleKind {
    pub const ALL: [HandleKind; 3] = [HandleKind::Left, HandleKind::Right, HandleKind::Rotate];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Host glyph; `None` when the host failed to create it.
    pub primitive: Option<PrimitiveId>,
    pub pose: HandlePose,
}

/// Ephemeral UI objects; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Handles {
    pub left: Handle,
    pub right: Handle,
    pub rotate: Handle,
}

impl Handles {
    pub fn new(
        left: Option<PrimitiveId>,
        right: Option<PrimitiveId>,
        rotate: Option<PrimitiveId>,
    ) -> Self {
        let h = |kind, primitive| Handle {
            kind,
            primitive,
            pose: HandlePose::default(),
        };
        Self {
            left: h(HandleKind::Left, left),
            right: h(HandleKind::Right, right),
            rotate: h(HandleKind::Rotate, rotate),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        [&self.left, &self.right, &self.rotate].into_iter()
    }

    pub fn get(&self, kind: HandleKind) -> &Handle {
        match kind {
            HandleKind::Left => &self.left,
            HandleKind::Right => &self.right,
            HandleKind::Rotate => &self.rotate,
        }
    }

    /// Which handle a host primitive belongs to.
    pub fn kind_of(&self, id: PrimitiveId) -> Option<HandleKind> {
        self.iter().find(|h| h.primitive == Some(id)).map(|h| h.kind)
    }

    /// Recompute all three poses for the current cone.
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        span: f64,
        full: bool,
        visible: bool,
    ) {
        let [l, r, m] = handle_angles(start, end, span, full);
        let pose = |deg: f64| HandlePose {
            position: center + direction(deg) * radius,
            angle: deg,
            visible,
        };
        self.left.pose = pose(l);
        self.right.pose = pose(r);
        self.rotate.pose = pose(m);
    }
}

/// Angles of the `[left, right, rotate]` handles.
pub fn handle_angles(start: f64, end: f64, span: f64, full: bool) -> [f64; 3] {
    let spread = full || span <= HANDLE_OFFSET_DEG;
    let (l, r) = if spread {
        (start - HANDLE_OFFSET_DEG, end + HANDLE_OFFSET_DEG)
    } else {
        (start, end)
    };
    let mid = normalize_deg(start + span / 2.0);
    [normalize_deg(l), normalize_deg(r), mid]
}
