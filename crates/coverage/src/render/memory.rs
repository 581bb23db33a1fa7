//! In-memory scene graph: a complete `SceneGraph` for headless runs and tests.
//!
//! Keeps primitives in a map, draw order as a back-to-front list, and counts
//! pointer subscriptions so duplicate bindings are visible.

use std::collections::{BTreeMap, BTreeSet};

use super::port::{HandlePose, PolygonStyle, PrimitiveId, PropertiesPanel, SceneGraph};
use crate::geom2::Point;
use crate::interact::HandleKind;
use crate::model::SensorId;

#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveData {
    Polygon {
        vertices: Vec<Point>,
        style: Option<PolygonStyle>,
    },
    Handle {
        kind: HandleKind,
        pose: HandlePose,
    },
    Icon,
    Label,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub owner: SensorId,
    pub data: PrimitiveData,
    pub subscriptions: u32,
}

#[derive(Clone, Debug)]
pub struct MemoryScene {
    next_id: u64,
    prims: BTreeMap<PrimitiveId, Primitive>,
    /// Back to front.
    order: Vec<PrimitiveId>,
    drawings_evented: bool,
    panel_visible: bool,
    /// Handle kinds whose creation fails (simulates a missing glyph image).
    failing_handles: BTreeSet<HandleKind>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self {
            next_id: 1,
            prims: BTreeMap::new(),
            order: Vec::new(),
            drawings_evented: true,
            panel_visible: false,
            failing_handles: BTreeSet::new(),
        }
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device icon and text label, as the host would place them.
    pub fn add_device(&mut self, owner: SensorId) -> (PrimitiveId, PrimitiveId) {
        let icon = self.insert(owner, PrimitiveData::Icon);
        let label = self.insert(owner, PrimitiveData::Label);
        (icon, label)
    }

    pub fn fail_handle_creation(&mut self, kind: HandleKind) {
        self.failing_handles.insert(kind);
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.prims.get(&id)
    }
    pub fn len(&self) -> usize {
        self.prims.len()
    }
    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }
    pub fn owned_by(
        &self,
        owner: SensorId,
    ) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        self.prims
            .iter()
            .filter(move |(_, p)| p.owner == owner)
            .map(|(id, p)| (*id, p))
    }
    pub fn vertices(&self, id: PrimitiveId) -> Option<&[Point]> {
        match &self.prims.get(&id)?.data {
            PrimitiveData::Polygon { vertices, .. } => Some(vertices),
            _ => None,
        }
    }
    pub fn polygon_style(&self, id: PrimitiveId) -> Option<&PolygonStyle> {
        match &self.prims.get(&id)?.data {
            PrimitiveData::Polygon { style, .. } => style.as_ref(),
            _ => None,
        }
    }
    pub fn handle_pose(&self, id: PrimitiveId) -> Option<HandlePose> {
        match self.prims.get(&id)?.data {
            PrimitiveData::Handle { pose, .. } => Some(pose),
            _ => None,
        }
    }
    /// Position in draw order (0 = backmost).
    pub fn z_index(&self, id: PrimitiveId) -> Option<usize> {
        self.order.iter().position(|p| *p == id)
    }
    pub fn drawings_evented(&self) -> bool {
        self.drawings_evented
    }

    fn insert(&mut self, owner: SensorId, data: PrimitiveData) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        self.prims.insert(
            id,
            Primitive {
                owner,
                data,
                subscriptions: 0,
            },
        );
        self.order.push(id);
        id
    }

    fn detach(&mut self, id: PrimitiveId) -> bool {
        match self.order.iter().position(|p| *p == id) {
            Some(i) => {
                self.order.remove(i);
                true
            }
            None => false,
        }
    }
}

impl SceneGraph for MemoryScene {
    fn add_polygon(&mut self, owner: SensorId) -> Option<PrimitiveId> {
        Some(self.insert(
            owner,
            PrimitiveData::Polygon {
                vertices: Vec::new(),
                style: None,
            },
        ))
    }

    fn add_handle(&mut self, owner: SensorId, kind: HandleKind) -> Option<PrimitiveId> {
        if self.failing_handles.contains(&kind) {
            return None;
        }
        Some(self.insert(
            owner,
            PrimitiveData::Handle {
                kind,
                pose: HandlePose::default(),
            },
        ))
    }

    fn remove(&mut self, id: PrimitiveId) {
        self.prims.remove(&id);
        self.detach(id);
    }

    fn set_vertices(&mut self, id: PrimitiveId, new: &[Point]) {
        if let Some(Primitive {
            data: PrimitiveData::Polygon { vertices, .. },
            ..
        }) = self.prims.get_mut(&id)
        {
            vertices.clear();
            vertices.extend_from_slice(new);
        }
    }

    fn set_polygon_style(&mut self, id: PrimitiveId, new: &PolygonStyle) {
        if let Some(Primitive {
            data: PrimitiveData::Polygon { style, .. },
            ..
        }) = self.prims.get_mut(&id)
        {
            *style = Some(new.clone());
        }
    }

    fn set_handle_pose(&mut self, id: PrimitiveId, new: HandlePose) {
        if let Some(Primitive {
            data: PrimitiveData::Handle { pose, .. },
            ..
        }) = self.prims.get_mut(&id)
        {
            *pose = new;
        }
    }

    fn subscribe_pointer(&mut self, id: PrimitiveId) {
        if let Some(p) = self.prims.get_mut(&id) {
            p.subscriptions += 1;
        }
    }

    fn unsubscribe_pointer(&mut self, id: PrimitiveId) {
        if let Some(p) = self.prims.get_mut(&id) {
            p.subscriptions = p.subscriptions.saturating_sub(1);
        }
    }

    fn place_below(&mut self, id: PrimitiveId, anchor: PrimitiveId) {
        if id == anchor || !self.prims.contains_key(&anchor) || !self.detach(id) {
            return;
        }
        if let Some(i) = self.z_index(anchor) {
            self.order.insert(i, id);
        }
    }

    fn place_above(&mut self, id: PrimitiveId, anchor: PrimitiveId) {
        if id == anchor || !self.prims.contains_key(&anchor) || !self.detach(id) {
            return;
        }
        if let Some(i) = self.z_index(anchor) {
            self.order.insert(i + 1, id);
        }
    }

    fn bring_to_front(&mut self, id: PrimitiveId) {
        if self.detach(id) {
            self.order.push(id);
        }
    }

    fn set_drawings_evented(&mut self, evented: bool) {
        self.drawings_evented = evented;
    }
}

impl PropertiesPanel for MemoryScene {
    fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }
    fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }
}
