//! What the host tells the coverage core on every call.

use serde::{Deserialize, Serialize};

use super::config::sanitize_pixels_per_meter;
use crate::geom2::{GeomCfg, Point, WallSegment};
use crate::render::PrimitiveId;

/// Stable identity of a placed sensor device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorId(pub u64);

/// Snapshot of the host device object. Read on every recompute, never written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceInfo {
    pub id: SensorId,
    pub center: Point,
    pub pixels_per_meter: Option<f64>,
    /// Host primitives that must stay above the cone.
    pub icon: Option<PrimitiveId>,
    pub label: Option<PrimitiveId>,
}

impl DeviceInfo {
    pub fn new(id: SensorId, center: Point) -> Self {
        Self {
            id,
            center,
            pixels_per_meter: None,
            icon: None,
            label: None,
        }
    }
    /// Host scale, 17.5 px/m when absent or unusable.
    pub fn ppm(&self) -> f64 {
        sanitize_pixels_per_meter(self.pixels_per_meter)
    }
}

/// The externally owned "devices" layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DevicesLayer {
    pub opacity: f64,
    pub visible: bool,
}

impl Default for DevicesLayer {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            visible: true,
        }
    }
}

/// Everything a recompute reads from the host.
#[derive(Clone, Copy, Debug)]
pub struct HostView<'a> {
    pub device: DeviceInfo,
    /// Current wall layout; must be re-read by the host for every call.
    pub walls: &'a [WallSegment],
    pub layer: DevicesLayer,
    /// Whether this sensor is the active selection.
    pub selected: bool,
    pub cfg: GeomCfg,
}

impl<'a> HostView<'a> {
    pub fn new(device: DeviceInfo, walls: &'a [WallSegment]) -> Self {
        Self {
            device,
            walls,
            layer: DevicesLayer::default(),
            selected: false,
            cfg: GeomCfg::default(),
        }
    }
    pub fn with_layer(mut self, layer: DevicesLayer) -> Self {
        self.layer = layer;
        self
    }
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
    /// Handles show only for the selected sensor on a visible layer.
    pub fn handles_visible(&self, coverage_visible: bool) -> bool {
        self.selected && coverage_visible && self.layer.visible
    }
}
