//! Registry of every sensor's coverage, keyed by device id.
//!
//! Holds the pieces of host state that apply to all sensors (the devices
//! layer, the active selection, the geometry tolerances) and builds the
//! `HostView` for each call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::CoverageConfig;
use super::host::{DeviceInfo, DevicesLayer, HostView, SensorId};
use super::sensor::Sensor;
use crate::geom2::{GeomCfg, WallSegment};
use crate::render::SceneGraph;

/// Persisted form: one record per sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedCoverage {
    pub sensor: SensorId,
    pub coverage: CoverageConfig,
}

#[derive(Clone, Debug, Default)]
pub struct CoverageManager {
    sensors: BTreeMap<SensorId, Sensor>,
    selected: Option<SensorId>,
    layer: DevicesLayer,
    cfg: GeomCfg,
}

impl CoverageManager {
    pub fn new(cfg: GeomCfg) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn layer(&self) -> DevicesLayer {
        self.layer
    }
    pub fn selected(&self) -> Option<SensorId> {
        self.selected
    }
    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.get(&id)
    }
    pub fn sensor_mut(&mut self, id: SensorId) -> Option<&mut Sensor> {
        self.sensors.get_mut(&id)
    }
    pub fn ids(&self) -> impl Iterator<Item = SensorId> + '_ {
        self.sensors.keys().copied()
    }

    /// View of the host for one device.
    pub fn view<'a>(&self, device: DeviceInfo, walls: &'a [WallSegment]) -> HostView<'a> {
        HostView {
            device,
            walls,
            layer: self.layer,
            selected: self.selected == Some(device.id),
            cfg: self.cfg,
        }
    }

    /// Idempotent: creates the sensor entry on first call, then renders.
    pub fn add_coverage<S: SceneGraph + ?Sized>(
        &mut self,
        device: DeviceInfo,
        walls: &[WallSegment],
        scene: &mut S,
    ) {
        let view = self.view(device, walls);
        self.sensors
            .entry(device.id)
            .or_insert_with(|| Sensor::new(device.id))
            .add_coverage(&view, scene);
    }

    /// Warm-path recompute of one sensor. Unknown ids are ignored.
    pub fn update<S: SceneGraph + ?Sized>(
        &mut self,
        device: DeviceInfo,
        walls: &[WallSegment],
        scene: &mut S,
    ) {
        let view = self.view(device, walls);
        if let Some(sensor) = self.sensors.get_mut(&device.id) {
            sensor.create_or_update_coverage_area(&view, scene);
        }
    }

    /// Destroy config, polygon, handles and bindings of a removed sensor.
    pub fn remove_coverage<S: SceneGraph + ?Sized>(&mut self, id: SensorId, scene: &mut S) {
        if let Some(mut sensor) = self.sensors.remove(&id) {
            sensor.remove_coverage(scene);
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Recompute every known sensor present in `devices` (layer change, wall edit, reload).
    pub fn refresh_all<S: SceneGraph + ?Sized>(
        &mut self,
        devices: &[DeviceInfo],
        walls: &[WallSegment],
        scene: &mut S,
    ) {
        for device in devices {
            if self.sensors.contains_key(&device.id) {
                self.update(*device, walls, scene);
            }
        }
    }

    pub fn set_layer<S: SceneGraph + ?Sized>(
        &mut self,
        layer: DevicesLayer,
        devices: &[DeviceInfo],
        walls: &[WallSegment],
        scene: &mut S,
    ) {
        self.layer = layer;
        self.refresh_all(devices, walls, scene);
    }

    /// Change the active selection; refreshes handle visibility of both sensors.
    pub fn select<S: SceneGraph + ?Sized>(
        &mut self,
        id: Option<SensorId>,
        devices: &[DeviceInfo],
        walls: &[WallSegment],
        scene: &mut S,
    ) {
        let previous = std::mem::replace(&mut self.selected, id);
        if previous == id {
            return;
        }
        for device in devices {
            if Some(device.id) == previous || Some(device.id) == id {
                self.update(*device, walls, scene);
            }
        }
    }

    /// Config copy for the undo stack.
    pub fn snapshot(&self, id: SensorId) -> Option<CoverageConfig> {
        self.sensors.get(&id).and_then(|s| s.coverage().cloned())
    }

    /// Undo/redo: put a config back and re-render through the warm path.
    pub fn restore<S: SceneGraph + ?Sized>(
        &mut self,
        device: DeviceInfo,
        coverage: CoverageConfig,
        walls: &[WallSegment],
        scene: &mut S,
    ) {
        let view = self.view(device, walls);
        let sensor = self
            .sensors
            .entry(device.id)
            .or_insert_with(|| Sensor::new(device.id));
        *sensor.coverage_mut() = coverage;
        sensor.create_or_update_coverage_area(&view, scene);
    }

    pub fn save(&self) -> Vec<SavedCoverage> {
        self.sensors
            .values()
            .filter_map(|s| {
                s.coverage().map(|c| SavedCoverage {
                    sensor: s.id(),
                    coverage: c.clone(),
                })
            })
            .collect()
    }

    /// Bulk reload: drop all primitives and replace every config. The host
    /// then calls `add_coverage`/`refresh_all`, which takes the cold path.
    pub fn load<S: SceneGraph + ?Sized>(&mut self, saved: Vec<SavedCoverage>, scene: &mut S) {
        for sensor in self.sensors.values_mut() {
            sensor.teardown(scene);
        }
        self.sensors = saved
            .into_iter()
            .map(|r| (r.sensor, Sensor::with_coverage(r.sensor, r.coverage)))
            .collect();
        if self.selected.is_some_and(|id| !self.sensors.contains_key(&id)) {
            self.selected = None;
        }
        debug!(sensors = self.sensors.len(), "coverage loaded");
    }
}
