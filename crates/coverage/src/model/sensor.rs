//! One sensor's coverage: config, cached boundary, host primitives.
//!
//! Two paths reach the renderer:
//! - cold (`add_coverage` on a sensor that is not set up): drop stale
//!   primitives, create polygon and handles, bind pointer events, then render.
//! - warm (`create_or_update_coverage_area` once set up): resample and mutate
//!   the existing primitives in place. Never creates or binds anything.
//!
//! The set-up flag is the only gate between them; drag handlers only ever
//! reach the warm path.

use tracing::{debug, warn};

use super::config::CoverageConfig;
use super::host::{HostView, SensorId};
use crate::geom2::{sample_boundary, Point};
use crate::interact::{HandleKind, Handles};
use crate::render::{self, PrimitiveId, SceneGraph};

#[derive(Clone, Debug)]
pub struct Sensor {
    id: SensorId,
    coverage: Option<CoverageConfig>,
    boundary: Vec<Point>,
    polygon: Option<PrimitiveId>,
    handles: Option<Handles>,
    set_up: bool,
}

impl Sensor {
    pub fn new(id: SensorId) -> Self {
        Self {
            id,
            coverage: None,
            boundary: Vec::new(),
            polygon: None,
            handles: None,
            set_up: false,
        }
    }

    /// Sensor restored from a saved record; primitives are built on the next `add_coverage`.
    pub fn with_coverage(id: SensorId, coverage: CoverageConfig) -> Self {
        Self {
            coverage: Some(coverage),
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }
    pub fn coverage(&self) -> Option<&CoverageConfig> {
        self.coverage.as_ref()
    }
    /// Mutable config, created empty on first request.
    pub fn coverage_mut(&mut self) -> &mut CoverageConfig {
        self.coverage.get_or_insert_with(CoverageConfig::default)
    }
    /// Boundary from the last recompute.
    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }
    pub fn polygon(&self) -> Option<PrimitiveId> {
        self.polygon
    }
    pub fn handles(&self) -> Option<&Handles> {
        self.handles.as_ref()
    }
    pub fn is_set_up(&self) -> bool {
        self.set_up
    }

    /// Idempotent entry point: lazily create the config, default it, build
    /// primitives if needed, render.
    pub fn add_coverage<S: SceneGraph + ?Sized>(&mut self, view: &HostView<'_>, scene: &mut S) {
        self.coverage_mut().apply_defaults(view.device.ppm());
        if !self.set_up {
            self.cold_setup(view, scene);
        }
        self.recompute(view, scene);
    }

    /// Warm-path recompute for external callers (undo/redo, drags, reload).
    ///
    /// Falls through to `add_coverage` once if the sensor was never set up.
    pub fn create_or_update_coverage_area<S: SceneGraph + ?Sized>(
        &mut self,
        view: &HostView<'_>,
        scene: &mut S,
    ) {
        if !self.set_up {
            self.add_coverage(view, scene);
            return;
        }
        self.recompute(view, scene);
    }

    /// Remove every host primitive and forget the config.
    pub fn remove_coverage<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        self.teardown(scene);
        self.coverage = None;
    }

    /// Drop host primitives but keep the config (bulk reload).
    pub fn teardown<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        if let Some(handles) = self.handles.take() {
            for id in handles.iter().filter_map(|h| h.primitive) {
                scene.unsubscribe_pointer(id);
                scene.remove(id);
            }
        }
        if let Some(poly) = self.polygon.take() {
            scene.remove(poly);
        }
        self.boundary.clear();
        if self.set_up {
            debug!(sensor = self.id.0, "coverage torn down");
        }
        self.set_up = false;
    }

    fn cold_setup<S: SceneGraph + ?Sized>(&mut self, view: &HostView<'_>, scene: &mut S) {
        self.teardown(scene);
        let Some(polygon) = scene.add_polygon(self.id) else {
            warn!(sensor = self.id.0, "host could not create coverage polygon");
            return;
        };
        self.polygon = Some(polygon);
        let mut make = |kind: HandleKind| {
            let id = scene.add_handle(self.id, kind);
            match id {
                Some(id) => scene.subscribe_pointer(id),
                None => warn!(sensor = self.id.0, ?kind, "host could not create handle"),
            }
            id
        };
        let (l, r, m) = (make(HandleKind::Left), make(HandleKind::Right), make(HandleKind::Rotate));
        self.handles = Some(Handles::new(l, r, m));
        self.set_up = true;
        debug!(sensor = self.id.0, center = ?view.device.center, "coverage set up");
    }

    fn recompute<S: SceneGraph + ?Sized>(&mut self, view: &HostView<'_>, scene: &mut S) {
        let Some(polygon) = self.polygon else {
            return;
        };
        let center = view.device.center;
        let cfg = view.cfg;
        let Some(coverage) = self.coverage.as_mut() else {
            return;
        };
        let (start, end, radius) = (
            coverage.start_angle(),
            coverage.end_angle(),
            coverage.radius(),
        );
        self.boundary = sample_boundary(
            start,
            end,
            center,
            radius,
            view.walls,
            coverage.is_initialized(),
            cfg,
        );
        coverage.refresh_fill(view.layer.opacity);

        let style = render::polygon_style(coverage, view.layer.visible);
        render::push_cone(scene, polygon, &self.boundary, &style);

        if let Some(handles) = self.handles.as_mut() {
            let span = coverage.span();
            let full = span >= cfg.full_circle_deg;
            let visible = view.handles_visible(coverage.visible());
            handles.place(center, radius, start, end, span, full, visible);
            render::push_handles(scene, handles);
        }
        render::reassert_z_order(scene, polygon, &view.device, self.handles.as_ref());
    }
}
