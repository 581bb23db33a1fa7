//! Handle drag state machine.
//!
//! States: `Idle`, `DraggingLeft`, `DraggingRight`, `Rotating`. A drag starts
//! with `pointer_down` on a handle and ends with `pointer_up`, which the host
//! forwards from both the canvas and the document; the second release is a
//! no-op. There is no cancel path: values reached during the drag stay.
//!
//! While dragging, walls and drawings are made non-interactive and the
//! properties panel is hidden. Interactivity comes back `RESTORE_DELAY` after
//! release (via `tick`) so the release itself cannot select a wall below the
//! handle.

use std::time::{Duration, Instant};

use tracing::debug;

use super::handles::HandleKind;
use crate::geom2::{angle_diff, angle_of, normalize_deg, Point};
use crate::model::{CoverageConfig, HostView, Sensor, SensorId, MIN_SPAN_DEG};
use crate::render::{PropertiesPanel, SceneGraph};

/// Delay before drawings become interactive again after a drag.
pub const RESTORE_DELAY: Duration = Duration::from_millis(150);
/// Half-width of the cone created when an edge is dragged across a wide cone.
pub const SNAP_HALF_WIDTH_DEG: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    DraggingLeft,
    DraggingRight,
    Rotating {
        initial_pointer_angle: f64,
        initial_start: f64,
        initial_end: f64,
    },
}

/// One edge handle moved to `current` (whole degrees). Never leaves a span below 1 degree.
pub fn drag_edge(coverage: &mut CoverageConfig, kind: HandleKind, current: f64) {
    let current = normalize_deg(current.round());
    let (start, end) = (coverage.start_angle(), coverage.end_angle());
    let previous_span = coverage.span();
    let tentative = match kind {
        HandleKind::Left => angle_diff(current, end, false),
        HandleKind::Right => angle_diff(start, current, false),
        HandleKind::Rotate => return,
    };
    if tentative >= MIN_SPAN_DEG {
        match kind {
            HandleKind::Left => coverage.set_angles(current, end),
            _ => coverage.set_angles(start, current),
        }
    } else if previous_span > 180.0 {
        // Crossing over from a wide cone starts a narrow one on the far side.
        coverage.set_angles(current - SNAP_HALF_WIDTH_DEG, current + SNAP_HALF_WIDTH_DEG);
    } else {
        match kind {
            HandleKind::Left => coverage.set_angles(end - MIN_SPAN_DEG, end),
            _ => coverage.set_angles(start, start + MIN_SPAN_DEG),
        }
    }
}

/// Rotate by the pointer's angular travel and set the radius to the pointer distance.
pub fn rotate_and_resize(
    coverage: &mut CoverageConfig,
    state: DragState,
    center: Point,
    pointer: Point,
    pixels_per_meter: f64,
) {
    let DragState::Rotating {
        initial_pointer_angle,
        initial_start,
        initial_end,
    } = state
    else {
        return;
    };
    let current = angle_of(center, pointer);
    let delta = normalize_deg(current - initial_pointer_angle + 360.0);
    coverage.set_angles(initial_start + delta, initial_end + delta);
    // clamped to [MIN_RADIUS_M, MAX_RADIUS_M] by the setter
    coverage.set_radius_px((pointer - center).norm(), pixels_per_meter);
}

#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
    sensor: Option<SensorId>,
    panel_was_visible: bool,
    restore_at: Option<Instant>,
    restore_delay: Duration,
}

impl Default for DragController {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            sensor: None,
            panel_was_visible: false,
            restore_at: None,
            restore_delay: RESTORE_DELAY,
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn state(&self) -> DragState {
        self.state
    }
    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }
    /// Sensor being dragged, if any.
    pub fn sensor(&self) -> Option<SensorId> {
        self.sensor
    }
    /// Pending interactivity restore, if any.
    pub fn restore_due(&self) -> Option<Instant> {
        self.restore_at
    }

    /// Pointer pressed on one of `sensor`'s handles.
    pub fn pointer_down<S>(
        &mut self,
        sensor: &Sensor,
        kind: HandleKind,
        pointer: Point,
        view: &HostView<'_>,
        scene: &mut S,
    ) where
        S: SceneGraph + PropertiesPanel + ?Sized,
    {
        let Some(coverage) = sensor.coverage() else {
            return;
        };
        if self.is_dragging() {
            return;
        }
        // A press inside the restore window keeps drawings disabled.
        self.restore_at = None;
        self.panel_was_visible = scene.is_panel_visible();
        scene.set_panel_visible(false);
        scene.set_drawings_evented(false);
        self.sensor = Some(sensor.id());
        self.state = match kind {
            HandleKind::Left => DragState::DraggingLeft,
            HandleKind::Right => DragState::DraggingRight,
            HandleKind::Rotate => DragState::Rotating {
                initial_pointer_angle: angle_of(view.device.center, pointer),
                initial_start: coverage.start_angle(),
                initial_end: coverage.end_angle(),
            },
        };
        debug!(sensor = sensor.id().0, state = ?self.state, "drag start");
    }

    /// Apply one pointer move and re-render. Returns false if nothing was dragged.
    pub fn pointer_move<S>(
        &mut self,
        sensor: &mut Sensor,
        pointer: Point,
        view: &HostView<'_>,
        scene: &mut S,
    ) -> bool
    where
        S: SceneGraph + ?Sized,
    {
        if self.sensor != Some(sensor.id()) || sensor.coverage().is_none() {
            return false;
        }
        let center = view.device.center;
        let ppm = view.device.ppm();
        let coverage = sensor.coverage_mut();
        let current = angle_of(center, pointer);
        match self.state {
            DragState::Idle => return false,
            DragState::DraggingLeft => drag_edge(coverage, HandleKind::Left, current),
            DragState::DraggingRight => drag_edge(coverage, HandleKind::Right, current),
            state @ DragState::Rotating { .. } => {
                rotate_and_resize(coverage, state, center, pointer, ppm)
            }
        }
        sensor.create_or_update_coverage_area(view, scene);
        true
    }

    /// Release. `still_selected` is whether the dragged sensor is the active selection.
    pub fn pointer_up<S>(&mut self, now: Instant, still_selected: bool, scene: &mut S)
    where
        S: PropertiesPanel + ?Sized,
    {
        if !self.is_dragging() {
            return;
        }
        debug!(sensor = ?self.sensor.map(|s| s.0), state = ?self.state, "drag end");
        self.state = DragState::Idle;
        self.sensor = None;
        self.restore_at = Some(now + self.restore_delay);
        if self.panel_was_visible && still_selected {
            scene.set_panel_visible(true);
        }
        self.panel_was_visible = false;
    }

    /// Fire the delayed interactivity restore once it is due.
    pub fn tick<S>(&mut self, now: Instant, scene: &mut S)
    where
        S: SceneGraph + ?Sized,
    {
        if self.restore_at.is_some_and(|due| now >= due) {
            self.restore_at = None;
            scene.set_drawings_evented(true);
        }
    }
}
