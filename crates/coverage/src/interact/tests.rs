use std::time::{Duration, Instant};

use super::*;
use crate::geom2::{direction, Point};
use crate::model::{CoverageConfig, DeviceInfo, HostView, Sensor, SensorId};
use crate::render::{MemoryScene, PropertiesPanel};
use nalgebra::vector;
use proptest::prelude::*;

fn cone(start: f64, end: f64) -> CoverageConfig {
    let mut c = CoverageConfig::default();
    c.set_angles(start, end);
    c.apply_defaults(17.5);
    c
}

fn at(center: Point, deg: f64, dist: f64) -> Point {
    center + direction(deg) * dist
}

#[test]
fn edge_moves_to_rounded_pointer_angle() {
    let mut c = cone(270.0, 0.0);
    drag_edge(&mut c, HandleKind::Left, 300.4);
    assert_eq!((c.start_angle(), c.end_angle()), (300.0, 0.0));
    drag_edge(&mut c, HandleKind::Right, 45.6);
    assert_eq!((c.start_angle(), c.end_angle()), (300.0, 46.0));
    assert_eq!(c.span(), 106.0);
}

#[test]
fn wide_cone_collapse_snaps_to_far_side() {
    let mut c = cone(0.0, 270.0);
    assert_eq!(c.span(), 270.0);
    drag_edge(&mut c, HandleKind::Left, 270.0);
    assert_eq!((c.start_angle(), c.end_angle()), (265.0, 275.0));
    assert_eq!(c.span(), 10.0);
}

#[test]
fn narrow_cone_collapse_keeps_one_degree() {
    let mut c = cone(0.0, 20.0);
    drag_edge(&mut c, HandleKind::Left, 20.2);
    assert_eq!((c.start_angle(), c.end_angle()), (19.0, 20.0));
    let mut c = cone(0.0, 20.0);
    drag_edge(&mut c, HandleKind::Right, 359.7);
    assert_eq!((c.start_angle(), c.end_angle()), (0.0, 1.0));
}

#[test]
fn edge_drag_leaves_full_circle() {
    let mut c = cone(90.0, 90.0);
    assert!(c.is_full_circle());
    drag_edge(&mut c, HandleKind::Right, 180.0);
    assert!(!c.is_full_circle());
    assert_eq!(c.span(), 90.0);
}

#[test]
fn rotation_keeps_span_and_sets_radius() {
    let center = vector![100.0, 100.0];
    let mut c = cone(270.0, 0.0);
    let state = DragState::Rotating {
        initial_pointer_angle: 315.0,
        initial_start: 270.0,
        initial_end: 0.0,
    };
    rotate_and_resize(&mut c, state, center, at(center, 45.0, 100.0), 17.5);
    assert!((c.start_angle() - 0.0).abs() < 1e-9 || (c.start_angle() - 360.0).abs() < 1e-9);
    assert!((c.end_angle() - 90.0).abs() < 1e-9);
    assert!((c.span() - 90.0).abs() < 1e-9);
    assert!((c.radius() - 100.0).abs() < 1e-9);

    rotate_and_resize(&mut c, state, center, at(center, 315.0, 2.0), 17.5);
    assert_eq!(c.radius(), 17.5);
    rotate_and_resize(&mut c, state, center, at(center, 315.0, 1e6), 17.5);
    assert_eq!(c.radius(), 500.0 * 17.5);
    assert!((c.start_angle() - 270.0).abs() < 1e-9);
}

#[test]
fn rotation_preserves_full_circle() {
    let center = vector![0.0, 0.0];
    let mut c = cone(30.0, 30.0);
    let state = DragState::Rotating {
        initial_pointer_angle: 0.0,
        initial_start: 30.0,
        initial_end: 30.0,
    };
    rotate_and_resize(&mut c, state, center, at(center, 77.0, 50.0), 17.5);
    assert!(c.is_full_circle());
    assert_eq!(c.span(), 360.0);
}

#[test]
fn handle_angles_spread_on_narrow_and_full() {
    assert_eq!(handle_angles(270.0, 0.0, 90.0, false), [270.0, 0.0, 315.0]);
    assert_eq!(handle_angles(10.0, 14.0, 4.0, false), [5.0, 19.0, 12.0]);
    assert_eq!(handle_angles(0.0, 0.0, 360.0, true), [355.0, 5.0, 180.0]);
}

fn setup() -> (MemoryScene, DeviceInfo, Sensor) {
    let mut scene = MemoryScene::new();
    let id = SensorId(1);
    let (icon, label) = scene.add_device(id);
    let dev = DeviceInfo {
        icon: Some(icon),
        label: Some(label),
        ..DeviceInfo::new(id, vector![100.0, 100.0])
    };
    let mut sensor = Sensor::new(id);
    sensor.add_coverage(&HostView::new(dev, &[]).with_selected(true), &mut scene);
    (scene, dev, sensor)
}

#[test]
fn drag_lifecycle_toggles_host_state() {
    let (mut scene, dev, mut sensor) = setup();
    let view = HostView::new(dev, &[]).with_selected(true);
    scene.set_panel_visible(true);
    let poly = sensor.polygon().unwrap();
    let before = scene.vertices(poly).unwrap().to_vec();

    let mut ctl = DragController::new();
    ctl.pointer_down(&sensor, HandleKind::Right, at(dev.center, 0.0, 175.0), &view, &mut scene);
    assert_eq!(ctl.state(), DragState::DraggingRight);
    assert!(!scene.is_panel_visible());
    assert!(!scene.drawings_evented());

    assert!(ctl.pointer_move(&mut sensor, at(dev.center, 60.0, 80.0), &view, &mut scene));
    assert_eq!(sensor.coverage().unwrap().end_angle(), 60.0);
    assert_ne!(scene.vertices(poly).unwrap(), &before[..]);
    // right handle follows the edge
    let right = sensor.handles().unwrap().right.primitive.unwrap();
    assert!((scene.handle_pose(right).unwrap().angle - 60.0).abs() < 1e-9);

    let t0 = Instant::now();
    ctl.pointer_up(t0, true, &mut scene);
    assert_eq!(ctl.state(), DragState::Idle);
    assert!(scene.is_panel_visible());
    // document-level release arrives second and changes nothing
    ctl.pointer_up(t0 + Duration::from_millis(40), true, &mut scene);
    assert_eq!(ctl.restore_due(), Some(t0 + RESTORE_DELAY));

    ctl.tick(t0 + Duration::from_millis(100), &mut scene);
    assert!(!scene.drawings_evented());
    ctl.tick(t0 + RESTORE_DELAY, &mut scene);
    assert!(scene.drawings_evented());
    assert!(ctl.restore_due().is_none());

    // moves after release are ignored; values stay committed
    assert!(!ctl.pointer_move(&mut sensor, at(dev.center, 120.0, 80.0), &view, &mut scene));
    assert_eq!(sensor.coverage().unwrap().end_angle(), 60.0);
}

#[test]
fn panel_stays_hidden_when_selection_moved_on() {
    let (mut scene, dev, sensor) = setup();
    let view = HostView::new(dev, &[]).with_selected(true);
    scene.set_panel_visible(true);
    let mut ctl = DragController::new();
    ctl.pointer_down(&sensor, HandleKind::Left, dev.center, &view, &mut scene);
    ctl.pointer_up(Instant::now(), false, &mut scene);
    assert!(!scene.is_panel_visible());
}

#[test]
fn rotate_drag_through_controller() {
    let (mut scene, dev, mut sensor) = setup();
    let view = HostView::new(dev, &[]).with_selected(true);
    let mut ctl = DragController::new();
    ctl.pointer_down(&sensor, HandleKind::Rotate, at(dev.center, 315.0, 175.0), &view, &mut scene);
    assert!(matches!(ctl.state(), DragState::Rotating { .. }));
    ctl.pointer_move(&mut sensor, at(dev.center, 135.0, 70.0), &view, &mut scene);
    let c = sensor.coverage().unwrap();
    assert!((c.start_angle() - 90.0).abs() < 1e-9);
    assert!((c.end_angle() - 180.0).abs() < 1e-9);
    assert!((c.radius() - 70.0).abs() < 1e-9);
    assert!(sensor
        .boundary()
        .iter()
        .all(|p| (p - dev.center).norm() <= 70.0 + 1e-9));
}

#[test]
fn moves_for_another_sensor_are_ignored() {
    let (mut scene, dev, sensor) = setup();
    let view = HostView::new(dev, &[]);
    let mut ctl = DragController::new();
    ctl.pointer_down(&sensor, HandleKind::Left, dev.center, &view, &mut scene);
    let mut other = Sensor::new(SensorId(2));
    assert!(!ctl.pointer_move(&mut other, dev.center, &view, &mut scene));
    assert!(other.coverage().is_none());
}

fn handle_strategy() -> impl Strategy<Value = HandleKind> {
    prop_oneof![Just(HandleKind::Left), Just(HandleKind::Right)]
}

proptest! {
    #[test]
    fn edge_drags_never_store_tiny_spans(
        start in 0.0..360.0f64,
        span in 1.0..359.0f64,
        moves in prop::collection::vec((handle_strategy(), 0.0..360.0f64), 1..40),
    ) {
        let mut c = cone(start.round(), (start + span).round());
        for (kind, angle) in moves {
            drag_edge(&mut c, kind, angle);
            prop_assert!(c.span() >= 1.0 - 1e-9, "span {}", c.span());
        }
    }
}
