//! Headless drag session: add coverage, rotate the cone, widen it, print the result.
//!
//! Run: `cargo run -p coverage --example drag_session`

use std::time::Instant;

use coverage::geom2::direction;
use coverage::prelude::*;

fn main() {
    let mut scene = MemoryScene::new();
    let id = SensorId(1);
    let (icon, label) = scene.add_device(id);
    let device = DeviceInfo {
        icon: Some(icon),
        label: Some(label),
        ..DeviceInfo::new(id, Point::new(100.0, 100.0))
    };
    let walls = vec![WallSegment::new(Point::new(150.0, -200.0), Point::new(150.0, 150.0), 4.0)];

    let mut manager = CoverageManager::default();
    manager.add_coverage(device, &walls, &mut scene);
    manager.select(Some(id), &[device], &walls, &mut scene);
    let view = manager.view(device, &walls);

    let mut ctl = DragController::new();
    let Some(sensor) = manager.sensor_mut(id) else {
        return;
    };
    let at = |deg: f64, dist: f64| device.center + direction(deg) * dist;

    ctl.pointer_down(sensor, HandleKind::Rotate, at(315.0, 175.0), &view, &mut scene);
    ctl.pointer_move(sensor, at(0.0, 120.0), &view, &mut scene);
    ctl.pointer_up(Instant::now(), true, &mut scene);

    ctl.pointer_down(sensor, HandleKind::Right, at(45.0, 120.0), &view, &mut scene);
    ctl.pointer_move(sensor, at(100.0, 120.0), &view, &mut scene);
    ctl.pointer_up(Instant::now(), true, &mut scene);

    if let Some(c) = sensor.coverage() {
        println!(
            "start={:.1} end={:.1} span={:.1} radius={:.1}px fill={}",
            c.start_angle(),
            c.end_angle(),
            c.span(),
            c.radius(),
            c.fill_color()
        );
    }
    println!("boundary vertices: {}", sensor.boundary().len());
}
