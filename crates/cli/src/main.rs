use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use coverage::geom2::rand::{draw_walls, ReplayToken, WallCfg};
use coverage::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod scene;

use provenance::{write_sidecar, Payload};
use scene::{
    load_scene, save_scene, write_boundary, LoadedScene, SceneFile, SensorRecord, Workspace,
};

#[derive(Parser)]
#[command(name = "coverage-cli")]
#[command(about = "Headless sensor coverage runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Render every sensor of a scene and write boundary vertices (CSV or Parquet)
    Sample {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Replay one handle drag and write the updated scene
    Drag {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        sensor: u64,
        #[arg(long, value_enum)]
        handle: HandleArg,
        /// Pointer release position, `X,Y` in screen pixels
        #[arg(long, value_parser = parse_point)]
        to: Point,
        #[arg(long)]
        out: PathBuf,
    },
    /// Random walls around one full-circle sensor
    Demo {
        #[arg(long, default_value_t = 12)]
        walls: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HandleArg {
    Left,
    Right,
    Rotate,
}

impl From<HandleArg> for HandleKind {
    fn from(h: HandleArg) -> Self {
        match h {
            HandleArg::Left => HandleKind::Left,
            HandleArg::Right => HandleKind::Right,
            HandleArg::Rotate => HandleKind::Rotate,
        }
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Point::new(x, y))
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Sample { scene, out } => sample(&scene, &out),
        Action::Drag {
            scene,
            sensor,
            handle,
            to,
            out,
        } => drag(&scene, SensorId(sensor), handle.into(), to, &out),
        Action::Demo { walls, seed, out } => demo(walls, seed, &out),
        Action::Report => report(),
    }
}

fn sample(scene_path: &Path, out: &Path) -> Result<()> {
    tracing::info!(scene = %scene_path.display(), out = %out.display(), "sample");
    let loaded = load_scene(scene_path)?;
    let mut payload = scene_payload(&loaded, scene_path)?;
    let ws = Workspace::build(&loaded);
    let rows = ws.boundary_rows();
    write_boundary(out, &rows)?;
    payload.params = json!({
        "command": "sample",
        "sensors": loaded.file.sensors.len(),
        "walls": loaded.walls.len(),
        "vertices": rows.len(),
    });
    write_sidecar(out, payload)?;
    Ok(())
}

fn drag(scene_path: &Path, id: SensorId, kind: HandleKind, to: Point, out: &Path) -> Result<()> {
    tracing::info!(sensor = id.0, handle = ?kind, to_x = to.x, to_y = to.y, "drag");
    let loaded = load_scene(scene_path)?;
    // digest before `out` (possibly the scene itself) is rewritten
    let mut payload = scene_payload(&loaded, scene_path)?;
    let mut ws = Workspace::build(&loaded);
    let Some(device) = ws.device(id) else {
        bail!("scene has no sensor {}", id.0);
    };
    ws.manager
        .select(Some(id), &ws.devices, &ws.walls, &mut ws.scene);
    let view = ws.manager.view(device, &ws.walls);
    let sensor = ws
        .manager
        .sensor_mut(id)
        .with_context(|| format!("sensor {} has no coverage", id.0))?;
    let grab = sensor
        .handles()
        .map(|h| h.get(kind).pose.position)
        .with_context(|| format!("sensor {} has no handles", id.0))?;

    let mut ctl = DragController::new();
    ctl.pointer_down(sensor, kind, grab, &view, &mut ws.scene);
    ctl.pointer_move(sensor, to, &view, &mut ws.scene);
    let released = Instant::now();
    ctl.pointer_up(released, true, &mut ws.scene);
    if let Some(due) = ctl.restore_due() {
        ctl.tick(due, &mut ws.scene);
    }

    let mut file = loaded.file.clone();
    ws.write_back(&mut file);
    file.selected = Some(id.0);
    save_scene(out, &file)?;
    if let Some(c) = ws.manager.snapshot(id) {
        tracing::info!(
            start = c.start_angle(),
            end = c.end_angle(),
            span = c.span(),
            radius = c.radius(),
            "drag_done"
        );
    }
    payload.params = json!({
        "command": "drag",
        "sensor": id.0,
        "handle": format!("{kind:?}").to_lowercase(),
        "grab": [grab.x, grab.y],
        "to": [to.x, to.y],
    });
    write_sidecar(out, payload)?;
    Ok(())
}

/// Provenance inputs of a scene: the scene file and its walls CSV, if any.
fn scene_payload(loaded: &LoadedScene, scene_path: &Path) -> Result<Payload> {
    let mut payload = Payload::new(serde_json::Value::Null).with_input(scene_path)?;
    if let Some(csv) = &loaded.walls_csv {
        payload = payload.with_input(csv)?;
    }
    Ok(payload)
}

fn demo(walls: usize, seed: u64, out: &Path) -> Result<()> {
    tracing::info!(walls, seed, out = %out.display(), "demo");
    let center = Point::new(0.0, 0.0);
    let cfg = WallCfg {
        count: walls,
        ..WallCfg::default()
    };
    let drawn = draw_walls(center, cfg, ReplayToken { seed, index: 0 });
    let mut coverage = CoverageConfig::default();
    coverage.set_full_circle(true);
    let loaded = LoadedScene {
        file: SceneFile {
            pixels_per_meter: None,
            layer: DevicesLayer::default(),
            selected: None,
            walls: drawn.clone(),
            walls_csv: None,
            sensors: vec![SensorRecord {
                id: 1,
                x: center.x,
                y: center.y,
                pixels_per_meter: None,
                coverage,
            }],
        },
        walls: drawn,
        walls_csv: None,
    };
    let ws = Workspace::build(&loaded);
    let rows = ws.boundary_rows();
    if rows.is_empty() {
        bail!("demo produced an empty boundary");
    }
    write_boundary(out, &rows)?;
    let scene_out = out.with_extension("scene.json");
    save_scene(&scene_out, &loaded.file)?;
    write_sidecar(
        out,
        Payload::new(json!({
            "command": "demo",
            "walls": walls,
            "seed": seed,
            "vertices": rows.len(),
            "scene": scene_out.to_string_lossy(),
        })),
    )?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": coverage::VERSION,
        "geom": {
            "eps_det": GeomCfg::default().eps_det,
            "thick_tolerance_px": GeomCfg::default().thick_tolerance_px,
            "deg_per_sample": GeomCfg::default().deg_per_sample,
        },
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_spaces() {
        assert_eq!(parse_point("10, -2.5").unwrap(), Point::new(10.0, -2.5));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn drag_right_handle_widens_cone() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        std::fs::write(&scene_path, r#"{"sensors":[{"id":7,"x":100,"y":100}]}"#).unwrap();
        let out = dir.path().join("dragged.json");
        // release straight below the center: 90 degrees on screen
        drag(&scene_path, SensorId(7), HandleKind::Right, Point::new(100.0, 200.0), &out).unwrap();
        let again = load_scene(&out).unwrap();
        let c = &again.file.sensors[0].coverage;
        assert_eq!(c.start_angle(), 270.0);
        assert_eq!(c.end_angle(), 90.0);
        assert_eq!(again.file.selected, Some(7));
        assert!(dir.path().join("dragged.provenance.json").exists());
    }

    #[test]
    fn drag_in_place_records_original_scene_digest() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        std::fs::write(&scene_path, r#"{"sensors":[{"id":1,"x":0,"y":0}]}"#).unwrap();
        let before = provenance::FileDigest::of(&scene_path).unwrap();
        let to = Point::new(0.0, 50.0);
        drag(&scene_path, SensorId(1), HandleKind::Left, to, &scene_path).unwrap();
        let after = provenance::FileDigest::of(&scene_path).unwrap();
        assert_ne!(before.sha256, after.sha256);

        let sidecar = dir.path().join("scene.provenance.json");
        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(doc["inputs"][0]["sha256"], before.sha256.as_str());
        assert_eq!(doc["outputs"][0]["sha256"], after.sha256.as_str());
        assert_eq!(doc["params"]["handle"], "left");
    }

    #[test]
    fn drag_unknown_sensor_fails() {
        let dir = tempfile::tempdir().unwrap();
        let scene_path = dir.path().join("scene.json");
        std::fs::write(&scene_path, r#"{"sensors":[{"id":1,"x":0,"y":0}]}"#).unwrap();
        let err = drag(
            &scene_path,
            SensorId(2),
            HandleKind::Left,
            Point::new(1.0, 1.0),
            &dir.path().join("o.json"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no sensor 2"));
    }

    #[test]
    fn demo_writes_full_circle_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("demo.csv");
        demo(5, 3, &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        // header plus 180 full-circle rays
        assert_eq!(text.lines().count(), 181);
        assert!(dir.path().join("demo.scene.json").exists());
    }
}
