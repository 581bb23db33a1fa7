//! Scene files: sensors with their saved coverage plus wall geometry.
//!
//! JSON layout (camelCase, every section optional except `sensors`):
//! `{ pixelsPerMeter, layer: {opacity, visible}, selected, walls: [..], wallsCsv,
//!    sensors: [{id, x, y, pixelsPerMeter, coverage}] }`
//!
//! `wallsCsv` is resolved relative to the scene file and read through polars;
//! columns `x1,y1,x2,y2` are required, `stroke_width` is optional.

use anyhow::{Context, Result};
use coverage::prelude::*;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels_per_meter: Option<f64>,
    #[serde(default)]
    pub layer: DevicesLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<u64>,
    #[serde(default)]
    pub walls: Vec<WallSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walls_csv: Option<PathBuf>,
    pub sensors: Vec<SensorRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRecord {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels_per_meter: Option<f64>,
    #[serde(default)]
    pub coverage: CoverageConfig,
}

/// Scene plus every wall it references (inline and CSV).
pub struct LoadedScene {
    pub file: SceneFile,
    pub walls: Vec<WallSegment>,
    /// `wallsCsv` resolved against the scene directory.
    pub walls_csv: Option<PathBuf>,
}

pub fn load_scene(path: &Path) -> Result<LoadedScene> {
    let raw = fs::read(path).with_context(|| format!("reading scene {}", path.display()))?;
    let file: SceneFile =
        serde_json::from_slice(&raw).with_context(|| format!("parsing scene {}", path.display()))?;
    let mut walls = file.walls.clone();
    let walls_csv = file.walls_csv.as_ref().map(|csv| match path.parent() {
        Some(dir) if csv.is_relative() => dir.join(csv),
        _ => csv.clone(),
    });
    if let Some(csv) = &walls_csv {
        walls.extend(read_walls_csv(csv)?);
    }
    tracing::info!(
        scene = %path.display(),
        sensors = file.sensors.len(),
        walls = walls.len(),
        "scene_loaded"
    );
    Ok(LoadedScene {
        file,
        walls,
        walls_csv,
    })
}

pub fn save_scene(path: &Path, file: &SceneFile) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, serde_json::to_vec_pretty(file)?)
        .with_context(|| format!("writing scene {}", path.display()))
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .with_context(|| format!("walls csv lacks column {name}"))?
        .cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Walls from CSV; rows with missing coordinates are kept as non-finite and skipped by the kernel.
pub fn read_walls_csv(path: &Path) -> Result<Vec<WallSegment>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening walls csv {}", path.display()))?
        .collect()?;
    let [x1, y1, x2, y2] = [
        f64_column(&df, "x1")?,
        f64_column(&df, "y1")?,
        f64_column(&df, "x2")?,
        f64_column(&df, "y2")?,
    ];
    let stroke = match df.column("stroke_width") {
        Ok(_) => f64_column(&df, "stroke_width")?,
        Err(_) => vec![1.0; df.height()],
    };
    let walls = (0..df.height())
        .map(|i| WallSegment {
            x1: x1[i],
            y1: y1[i],
            x2: x2[i],
            y2: y2[i],
            stroke_width: if stroke[i].is_finite() { stroke[i] } else { 1.0 },
        })
        .collect();
    Ok(walls)
}

/// One output row per boundary vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryRow {
    pub sensor: u64,
    pub index: u32,
    pub x: f64,
    pub y: f64,
}

/// Write boundary rows as CSV, or Parquet when the path ends in `.parquet`.
pub fn write_boundary(path: &Path, rows: &[BoundaryRow]) -> Result<()> {
    ensure_parent(path)?;
    let mut df = df!(
        "sensor" => rows.iter().map(|r| r.sensor).collect::<Vec<u64>>(),
        "index" => rows.iter().map(|r| r.index).collect::<Vec<u32>>(),
        "x" => rows.iter().map(|r| r.x).collect::<Vec<f64>>(),
        "y" => rows.iter().map(|r| r.y).collect::<Vec<f64>>()
    )?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    if path.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(file).finish(&mut df)?;
    } else {
        let mut file = file;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
    }
    tracing::info!(out = %path.display(), rows = rows.len(), "boundary_written");
    Ok(())
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Headless host: scene graph, coverage registry and device snapshots.
pub struct Workspace {
    pub scene: MemoryScene,
    pub manager: CoverageManager,
    pub devices: Vec<DeviceInfo>,
    pub walls: Vec<WallSegment>,
}

impl Workspace {
    /// Build host state and render every sensor.
    pub fn build(loaded: &LoadedScene) -> Self {
        let mut scene = MemoryScene::new();
        let mut manager = CoverageManager::default();
        let saved = loaded
            .file
            .sensors
            .iter()
            .map(|s| coverage::model::SavedCoverage {
                sensor: SensorId(s.id),
                coverage: s.coverage.clone(),
            })
            .collect();
        manager.load(saved, &mut scene);
        let devices: Vec<DeviceInfo> = loaded
            .file
            .sensors
            .iter()
            .map(|s| {
                let id = SensorId(s.id);
                let (icon, label) = scene.add_device(id);
                DeviceInfo {
                    pixels_per_meter: s.pixels_per_meter.or(loaded.file.pixels_per_meter),
                    icon: Some(icon),
                    label: Some(label),
                    ..DeviceInfo::new(id, Point::new(s.x, s.y))
                }
            })
            .collect();
        let walls = loaded.walls.clone();
        manager.set_layer(loaded.file.layer, &devices, &walls, &mut scene);
        // set_layer refreshes every sensor, which takes the cold path once
        manager.select(loaded.file.selected.map(SensorId), &devices, &walls, &mut scene);
        Self {
            scene,
            manager,
            devices,
            walls,
        }
    }

    pub fn device(&self, id: SensorId) -> Option<DeviceInfo> {
        self.devices.iter().copied().find(|d| d.id == id)
    }

    pub fn boundary_rows(&self) -> Vec<BoundaryRow> {
        let mut rows = Vec::new();
        for id in self.manager.ids() {
            let Some(sensor) = self.manager.sensor(id) else {
                continue;
            };
            rows.extend(sensor.boundary().iter().enumerate().map(|(i, p)| BoundaryRow {
                sensor: id.0,
                index: i as u32,
                x: p.x,
                y: p.y,
            }));
        }
        rows
    }

    /// Copy current configs back into the scene file.
    pub fn write_back(&self, file: &mut SceneFile) {
        for record in &mut file.sensors {
            if let Some(c) = self.manager.snapshot(SensorId(record.id)) {
                record.coverage = c;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scene_with_csv_walls_loads_and_samples() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("walls.csv"),
            "x1,y1,x2,y2,stroke_width\n150,-200,150,150,1\n",
        )
        .unwrap();
        let scene_path = dir.path().join("scene.json");
        fs::write(
            &scene_path,
            r#"{"wallsCsv":"walls.csv","sensors":[{"id":1,"x":100,"y":100}]}"#,
        )
        .unwrap();
        let loaded = load_scene(&scene_path).unwrap();
        assert_eq!(loaded.walls.len(), 1);
        assert_eq!(loaded.walls[0].x1, 150.0);
        assert_eq!(loaded.walls_csv.as_deref(), Some(dir.path().join("walls.csv").as_path()));

        let ws = Workspace::build(&loaded);
        let rows = ws.boundary_rows();
        assert_eq!(rows.len(), 47);
        assert_eq!((rows[0].x, rows[0].y), (100.0, 100.0));
        // the closing ray at 0 degrees stops on the wall
        let last = rows[rows.len() - 1];
        assert!((last.x - 150.0).abs() < 1e-9);

        let out = dir.path().join("out/boundary.csv");
        write_boundary(&out, &rows).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("sensor,index,x,y"));
        assert_eq!(text.lines().count(), 48);
    }

    #[test]
    fn write_back_persists_defaults() {
        let loaded = LoadedScene {
            file: serde_json::from_str(r#"{"sensors":[{"id":3,"x":0,"y":0}]}"#).unwrap(),
            walls: Vec::new(),
            walls_csv: None,
        };
        let ws = Workspace::build(&loaded);
        let mut file = loaded.file.clone();
        ws.write_back(&mut file);
        let c = &file.sensors[0].coverage;
        assert!(c.is_initialized());
        assert_eq!(c.radius(), 175.0);

        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.json");
        save_scene(&path, &file).unwrap();
        let again = load_scene(&path).unwrap();
        assert_eq!(again.file.sensors[0].coverage, *c);
    }
}
