//! Provenance sidecars for CLI artifacts.
//!
//! Every artifact `dir/<stem>.<ext>` gets `dir/<stem>.provenance.json`
//! recording the code revision, library version, the command parameters and
//! a SHA-256 digest of each file read (scene, walls CSV) and written.
//! Re-running a command on inputs with the same digests reproduces the
//! artifact byte for byte.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A file an artifact depends on (or is), with its content digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileDigest {
    pub path: String,
    pub sha256: String,
}

impl FileDigest {
    pub fn of(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("hashing {}", path.display()))?;
        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            sha256: hex::encode(Sha256::digest(&bytes)),
        })
    }
}

/// Command parameters plus the files they were applied to.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<FileDigest>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
        }
    }

    /// Digest `path` now, before anything downstream can rewrite it.
    pub fn with_input(mut self, path: &Path) -> Result<Self> {
        self.inputs.push(FileDigest::of(path)?);
        Ok(self)
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar {
    code_rev: String,
    version: &'static str,
    callsite: Callsite,
    params: Value,
    inputs: Vec<FileDigest>,
    outputs: Vec<FileDigest>,
}

/// Write the sidecar for an artifact that already exists on disk.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let caller = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        version: coverage::VERSION,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        params: payload.params,
        inputs: payload.inputs,
        outputs: vec![FileDigest::of(artifact)?],
    };
    let path = sidecar_path(artifact);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(sidecar = %path.display(), "provenance_written");
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time `GIT_COMMIT`, then runtime `GIT_COMMIT`, then `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_sits_next_to_artifact() {
        let base = Path::new("/tmp/output/boundary.parquet");
        assert_eq!(
            sidecar_path(base),
            Path::new("/tmp/output/boundary.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_input_and_output_digests() {
        let dir = tempdir().unwrap();
        let scene = dir.path().join("scene.json");
        fs::write(&scene, "{}").unwrap();
        let artifact = dir.path().join("boundary.csv");
        fs::write(&artifact, "sensor,index,x,y\n").unwrap();

        let payload = Payload::new(json!({"command": "sample"}))
            .with_input(&scene)
            .unwrap();
        let path = write_sidecar(&artifact, payload).unwrap();
        assert_eq!(path, dir.path().join("boundary.provenance.json"));

        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["params"]["command"], "sample");
        assert_eq!(parsed["version"], coverage::VERSION);
        assert_eq!(parsed["outputs"][0]["path"], artifact.to_string_lossy().as_ref());
        // sha256("{}")
        assert_eq!(
            parsed["inputs"][0]["sha256"],
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
        assert_eq!(parsed["outputs"][0]["sha256"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        let err = Payload::new(Value::Null)
            .with_input(&dir.path().join("nope.json"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("hashing"));
    }
}
