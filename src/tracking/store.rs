//! File-backed run store
//!
//! Layout:
//!
//! ```text
//! <root>/<experiment>/<run_id>/
//!     meta.json
//!     params/<key>
//!     metrics/<key>     "<timestamp_ms> <value> <step>" per line
//!     tags/<key>
//!     artifacts/...
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{validate_key, Tracker};

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Running => write!(f, "RUNNING"),
            RunStatus::Finished => write!(f, "FINISHED"),
            RunStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Contents of `meta.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub experiment_name: String,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub artifact_uri: PathBuf,
}

/// Root of the run store
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a new run under `experiment`
    pub fn start_run(&self, experiment: &str) -> Result<FileRun> {
        validate_key(experiment)?;
        let run_id = format!("{:032x}", rand::random::<u128>());
        let dir = self.root.join(experiment).join(&run_id);
        for sub in ["params", "metrics", "tags", "artifacts"] {
            fs::create_dir_all(dir.join(sub))?;
        }

        let meta = RunMeta {
            run_id,
            experiment_name: experiment.to_string(),
            status: RunStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            artifact_uri: dir.join("artifacts"),
        };
        let run = FileRun { dir, meta };
        run.write_meta()?;

        log::info!("Started run {} in experiment {:?}", run.meta.run_id, experiment);
        Ok(run)
    }

    /// Read back the metadata of a run
    pub fn load_meta(&self, experiment: &str, run_id: &str) -> Result<RunMeta> {
        let text = fs::read_to_string(self.root.join(experiment).join(run_id).join("meta.json"))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// An open run writing into its own directory
#[derive(Debug)]
pub struct FileRun {
    dir: PathBuf,
    meta: RunMeta,
}

impl FileRun {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Close the run with a terminal status
    pub fn end(mut self, status: RunStatus) -> Result<RunMeta> {
        self.meta.status = status;
        self.meta.end_time = Some(Utc::now());
        self.write_meta()?;
        log::info!("Run {} ended with status {}", self.meta.run_id, status);
        Ok(self.meta)
    }

    fn write_meta(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.meta)?;
        fs::write(self.dir.join("meta.json"), json)?;
        Ok(())
    }
}

impl Tracker for FileRun {
    fn run_id(&self) -> &str {
        &self.meta.run_id
    }

    fn log_param(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.dir.join("params").join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, value)?;
        Ok(())
    }

    fn log_metric(&mut self, key: &str, value: f64, step: u64) -> Result<()> {
        validate_key(key)?;
        let path = self.dir.join("metrics").join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{} {} {}", Utc::now().timestamp_millis(), value, step)?;
        log::debug!("metric {} = {}", key, value);
        Ok(())
    }

    fn set_tag(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.dir.join("tags").join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, value)?;
        Ok(())
    }

    fn log_artifact(&mut self, path: &str, contents: &[u8]) -> Result<()> {
        validate_key(path)?;
        let target = self.meta.artifact_uri.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, contents)?;
        Ok(())
    }
}
