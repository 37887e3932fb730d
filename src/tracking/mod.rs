//! Experiment tracking: params, metrics, tags and artifacts per run

mod autolog;
mod store;

use indexmap::IndexMap;

use crate::error::{Result, TrainError};

pub use autolog::{training_metrics, Autolog};
pub use store::{FileRun, FileStore, RunMeta, RunStatus};

/// Sink for everything recorded during a run
pub trait Tracker {
    /// Identifier of the active run
    fn run_id(&self) -> &str;

    fn log_param(&mut self, key: &str, value: &str) -> Result<()>;

    fn log_metric(&mut self, key: &str, value: f64, step: u64) -> Result<()>;

    fn set_tag(&mut self, key: &str, value: &str) -> Result<()>;

    /// Store `contents` under `path`, relative to the run's artifact root
    fn log_artifact(&mut self, path: &str, contents: &[u8]) -> Result<()>;

    /// Log several metrics at step 0
    fn log_metrics(&mut self, metrics: &IndexMap<String, f64>) -> Result<()> {
        for (key, value) in metrics {
            self.log_metric(key, *value, 0)?;
        }
        Ok(())
    }

    /// Log several params
    fn log_params(&mut self, params: &IndexMap<&'static str, String>) -> Result<()> {
        for (key, value) in params {
            self.log_param(key, value)?;
        }
        Ok(())
    }
}

/// Keys become file names inside the run directory; keep them tame
pub fn validate_key(key: &str) -> Result<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ' ' | '/');
    let bad_component = key
        .split('/')
        .any(|part| part.is_empty() || part == "." || part == "..");
    if key.is_empty() || !key.chars().all(allowed) || bad_component {
        return Err(TrainError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("acc").is_ok());
        assert!(validate_key("training_roc_auc").is_ok());
        assert!(validate_key("model/model.json").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("/abs").is_err());
        assert!(validate_key("a\\b").is_err());
    }
}
