//! Configuration handling for diabetes-train

use std::path::PathBuf;

use crate::error::{Result, TrainError};

/// Output format for the training report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Default directory scanned for training CSVs
pub const DEFAULT_TRAINING_DATA: &str = "experimentation/data/";
/// Default label column
pub const DEFAULT_TARGET: &str = "Diabetic";

/// Configuration for a training run
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Directory holding the `*.csv` training files
    pub training_data: PathBuf,
    /// Regularization rate; the classifier uses `C = 1 / reg_rate`
    pub reg_rate: f64,
    /// Label column
    pub target: String,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Seed for the train/test shuffle
    pub random_state: u64,
    /// Solver iteration cap
    pub max_iter: usize,
    /// Solver stopping tolerance
    pub tol: f64,
    /// Root directory of the run store
    pub tracking_dir: PathBuf,
    /// Experiment the run is filed under
    pub experiment_name: String,
    /// Log estimator params, training metrics and the model on fit
    pub autolog: bool,
    /// Report format
    pub output_format: OutputFormat,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            training_data: PathBuf::from(DEFAULT_TRAINING_DATA),
            reg_rate: 0.01,
            target: DEFAULT_TARGET.to_string(),
            test_size: 0.2,
            random_state: 0,
            max_iter: 100,
            tol: 1e-4,
            tracking_dir: PathBuf::from("mlruns"),
            experiment_name: "Default".to_string(),
            autolog: true,
            output_format: OutputFormat::default(),
        }
    }
}

impl TrainConfig {
    /// Create a new config reading from the given data directory
    pub fn new(training_data: PathBuf) -> Self {
        Self {
            training_data,
            ..Default::default()
        }
    }

    pub fn with_reg_rate(mut self, reg_rate: f64) -> Self {
        self.reg_rate = reg_rate;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the run store root
    pub fn with_tracking_dir(mut self, dir: PathBuf) -> Self {
        self.tracking_dir = dir;
        self
    }

    pub fn with_experiment_name(mut self, name: impl Into<String>) -> Self {
        self.experiment_name = name.into();
        self
    }

    pub fn with_autolog(mut self, autolog: bool) -> Self {
        self.autolog = autolog;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.reg_rate.is_finite() && self.reg_rate > 0.0) {
            return Err(TrainError::InvalidParameter {
                name: "reg_rate",
                reason: format!("must be a positive number, got {}", self.reg_rate),
            });
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainError::InvalidParameter {
                name: "test_size",
                reason: format!("must be in (0, 1), got {}", self.test_size),
            });
        }
        if self.max_iter == 0 {
            return Err(TrainError::InvalidParameter {
                name: "max_iter",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.target.is_empty() {
            return Err(TrainError::InvalidParameter {
                name: "target",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
