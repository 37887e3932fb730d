//! diabetes-train - logistic regression training on tabular CSV data
//!
//! Loads every CSV file in a directory, holds out a test split, fits an
//! L2-regularised logistic regression and records accuracy/AUC to a
//! file-backed experiment tracker.

pub mod classifier;
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod split;
pub mod tracking;

pub use config::TrainConfig;
pub use error::{Result, TrainError};
pub use pipeline::{run, TrainReport};
