//! Feature/target pairs used for fitting and evaluation

use serde::Serialize;

use crate::error::{Result, TrainError};

use super::Frame;

/// Feature matrix with a row-aligned target vector
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Frame,
    pub target: Vec<f64>,
}

impl Dataset {
    /// Pair a feature frame with its labels
    pub fn new(features: Frame, target: Vec<f64>) -> Result<Self> {
        if features.row_count() != target.len() {
            return Err(TrainError::DimensionMismatch {
                expected: features.row_count(),
                found: target.len(),
            });
        }
        Ok(Self { features, target })
    }

    /// Split `target` off `frame`
    pub fn from_frame(frame: &Frame, target: &str) -> Result<Self> {
        let (features, labels) = frame.pop_column(target)?;
        Self::new(features, labels)
    }

    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Select rows by position
    pub fn take(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.take_rows(indices),
            target: indices.iter().map(|&i| self.target[i]).collect(),
        }
    }
}

/// Row counts of a train/test split, as reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SplitSizes {
    pub train: usize,
    pub test: usize,
}

/// Training and held-out partitions
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Split {
    pub fn sizes(&self) -> SplitSizes {
        SplitSizes {
            train: self.train.len(),
            test: self.test.len(),
        }
    }
}
