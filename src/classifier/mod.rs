//! Binary classifiers

mod linalg;
mod logistic;

pub use logistic::{LogisticModel, LogisticRegression};
