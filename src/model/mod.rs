//! Data model for in-memory training data

mod dataset;
mod frame;

pub use dataset::{Dataset, Split, SplitSizes};
pub use frame::Frame;
