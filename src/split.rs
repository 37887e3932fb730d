//! Seeded train/test partitioning

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Result, TrainError};
use crate::model::{Dataset, Split};

/// Number of (train, test) rows for `n` samples.
///
/// The test partition is rounded up, the train partition gets the rest.
pub fn split_sizes(n: usize, test_size: f64) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TrainError::InvalidParameter {
            name: "test_size",
            reason: format!("must be in (0, 1), got {}", test_size),
        });
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    let empty = match (n_train, n_test) {
        (0, 0) => Some("train and test sets"),
        (0, _) => Some("train set"),
        (_, 0) => Some("test set"),
        _ => None,
    };
    if let Some(partition) = empty {
        return Err(TrainError::EmptyData(format!(
            "with n_samples={} and test_size={}, the resulting {} would be empty",
            n, test_size, partition
        )));
    }
    Ok((n_train, n_test))
}

/// Shuffle rows with a seeded generator and cut off the test partition
pub fn train_test_split(data: &Dataset, test_size: f64, seed: u64) -> Result<Split> {
    let (n_train, n_test) = split_sizes(data.len(), test_size)?;

    let mut permutation: Vec<usize> = (0..data.len()).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let (test_idx, train_idx) = permutation.split_at(n_test);
    debug_assert_eq!(train_idx.len(), n_train);

    log::debug!("Split {} rows into {} train / {} test", data.len(), n_train, n_test);

    Ok(Split {
        train: data.take(train_idx),
        test: data.take(test_idx),
    })
}
