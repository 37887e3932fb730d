//! Discovery and loading of training CSV files

mod csv;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Result, TrainError};
use crate::model::Frame;

pub use self::csv::read_csv;

/// List the `*.csv` files directly inside `dir`, sorted by path.
///
/// Hidden files are skipped, matching shell glob behaviour.
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        let is_csv = path.extension().and_then(|e| e.to_str()) == Some("csv");
        if is_csv && !is_hidden && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every CSV file in `path` and stack them into one frame.
///
/// Fails if the path does not exist or holds no CSV files. Columns are
/// aligned by name across files.
pub fn get_csvs_df(path: &Path) -> Result<Frame> {
    if !path.exists() {
        return Err(TrainError::PathNotFound(path.display().to_string()));
    }

    let csv_files = if path.is_dir() {
        find_csv_files(path)?
    } else {
        Vec::new()
    };
    if csv_files.is_empty() {
        return Err(TrainError::NoCsvFiles(path.display().to_string()));
    }

    log::info!(
        "Loading {} CSV file(s) from {}",
        csv_files.len(),
        path.display()
    );

    let frames = csv_files
        .par_iter()
        .map(|file| read_csv(file))
        .collect::<Result<Vec<Frame>>>()?;

    let df = Frame::concat(&frames);
    log::info!(
        "Loaded {} rows x {} columns",
        df.row_count(),
        df.column_count()
    );
    Ok(df)
}
