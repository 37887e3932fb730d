//! Numeric in-memory table

use indexmap::IndexMap;

use crate::error::{Result, TrainError};

/// A row-major table of `f64` cells with named columns.
///
/// Missing cells are stored as `NaN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Column name -> position, in column order
    columns: IndexMap<String, usize>,
    /// Cell values, one vector per row
    rows: Vec<Vec<f64>>,
}

impl Frame {
    /// Create an empty frame with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = IndexMap::new();
        for name in columns {
            let name = name.into();
            // duplicate headers become "name.1", "name.2", ...
            let mut unique = name.clone();
            let mut suffix = 1;
            while index.contains_key(&unique) {
                unique = format!("{}.{}", name, suffix);
                suffix += 1;
            }
            let next = index.len();
            index.insert(unique, next);
        }
        Self {
            columns: index,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with `NaN` or truncating to the column count
    pub fn push_row(&mut self, mut cells: Vec<f64>) {
        cells.resize(self.column_count(), f64::NAN);
        self.rows.push(cells);
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Values of a single column
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| TrainError::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Split a column off the frame, returning the remaining frame and the column values
    pub fn pop_column(&self, name: &str) -> Result<(Frame, Vec<f64>)> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| TrainError::MissingColumn(name.to_string()))?;

        let remaining = Frame::new(self.column_names().filter(|c| *c != name));
        let mut values = Vec::with_capacity(self.rows.len());
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            values.push(row[idx]);
            let mut kept = row.clone();
            kept.remove(idx);
            rows.push(kept);
        }

        Ok((
            Frame {
                columns: remaining.columns,
                rows,
            },
            values,
        ))
    }

    /// Select rows by position, in the given order
    pub fn take_rows(&self, indices: &[usize]) -> Frame {
        Frame {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// First column holding a `NaN`, if any
    pub fn first_missing_column(&self) -> Option<&str> {
        let names: Vec<&str> = self.column_names().collect();
        self.rows
            .iter()
            .find_map(|row| row.iter().position(|v| v.is_nan()))
            .map(|idx| names[idx])
    }

    /// Stack frames vertically.
    ///
    /// Columns are the union of all inputs in first-seen order; cells a frame
    /// lacks are filled with `NaN`.
    pub fn concat<'a, I>(frames: I) -> Frame
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        let frames: Vec<&Frame> = frames.into_iter().collect();
        let mut out = Frame::default();
        for name in frames.iter().flat_map(|f| f.column_names()) {
            if !out.columns.contains_key(name) {
                let next = out.columns.len();
                out.columns.insert(name.to_string(), next);
            }
        }

        for frame in frames {
            let mapping: Vec<usize> = frame
                .column_names()
                .map(|name| out.columns[name])
                .collect();
            for row in &frame.rows {
                let mut cells = vec![f64::NAN; out.column_count()];
                for (src, &dst) in mapping.iter().enumerate() {
                    cells[dst] = row[src];
                }
                out.rows.push(cells);
            }
        }

        out
    }
}
