//! CSV file reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, TrainError};
use crate::model::Frame;

/// Read a headed, comma-separated file into a numeric frame
pub fn read_csv(path: &Path) -> Result<Frame> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let csv_err = |source| TrainError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = csv_reader.headers().map_err(csv_err)?.clone();
    let mut frame = Frame::new(headers.iter());

    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        // +2 for 1-indexing and header
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(line_num + 2);

        if record.len() > headers.len() {
            return Err(TrainError::TooManyFields {
                path: path.to_path_buf(),
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }

        let mut cells = Vec::with_capacity(headers.len());
        for (idx, raw) in record.iter().enumerate() {
            let value = parse_cell_value(raw).ok_or_else(|| TrainError::NonNumeric {
                path: path.to_path_buf(),
                line,
                column: headers.get(idx).unwrap_or_default().to_string(),
                value: raw.to_string(),
            })?;
            cells.push(value);
        }

        // Short rows are padded with NaN
        frame.push_row(cells);
    }

    log::debug!(
        "Read {} rows x {} columns from {}",
        frame.row_count(),
        frame.column_count(),
        path.display()
    );

    Ok(frame)
}

/// Parse a cell as a number; missing markers become `NaN`
fn parse_cell_value(s: &str) -> Option<f64> {
    let trimmed = s.trim();

    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed == "NA"
    {
        return Some(f64::NAN);
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }

    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_cell_value() {
        assert!(parse_cell_value("").unwrap().is_nan());
        assert!(parse_cell_value("NA").unwrap().is_nan());
        assert_eq!(parse_cell_value("true"), Some(1.0));
        assert_eq!(parse_cell_value("42"), Some(42.0));
        assert_eq!(parse_cell_value(" 0.627 "), Some(0.627));
        assert_eq!(parse_cell_value("hello"), None);
    }

    #[test]
    fn test_read_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "PatientID,Age,Diabetic").unwrap();
        writeln!(file, "1354778,21,0").unwrap();
        writeln!(file, "1147438,43,1").unwrap();
        writeln!(file, "1640031,").unwrap();

        let frame = read_csv(file.path()).unwrap();
        assert_eq!(frame.row_count(), 3);
        assert_eq!(frame.column("Age").unwrap()[1], 43.0);
        assert!(frame.column("Diabetic").unwrap()[2].is_nan());
    }

    #[test]
    fn test_read_csv_rejects_text() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Age,Diabetic").unwrap();
        writeln!(file, "21,0").unwrap();
        writeln!(file, "old,1").unwrap();

        match read_csv(file.path()).unwrap_err() {
            TrainError::NonNumeric {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Age");
                assert_eq!(value, "old");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_csv_rejects_extra_fields() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Age,Diabetic").unwrap();
        writeln!(file, "21,0,999").unwrap();
        writeln!(file, "30,1").unwrap();

        match read_csv(file.path()).unwrap_err() {
            TrainError::TooManyFields {
                line,
                expected,
                found,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
