//! Export the `(n, best_g)` dataset to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::SamplePoint;
use crate::error::AppError;

/// Write the dataset to a CSV file with header `n,best_g`.
pub fn write_dataset_csv(path: &Path, points: &[SamplePoint]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::invalid(format!("Failed to create dataset CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);

    writeln!(out, "n,best_g")
        .map_err(|e| AppError::invalid(format!("Failed to write dataset CSV header: {e}")))?;
    for p in points {
        writeln!(out, "{},{}", p.n, p.best_g)
            .map_err(|e| AppError::invalid(format!("Failed to write dataset CSV row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::invalid(format!("Failed to flush dataset CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = points.len(), "wrote dataset CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let path = std::env::temp_dir().join(format!("gridfit-dataset-{}.csv", std::process::id()));
        let points = [
            SamplePoint { n: 2, best_g: 2 },
            SamplePoint { n: 1000, best_g: 10 },
        ];
        write_dataset_csv(&path, &points).unwrap();
        let txt = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(txt, "n,best_g\n2,2\n1000,10\n");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let path = std::env::temp_dir().join("gridfit-no-such-dir").join("out.csv");
        let err = write_dataset_csv(&path, &[]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
