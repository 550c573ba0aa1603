//! Read/write fitted formulas as JSON.
//!
//! A fits file is the portable record of one run:
//! - the sampling plan and log-base bounds it was produced with
//! - every fitted formula with its quality diagnostics
//! - which formula won the BIC ranking
//!
//! The schema is defined by `domain::FitsFile`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitsFile, LogBounds, SamplePlan};
use crate::error::AppError;
use crate::fit::FitSelection;

/// Build the serializable record for a fit run.
pub fn fits_file(selection: &FitSelection, plan: &SamplePlan, log_bounds: &LogBounds) -> FitsFile {
    FitsFile {
        tool: "gridfit".to_string(),
        generated_at: Utc::now(),
        plan: plan.clone(),
        log_bounds: *log_bounds,
        best: selection.best.formula.kind,
        fits: selection.fits.clone(),
    }
}

/// Write a fits JSON file.
pub fn write_fits_json(path: &Path, file: &FitsFile) -> Result<(), AppError> {
    let out = File::create(path).map_err(|e| {
        AppError::invalid(format!("Failed to create fits JSON '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(out);

    serde_json::to_writer_pretty(&mut out, file)
        .map_err(|e| AppError::invalid(format!("Failed to write fits JSON: {e}")))?;
    out.flush()
        .map_err(|e| AppError::invalid(format!("Failed to flush fits JSON: {e}")))?;

    tracing::info!(path = %path.display(), fits = file.fits.len(), "wrote fits JSON");
    Ok(())
}

/// Read a fits JSON file.
pub fn read_fits_json(path: &Path) -> Result<FitsFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid(format!("Failed to open fits JSON '{}': {e}", path.display()))
    })?;
    let fits: FitsFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::invalid(format!("Invalid fits JSON: {e}")))?;
    if fits.fits.is_empty() {
        return Err(AppError::invalid(format!(
            "Fits JSON '{}' contains no fits.",
            path.display()
        )));
    }
    Ok(fits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, SampleRange};
    use crate::fit::fit_all;
    use crate::search::find_line_with;

    #[test]
    fn fits_file_survives_disk() {
        let plan = SamplePlan {
            ranges: vec![SampleRange::new(2, 200, 1).unwrap()],
        };
        let bounds = LogBounds::default();
        let selection = fit_all(&find_line_with(&plan), &bounds).unwrap();
        let record = fits_file(&selection, &plan, &bounds);

        let path = std::env::temp_dir().join(format!("gridfit-fits-{}.json", std::process::id()));
        write_fits_json(&path, &record).unwrap();
        let loaded = read_fits_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.tool, "gridfit");
        assert_eq!(loaded.plan, plan);
        assert_eq!(loaded.best, selection.best.formula.kind);
        assert_eq!(loaded.fits.len(), 4);
        let log = loaded.fits.iter().find(|f| f.formula.kind == ModelKind::Log).unwrap();
        let live = selection.get(ModelKind::Log).unwrap();
        for (a, b) in log.formula.params.iter().zip(&live.formula.params) {
            assert!((a - b).abs() <= 1e-12 * b.abs().max(1.0), "{a} vs {b}");
        }
    }

    #[test]
    fn rejects_garbage() {
        let path = std::env::temp_dir()
            .join(format!("gridfit-garbage-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_fits_json(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().starts_with("Invalid fits JSON"));
    }

    fn small_record() -> FitsFile {
        let plan = SamplePlan {
            ranges: vec![SampleRange::new(2, 60, 1).unwrap()],
        };
        let bounds = LogBounds::default();
        let selection = fit_all(&find_line_with(&plan), &bounds).unwrap();
        fits_file(&selection, &plan, &bounds)
    }

    #[test]
    fn rejects_plan_that_fails_range_checks() {
        let json = serde_json::to_string(&small_record()).unwrap();
        assert!(json.contains(r#""start":2"#));

        let path = std::env::temp_dir()
            .join(format!("gridfit-bad-plan-{}.json", std::process::id()));
        std::fs::write(&path, json.replace(r#""start":2"#, r#""start":0"#)).unwrap();
        let err = read_fits_json(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("start must be >= 1"), "{}", err.message());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_reports_full_disk() {
        let err = write_fits_json(Path::new("/dev/full"), &small_record()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
