//! Export the merged series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per merged point, empty cells for gaps.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::CombinedPoint;
use crate::error::AppError;
use crate::series::format::format_instant;

/// Write merged points to a CSV file.
pub fn write_points_csv(path: &Path, points: &[CombinedPoint]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::validation(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "timestamp_ms,instant,observed_kwh,forecast_kwh")
        .map_err(|e| AppError::validation(format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        writeln!(
            file,
            "{},{},{},{}",
            p.timestamp_ms,
            format_instant(p.timestamp_ms as f64),
            p.observed.map(|v| format!("{v:.3}")).unwrap_or_default(),
            p.forecast.map(|v| format!("{v:.3}")).unwrap_or_default(),
        )
        .map_err(|e| AppError::validation(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}
