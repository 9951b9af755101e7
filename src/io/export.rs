//! Export dated history to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! One row per 10-year yield date; `actual_30y` is blank where no weekly
//! average was published that day.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::snapshot::{DashboardSnapshot, ExportRow};

/// Write the snapshot's history rows to a CSV file.
pub fn write_history_csv(path: &Path, snapshot: &DashboardSnapshot) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_rows_csv(file, &snapshot.export_rows())
}

/// Write rows with a header to any writer.
pub fn write_rows_csv<W: Write>(writer: W, rows: &[ExportRow]) -> Result<(), AppError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    csv.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn blank_cell_for_missing_actual() {
        let date = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        let rows = [
            ExportRow {
                date: date(8),
                treasury_10y: 4.1,
                estimated_30y: 5.9,
                actual_30y: None,
            },
            ExportRow {
                date: date(9),
                treasury_10y: 4.3,
                estimated_30y: 6.1,
                actual_30y: Some(6.93),
            },
        ];

        let mut buf = Vec::new();
        write_rows_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,treasury_10y,estimated_30y,actual_30y\n\
             2025-01-08,4.1,5.9,\n\
             2025-01-09,4.3,6.1,6.93\n"
        );
    }
}
