//! Write snapshot JSON files.
//!
//! Snapshot JSON is the "portable" representation of one dashboard view:
//! current readings, estimates, statistics, and every aligned history series.
//! The schema is `DashboardSnapshot` wrapped with a tool tag.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::snapshot::DashboardSnapshot;

#[derive(Debug, Serialize)]
struct SnapshotFile<'a> {
    tool: &'static str,
    snapshot: &'a DashboardSnapshot,
}

/// Write a snapshot JSON file.
pub fn write_snapshot_json(path: &Path, snapshot: &DashboardSnapshot) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create snapshot JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &SnapshotFile { tool: "rates", snapshot })
        .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}
