use std::path::Path;

use serde::Deserialize;

use super::snapshot::FilterSnapshot;
use super::{CheckOutcome, SpatialFilter};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a filter snapshot.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – the snapshot written by the filter tool
pub fn load_filter(path: &Path) -> Result<FilterSnapshot> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        other => Err(Error::InvalidFilter(format!(
            "unsupported snapshot extension: .{other}"
        ))),
    }
}

/// Write a snapshot as pretty JSON.
pub fn save_filter(snapshot: &FilterSnapshot, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, text)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON snapshot
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// {
///   "num_cells": 65536,
///   "num_hashes": 3,
///   "num_areas": 4,
///   "members": 100,
///   "area_members": [40, 30, 20, 10],
///   "area_cells": [110, 85, 58, 30],
///   "area_self_collisions": [0, 1, 0, 0],
///   "insert_file_list": ["cities.csv"],
///   "check_logs": { "cities.csv": "cities.check.csv" }
/// }
/// ```
fn load_json(path: &Path) -> Result<FilterSnapshot> {
    let text = std::fs::read_to_string(path)?;
    let snapshot: FilterSnapshot = serde_json::from_str(&text)?;
    snapshot.check_consistency()?;
    log::info!(
        "Loaded filter with {} areas and {} members from {}",
        snapshot.num_areas,
        snapshot.members,
        path.display()
    );
    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// CSV check logs
// ---------------------------------------------------------------------------

/// One row of a check log.
///
/// `expected` is empty for non-member elements, `reported` is 0 when the
/// filter did not report any area.
#[derive(Debug, Deserialize)]
struct CheckRecord {
    expected: Option<usize>,
    reported: usize,
}

/// Read a check log: header row `expected,reported`, one row per element.
pub fn load_check_log(path: &Path) -> Result<Vec<CheckOutcome>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::CheckLog {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut outcomes = Vec::new();
    for (row_no, result) in reader.deserialize::<CheckRecord>().enumerate() {
        let record = result.map_err(|e| Error::CheckLog {
            path: path.to_path_buf(),
            message: format!("row {row_no}: {e}"),
        })?;
        outcomes.push(CheckOutcome::classify(record.expected, record.reported));
    }
    log::debug!("{} check outcomes read from {}", outcomes.len(), path.display());
    Ok(outcomes)
}
