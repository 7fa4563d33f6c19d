//! Persisted snapshot of one month grid.
//!
//! # Responsibility
//! - Define the versioned record written to a store slot.
//! - Reject records this build cannot interpret.
//!
//! # Invariants
//! - `version` is written as `SNAPSHOT_VERSION`.
//! - A snapshot belongs to exactly one `(year, month)` slot.

use super::grid::YearMonth;
use serde::{Deserialize, Serialize};

/// Format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a `MonthGrid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub rows: Vec<SnapshotRow>,
}

/// One habit row as stored. Missing fields read as defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub days: Vec<bool>,
}

impl Snapshot {
    /// Creates a current-version snapshot for `key`.
    pub fn new(key: YearMonth, rows: Vec<SnapshotRow>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            year: key.year(),
            month: key.month(),
            rows,
        }
    }

    /// Checks that this snapshot can be loaded into the slot `key`.
    ///
    /// Returns a human-readable reason on mismatch.
    pub fn check_for(&self, key: YearMonth) -> Result<(), String> {
        if self.version == 0 || self.version > SNAPSHOT_VERSION {
            return Err(format!(
                "unsupported snapshot version {} (supported: 1..={SNAPSHOT_VERSION})",
                self.version
            ));
        }
        if self.year != key.year() || self.month != key.month() {
            return Err(format!(
                "snapshot is for {:04}-{:02}, slot is {key}",
                self.year, self.month
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Snapshot, SNAPSHOT_VERSION};
    use crate::model::grid::YearMonth;

    #[test]
    fn check_for_rejects_future_version_and_foreign_key() {
        let key = YearMonth::new(2024, 2).unwrap();
        let mut snapshot = Snapshot::new(key, Vec::new());
        assert!(snapshot.check_for(key).is_ok());

        let other = YearMonth::new(2024, 3).unwrap();
        let err = snapshot.check_for(other).unwrap_err();
        assert!(err.contains("2024-02"), "unexpected reason: {err}");

        snapshot.version = SNAPSHOT_VERSION + 1;
        let err = snapshot.check_for(key).unwrap_err();
        assert!(err.contains("unsupported"), "unexpected reason: {err}");
    }

    #[test]
    fn missing_rows_and_fields_deserialize_as_defaults() {
        let value = serde_json::json!({
            "version": 1,
            "year": 2025,
            "month": 5,
            "rows": [{ "name": "Exercise" }, {}]
        });
        let snapshot: Snapshot = serde_json::from_value(value).unwrap();
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.rows[0].name, "Exercise");
        assert!(snapshot.rows[0].days.is_empty());
        assert_eq!(snapshot.rows[1].name, "");
    }
}
