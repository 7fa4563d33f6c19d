//! File-backed snapshot store: one JSON file per month.
//!
//! # Responsibility
//! - Create the data directory on first use.
//! - Encode snapshots as JSON and replace slot files atomically.
//!
//! # Invariants
//! - Slot file names are `habits_{year}_{month:02}.json`.
//! - Writes go to a temp file in the same directory and are renamed into place.
//! - Read failures are logged and reported as absent by `load`.

use super::{SnapshotStore, StoreError, StoreResult};
use crate::model::grid::YearMonth;
use crate::model::snapshot::Snapshot;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

static SLOT_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^habits_(\d{4})_(\d{2})\.json$").expect("valid slot file regex"));

/// Snapshot store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Opens a store, creating `dir` (and parents) when missing.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| {
            error!(
                "event=store_open module=store status=error dir={} error={}",
                dir.display(),
                source
            );
            StoreError::Io {
                path: dir.clone(),
                source,
            }
        })?;
        info!(
            "event=store_open module=store status=ok dir={}",
            dir.display()
        );
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: YearMonth) -> PathBuf {
        self.dir.join(format!(
            "habits_{}_{:02}.json",
            key.year(),
            key.month()
        ))
    }

    /// Reads a slot, surfacing every failure.
    ///
    /// Returns `Ok(None)` only when the slot file does not exist.
    pub fn try_load(&self, key: YearMonth) -> StoreResult<Option<Snapshot>> {
        let path = self.slot_path(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|err| StoreError::Corrupt {
                path: path.clone(),
                reason: err.to_string(),
            })?;
        snapshot
            .check_for(key)
            .map_err(|reason| StoreError::Corrupt { path, reason })?;
        Ok(Some(snapshot))
    }

    fn write_slot(&self, path: &Path, snapshot: &Snapshot) -> StoreResult<()> {
        let encoded = serde_json::to_vec_pretty(snapshot).map_err(StoreError::Serialize)?;
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        temp.write_all(&encoded).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&mut self, key: YearMonth, snapshot: &Snapshot) -> StoreResult<()> {
        let started_at = Instant::now();
        let path = self.slot_path(key);
        match self.write_slot(&path, snapshot) {
            Ok(()) => {
                info!(
                    "event=snapshot_save module=store status=ok key={} rows={} duration_ms={}",
                    key,
                    snapshot.rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=snapshot_save module=store status=error key={} duration_ms={} error={}",
                    key,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn load(&self, key: YearMonth) -> Option<Snapshot> {
        match self.try_load(key) {
            Ok(Some(snapshot)) => {
                info!(
                    "event=snapshot_load module=store status=ok key={} rows={}",
                    key,
                    snapshot.rows.len()
                );
                Some(snapshot)
            }
            Ok(None) => {
                info!("event=snapshot_load module=store status=absent key={key}");
                None
            }
            Err(err) => {
                error!(
                    "event=snapshot_load module=store status=error key={} error_code=slot_unreadable error={}",
                    key, err
                );
                None
            }
        }
    }

    fn list_slots(&self) -> StoreResult<Vec<YearMonth>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(captures) = SLOT_FILE_RE.captures(name) else {
                continue;
            };
            let parsed = captures[1]
                .parse::<i32>()
                .ok()
                .zip(captures[2].parse::<u32>().ok());
            match parsed.and_then(|(year, month)| YearMonth::new(year, month).ok()) {
                Some(key) => keys.push(key),
                None => warn!(
                    "event=slot_list module=store status=skipped file={} reason=out_of_range",
                    name
                ),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::FileSnapshotStore;
    use crate::model::grid::YearMonth;

    #[test]
    fn slot_path_zero_pads_month() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::open(dir.path()).unwrap();
        let path = store.slot_path(YearMonth::new(2025, 5).unwrap());
        assert_eq!(path, dir.path().join("habits_2025_05.json"));
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("data");
        let store = FileSnapshotStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }
}
