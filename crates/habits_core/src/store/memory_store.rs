//! In-process snapshot store.
//!
//! Used by tests and dry runs; holds snapshots in a `BTreeMap` so
//! `list_slots` comes back sorted. Can be told to fail writes to exercise the
//! save-failure path.

use super::{SnapshotStore, StoreError, StoreResult};
use crate::model::grid::YearMonth;
use crate::model::snapshot::Snapshot;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotStore {
    slots: BTreeMap<YearMonth, Snapshot>,
    fail_writes: bool,
    writes: usize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `save` fail with a permission error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Seeds a slot directly, bypassing write accounting.
    pub fn insert(&mut self, key: YearMonth, snapshot: Snapshot) {
        self.slots.insert(key, snapshot);
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&mut self, key: YearMonth, snapshot: &Snapshot) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Io {
                path: PathBuf::from(format!("memory:{key}")),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "writes disabled",
                ),
            });
        }
        self.slots.insert(key, snapshot.clone());
        self.writes += 1;
        Ok(())
    }

    fn load(&self, key: YearMonth) -> Option<Snapshot> {
        let snapshot = self.slots.get(&key)?;
        snapshot.check_for(key).ok()?;
        Some(snapshot.clone())
    }

    fn list_slots(&self) -> StoreResult<Vec<YearMonth>> {
        Ok(self.slots.keys().copied().collect())
    }
}
