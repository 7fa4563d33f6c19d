//! Snapshot persistence contracts and implementations.
//!
//! # Responsibility
//! - Map a `YearMonth` slot to at most one stored `Snapshot`.
//! - Keep file layout and encoding details inside the store boundary.
//!
//! # Invariants
//! - `save` replaces the whole slot; readers never observe a partial write.
//! - `load` never fails: unreadable or corrupt slots read as absent.
//! - Slots are never deleted.

use crate::model::grid::YearMonth;
use crate::model::snapshot::Snapshot;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod file_store;
pub mod memory_store;

pub use file_store::FileSnapshotStore;
pub use memory_store::MemorySnapshotStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure for save/list operations and strict reads.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
    Corrupt {
        path: PathBuf,
        reason: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error at `{}`: {source}", path.display()),
            Self::Serialize(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Corrupt { path, reason } => {
                write!(f, "corrupt snapshot `{}`: {reason}", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Corrupt { .. } => None,
        }
    }
}

/// Slot-keyed snapshot storage.
pub trait SnapshotStore {
    /// Writes `snapshot` to the slot for `key`, replacing prior content.
    fn save(&mut self, key: YearMonth, snapshot: &Snapshot) -> StoreResult<()>;

    /// Returns the stored snapshot, or `None` when the slot is empty or unusable.
    fn load(&self, key: YearMonth) -> Option<Snapshot>;

    /// Lists keys that hold a snapshot, ascending.
    fn list_slots(&self) -> StoreResult<Vec<YearMonth>>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &mut S {
    fn save(&mut self, key: YearMonth, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(key, snapshot)
    }

    fn load(&self, key: YearMonth) -> Option<Snapshot> {
        (**self).load(key)
    }

    fn list_slots(&self) -> StoreResult<Vec<YearMonth>> {
        (**self).list_slots()
    }
}
