//! Core domain logic for the habit calendar.
//! This crate is the single source of truth for grid invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::TrackerConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::grid::{
    days_in_month, GridError, HabitRow, MonthGrid, YearMonth, MAX_HABITS, YEAR_MAX, YEAR_MIN,
};
pub use model::snapshot::{Snapshot, SnapshotRow, SNAPSHOT_VERSION};
pub use service::session::{HabitSession, SessionError, SessionResult};
pub use service::status::StatusMessage;
pub use store::{
    FileSnapshotStore, MemorySnapshotStore, SnapshotStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
