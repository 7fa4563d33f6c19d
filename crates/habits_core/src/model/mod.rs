//! Habit calendar domain model.
//!
//! # Responsibility
//! - Define the month grid used by sessions and its persisted snapshot shape.
//! - Keep calendar arithmetic (month lengths, weekdays, stepping) in one place.
//!
//! # Invariants
//! - Grid shape is derived from the key, never from stored data.

pub mod grid;
pub mod snapshot;
