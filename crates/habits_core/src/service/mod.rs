//! Session services over the habit grid.
//!
//! # Responsibility
//! - Orchestrate grid mutations and store calls into user-level actions.
//! - Keep front ends decoupled from snapshot storage details.

pub mod session;
pub mod status;
