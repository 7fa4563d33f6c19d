//! Status line state.
//!
//! # Responsibility
//! - Describe what the front end should show in its status area.
//! - Restore the habit summary a fixed delay after a save notice.
//!
//! # Invariants
//! - A transient message is replaced by the habit summary once its deadline
//!   passes; any newer message replaces it earlier.

use crate::model::grid::{MonthGrid, YearMonth};
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Status text kinds shown by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Saved(YearMonth),
    SaveFailed,
    InvalidDate,
    InvalidInput,
    Habits(Vec<(usize, String)>),
    NoHabits,
    HabitAt {
        name: Option<String>,
        month: u32,
        day: u32,
    },
}

impl StatusMessage {
    /// Summary of the named habits in `grid`.
    pub fn habits_of(grid: &MonthGrid) -> Self {
        let habits: Vec<(usize, String)> = grid
            .habit_summary()
            .into_iter()
            .map(|(position, name)| (position, name.to_string()))
            .collect();
        if habits.is_empty() {
            Self::NoHabits
        } else {
            Self::Habits(habits)
        }
    }

    /// Hover text for one cell. Unnamed rows show only the date.
    pub fn cell(grid: &MonthGrid, row: usize, day: u32) -> Self {
        let name = grid
            .row(row)
            .ok()
            .filter(|habit| habit.is_named())
            .map(|habit| habit.name().trim().to_string());
        Self::HabitAt {
            name,
            month: grid.key().month(),
            day,
        }
    }
}

impl Display for StatusMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Saved(key) => write!(f, "Saved {} / {}", key.year(), key.month()),
            Self::SaveFailed => write!(f, "Failed to save data"),
            Self::InvalidDate => write!(f, "Invalid date. Please select again."),
            Self::InvalidInput => write!(f, "Invalid input. Please enter numbers."),
            Self::Habits(habits) => {
                let joined = habits
                    .iter()
                    .map(|(position, name)| format!("{position}: {name}"))
                    .collect::<Vec<_>>()
                    .join(" | ");
                write!(f, "Habits: {joined}")
            }
            Self::NoHabits => write!(f, "No habits set. Enter a habit name."),
            Self::HabitAt {
                name: Some(name),
                month,
                day,
            } => write!(f, "Habit: {name} - {month}/{day}"),
            Self::HabitAt {
                name: None,
                month,
                day,
            } => write!(f, "{month}/{day}"),
        }
    }
}

/// Current status message plus an optional restore deadline.
#[derive(Debug, Clone)]
pub struct StatusLine {
    message: StatusMessage,
    restore_at: Option<Instant>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: StatusMessage::NoHabits,
            restore_at: None,
        }
    }
}

impl StatusLine {
    /// Shows `message` until the next update.
    pub fn set(&mut self, message: StatusMessage) {
        self.message = message;
        self.restore_at = None;
    }

    /// Shows `message` until `delay` elapses, then the habit summary.
    pub fn set_transient(&mut self, message: StatusMessage, now: Instant, delay: Duration) {
        self.message = message;
        self.restore_at = Some(now + delay);
    }

    /// Message visible at `now` for `grid`.
    pub fn message_at(&self, grid: &MonthGrid, now: Instant) -> StatusMessage {
        match self.restore_at {
            Some(deadline) if now >= deadline => StatusMessage::habits_of(grid),
            _ => self.message.clone(),
        }
    }
}
