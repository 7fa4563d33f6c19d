//! Habit calendar session.
//!
//! # Responsibility
//! - Own the single active `MonthGrid` and the store it is persisted to.
//! - Turn front-end actions (navigate, toggle, rename, save, close) into grid
//!   mutations followed by explicit saves.
//!
//! # Invariants
//! - Exactly one grid is active; it is replaced only by a valid navigation.
//! - Invalid navigation leaves the active grid and its key untouched.
//! - Save failures are reported through the status line and the return value,
//!   never by discarding in-memory state.

use crate::model::grid::{GridError, MonthGrid, YearMonth};
use crate::model::snapshot::Snapshot;
use crate::service::status::{StatusLine, StatusMessage};
use crate::store::{SnapshotStore, StoreResult};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Default time a save notice stays visible before the habit summary returns.
pub const DEFAULT_STATUS_RESTORE_DELAY: Duration = Duration::from_millis(1000);

pub type SessionResult<T> = Result<T, SessionError>;

/// Session-level error for rejected user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Navigation target outside the accepted year/month range.
    InvalidDate(GridError),
    /// Navigation input that is not a number.
    InvalidInput(String),
    /// Cell coordinates outside the active grid.
    Grid(GridError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(err) => write!(f, "invalid date: {err}"),
            Self::InvalidInput(value) => write!(f, "invalid input: `{value}` is not a number"),
            Self::Grid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::InvalidInput(_) => None,
            Self::Grid(err) => Some(err),
        }
    }
}

/// One user session over a snapshot store.
pub struct HabitSession<S: SnapshotStore> {
    store: S,
    active: MonthGrid,
    status: StatusLine,
    restore_delay: Duration,
}

impl<S: SnapshotStore> HabitSession<S> {
    /// Starts a session at `start`.
    ///
    /// This is the first load of the session, so nothing is persisted before
    /// the grid for `start` is read.
    pub fn open(store: S, start: YearMonth) -> Self {
        let active = hydrate(&store, start);
        let mut status = StatusLine::default();
        status.set(StatusMessage::habits_of(&active));
        info!("event=session_open module=session status=ok key={start}");
        Self {
            store,
            active,
            status,
            restore_delay: DEFAULT_STATUS_RESTORE_DELAY,
        }
    }

    /// Overrides how long save notices stay visible.
    pub fn with_restore_delay(mut self, delay: Duration) -> Self {
        self.restore_delay = delay;
        self
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.active
    }

    pub fn key(&self) -> YearMonth {
        self.active.key()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Switches the active grid to `(year, month)`.
    ///
    /// Persists the current grid first, then rebuilds from the stored
    /// snapshot or defaults.
    ///
    /// # Errors
    /// - `InvalidDate` when the target is out of range; nothing changes except
    ///   the status line.
    pub fn load_month(&mut self, year: i32, month: u32) -> SessionResult<&MonthGrid> {
        let key = match YearMonth::new(year, month) {
            Ok(key) => key,
            Err(err) => {
                warn!(
                    "event=month_load module=session status=rejected year={} month={} error={}",
                    year, month, err
                );
                self.status.set(StatusMessage::InvalidDate);
                return Err(SessionError::InvalidDate(err));
            }
        };

        let persisted = self.persist_active().is_ok();
        if !persisted {
            warn!(
                "event=month_load module=session status=unsaved_previous from={} to={}",
                self.active.key(),
                key
            );
        }

        self.active = hydrate(&self.store, key);
        if persisted {
            self.status.set(StatusMessage::habits_of(&self.active));
        }
        Ok(&self.active)
    }

    /// Parses raw selector text and navigates.
    ///
    /// # Errors
    /// - `InvalidInput` when either value is not an integer.
    /// - `InvalidDate` as for `load_month`.
    pub fn load_month_input(&mut self, year: &str, month: &str) -> SessionResult<&MonthGrid> {
        let year_value = year.trim().parse::<i32>();
        let month_value = month.trim().parse::<u32>();
        match (year_value, month_value) {
            (Ok(year), Ok(month)) => self.load_month(year, month),
            (Err(_), _) => Err(self.reject_input(year)),
            (_, Err(_)) => Err(self.reject_input(month)),
        }
    }

    /// Moves by `delta` months. Returns `false` when the move would leave the
    /// year range; nothing changes in that case.
    pub fn change_month(&mut self, delta: i32) -> SessionResult<bool> {
        match self.active.key().step_months(delta) {
            Some(target) => {
                self.load_month(target.year(), target.month())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Moves by `delta` years keeping the month. Same edge rule as
    /// `change_month`.
    pub fn change_year(&mut self, delta: i32) -> SessionResult<bool> {
        match self.active.key().step_years(delta) {
            Some(target) => {
                self.load_month(target.year(), target.month())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flips one day flag, persists, and returns the new value.
    ///
    /// A failed save does not undo the toggle; it is reported on the status
    /// line.
    pub fn toggle_day(&mut self, row: usize, day: u32) -> SessionResult<bool> {
        let value = self
            .active
            .toggle_day(row, day)
            .map_err(SessionError::Grid)?;
        debug!(
            "event=day_toggle module=session status=ok key={} row={} day={} value={}",
            self.active.key(),
            row,
            day,
            value
        );
        let _ = self.persist_active();
        Ok(value)
    }

    /// Renames one habit row and persists.
    pub fn rename_habit(&mut self, row: usize, name: impl Into<String>) -> SessionResult<()> {
        self.active
            .rename_habit(row, name)
            .map_err(SessionError::Grid)?;
        debug!(
            "event=habit_rename module=session status=ok key={} row={}",
            self.active.key(),
            row
        );
        let _ = self.persist_active();
        Ok(())
    }

    /// Serializes the active grid. No side effects.
    pub fn collect_snapshot(&self) -> Snapshot {
        self.active.to_snapshot()
    }

    /// Explicitly persists the active grid.
    pub fn save(&mut self) -> StoreResult<()> {
        self.persist_active()
    }

    /// Shows the hover text for a cell on the status line.
    pub fn describe_cell(&mut self, row: usize, day: u32) -> SessionResult<StatusMessage> {
        self.active.is_done(row, day).map_err(SessionError::Grid)?;
        let message = StatusMessage::cell(&self.active, row, day);
        self.status.set(message.clone());
        Ok(message)
    }

    /// Puts the habit summary back on the status line.
    pub fn show_habits(&mut self) {
        self.status.set(StatusMessage::habits_of(&self.active));
    }

    /// Status visible at `now`.
    pub fn status_at(&self, now: Instant) -> StatusMessage {
        self.status.message_at(&self.active, now)
    }

    pub fn status_text(&self) -> String {
        self.status_at(Instant::now()).to_string()
    }

    /// Ends the session with a best-effort save.
    pub fn close(mut self) -> StoreResult<()> {
        let result = self.persist_active();
        match &result {
            Ok(()) => info!(
                "event=session_close module=session status=ok key={}",
                self.active.key()
            ),
            Err(err) => warn!(
                "event=session_close module=session status=error key={} error={}",
                self.active.key(),
                err
            ),
        }
        result
    }

    fn persist_active(&mut self) -> StoreResult<()> {
        let key = self.active.key();
        let snapshot = self.active.to_snapshot();
        match self.store.save(key, &snapshot) {
            Ok(()) => {
                self.status.set_transient(
                    StatusMessage::Saved(key),
                    Instant::now(),
                    self.restore_delay,
                );
                Ok(())
            }
            Err(err) => {
                self.status.set(StatusMessage::SaveFailed);
                Err(err)
            }
        }
    }

    fn reject_input(&mut self, value: &str) -> SessionError {
        warn!(
            "event=month_load module=session status=rejected error_code=non_numeric input_len={}",
            value.len()
        );
        self.status.set(StatusMessage::InvalidInput);
        SessionError::InvalidInput(value.trim().to_string())
    }
}

fn hydrate<S: SnapshotStore>(store: &S, key: YearMonth) -> MonthGrid {
    match store.load(key) {
        Some(snapshot) => {
            info!("event=month_load module=session status=ok key={key} source=snapshot");
            MonthGrid::from_snapshot(key, &snapshot)
        }
        None => {
            info!("event=month_load module=session status=ok key={key} source=default");
            MonthGrid::empty(key)
        }
    }
}
