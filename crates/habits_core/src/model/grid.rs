//! Month grid domain model.
//!
//! # Responsibility
//! - Define the slot key (`YearMonth`) and its accepted range.
//! - Own one month of habit rows and their per-day completion flags.
//!
//! # Invariants
//! - A grid always has exactly `MAX_HABITS` rows.
//! - Every row carries exactly `days_in_month(year, month)` flags.
//! - Flags are kept for rows without a name.
//!
//! # See also
//! - `model::snapshot` for the persisted shape.

use super::snapshot::{Snapshot, SnapshotRow};
use chrono::{Datelike, NaiveDate, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of habit slots in every grid, named or not.
pub const MAX_HABITS: usize = 10;
/// First selectable year (inclusive).
pub const YEAR_MIN: i32 = 2020;
/// Last selectable year (inclusive).
pub const YEAR_MAX: i32 = 2025;

/// Validation error for grid keys and cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    YearOutOfRange(i32),
    MonthOutOfRange(u32),
    RowOutOfRange(usize),
    DayOutOfRange { day: u32, days_in_month: u32 },
}

impl Display for GridError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearOutOfRange(year) => {
                write!(f, "year {year} is outside {YEAR_MIN}..={YEAR_MAX}")
            }
            Self::MonthOutOfRange(month) => write!(f, "month {month} is outside 1..=12"),
            Self::RowOutOfRange(row) => {
                write!(f, "habit row {row} is outside 0..{MAX_HABITS}")
            }
            Self::DayOutOfRange { day, days_in_month } => {
                write!(f, "day {day} is outside 1..={days_in_month}")
            }
        }
    }
}

impl Error for GridError {}

/// Returns the number of days in a Gregorian month, or 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

/// Slot key: one calendar month inside the selectable year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Validates and builds a key.
    ///
    /// # Errors
    /// - `YearOutOfRange` when `year` is outside `YEAR_MIN..=YEAR_MAX`.
    /// - `MonthOutOfRange` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Result<Self, GridError> {
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            return Err(GridError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(GridError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Builds the nearest valid key, pulling `year` and `month` into range.
    ///
    /// Years before the range land on January of `YEAR_MIN`, years after it
    /// on December of `YEAR_MAX`.
    pub fn clamped(year: i32, month: u32) -> Self {
        if year < YEAR_MIN {
            return Self {
                year: YEAR_MIN,
                month: 1,
            };
        }
        if year > YEAR_MAX {
            return Self {
                year: YEAR_MAX,
                month: 12,
            };
        }
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn days_in_month(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Moves by `delta` months, wrapping across year boundaries.
    ///
    /// Returns `None` when the result would leave the year range.
    pub fn step_months(self, delta: i32) -> Option<Self> {
        let index = self.year * 12 + self.month as i32 - 1 + delta;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        Self::new(year, month).ok()
    }

    /// Moves by `delta` years keeping the month.
    pub fn step_years(self, delta: i32) -> Option<Self> {
        Self::new(self.year + delta, self.month).ok()
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One habit slot: a name and one completion flag per day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitRow {
    name: String,
    days: Vec<bool>,
}

impl HabitRow {
    fn empty(days_in_month: u32) -> Self {
        Self {
            name: String::new(),
            days: vec![false; days_in_month as usize],
        }
    }

    fn from_snapshot_row(row: &SnapshotRow, days_in_month: u32) -> Self {
        let mut days = vec![false; days_in_month as usize];
        for (slot, flag) in days.iter_mut().zip(row.days.iter()) {
            *slot = *flag;
        }
        Self {
            name: row.name.clone(),
            days,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flags indexed from day 1 at position 0.
    pub fn days(&self) -> &[bool] {
        &self.days
    }

    /// Whether the row names a habit; blank or whitespace-only names do not.
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// In-memory state for one displayed month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    key: YearMonth,
    rows: Vec<HabitRow>,
}

impl MonthGrid {
    /// Creates a grid with `MAX_HABITS` unnamed rows and every flag cleared.
    pub fn empty(key: YearMonth) -> Self {
        let days = key.days_in_month();
        Self {
            key,
            rows: (0..MAX_HABITS).map(|_| HabitRow::empty(days)).collect(),
        }
    }

    /// Rehydrates a grid from a snapshot.
    ///
    /// Rows and days present in the snapshot are copied; missing ones take
    /// defaults and surplus ones are dropped, so grid invariants hold for any
    /// snapshot shape.
    pub fn from_snapshot(key: YearMonth, snapshot: &Snapshot) -> Self {
        let days = key.days_in_month();
        let rows = (0..MAX_HABITS)
            .map(|index| match snapshot.rows.get(index) {
                Some(row) => HabitRow::from_snapshot_row(row, days),
                None => HabitRow::empty(days),
            })
            .collect();
        Self { key, rows }
    }

    pub fn key(&self) -> YearMonth {
        self.key
    }

    pub fn days_in_month(&self) -> u32 {
        self.key.days_in_month()
    }

    pub fn rows(&self) -> &[HabitRow] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Result<&HabitRow, GridError> {
        self.rows.get(row).ok_or(GridError::RowOutOfRange(row))
    }

    /// Returns the flag for `day` (1-based) of `row` (0-based).
    pub fn is_done(&self, row: usize, day: u32) -> Result<bool, GridError> {
        let index = self.day_index(day)?;
        Ok(self.row(row)?.days[index])
    }

    /// Flips one flag and returns its new value.
    ///
    /// The grid is untouched when either coordinate is out of range.
    pub fn toggle_day(&mut self, row: usize, day: u32) -> Result<bool, GridError> {
        let index = self.day_index(day)?;
        let habit = self
            .rows
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange(row))?;
        let flag = &mut habit.days[index];
        *flag = !*flag;
        Ok(*flag)
    }

    /// Replaces a row name. Flags are unaffected.
    pub fn rename_habit(&mut self, row: usize, name: impl Into<String>) -> Result<(), GridError> {
        let habit = self
            .rows
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange(row))?;
        habit.name = name.into();
        Ok(())
    }

    /// Lists named habits as `(1-based position, trimmed name)`.
    pub fn habit_summary(&self) -> Vec<(usize, &str)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_named())
            .map(|(index, row)| (index + 1, row.name.trim()))
            .collect()
    }

    /// Number of marked days in a row.
    pub fn completed_days(&self, row: usize) -> Result<usize, GridError> {
        Ok(self.row(row)?.days.iter().filter(|flag| **flag).count())
    }

    /// Weekday of `day` in this grid's month.
    pub fn weekday(&self, day: u32) -> Result<Weekday, GridError> {
        self.day_index(day)?;
        NaiveDate::from_ymd_opt(self.key.year, self.key.month, day)
            .map(|date| date.weekday())
            .ok_or(GridError::DayOutOfRange {
                day,
                days_in_month: self.days_in_month(),
            })
    }

    /// Serializes the current state. Pure read.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.key,
            self.rows
                .iter()
                .map(|row| SnapshotRow {
                    name: row.name.clone(),
                    days: row.days.clone(),
                })
                .collect(),
        )
    }

    fn day_index(&self, day: u32) -> Result<usize, GridError> {
        let days_in_month = self.days_in_month();
        if day == 0 || day > days_in_month {
            return Err(GridError::DayOutOfRange { day, days_in_month });
        }
        Ok((day - 1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, GridError, MonthGrid, YearMonth, MAX_HABITS};
    use chrono::Weekday;

    #[test]
    fn days_in_month_follows_gregorian_leap_rules() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn year_month_rejects_out_of_range_values() {
        assert_eq!(
            YearMonth::new(2019, 5).unwrap_err(),
            GridError::YearOutOfRange(2019)
        );
        assert_eq!(
            YearMonth::new(2026, 5).unwrap_err(),
            GridError::YearOutOfRange(2026)
        );
        assert_eq!(
            YearMonth::new(2025, 0).unwrap_err(),
            GridError::MonthOutOfRange(0)
        );
        assert_eq!(
            YearMonth::new(2025, 13).unwrap_err(),
            GridError::MonthOutOfRange(13)
        );
    }

    #[test]
    fn step_months_wraps_years_and_stops_at_range_edges() {
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.step_months(-1), Some(YearMonth::new(2023, 12).unwrap()));
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.step_months(1), Some(YearMonth::new(2025, 1).unwrap()));

        assert_eq!(YearMonth::new(2020, 1).unwrap().step_months(-1), None);
        assert_eq!(YearMonth::new(2025, 12).unwrap().step_months(1), None);
        assert_eq!(YearMonth::new(2025, 3).unwrap().step_years(1), None);
    }

    #[test]
    fn clamped_pulls_future_dates_to_last_month() {
        assert_eq!(
            YearMonth::clamped(2026, 10),
            YearMonth::new(2025, 12).unwrap()
        );
        assert_eq!(YearMonth::clamped(2019, 7), YearMonth::new(2020, 1).unwrap());
        assert_eq!(YearMonth::clamped(2022, 7), YearMonth::new(2022, 7).unwrap());
    }

    #[test]
    fn toggle_day_rejects_out_of_range_without_mutation() {
        let key = YearMonth::new(2023, 2).unwrap();
        let mut grid = MonthGrid::empty(key);
        let before = grid.clone();

        assert_eq!(
            grid.toggle_day(MAX_HABITS, 1).unwrap_err(),
            GridError::RowOutOfRange(MAX_HABITS)
        );
        assert_eq!(
            grid.toggle_day(0, 29).unwrap_err(),
            GridError::DayOutOfRange {
                day: 29,
                days_in_month: 28
            }
        );
        assert_eq!(
            grid.toggle_day(0, 0).unwrap_err(),
            GridError::DayOutOfRange {
                day: 0,
                days_in_month: 28
            }
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn habit_summary_skips_blank_names_but_keeps_their_flags() {
        let mut grid = MonthGrid::empty(YearMonth::new(2025, 5).unwrap());
        grid.rename_habit(0, "  Read ").unwrap();
        grid.rename_habit(1, "   ").unwrap();
        grid.rename_habit(3, "Walk").unwrap();
        grid.toggle_day(1, 10).unwrap();

        assert_eq!(grid.habit_summary(), vec![(1, "Read"), (4, "Walk")]);
        assert!(grid.is_done(1, 10).unwrap());
        assert_eq!(grid.completed_days(1).unwrap(), 1);
    }

    #[test]
    fn weekday_reports_calendar_day() {
        let grid = MonthGrid::empty(YearMonth::new(2025, 5).unwrap());
        assert_eq!(grid.weekday(1).unwrap(), Weekday::Thu);
        assert_eq!(grid.weekday(3).unwrap(), Weekday::Sat);
        assert!(grid.weekday(32).is_err());
    }
}
