//! Plain-text rendering of a month grid.

use chrono::Weekday;
use habits_core::MonthGrid;
use std::fmt::Write;

const NAME_WIDTH: usize = 18;

/// Renders the grid as a table: one line per habit slot, one column per day.
///
/// Saturdays and Sundays are marked under the day numbers; done days show
/// `x`, open days `.`.
pub fn render_grid(grid: &MonthGrid) -> String {
    let days = grid.days_in_month();
    let mut out = String::new();

    let key = grid.key();
    let _ = writeln!(out, "{} / {}", key.year(), key.month());

    let _ = write!(out, "{:<3}{:<NAME_WIDTH$}", "#", "Habit");
    for day in 1..=days {
        let _ = write!(out, "{day:>3}");
    }
    let _ = writeln!(out);

    let _ = write!(out, "{:<3}{:<NAME_WIDTH$}", "", "");
    for day in 1..=days {
        let mark = match grid.weekday(day) {
            Ok(Weekday::Sat) => "Sa",
            Ok(Weekday::Sun) => "Su",
            _ => "",
        };
        let _ = write!(out, "{mark:>3}");
    }
    let _ = writeln!(out);

    for (index, row) in grid.rows().iter().enumerate() {
        let _ = write!(
            out,
            "{:<3}{:<NAME_WIDTH$}",
            index + 1,
            truncate(row.name().trim(), NAME_WIDTH - 1)
        );
        for done in row.days() {
            let _ = write!(out, "{:>3}", if *done { "x" } else { "." });
        }
        let completed = row.days().iter().filter(|flag| **flag).count();
        let _ = writeln!(out, "  ({completed})");
    }
    out
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
