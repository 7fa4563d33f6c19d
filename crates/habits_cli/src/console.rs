//! Interactive console over one habit session.
//!
//! # Responsibility
//! - Parse one line of user input into a console command.
//! - Route each command to an explicit session call and print the result.
//!
//! # Invariants
//! - Rows and days are 1-based at this boundary, 0-based rows inside core.
//! - Rejected commands never stop the loop.

use crate::render::render_grid;
use habits_core::{HabitSession, SnapshotStore};
use std::io::{self, BufRead, Write};

pub const HELP: &str = "\
commands:
  <  >          previous / next month
  ^  v          next / previous year
  goto Y M      jump to year Y, month M
  t ROW DAY     toggle a day
  n ROW NAME    rename a habit (empty NAME clears it)
  c ROW DAY     describe a cell
  show          print the grid
  habits        print the habit list
  save          save now
  help          this text
  quit          save and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    PrevMonth,
    NextMonth,
    NextYear,
    PrevYear,
    Goto { year: String, month: String },
    Toggle { row: usize, day: u32 },
    Rename { row: usize, name: String },
    Cell { row: usize, day: u32 },
    Show,
    Habits,
    Save,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "<" | "left" => ConsoleCommand::PrevMonth,
        ">" | "right" => ConsoleCommand::NextMonth,
        "^" | "up" => ConsoleCommand::NextYear,
        "v" | "down" => ConsoleCommand::PrevYear,
        "goto" | "g" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(year), Some(month), None) => ConsoleCommand::Goto {
                    year: year.to_string(),
                    month: month.to_string(),
                },
                _ => return Err("usage: goto YEAR MONTH".to_string()),
            }
        }
        "t" | "toggle" => {
            let (row, day) = parse_cell(rest).ok_or("usage: t ROW DAY")?;
            ConsoleCommand::Toggle { row, day }
        }
        "c" | "cell" => {
            let (row, day) = parse_cell(rest).ok_or("usage: c ROW DAY")?;
            ConsoleCommand::Cell { row, day }
        }
        "n" | "rename" => {
            let (row, name) = match rest.split_once(char::is_whitespace) {
                Some((row, name)) => (row, name.trim()),
                None => (rest, ""),
            };
            let row = parse_row(row).ok_or("usage: n ROW NAME")?;
            ConsoleCommand::Rename {
                row,
                name: name.to_string(),
            }
        }
        "show" | "s" => ConsoleCommand::Show,
        "habits" | "h" => ConsoleCommand::Habits,
        "save" | "w" => ConsoleCommand::Save,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(Some(command))
}

/// Converts a 1-based row label into a 0-based index.
pub fn parse_row(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()?.checked_sub(1)
}

fn parse_cell(rest: &str) -> Option<(usize, u32)> {
    let mut parts = rest.split_whitespace();
    let row = parse_row(parts.next()?)?;
    let day = parts.next()?.parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((row, day))
}

/// Reads commands until `quit` or end of input.
///
/// The caller owns the session and performs the closing save.
pub fn run_console<S, R, W>(session: &mut HabitSession<S>, input: R, mut out: W) -> io::Result<()>
where
    S: SnapshotStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", render_grid(session.grid()))?;
    writeln!(out, "status: {}", session.status_text())?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        if command == ConsoleCommand::Quit {
            break;
        }
        execute(session, command, &mut out)?;
        writeln!(out, "status: {}", session.status_text())?;
    }
    Ok(())
}

fn execute<S: SnapshotStore, W: Write>(
    session: &mut HabitSession<S>,
    command: ConsoleCommand,
    out: &mut W,
) -> io::Result<()> {
    let navigated = match command {
        ConsoleCommand::PrevMonth => session.change_month(-1),
        ConsoleCommand::NextMonth => session.change_month(1),
        ConsoleCommand::NextYear => session.change_year(1),
        ConsoleCommand::PrevYear => session.change_year(-1),
        ConsoleCommand::Goto { year, month } => session
            .load_month_input(&year, &month)
            .map(|_| true),
        ConsoleCommand::Toggle { row, day } => {
            match session.toggle_day(row, day) {
                Ok(done) => writeln!(
                    out,
                    "row {} day {}: {}",
                    row + 1,
                    day,
                    if done { "done" } else { "open" }
                )?,
                Err(err) => writeln!(out, "{err}")?,
            }
            return Ok(());
        }
        ConsoleCommand::Rename { row, name } => {
            if let Err(err) = session.rename_habit(row, name) {
                writeln!(out, "{err}")?;
            }
            return Ok(());
        }
        ConsoleCommand::Cell { row, day } => {
            if let Err(err) = session.describe_cell(row, day) {
                writeln!(out, "{err}")?;
            }
            return Ok(());
        }
        ConsoleCommand::Show => Ok(true),
        ConsoleCommand::Habits => {
            session.show_habits();
            return Ok(());
        }
        ConsoleCommand::Save => {
            if let Err(err) = session.save() {
                writeln!(out, "save failed: {err}")?;
            }
            return Ok(());
        }
        ConsoleCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(());
        }
        ConsoleCommand::Quit => return Ok(()),
    };

    match navigated {
        Ok(true) => writeln!(out, "{}", render_grid(session.grid())),
        Ok(false) => writeln!(out, "already at the edge of the year range"),
        Err(err) => writeln!(out, "{err}"),
    }
}
