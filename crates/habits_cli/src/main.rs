//! Command line front end for the habit calendar.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the snapshot store.
//! - Map each subcommand onto explicit session calls.

mod console;
mod render;

use anyhow::{anyhow, Context};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use habits_core::{
    init_logging, FileSnapshotStore, HabitSession, SnapshotStore, TrackerConfig, YearMonth,
};
use log::{error, info};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "habits")]
#[command(version, about = "Track up to ten daily habits on a monthly grid")]
struct Cli {
    /// Directory holding one snapshot file per month
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Month selector shared by subcommands; defaults to the current month.
#[derive(Args, Clone, Copy, Debug, Default)]
struct MonthArgs {
    /// Year (2020-2025)
    #[arg(long)]
    year: Option<i32>,

    /// Month (1-12)
    #[arg(long)]
    month: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the month grid
    Show {
        #[command(flatten)]
        at: MonthArgs,
    },
    /// Toggle one day of one habit (row and day start at 1)
    Toggle {
        row: usize,
        day: u32,
        #[command(flatten)]
        at: MonthArgs,
    },
    /// Rename a habit row; an empty name clears it
    Rename {
        row: usize,
        name: String,
        #[command(flatten)]
        at: MonthArgs,
    },
    /// List the named habits of a month
    Habits {
        #[command(flatten)]
        at: MonthArgs,
    },
    /// List months that have saved data
    Months,
    /// Interactive console (default)
    Console {
        #[command(flatten)]
        at: MonthArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    init_logging(&config.log_level, &config.log_dir).map_err(|err| anyhow!(err))?;
    info!(
        "event=app_start module=cli status=ok version={} data_dir={}",
        habits_core::core_version(),
        config.data_dir.display()
    );

    let result = run(cli.command, &config);
    if let Err(err) = &result {
        error!("event=app_fault module=cli status=error error={err:#}");
    }
    result
}

fn build_config(cli: &Cli) -> anyhow::Result<TrackerConfig> {
    let mut config = TrackerConfig::default();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    Ok(config.resolve(&cwd))
}

fn run(command: Option<Command>, config: &TrackerConfig) -> anyhow::Result<()> {
    let store = FileSnapshotStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
    let open = |at: MonthArgs| -> anyhow::Result<HabitSession<FileSnapshotStore>> {
        Ok(HabitSession::open(store.clone(), start_month(at)?)
            .with_restore_delay(config.status_restore_delay))
    };

    match command.unwrap_or(Command::Console {
        at: MonthArgs::default(),
    }) {
        Command::Show { at } => {
            let session = open(at)?;
            print!("{}", render::render_grid(session.grid()));
        }
        Command::Habits { at } => {
            let session = open(at)?;
            println!("{}", session.status_text());
        }
        Command::Toggle { row, day, at } => {
            let mut session = open(at)?;
            let index = row_index(row)?;
            let done = session.toggle_day(index, day)?;
            println!("row {row} day {day}: {}", if done { "done" } else { "open" });
            println!("{}", session.status_text());
            session.close().context("failed to save")?;
        }
        Command::Rename { row, name, at } => {
            let mut session = open(at)?;
            session.rename_habit(row_index(row)?, name)?;
            println!("{}", session.status_text());
            session.close().context("failed to save")?;
        }
        Command::Months => {
            for key in store.list_slots()? {
                println!("{key}");
            }
        }
        Command::Console { at } => {
            let mut session = open(at)?;
            let stdin = io::stdin();
            let console_result = console::run_console(&mut session, stdin.lock(), io::stdout());
            // Save on the way out even when the console loop failed.
            if let Err(err) = session.close() {
                eprintln!("warning: data may not have been saved: {err}");
            }
            console_result.context("console input failed")?;
        }
    }
    Ok(())
}

/// Month to open: explicit selectors are validated, otherwise today is
/// clamped into the selectable range.
fn start_month(at: MonthArgs) -> anyhow::Result<YearMonth> {
    let today = chrono::Local::now().date_naive();
    if at.year.is_none() && at.month.is_none() {
        return Ok(YearMonth::clamped(today.year(), today.month()));
    }
    let year = at.year.unwrap_or(today.year());
    let month = at.month.unwrap_or(today.month());
    YearMonth::new(year, month).with_context(|| format!("cannot open {year}-{month}"))
}

fn row_index(row: usize) -> anyhow::Result<usize> {
    row.checked_sub(1)
        .ok_or_else(|| anyhow!("rows are numbered from 1"))
}
