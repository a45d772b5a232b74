//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Project time tracker.
///
/// Starts and stops timers against projects and tasks, keeps entries in a
/// local SQLite database, and reports or exports them by date range.
#[derive(Debug, Parser)]
#[command(name = "tock", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a timer, stopping whatever is currently running.
    Start {
        /// Project the entry belongs to (created on first use).
        project: String,

        /// Task title; blank falls back to a placeholder.
        #[arg(default_value = "")]
        task: String,

        /// Free-form notes.
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Stop the running timer.
    Stop,

    /// Show the running timer and today's total.
    Status {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// List known project names.
    Projects,

    /// List entries in a date range.
    Log {
        /// First day of the range (YYYY-MM-DD); defaults to the first of the
        /// current month.
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the range (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Restrict to one project (exact name).
        #[arg(long)]
        project: Option<String>,

        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Rewrite an entry's fields.
    Edit {
        /// Entry id as shown by `log`.
        id: i64,

        /// Project name (created on first use).
        #[arg(long)]
        project: String,

        /// Task title; blank falls back to a placeholder.
        #[arg(long, default_value = "")]
        task: String,

        /// Free-form notes.
        #[arg(long, default_value = "")]
        notes: String,

        /// Start timestamp (YYYY-MM-DDTHH:MM:SS).
        #[arg(long)]
        start: String,

        /// End timestamp; omit to re-open the entry.
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete an entry.
    Delete {
        /// Entry id as shown by `log`.
        id: i64,
    },

    /// Export a date range as CSV.
    Export {
        /// First day of the range (YYYY-MM-DD); defaults to the first of the
        /// current month.
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the range (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Restrict to one project (exact name).
        #[arg(long)]
        project: Option<String>,

        /// Destination file; `-` for stdout. Defaults to
        /// `timetracker_{from}_{to}.csv` in the working directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
