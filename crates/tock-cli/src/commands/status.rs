//! Implementation of the `tock status` command.
//!
//! A single poll of the store: the running entry with its live elapsed time,
//! plus today's overlap-corrected total. Callers wanting a live display
//! re-run this; the core recomputes fresh on every call.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use tock_core::{format_duration, parse_timestamp};
use tock_db::{Database, EntryRecord};

#[derive(Serialize)]
struct StatusReport {
    running: Option<EntryRecord>,
    elapsed_secs: Option<i64>,
    today_secs: i64,
    today: String,
}

/// Render the running entry and today's total.
pub fn run<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let running = db.running_entry()?;
    let today_secs = db.sum_today()?;

    let elapsed_secs = running.as_ref().and_then(|entry| {
        let start = parse_timestamp(&entry.start).ok()?;
        Some((Local::now().naive_local() - start).num_seconds())
    });

    if json {
        let report = StatusReport {
            running,
            elapsed_secs,
            today_secs,
            today: format_duration(today_secs),
        };
        serde_json::to_writer_pretty(&mut *writer, &report)?;
        writeln!(writer)?;
        return Ok(());
    }

    match &running {
        Some(entry) => writeln!(
            writer,
            "Running: {} - {} ({})",
            entry.project,
            entry.task,
            format_duration(elapsed_secs.unwrap_or(0))
        )?,
        None => writeln!(writer, "Not running")?,
    }
    writeln!(writer, "Today: {}", format_duration(today_secs))?;

    Ok(())
}
