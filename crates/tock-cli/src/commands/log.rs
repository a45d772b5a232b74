//! Implementation of the `tock log` command.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use tock_core::format_duration;
use tock_db::Database;

/// List entries whose start falls inside the date range, newest first.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    from: NaiveDate,
    to: NaiveDate,
    project: Option<&str>,
    json: bool,
) -> Result<()> {
    let entries = db
        .query_entries(from, to, project)
        .context("invalid date range")?;

    if json {
        serde_json::to_writer_pretty(&mut *writer, &entries)?;
        writeln!(writer)?;
        return Ok(());
    }

    if entries.is_empty() {
        writeln!(writer, "No entries between {from} and {to}.")?;
        return Ok(());
    }

    writeln!(writer, "{from} .. {to}: {} entries", entries.len())?;
    for entry in &entries {
        let end = entry.end.as_deref().unwrap_or("(running)");
        let duration = format_duration(entry.effective_duration().unwrap_or(0));
        writeln!(
            writer,
            "{:>5}  {}  {:<19}  {:>9}  {} - {}",
            entry.id, entry.start, end, duration, entry.project, entry.task
        )?;
        if let Some(notes) = &entry.notes {
            writeln!(writer, "{:>5}  {notes}", "")?;
        }
    }

    Ok(())
}
