//! Implementation of the `tock start` command.

use std::io::Write;

use anyhow::Result;

use tock_core::format_duration;
use tock_db::{Database, Session};

/// Start a new timer, reporting any entry that got auto-closed on the way.
pub fn run<W: Write>(
    writer: &mut W,
    db: Database,
    project: &str,
    task: &str,
    notes: &str,
) -> Result<()> {
    let mut session = Session::new(db)?;
    let previous = session.running().map(|entry| entry.id);

    session.start(project, task, notes)?;

    if let Some(previous) = previous {
        if let Some(closed) = session.db().entry(previous)? {
            writeln!(
                writer,
                "Stopped entry {}: {} - {} ({})",
                closed.id,
                closed.project,
                closed.task,
                format_duration(closed.effective_duration().unwrap_or(0))
            )?;
        }
    }
    if let Some(entry) = session.running() {
        writeln!(
            writer,
            "Started entry {}: {} - {}",
            entry.id, entry.project, entry.task
        )?;
    }

    Ok(())
}
