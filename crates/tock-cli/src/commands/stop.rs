//! Implementation of the `tock stop` command.

use std::io::Write;

use anyhow::Result;

use tock_core::format_duration;
use tock_db::{Database, Session};

/// Stop whatever timer is running.
pub fn run<W: Write>(writer: &mut W, db: Database) -> Result<()> {
    let mut session = Session::new(db)?;
    match session.stop()? {
        Some(entry) => writeln!(
            writer,
            "Stopped entry {}: {} - {} ({})",
            entry.id,
            entry.project,
            entry.task,
            format_duration(entry.effective_duration().unwrap_or(0))
        )?,
        None => writeln!(writer, "No timer running.")?,
    }
    Ok(())
}
