//! Implementation of the `tock edit` command.

use std::io::Write;

use anyhow::Result;

use tock_db::{Database, UNTITLED_TASK};

/// Replacement field values for an entry.
pub struct EntryEdit<'a> {
    pub project: &'a str,
    pub task: &'a str,
    pub notes: &'a str,
    pub start: &'a str,
    /// `None` re-opens the entry.
    pub end: Option<&'a str>,
}

/// Rewrite an entry's fields; the cached duration is recomputed by the store.
pub fn run<W: Write>(writer: &mut W, db: &Database, id: i64, fields: &EntryEdit<'_>) -> Result<()> {
    if db.entry(id)?.is_none() {
        writeln!(writer, "Entry {id} not found.")?;
        return Ok(());
    }

    // Same fallback the start path applies: edits cannot blank the task.
    let task = fields.task.trim();
    let task = if task.is_empty() { UNTITLED_TASK } else { task };

    db.update_entry(id, fields.project, task, fields.notes, fields.start, fields.end)?;

    if let Some(entry) = db.entry(id)? {
        let end = entry.end.as_deref().unwrap_or("(running)");
        writeln!(
            writer,
            "Updated entry {}: {} - {} [{} .. {}]",
            entry.id, entry.project, entry.task, entry.start, end
        )?;
    }
    Ok(())
}
