//! Implementation of the `tock delete` command.

use std::io::Write;

use anyhow::Result;

use tock_db::Database;

/// Delete an entry. The store treats missing ids as a no-op; the command only
/// adds a human-readable report either way.
pub fn run<W: Write>(writer: &mut W, db: &Database, id: i64) -> Result<()> {
    let existed = db.entry(id)?.is_some();
    db.delete_entry(id)?;
    if existed {
        writeln!(writer, "Deleted entry {id}.")?;
    } else {
        writeln!(writer, "Entry {id} not found; nothing deleted.")?;
    }
    Ok(())
}
