//! Implementation of the `tock projects` command.

use std::io::Write;

use anyhow::Result;

use tock_db::Database;

/// List project names, case-insensitively ordered.
pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let names = db.project_names()?;
    if names.is_empty() {
        writeln!(writer, "No projects yet.")?;
        return Ok(());
    }
    for name in names {
        writeln!(writer, "{name}")?;
    }
    Ok(())
}
