//! Implementation of the `tock export` command.
//!
//! Queries a date range and writes it through the store's CSV projection,
//! either to a file (default name `timetracker_{from}_{to}.csv`) or to
//! stdout with `--output -`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use tock_db::{Database, write_csv};

/// Export entries in the range as CSV.
pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    from: NaiveDate,
    to: NaiveDate,
    project: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let rows = db
        .query_entries(from, to, project)
        .context("invalid date range")?;
    if rows.is_empty() {
        writeln!(writer, "No entries to export.")?;
        return Ok(());
    }

    if output == Some(Path::new("-")) {
        write_csv(writer, &rows)?;
        return Ok(());
    }

    let path = output.map_or_else(
        || PathBuf::from(format!("timetracker_{from}_{to}.csv")),
        Path::to_path_buf,
    );
    let file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut file = BufWriter::new(file);
    write_csv(&mut file, &rows)?;
    file.flush()?;

    writeln!(
        writer,
        "Exported {} entries to {}",
        rows.len(),
        path.display()
    )?;
    Ok(())
}
