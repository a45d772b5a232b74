//! CSV projection of query results.
//!
//! Writes the fixed seven-column table consumers of the export contract
//! expect: `ID,Project,Task,Notes,Start,End,Duration`. Fields are
//! comma-separated UTF-8 with double-quote escaping; durations render through
//! [`tock_core::format_duration`].

use std::io::{self, Write};

use tock_core::format_duration;

use crate::EntryRecord;

const HEADER: [&str; 7] = ["ID", "Project", "Task", "Notes", "Start", "End", "Duration"];

/// Writes entries as CSV, one row per entry plus the header.
///
/// Rows without a cached duration but with an end time get the duration
/// recomputed on the fly; still-open rows render a zero duration.
pub fn write_csv<W: Write>(writer: &mut W, rows: &[EntryRecord]) -> io::Result<()> {
    writeln!(writer, "{}", HEADER.join(","))?;
    for row in rows {
        let duration = format_duration(row.effective_duration().unwrap_or(0));
        let fields = [
            row.id.to_string(),
            row.project.clone(),
            row.task.clone(),
            row.notes.clone().unwrap_or_default(),
            row.start.clone(),
            row.end.clone().unwrap_or_default(),
            duration,
        ];
        let escaped: Vec<String> = fields.iter().map(|field| escape_field(field)).collect();
        writeln!(writer, "{}", escaped.join(","))?;
    }
    Ok(())
}

/// Quotes a field when it contains a separator, quote, or line break;
/// embedded quotes double up.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
