//! Storage layer for the tock time tracker.
//!
//! Provides persistence for projects and time entries using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A `Database` can be moved between threads but cannot be shared
//! without external synchronization. The intended model is single-process,
//! single-writer: one interactive session at a time.
//!
//! # Schema
//!
//! Two tables plus an index for range scans:
//!
//! - `projects(id, name UNIQUE)` — name uniqueness is case-sensitive at
//!   storage, while [`Database::project_names`] lists case-insensitively.
//!   The asymmetry is deliberate and preserved from the original design.
//! - `entries(id, project_id, task, notes, start_ts, end_ts, duration_s)` —
//!   `end_ts IS NULL` marks the single running entry; `duration_s` caches
//!   `end - start` in whole seconds and is recomputed on every mutation.
//!
//! Timestamps are stored as local-naive ISO 8601 TEXT with second precision
//! (see [`tock_core::clock`] for the DST policy). Lexicographic ordering of
//! the stored form matches chronological ordering, so range queries compare
//! strings directly.
//!
//! # Invariants
//!
//! At most one entry is open at a time. Open→closed transitions happen
//! through [`Database::stop_entry`] or implicitly when a new entry starts
//! (auto-close, last start wins); the close and the insert share one
//! transaction so a crash cannot leave two open rows. [`Database::update_entry`]
//! can still re-open an arbitrary entry by clearing its end — that edit path
//! is deliberately unguarded, and [`Database::running_entry`] breaks any
//! resulting tie deterministically by latest start.

use std::path::Path;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde::Serialize;
use thiserror::Error;

use tock_core::{clamp_interval, day_window, format_timestamp, parse_timestamp};

mod export;
mod session;

pub use export::write_csv;
pub use session::Session;

/// Task text stored when a new entry is started with a blank task.
pub const UNTITLED_TASK: &str = "(untitled)";

/// Stored layout of day-window upper bounds (`23:59:59.999999`).
///
/// Entries are written with second precision, so the microsecond tail keeps
/// the bound sorting after every timestamp of the day it closes.
const WINDOW_END_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A project name was empty after trimming.
    #[error("project name cannot be empty")]
    EmptyProjectName,
    /// A start or end timestamp could not be parsed.
    #[error("invalid {field} timestamp: {value}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A query range ended before it started.
    #[error("inverted date range: {from} is after {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for the schema and invariants.
pub struct Database {
    conn: Connection,
}

/// A time entry row joined with its project name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub id: i64,
    pub project: String,
    pub task: String,
    pub notes: Option<String>,
    /// Local-naive ISO 8601, second precision.
    pub start: String,
    /// `None` while the entry is running.
    pub end: Option<String>,
    /// Cached `end - start` in whole seconds; `None` while running.
    pub duration_secs: Option<i64>,
}

impl EntryRecord {
    /// Cached duration, recomputed from the stored interval when the cache is
    /// missing but an end time exists.
    pub fn effective_duration(&self) -> Option<i64> {
        self.duration_secs.or_else(|| {
            let start = parse_timestamp(&self.start).ok()?;
            let end = parse_timestamp(self.end.as_deref()?).ok()?;
            Some((end - start).num_seconds())
        })
    }
}

/// Joined column list shared by every entry select.
const ENTRY_COLUMNS: &str =
    "e.id, p.name, e.task, e.notes, e.start_ts, e.end_ts, e.duration_s \
     FROM entries e JOIN projects p ON e.project_id = p.id";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            -- start_ts/end_ts: local-naive ISO 8601, second precision
            -- duration_s: cached finalized duration, NULL while running
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY,
                project_id INTEGER NOT NULL,
                task TEXT NOT NULL,
                notes TEXT,
                start_ts TEXT NOT NULL,
                end_ts TEXT,
                duration_s INTEGER,
                FOREIGN KEY (project_id) REFERENCES projects(id)
            );

            CREATE INDEX IF NOT EXISTS idx_entries_start ON entries(start_ts);
            ",
        )?;
        Ok(())
    }

    /// Returns the id of the named project, creating the row if needed.
    ///
    /// The name is trimmed first; an empty result is a validation error and
    /// nothing is written.
    pub fn upsert_project(&self, name: &str) -> Result<i64, DbError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::EmptyProjectName);
        }
        self.conn
            .execute("INSERT OR IGNORE INTO projects (name) VALUES (?)", [name])?;
        let id = self
            .conn
            .query_row("SELECT id FROM projects WHERE name = ?", [name], |row| {
                row.get(0)
            })?;
        Ok(id)
    }

    /// Lists project names in case-insensitive lexicographic order.
    pub fn project_names(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM projects ORDER BY name COLLATE NOCASE")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Starts a new entry at the current wall-clock time.
    ///
    /// Any running entry is closed first with the same `now`, inside the same
    /// transaction as the insert, so at most one entry stays open. A blank
    /// task becomes [`UNTITLED_TASK`].
    pub fn start_entry(&mut self, project: &str, task: &str, notes: &str) -> Result<i64, DbError> {
        self.start_entry_at(project, task, notes, Local::now().naive_local())
    }

    fn start_entry_at(
        &mut self,
        project: &str,
        task: &str,
        notes: &str,
        now: NaiveDateTime,
    ) -> Result<i64, DbError> {
        let project = project.trim();
        if project.is_empty() {
            return Err(DbError::EmptyProjectName);
        }
        let task = task.trim();
        let task = if task.is_empty() { UNTITLED_TASK } else { task };
        let notes = normalize_notes(notes);
        let now_ts = format_timestamp(now);

        let tx = self.conn.transaction()?;
        let open_rows: Vec<(i64, String)> = {
            let mut stmt = tx.prepare("SELECT id, start_ts FROM entries WHERE end_ts IS NULL")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut open_rows = Vec::new();
            for row in rows {
                open_rows.push(row?);
            }
            open_rows
        };
        for (open_id, start_ts) in open_rows {
            let duration = elapsed_seconds("start", &start_ts, now)?;
            tx.execute(
                "UPDATE entries SET end_ts = ?, duration_s = ? WHERE id = ?",
                params![now_ts, duration, open_id],
            )?;
            tracing::debug!(entry = open_id, duration, "auto-closed running entry");
        }
        tx.execute("INSERT OR IGNORE INTO projects (name) VALUES (?)", [project])?;
        let project_id: i64 =
            tx.query_row("SELECT id FROM projects WHERE name = ?", [project], |row| {
                row.get(0)
            })?;
        tx.execute(
            "INSERT INTO entries (project_id, task, notes, start_ts) VALUES (?, ?, ?, ?)",
            params![project_id, task, notes, now_ts],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(entry = id, project, task, "started entry");
        Ok(id)
    }

    /// Closes the entry at the current wall-clock time.
    ///
    /// Missing ids and already-closed entries are benign no-ops.
    pub fn stop_entry(&self, id: i64) -> Result<(), DbError> {
        self.stop_entry_at(id, Local::now().naive_local())
    }

    fn stop_entry_at(&self, id: i64, now: NaiveDateTime) -> Result<(), DbError> {
        let start_ts: Option<String> = self
            .conn
            .query_row(
                "SELECT start_ts FROM entries WHERE id = ? AND end_ts IS NULL",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(start_ts) = start_ts else {
            return Ok(());
        };
        let duration = elapsed_seconds("start", &start_ts, now)?;
        self.conn.execute(
            "UPDATE entries SET end_ts = ?, duration_s = ? WHERE id = ?",
            params![format_timestamp(now), duration, id],
        )?;
        tracing::debug!(entry = id, duration, "stopped entry");
        Ok(())
    }

    /// Returns the running entry, if any.
    ///
    /// Should the edit path ever leave more than one row open, the most
    /// recently started one wins.
    pub fn running_entry(&self) -> Result<Option<EntryRecord>, DbError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} WHERE e.end_ts IS NULL ORDER BY e.start_ts DESC LIMIT 1"
        );
        let entry = self
            .conn
            .query_row(&sql, [], entry_from_row)
            .optional()?;
        Ok(entry)
    }

    /// Fetches a single entry by id.
    pub fn entry(&self, id: i64) -> Result<Option<EntryRecord>, DbError> {
        let sql = format!("SELECT {ENTRY_COLUMNS} WHERE e.id = ?");
        let entry = self
            .conn
            .query_row(&sql, [id], entry_from_row)
            .optional()?;
        Ok(entry)
    }

    /// Deletes an entry. Missing ids are a no-op.
    pub fn delete_entry(&self, id: i64) -> Result<(), DbError> {
        self.conn
            .execute("DELETE FROM entries WHERE id = ?", [id])?;
        Ok(())
    }

    /// Rewrites every field of an entry, recomputing the cached duration.
    ///
    /// The project is resolved (or created) by name. `end = None` re-opens
    /// the entry and clears the duration; nothing checks that another entry
    /// is not already open, see the [module documentation](self). Missing ids
    /// are a no-op. Timestamps are validated before anything is written.
    pub fn update_entry(
        &self,
        id: i64,
        project: &str,
        task: &str,
        notes: &str,
        start: &str,
        end: Option<&str>,
    ) -> Result<(), DbError> {
        let start_parsed = parse_stored("start", start)?;
        let end_parsed = end.map(|value| parse_stored("end", value)).transpose()?;
        // Edits may place start after end; the relaxed invariant stores the
        // negative duration rather than rejecting the row.
        let duration = end_parsed.map(|end| (end - start_parsed).num_seconds());
        let project_id = self.upsert_project(project)?;
        self.conn.execute(
            "UPDATE entries
             SET project_id = ?, task = ?, notes = ?, start_ts = ?, end_ts = ?, duration_s = ?
             WHERE id = ?",
            params![
                project_id,
                task.trim(),
                normalize_notes(notes),
                format_timestamp(start_parsed),
                end_parsed.map(format_timestamp),
                duration,
                id
            ],
        )?;
        tracing::debug!(entry = id, project, "updated entry");
        Ok(())
    }

    /// Lists entries whose start falls within `[from 00:00:00, to
    /// 23:59:59.999999]`, most recent start first.
    ///
    /// `project` restricts to an exact name match. An inverted range is a
    /// validation error.
    pub fn query_entries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        project: Option<&str>,
    ) -> Result<Vec<EntryRecord>, DbError> {
        if to < from {
            return Err(DbError::InvalidRange { from, to });
        }
        let (range_start, _) = day_window(from);
        let (_, range_end) = day_window(to);

        let mut sql = format!("SELECT {ENTRY_COLUMNS} WHERE e.start_ts BETWEEN ? AND ?");
        let mut bindings = vec![
            format_timestamp(range_start),
            range_end.format(WINDOW_END_FORMAT).to_string(),
        ];
        if let Some(name) = project {
            sql.push_str(" AND p.name = ?");
            bindings.push(name.to_string());
        }
        sql.push_str(" ORDER BY e.start_ts DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bindings.iter()), entry_from_row)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Total seconds attributable to today, evaluated fresh at every call.
    ///
    /// Entries are clamped to today's window, so spans crossing midnight
    /// contribute only their in-window part, and an open entry is counted up
    /// to `now` — its contribution grows between calls.
    pub fn sum_today(&self) -> Result<i64, DbError> {
        let now = Local::now().naive_local();
        self.sum_day_at(now.date(), now)
    }

    fn sum_day_at(&self, day: NaiveDate, now: NaiveDateTime) -> Result<i64, DbError> {
        let (window_start, window_end) = day_window(day);

        // Any entry whose interval intersects the day's window:
        // start <= end_of_day AND (end IS NULL OR end >= start_of_day)
        let mut stmt = self.conn.prepare(
            "SELECT start_ts, end_ts FROM entries
             WHERE start_ts <= ? AND (end_ts IS NULL OR end_ts >= ?)",
        )?;
        let rows = stmt.query_map(
            params![
                window_end.format(WINDOW_END_FORMAT).to_string(),
                format_timestamp(window_start)
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
        )?;

        let mut total = 0;
        for row in rows {
            let (start_ts, end_ts) = row?;
            let start = parse_stored("start", &start_ts)?;
            let end = match end_ts {
                Some(ts) => parse_stored("end", &ts)?,
                None => now,
            };
            let (eff_start, eff_end) = clamp_interval(start, end, window_start, window_end);
            if eff_end > eff_start {
                total += (eff_end - eff_start).num_seconds();
            }
        }
        Ok(total)
    }
}

/// Empty-after-trim notes are stored as NULL.
fn normalize_notes(notes: &str) -> Option<String> {
    let notes = notes.trim();
    if notes.is_empty() {
        None
    } else {
        Some(notes.to_string())
    }
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRecord> {
    Ok(EntryRecord {
        id: row.get(0)?,
        project: row.get(1)?,
        task: row.get(2)?,
        notes: row.get(3)?,
        start: row.get(4)?,
        end: row.get(5)?,
        duration_secs: row.get(6)?,
    })
}

fn parse_stored(field: &'static str, value: &str) -> Result<NaiveDateTime, DbError> {
    parse_timestamp(value).map_err(|source| DbError::InvalidTimestamp {
        field,
        value: value.to_string(),
        source,
    })
}

/// Whole seconds from a stored start to `end`, truncated toward zero.
fn elapsed_seconds(field: &'static str, start: &str, end: NaiveDateTime) -> Result<i64, DbError> {
    let start = parse_stored(field, start)?;
    Ok((end - start).num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(text: &str) -> NaiveDateTime {
        parse_timestamp(text).expect("test timestamp parses")
    }

    fn date(text: &str) -> NaiveDate {
        datetime(&format!("{text}T00:00:00")).date()
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        let projects_columns = table_columns(&db.conn, "projects");
        assert_eq!(projects_columns, vec!["id", "name"]);

        let entries_columns = table_columns(&db.conn, "entries");
        assert_eq!(
            entries_columns,
            vec![
                "id",
                "project_id",
                "task",
                "notes",
                "start_ts",
                "end_ts",
                "duration_s",
            ]
        );

        let entries_indexes = index_names(&db.conn, "entries");
        assert!(entries_indexes.contains(&"idx_entries_start".to_string()));
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    fn index_names(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA index_list({table})"))
            .expect("prepare index_list");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query index_list");
        rows.map(|row| row.expect("index_list row")).collect()
    }

    #[test]
    fn upsert_project_is_idempotent_and_case_sensitive() {
        let db = Database::open_in_memory().expect("open in-memory db");
        let first = db.upsert_project("Alpha").unwrap();
        let again = db.upsert_project(" Alpha ").unwrap();
        assert_eq!(first, again);

        // Storage uniqueness is case-sensitive: a different casing is a row
        // of its own, even though listing collates case-insensitively.
        let lower = db.upsert_project("alpha").unwrap();
        assert_ne!(first, lower);
    }

    #[test]
    fn upsert_project_rejects_blank_names() {
        let db = Database::open_in_memory().expect("open in-memory db");
        assert!(matches!(
            db.upsert_project("   "),
            Err(DbError::EmptyProjectName)
        ));
        assert!(db.project_names().unwrap().is_empty());
    }

    #[test]
    fn project_names_collate_case_insensitively() {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.upsert_project("beta").unwrap();
        db.upsert_project("Alpha").unwrap();
        db.upsert_project("ALPINE").unwrap();
        assert_eq!(db.project_names().unwrap(), vec!["Alpha", "ALPINE", "beta"]);
    }

    #[test]
    fn start_entry_creates_open_row_with_placeholder_task() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "  ", "", datetime("2025-03-10T09:00:00"))
            .unwrap();

        let entry = db.entry(id).unwrap().expect("entry exists");
        assert_eq!(entry.project, "Alpha");
        assert_eq!(entry.task, UNTITLED_TASK);
        assert_eq!(entry.notes, None);
        assert_eq!(entry.start, "2025-03-10T09:00:00");
        assert_eq!(entry.end, None);
        assert_eq!(entry.duration_secs, None);

        let running = db.running_entry().unwrap().expect("running entry");
        assert_eq!(running.id, id);
    }

    #[test]
    fn start_entry_auto_closes_previous_entry() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let first = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();
        let second = db
            .start_entry_at("Alpha", "two", "", datetime("2025-03-10T09:45:30"))
            .unwrap();

        let closed = db.entry(first).unwrap().expect("first entry");
        assert_eq!(closed.end.as_deref(), Some("2025-03-10T09:45:30"));
        // duration = B.start - A.start
        assert_eq!(closed.duration_secs, Some(45 * 60 + 30));

        let running = db.running_entry().unwrap().expect("running entry");
        assert_eq!(running.id, second);
        assert_eq!(running.task, "two");
    }

    #[test]
    fn start_entry_rejects_blank_project_without_writing() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let running = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();
        assert!(matches!(
            db.start_entry_at("  ", "two", "", datetime("2025-03-10T10:00:00")),
            Err(DbError::EmptyProjectName)
        ));
        // The running entry is untouched by the failed start.
        let still_running = db.running_entry().unwrap().expect("running entry");
        assert_eq!(still_running.id, running);
        assert_eq!(still_running.end, None);
    }

    #[test]
    fn stop_entry_sets_end_and_duration() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "one", "notes here", datetime("2025-03-10T09:00:00"))
            .unwrap();
        db.stop_entry_at(id, datetime("2025-03-10T10:01:01")).unwrap();

        let entry = db.entry(id).unwrap().expect("entry exists");
        assert_eq!(entry.end.as_deref(), Some("2025-03-10T10:01:01"));
        assert_eq!(entry.duration_secs, Some(3661));
        assert!(db.running_entry().unwrap().is_none());
    }

    #[test]
    fn stop_entry_is_a_no_op_for_missing_and_closed_ids() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.stop_entry_at(999, datetime("2025-03-10T10:00:00")).unwrap();

        let id = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();
        db.stop_entry_at(id, datetime("2025-03-10T09:30:00")).unwrap();
        // A second stop must not move the recorded end.
        db.stop_entry_at(id, datetime("2025-03-10T11:00:00")).unwrap();

        let entry = db.entry(id).unwrap().expect("entry exists");
        assert_eq!(entry.end.as_deref(), Some("2025-03-10T09:30:00"));
        assert_eq!(entry.duration_secs, Some(1800));
    }

    #[test]
    fn delete_entry_is_idempotent() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();
        db.delete_entry(id).unwrap();
        db.delete_entry(id).unwrap();
        db.delete_entry(12_345).unwrap();
        assert!(db.entry(id).unwrap().is_none());
    }

    #[test]
    fn update_entry_recomputes_duration_and_moves_project() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();
        db.stop_entry_at(id, datetime("2025-03-10T09:10:00")).unwrap();

        db.update_entry(
            id,
            "Beta",
            "rewritten",
            "moved over",
            "2025-03-09T22:00:00",
            Some("2025-03-10T01:30:00"),
        )
        .unwrap();

        let entry = db.entry(id).unwrap().expect("entry exists");
        assert_eq!(entry.project, "Beta");
        assert_eq!(entry.task, "rewritten");
        assert_eq!(entry.notes.as_deref(), Some("moved over"));
        assert_eq!(entry.start, "2025-03-09T22:00:00");
        assert_eq!(entry.end.as_deref(), Some("2025-03-10T01:30:00"));
        assert_eq!(entry.duration_secs, Some(3 * 3600 + 1800));
    }

    #[test]
    fn update_entry_accepts_inverted_interval() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();

        // start > end is allowed on the edit path; the cached duration just
        // goes negative.
        db.update_entry(
            id,
            "Alpha",
            "one",
            "",
            "2025-03-10T10:00:00",
            Some("2025-03-10T09:00:00"),
        )
        .unwrap();
        let entry = db.entry(id).unwrap().expect("entry exists");
        assert_eq!(entry.duration_secs, Some(-3600));
    }

    #[test]
    fn update_entry_clearing_end_reopens_the_row() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();
        db.stop_entry_at(id, datetime("2025-03-10T09:30:00")).unwrap();

        db.update_entry(id, "Alpha", "one", "", "2025-03-10T09:00:00", None)
            .unwrap();
        let entry = db.entry(id).unwrap().expect("entry exists");
        assert_eq!(entry.end, None);
        assert_eq!(entry.duration_secs, None);
        assert_eq!(db.running_entry().unwrap().map(|e| e.id), Some(id));
    }

    #[test]
    fn update_entry_rejects_bad_timestamps_without_writing() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T09:00:00"))
            .unwrap();

        let err = db
            .update_entry(id, "Beta", "two", "", "yesterday-ish", None)
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidTimestamp { field: "start", .. }));

        let err = db
            .update_entry(
                id,
                "Beta",
                "two",
                "",
                "2025-03-10T09:00:00",
                Some("not-a-time"),
            )
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidTimestamp { field: "end", .. }));

        // Validation failures leave the row alone, including its project.
        let entry = db.entry(id).unwrap().expect("entry exists");
        assert_eq!(entry.project, "Alpha");
        assert_eq!(entry.task, "one");
    }

    #[test]
    fn running_entry_breaks_ties_by_latest_start() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let earlier = db
            .start_entry_at("Alpha", "one", "", datetime("2025-03-10T08:00:00"))
            .unwrap();
        let later = db
            .start_entry_at("Alpha", "two", "", datetime("2025-03-10T09:00:00"))
            .unwrap();
        // Re-open the earlier entry through the unguarded edit path: two open
        // rows now exist and the invariant is violated.
        db.update_entry(earlier, "Alpha", "one", "", "2025-03-10T08:00:00", None)
            .unwrap();

        let running = db.running_entry().unwrap().expect("running entry");
        assert_eq!(running.id, later);
    }

    #[test]
    fn query_entries_filters_by_day_window_and_project() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let before = db
            .start_entry_at("Alpha", "before", "", datetime("2025-03-09T23:59:59"))
            .unwrap();
        let inside_a = db
            .start_entry_at("Alpha", "morning", "", datetime("2025-03-10T00:00:00"))
            .unwrap();
        let inside_b = db
            .start_entry_at("Beta", "evening", "", datetime("2025-03-10T23:59:59"))
            .unwrap();
        let after = db
            .start_entry_at("Alpha", "after", "", datetime("2025-03-11T00:00:00"))
            .unwrap();

        let day = date("2025-03-10");
        let entries = db.query_entries(day, day, None).unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        // Most recent start first, both day edges inclusive.
        assert_eq!(ids, vec![inside_b, inside_a]);
        assert!(!ids.contains(&before));
        assert!(!ids.contains(&after));

        let entries = db.query_entries(day, day, Some("Alpha")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, inside_a);

        // Exact-match filter: casing matters.
        let entries = db.query_entries(day, day, Some("alpha")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn query_entries_rejects_inverted_range() {
        let db = Database::open_in_memory().expect("open in-memory db");
        let err = db
            .query_entries(date("2025-03-10"), date("2025-03-09"), None)
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidRange { .. }));
    }

    #[test]
    fn sum_day_clamps_entries_spanning_midnight() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "late", "", datetime("2025-03-09T23:00:00"))
            .unwrap();
        db.stop_entry_at(id, datetime("2025-03-10T01:00:00")).unwrap();

        let total = db
            .sum_day_at(date("2025-03-10"), datetime("2025-03-10T12:00:00"))
            .unwrap();
        assert_eq!(total, 3600);

        // The hour before midnight lands on the previous day.
        let total = db
            .sum_day_at(date("2025-03-09"), datetime("2025-03-10T12:00:00"))
            .unwrap();
        assert_eq!(total, 3600);
    }

    #[test]
    fn sum_day_counts_open_entries_up_to_now() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.start_entry_at("Alpha", "open", "", datetime("2025-03-10T09:00:00"))
            .unwrap();

        let earlier = db
            .sum_day_at(date("2025-03-10"), datetime("2025-03-10T09:10:00"))
            .unwrap();
        assert_eq!(earlier, 600);

        // Re-evaluated fresh: the open entry's contribution grows with now.
        let later = db
            .sum_day_at(date("2025-03-10"), datetime("2025-03-10T09:11:00"))
            .unwrap();
        assert!(later > earlier);
        assert_eq!(later, 660);
    }

    #[test]
    fn sum_day_ignores_entries_outside_the_window() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let id = db
            .start_entry_at("Alpha", "old", "", datetime("2025-03-08T09:00:00"))
            .unwrap();
        db.stop_entry_at(id, datetime("2025-03-08T10:00:00")).unwrap();

        let total = db
            .sum_day_at(date("2025-03-10"), datetime("2025-03-10T12:00:00"))
            .unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn sum_day_spans_multiple_overlapping_entries() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        // Closed span crossing into the day.
        let a = db
            .start_entry_at("Alpha", "night", "", datetime("2025-03-09T23:30:00"))
            .unwrap();
        db.stop_entry_at(a, datetime("2025-03-10T00:30:00")).unwrap();
        // Fully inside the day.
        let b = db
            .start_entry_at("Alpha", "midday", "", datetime("2025-03-10T12:00:00"))
            .unwrap();
        db.stop_entry_at(b, datetime("2025-03-10T13:00:00")).unwrap();
        // Open entry still running at evaluation time.
        db.start_entry_at("Beta", "open", "", datetime("2025-03-10T14:00:00"))
            .unwrap();

        let total = db
            .sum_day_at(date("2025-03-10"), datetime("2025-03-10T14:15:00"))
            .unwrap();
        assert_eq!(total, 1800 + 3600 + 900);
    }

    #[test]
    fn effective_duration_recomputes_when_cache_is_missing() {
        let record = EntryRecord {
            id: 1,
            project: "Alpha".to_string(),
            task: "one".to_string(),
            notes: None,
            start: "2025-03-10T09:00:00".to_string(),
            end: Some("2025-03-10T10:01:01".to_string()),
            duration_secs: None,
        };
        assert_eq!(record.effective_duration(), Some(3661));

        let open = EntryRecord {
            end: None,
            ..record.clone()
        };
        assert_eq!(open.effective_duration(), None);

        let cached = EntryRecord {
            duration_secs: Some(42),
            ..record
        };
        assert_eq!(cached.effective_duration(), Some(42));
    }

    #[test]
    fn state_survives_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("tock.db");

        {
            let mut db = Database::open(&path).unwrap();
            db.start_entry_at("Alpha", "persisted", "", datetime("2025-03-10T09:00:00"))
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let running = db.running_entry().unwrap().expect("running entry");
        assert_eq!(running.task, "persisted");
        assert_eq!(db.project_names().unwrap(), vec!["Alpha"]);
    }
}
