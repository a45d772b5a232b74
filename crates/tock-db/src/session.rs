//! Single-running-timer session orchestration.

use crate::{Database, DbError, EntryRecord};

/// Tracks the one running entry across store mutations.
///
/// The store already auto-closes on start; this wrapper is the path the
/// presentation layer goes through for open/close transitions, and it
/// re-reads [`Database::running_entry`] after every mutation so a concurrent
/// writer (say, a second process on the same file) cannot leave the cached
/// view stale.
pub struct Session {
    db: Database,
    running: Option<EntryRecord>,
}

impl Session {
    /// Wraps a database, picking up any entry left running by a previous
    /// process.
    pub fn new(db: Database) -> Result<Self, DbError> {
        let running = db.running_entry()?;
        Ok(Self { db, running })
    }

    /// Read access to the underlying store.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The cached running entry, if any.
    pub fn running(&self) -> Option<&EntryRecord> {
        self.running.as_ref()
    }

    /// Starts a new entry. Whatever was running is auto-closed by the store:
    /// last start wins, the request is never rejected.
    pub fn start(&mut self, project: &str, task: &str, notes: &str) -> Result<i64, DbError> {
        let id = self.db.start_entry(project, task, notes)?;
        self.refresh()?;
        Ok(id)
    }

    /// Stops the running entry and returns its closed record, or `None` when
    /// nothing was running.
    ///
    /// The store only stops by id, so the cache is consulted first and
    /// refreshed from the store when empty — "stop whatever is running" works
    /// from a fresh process too.
    pub fn stop(&mut self) -> Result<Option<EntryRecord>, DbError> {
        if self.running.is_none() {
            self.refresh()?;
        }
        let Some(entry) = self.running.take() else {
            return Ok(None);
        };
        self.db.stop_entry(entry.id)?;
        let closed = self.db.entry(entry.id)?;
        self.refresh()?;
        Ok(closed)
    }

    /// Re-reads the running entry from the store.
    pub fn refresh(&mut self) -> Result<(), DbError> {
        self.running = self.db.running_entry()?;
        Ok(())
    }
}
