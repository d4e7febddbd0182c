//! Named counter contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the shared allocation state behind roll-number generation.
//! - Keep increment-and-fetch a single atomic statement.
//!
//! # Invariants
//! - At most one `counters` row exists per name.
//! - `sequence_value` only decreases through an explicit `reset`.
//! - Concurrent `increment_and_fetch` calls on one name never return the
//!   same value: SQLite serializes writers, and the upsert reads and writes
//!   the row inside one statement.

use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Counter name backing student roll numbers.
pub const ROLL_NO_COUNTER: &str = "roll_no";

/// Contract for named, persisted monotonic counters.
///
/// Storage failures propagate unmodified; no retry happens at this layer.
pub trait CounterStore {
    /// Atomically increments the named counter and returns the new value.
    ///
    /// An absent counter behaves as if it held 0, so the first call on a
    /// fresh store returns 1.
    fn increment_and_fetch(&self, name: &str) -> RepoResult<i64>;

    /// Atomically sets the named counter to `value`, creating it if absent.
    ///
    /// Intended only for the empty-collection bootstrap; normal allocation
    /// never moves a counter backwards.
    fn reset(&self, name: &str, value: i64) -> RepoResult<()>;

    /// Reads the current value, or `None` when the counter does not exist.
    ///
    /// Diagnostics and tests only; allocation paths never read without
    /// incrementing.
    fn get(&self, name: &str) -> RepoResult<Option<i64>>;
}

/// SQLite-backed counter store over the `counters` table.
pub struct SqliteCounterStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCounterStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CounterStore for SqliteCounterStore<'_> {
    fn increment_and_fetch(&self, name: &str) -> RepoResult<i64> {
        let value = self.conn.query_row(
            "INSERT INTO counters (id, sequence_value) VALUES (?1, 1)
             ON CONFLICT(id) DO UPDATE SET sequence_value = sequence_value + 1
             RETURNING sequence_value;",
            params![name],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(value)
    }

    fn reset(&self, name: &str, value: i64) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO counters (id, sequence_value) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET sequence_value = excluded.sequence_value;",
            params![name, value],
        )?;
        Ok(())
    }

    fn get(&self, name: &str) -> RepoResult<Option<i64>> {
        let value = self
            .conn
            .query_row(
                "SELECT sequence_value FROM counters WHERE id = ?1;",
                params![name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(value)
    }
}
