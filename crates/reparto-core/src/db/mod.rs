//! Database layer for the ward registry.
//!
//! One SQLite file holds the three durable stores: the live ward document
//! (single row), the append-only backup log, and the user roster.

mod backups;
mod document;
mod schema;
mod users;

pub use backups::*;
pub use schema::*;
pub use users::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors. Corrupt stored JSON is not an error at this layer:
/// reads degrade leniently instead (see the document and backup stores).
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Open an existing database file without write access. The schema is
    /// assumed to be in place; used to exercise persistence-failure paths.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        )?;
        Ok(Self { conn })
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
