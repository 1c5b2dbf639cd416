//! SQLite schema definition.

/// Complete database schema for the ward registry.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Live Ward Document (single row, whole-document writes only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS ward_document (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    data TEXT NOT NULL,                          -- JSON WardDocument
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Backup Log (append-only - immutable after creation)
-- ============================================================================

CREATE TABLE IF NOT EXISTS backups (
    timestamp INTEGER PRIMARY KEY,               -- epoch milliseconds of the commit
    user TEXT NOT NULL,
    data TEXT NOT NULL,                          -- serialized WardDocument
    checksum TEXT NOT NULL,                      -- SHA-256 of data
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Entries are append-only: restore reads them, nothing rewrites them
CREATE TRIGGER IF NOT EXISTS backups_no_update BEFORE UPDATE ON backups
BEGIN
    SELECT RAISE(ABORT, 'Backup entries are immutable');
END;

-- ============================================================================
-- Users
-- ============================================================================

CREATE TABLE IF NOT EXISTS users (
    name TEXT PRIMARY KEY,
    password TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
    }

    #[test]
    fn test_document_single_row_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO ward_document (id, data) VALUES (1, '{}')",
            [],
        )
        .unwrap();

        // A second row is rejected
        let result = conn.execute(
            "INSERT INTO ward_document (id, data) VALUES (2, '{}')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_backups_are_immutable() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO backups (timestamp, user, data, checksum) VALUES (1, 'anna', '{}', 'x')",
            [],
        )
        .unwrap();

        let result = conn.execute("UPDATE backups SET user = 'mario' WHERE timestamp = 1", []);
        assert!(result.is_err());
    }
}
