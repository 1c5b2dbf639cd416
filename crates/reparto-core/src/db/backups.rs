//! Append-only backup log.
//!
//! Every commit of the live document appends one entry keyed by its
//! millisecond timestamp. Entries are never mutated, only appended or
//! bulk-cleared, so the log is a full linear history of the document.

use rusqlite::OptionalExtension;
use sha2::{Digest, Sha256};

use super::{Database, DbResult};

/// Shown when an entry carries no usable user identity.
pub const UNKNOWN_USER: &str = "unknown";

/// A stored snapshot of the ward document.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupEntry {
    /// Epoch milliseconds of the commit; unique key.
    pub timestamp: i64,
    pub user: String,
    /// Serialized `WardDocument`.
    pub data: String,
    /// SHA-256 of `data`, hex-encoded.
    pub checksum: String,
}

/// Metadata for the backup history view.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupMeta {
    pub timestamp: i64,
    pub patient_count: usize,
    pub note_count: usize,
    pub user: String,
}

fn checksum_of(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

impl Database {
    /// Append a snapshot. The timestamp is the primary key: a second append
    /// in the same millisecond fails, which callers treat as best-effort.
    pub fn append_backup(&self, timestamp: i64, user: &str, data: &str) -> DbResult<()> {
        let user = if user.trim().is_empty() { UNKNOWN_USER } else { user };
        self.conn.execute(
            r#"
            INSERT INTO backups (timestamp, user, data, checksum)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            rusqlite::params![timestamp, user, data, checksum_of(data)],
        )?;
        Ok(())
    }

    /// All entries' metadata, newest first. Malformed stored payloads
    /// degrade to zero counts rather than failing the listing.
    pub fn list_backups(&self) -> DbResult<Vec<BackupMeta>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT timestamp, user, data
            FROM backups
            ORDER BY timestamp DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut metas = Vec::new();
        for row in rows {
            let (timestamp, user, data) = row?;
            let (patient_count, note_count) = count_entities(&data);
            let user = if user.trim().is_empty() {
                UNKNOWN_USER.to_string()
            } else {
                user
            };
            metas.push(BackupMeta {
                timestamp,
                patient_count,
                note_count,
                user,
            });
        }
        Ok(metas)
    }

    /// Exact-timestamp lookup.
    pub fn get_backup(&self, timestamp: i64) -> DbResult<Option<BackupEntry>> {
        self.conn
            .query_row(
                r#"
                SELECT timestamp, user, data, checksum
                FROM backups
                WHERE timestamp = ?
                "#,
                [timestamp],
                |row| {
                    Ok(BackupEntry {
                        timestamp: row.get(0)?,
                        user: row.get(1)?,
                        data: row.get(2)?,
                        checksum: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Key of the newest entry, if any. Commit timestamps are kept
    /// strictly above this so sequential writes never collide.
    pub fn latest_backup_timestamp(&self) -> DbResult<Option<i64>> {
        let latest: Option<i64> = self
            .conn
            .query_row("SELECT MAX(timestamp) FROM backups", [], |row| row.get(0))?;
        Ok(latest)
    }

    /// Empty the log. Resetting the live document does NOT call this;
    /// history must survive a reset.
    pub fn clear_backups(&self) -> DbResult<()> {
        self.conn.execute("DELETE FROM backups", [])?;
        Ok(())
    }
}

impl BackupEntry {
    /// Whether the stored payload still matches its recorded checksum.
    pub fn verify(&self) -> bool {
        checksum_of(&self.data) == self.checksum
    }
}

/// Lenient entity counts from a serialized document.
fn count_entities(data: &str) -> (usize, usize) {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(data) else {
        return (0, 0);
    };
    let count = |key: &str| {
        value
            .get(key)
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0)
    };
    (count("patients"), count("wardNotes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_append_and_get() {
        let db = setup_db();
        db.append_backup(100, "anna", r#"{"patients":[],"wardNotes":[]}"#)
            .unwrap();

        let entry = db.get_backup(100).unwrap().unwrap();
        assert_eq!(entry.user, "anna");
        assert!(entry.verify());
    }

    #[test]
    fn test_get_missing_timestamp() {
        let db = setup_db();
        assert!(db.get_backup(12345).unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first_with_counts() {
        let db = setup_db();
        db.append_backup(100, "anna", r#"{"patients":[{},{}],"wardNotes":[{}]}"#)
            .unwrap();
        db.append_backup(300, "mario", r#"{"patients":[{}],"wardNotes":[]}"#)
            .unwrap();
        db.append_backup(200, "anna", r#"{"patients":[],"wardNotes":[]}"#)
            .unwrap();

        let metas = db.list_backups().unwrap();
        assert_eq!(
            metas.iter().map(|m| m.timestamp).collect::<Vec<_>>(),
            vec![300, 200, 100]
        );
        assert_eq!(metas[2].patient_count, 2);
        assert_eq!(metas[2].note_count, 1);
        assert_eq!(metas[0].user, "mario");
    }

    #[test]
    fn test_malformed_payload_degrades_to_zero_counts() {
        let db = setup_db();
        db.append_backup(100, "anna", "garbage").unwrap();

        let metas = db.list_backups().unwrap();
        assert_eq!(metas[0].patient_count, 0);
        assert_eq!(metas[0].note_count, 0);
    }

    #[test]
    fn test_blank_user_becomes_unknown() {
        let db = setup_db();
        db.append_backup(100, "  ", "{}").unwrap();

        let metas = db.list_backups().unwrap();
        assert_eq!(metas[0].user, UNKNOWN_USER);
    }

    #[test]
    fn test_same_millisecond_append_fails() {
        let db = setup_db();
        db.append_backup(100, "anna", "{}").unwrap();
        assert!(db.append_backup(100, "anna", "{}").is_err());
    }

    #[test]
    fn test_clear() {
        let db = setup_db();
        db.append_backup(100, "anna", "{}").unwrap();
        db.append_backup(200, "anna", "{}").unwrap();

        db.clear_backups().unwrap();
        assert!(db.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_checksum_detects_tampering() {
        let entry = BackupEntry {
            timestamp: 1,
            user: "anna".into(),
            data: "{}".into(),
            checksum: checksum_of("something else"),
        };
        assert!(!entry.verify());
    }
}
