//! Live ward document storage (single-row, whole-document writes).

use rusqlite::OptionalExtension;

use super::{Database, DbResult};
use crate::models::WardDocument;

impl Database {
    /// Load the live document. A missing row, corrupt JSON or a mis-shapen
    /// payload all degrade to the initial empty document; only storage
    /// errors propagate.
    pub fn load_document(&self) -> DbResult<WardDocument> {
        let stored: Option<String> = self
            .conn
            .query_row("SELECT data FROM ward_document WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(raw) = stored else {
            return Ok(WardDocument::default());
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                tracing::warn!(error = %e, "stored ward document is unreadable, starting empty");
                Ok(WardDocument::default())
            }
        }
    }

    /// Overwrite the live document with an already-serialized payload.
    /// The whole document is one value; there are no partial writes.
    pub fn save_document(&self, serialized: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO ward_document (id, data, saved_at)
            VALUES (1, ?1, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET data = ?1, saved_at = datetime('now')
            "#,
            [serialized],
        )?;
        Ok(())
    }
}
