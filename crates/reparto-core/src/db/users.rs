//! User roster storage.

use rusqlite::OptionalExtension;

use super::{Database, DbResult};

/// Password assigned to newly seeded users and restored on reset.
pub const DEFAULT_PASSWORD: &str = "1";

/// A ward staff account. The password is stored and compared as plain
/// text, faithfully to the system this replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub password: String,
}

impl Database {
    /// Add roster names that are not present yet, with the default
    /// password. Existing accounts are left untouched.
    pub fn seed_users(&self, roster: &[&str]) -> DbResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO users (name, password) VALUES (?1, ?2)",
        )?;
        for name in roster {
            stmt.execute(rusqlite::params![name, DEFAULT_PASSWORD])?;
        }
        Ok(())
    }

    pub fn get_user(&self, name: &str) -> DbResult<Option<User>> {
        self.conn
            .query_row(
                "SELECT name, password FROM users WHERE name = ?",
                [name],
                |row| {
                    Ok(User {
                        name: row.get(0)?,
                        password: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn set_user_password(&self, name: &str, password: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE users SET password = ?2, updated_at = datetime('now') WHERE name = ?1",
            rusqlite::params![name, password],
        )?;
        Ok(rows_affected > 0)
    }

    /// Account names only; passwords never leave the storage layer.
    pub fn list_user_names(&self) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM users ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_assigns_default_password() {
        let db = Database::open_in_memory().unwrap();
        db.seed_users(&["anna", "mario"]).unwrap();

        let user = db.get_user("anna").unwrap().unwrap();
        assert_eq!(user.password, DEFAULT_PASSWORD);
        assert_eq!(db.list_user_names().unwrap(), vec!["anna", "mario"]);
    }

    #[test]
    fn test_seed_keeps_existing_passwords() {
        let db = Database::open_in_memory().unwrap();
        db.seed_users(&["anna"]).unwrap();
        db.set_user_password("anna", "segreta").unwrap();

        // Re-seeding with an extended roster must not reset anna
        db.seed_users(&["anna", "mario"]).unwrap();
        assert_eq!(db.get_user("anna").unwrap().unwrap().password, "segreta");
        assert_eq!(
            db.get_user("mario").unwrap().unwrap().password,
            DEFAULT_PASSWORD
        );
    }

    #[test]
    fn test_set_password_unknown_user() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.set_user_password("nessuno", "x").unwrap());
    }
}
