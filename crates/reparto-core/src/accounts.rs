//! Staff account management.
//!
//! The password scheme is deliberately the plain-text comparison of the
//! system this replaces; hardening it is out of scope.

use thiserror::Error;

use crate::db::{Database, DbError, DEFAULT_PASSWORD};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("user not found: {0}")]
    UnknownUser(String),

    #[error("old password is incorrect")]
    WrongPassword,

    #[error("new password must not be empty")]
    EmptyPassword,

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type AccountResult<T> = Result<T, AccountError>;

/// Account operations over the user roster.
pub struct Accounts<'a> {
    db: &'a Database,
}

impl<'a> Accounts<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Seed roster names that are missing, with the default password.
    pub fn seed(&self, roster: &[&str]) -> AccountResult<()> {
        self.db.seed_users(roster)?;
        Ok(())
    }

    /// Plain-text credential check. Unknown names simply fail.
    pub fn authenticate(&self, name: &str, password_attempt: &str) -> AccountResult<bool> {
        let Some(user) = self.db.get_user(name)? else {
            return Ok(false);
        };
        Ok(user.password == password_attempt)
    }

    pub fn change_password(
        &self,
        name: &str,
        old_password_attempt: &str,
        new_password: &str,
    ) -> AccountResult<()> {
        let Some(user) = self.db.get_user(name)? else {
            return Err(AccountError::UnknownUser(name.to_string()));
        };
        if user.password != old_password_attempt {
            return Err(AccountError::WrongPassword);
        }
        if new_password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        self.db.set_user_password(name, new_password)?;
        Ok(())
    }

    /// Put an account back on the default password.
    pub fn reset_password(&self, name: &str) -> AccountResult<()> {
        if !self.db.set_user_password(name, DEFAULT_PASSWORD)? {
            return Err(AccountError::UnknownUser(name.to_string()));
        }
        Ok(())
    }

    /// Account names only.
    pub fn user_names(&self) -> AccountResult<Vec<String>> {
        Ok(self.db.list_user_names()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        Accounts::new(&db).seed(&["anna", "mario"]).unwrap();
        db
    }

    #[test]
    fn test_authenticate_with_default_password() {
        let db = setup();
        let accounts = Accounts::new(&db);
        assert!(accounts.authenticate("anna", DEFAULT_PASSWORD).unwrap());
        assert!(!accounts.authenticate("anna", "wrong").unwrap());
        assert!(!accounts.authenticate("nessuno", DEFAULT_PASSWORD).unwrap());
    }

    #[test]
    fn test_change_password_flow() {
        let db = setup();
        let accounts = Accounts::new(&db);

        accounts
            .change_password("anna", DEFAULT_PASSWORD, "segreta")
            .unwrap();
        assert!(accounts.authenticate("anna", "segreta").unwrap());
        assert!(!accounts.authenticate("anna", DEFAULT_PASSWORD).unwrap());
    }

    #[test]
    fn test_change_password_rejections() {
        let db = setup();
        let accounts = Accounts::new(&db);

        assert!(matches!(
            accounts.change_password("nessuno", "1", "x"),
            Err(AccountError::UnknownUser(_))
        ));
        assert!(matches!(
            accounts.change_password("anna", "wrong", "x"),
            Err(AccountError::WrongPassword)
        ));
        assert!(matches!(
            accounts.change_password("anna", DEFAULT_PASSWORD, ""),
            Err(AccountError::EmptyPassword)
        ));
    }

    #[test]
    fn test_reset_password() {
        let db = setup();
        let accounts = Accounts::new(&db);

        accounts
            .change_password("mario", DEFAULT_PASSWORD, "altra")
            .unwrap();
        accounts.reset_password("mario").unwrap();
        assert!(accounts.authenticate("mario", DEFAULT_PASSWORD).unwrap());

        assert!(matches!(
            accounts.reset_password("nessuno"),
            Err(AccountError::UnknownUser(_))
        ));
    }

    #[test]
    fn test_user_names_listed_without_passwords() {
        let db = setup();
        let accounts = Accounts::new(&db);
        assert_eq!(accounts.user_names().unwrap(), vec!["anna", "mario"]);
    }
}
