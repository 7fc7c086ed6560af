//! Store-specific error types.
//!
//! Every user store operation returns [`StoreError`] on failure. Callers match
//! on the variant to tell a duplicate username or a rejected role apart from a
//! storage fault. Absence is never an error; lookups return `Ok(None)`.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::services::password::PasswordError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert hit the UNIQUE constraint on `users.username`.
    #[error("username '{0}' already exists")]
    UsernameTaken(String),

    /// Insert hit the CHECK constraint on `users.role`.
    #[error("role '{0}' is not allowed")]
    InvalidRole(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// The data directory could not be created.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The database file could not be opened.
    #[error("failed to open database: {0}")]
    Connection(#[source] DbErr),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// A stored row does not map onto the typed record.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Blocking task failure (e.g., join error).
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Classify a failed `INSERT INTO users`.
    pub(crate) fn from_insert(err: DbErr, username: &str, role: &str) -> Self {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return Self::UsernameTaken(username.to_string());
        }

        let message = err.to_string();
        if message.contains("UNIQUE constraint failed") {
            Self::UsernameTaken(username.to_string())
        } else if message.contains("CHECK constraint failed") {
            Self::InvalidRole(role.to_string())
        } else {
            Self::Database(err)
        }
    }
}
