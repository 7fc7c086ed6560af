//! Domain service for account registration and login.
//!
//! No session or token is issued; a successful login only returns the
//! account's public fields.

use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::domain::{Role, UserId};
use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(username) => Self::UsernameTaken(username),
            StoreError::InvalidRole(role) => Self::InvalidRole(role),
            StoreError::Validation(msg) => Self::Validation(msg),
            StoreError::Io(_)
            | StoreError::Connection(_)
            | StoreError::Database(_)
            | StoreError::InvalidData(_) => Self::Database(err.to_string()),
            StoreError::Password(_) | StoreError::Internal(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Result of a successful registration.
///
/// `role` echoes the stored text; it passed the table constraint.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub username: String,
    pub role: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] for a duplicate username and
    /// [`AuthError::InvalidRole`] when the role is outside the allowed set.
    async fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<RegisteredUser, AuthError>;

    /// Verifies credentials and returns user info.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user or a wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;
}
