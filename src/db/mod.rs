//! SQLite persistence for user accounts.
//!
//! - [`ConnectionProvider`]: opens the single database file, creating its directory on demand
//! - [`ScopedConnection`]: a connection that lives for one store operation
//! - [`UserStore`]: `users` schema ownership plus create/lookup operations

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::GeneralConfig;

mod error;
pub mod repositories;

pub use error::StoreError;
pub use repositories::user::UserStore;

/// Hands out fresh connections to the database file at a fixed path.
///
/// There is no pooling, retry or timeout: every call to [`open`](Self::open)
/// yields a new single-connection handle.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    db_path: PathBuf,
}

impl ConnectionProvider {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GeneralConfig) -> Self {
        Self::new(config.database_path())
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection, creating the containing directory and the file if absent.
    ///
    /// Directory and file errors are returned to the caller untouched.
    pub async fn open(&self) -> Result<ScopedConnection, StoreError> {
        if let Some(parent) = self.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        // The path goes to sqlx as-is; a formatted URL would be percent-decoded.
        let filename = self.db_path.clone();
        let mut opt = ConnectOptions::new("sqlite:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false)
            .map_sqlx_sqlite_opts(move |o| o.filename(&filename).create_if_missing(true));

        let conn = Database::connect(opt)
            .await
            .map_err(StoreError::Connection)?;

        debug!(path = %self.db_path.display(), "Opened database connection");

        Ok(ScopedConnection { conn })
    }

    /// Round-trip `SELECT 1` through a fresh connection.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.open().await?;
        let backend = conn.get_database_backend();
        let result = conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await
            .map(|_| ())
            .map_err(StoreError::from);
        conn.release().await;
        result
    }
}

/// A connection owned by a single store operation.
///
/// Call [`release`](Self::release) once the work is done. If the owning future
/// is dropped early the handle is dropped with it, which closes the file.
pub struct ScopedConnection {
    conn: DatabaseConnection,
}

impl ScopedConnection {
    pub async fn release(self) {
        if let Err(e) = self.conn.close().await {
            warn!(error = %e, "Failed to close database connection");
        }
    }
}

impl Deref for ScopedConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}
