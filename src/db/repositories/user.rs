use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use tokio::task;
use tracing::{error, info, warn};

use crate::config::SecurityConfig;
use crate::db::{ConnectionProvider, StoreError};
use crate::domain::Role;
use crate::entities::{prelude::*, users};
use crate::models::User;
use crate::services::password;

const CREATE_USERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        role TEXT NOT NULL CHECK(role IN ('condomino', 'amministratore', 'portinaio'))
    )";

impl TryFrom<users::Model> for User {
    type Error = StoreError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        let role = model
            .role
            .parse::<Role>()
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        Ok(Self {
            id: model.id.into(),
            username: model.username,
            password_hash: model.password,
            role,
        })
    }
}

/// Owns the `users` table.
///
/// Every operation opens its own connection through the [`ConnectionProvider`]
/// and releases it before returning, whatever the outcome.
#[derive(Debug, Clone)]
pub struct UserStore {
    provider: ConnectionProvider,
    security: SecurityConfig,
}

impl UserStore {
    #[must_use]
    pub const fn new(provider: ConnectionProvider, security: SecurityConfig) -> Self {
        Self { provider, security }
    }

    #[must_use]
    pub const fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Create the `users` table if it does not exist yet.
    ///
    /// A supplied connection stays open and owned by the caller; otherwise one
    /// is opened for the call and released afterwards.
    pub async fn ensure_schema(
        &self,
        conn: Option<&DatabaseConnection>,
    ) -> Result<(), StoreError> {
        let result = match conn {
            Some(conn) => create_users_table(conn).await,
            None => {
                let conn = self.provider.open().await?;
                let result = create_users_table(&conn).await;
                conn.release().await;
                result
            }
        };

        if let Err(e) = &result {
            error!(error = %e, "Failed to initialize users table");
        }
        result
    }

    /// Insert a new account and return its id.
    ///
    /// `role` is written as given; values outside the allowed set are rejected
    /// by the table constraint and reported as [`StoreError::InvalidRole`].
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, StoreError> {
        if username.is_empty() {
            return Err(StoreError::Validation("username is required".to_string()));
        }
        if password.is_empty() {
            return Err(StoreError::Validation("password is required".to_string()));
        }

        let password = password.to_string();
        let security = self.security.clone();
        let hash = task::spawn_blocking(move || password::hash_password(&password, &security))
            .await
            .map_err(|e| StoreError::Internal(format!("Password hashing task panicked: {e}")))??;

        let conn = self.provider.open().await?;
        let result = insert_user(&conn, username, &hash, role).await;
        conn.release().await;

        match &result {
            Ok(id) => info!(user_id = id, username, role, "User created"),
            Err(StoreError::UsernameTaken(_)) => warn!(username, "Username already exists"),
            Err(StoreError::InvalidRole(_)) => {
                warn!(username, role, "Rejected user with invalid role");
            }
            Err(e) => error!(username, error = %e, "Database error during user creation"),
        }

        result
    }

    /// Look up an account by exact, case-sensitive username.
    ///
    /// `Ok(None)` means no such user; storage faults come back as `Err`.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self.provider.open().await?;
        let result = find_by_username(&conn, username).await;
        conn.release().await;

        if let Err(e) = &result {
            error!(username, error = %e, "Database error while fetching user");
        }
        result
    }

    /// Look up `username` and check `password` against its stored hash.
    ///
    /// Returns the user on a match, `None` for an unknown user or a wrong password.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let Some(user) = self.get_user_by_username(username).await? else {
            return Ok(None);
        };

        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let is_valid =
            task::spawn_blocking(move || password::verify_password(&password, &password_hash))
                .await
                .map_err(|e| {
                    StoreError::Internal(format!("Password verification task panicked: {e}"))
                })?;

        Ok(is_valid.then_some(user))
    }

    pub async fn count_users(&self) -> Result<u64, StoreError> {
        let conn = self.provider.open().await?;
        let result = Users::find().count(&*conn).await.map_err(StoreError::from);
        conn.release().await;
        result
    }
}

async fn create_users_table(conn: &DatabaseConnection) -> Result<(), StoreError> {
    let txn = conn.begin().await?;
    txn.execute_unprepared(CREATE_USERS_TABLE).await?;
    txn.commit().await?;
    Ok(())
}

async fn insert_user(
    conn: &DatabaseConnection,
    username: &str,
    password_hash: &str,
    role: &str,
) -> Result<i64, StoreError> {
    let active_model = users::ActiveModel {
        username: Set(username.to_string()),
        password: Set(password_hash.to_string()),
        role: Set(role.to_string()),
        ..Default::default()
    };

    // Dropping an uncommitted transaction rolls it back.
    let txn = conn.begin().await?;
    let inserted = Users::insert(active_model)
        .exec(&txn)
        .await
        .map_err(|e| StoreError::from_insert(e, username, role))?;
    txn.commit().await?;

    Ok(inserted.last_insert_id)
}

async fn find_by_username(
    conn: &DatabaseConnection,
    username: &str,
) -> Result<Option<User>, StoreError> {
    let model = Users::find()
        .filter(users::Column::Username.eq(username))
        .one(conn)
        .await?;

    model.map(User::try_from).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_db_path;
    use sea_orm::Statement;

    fn fast_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    async fn test_store(label: &str) -> UserStore {
        let provider = ConnectionProvider::new(temp_db_path(label));
        let store = UserStore::new(provider, fast_security());
        store.ensure_schema(None).await.unwrap();
        store
    }

    async fn users_table_count(store: &UserStore) -> i64 {
        let conn = store.provider().open().await.unwrap();
        let backend = conn.get_database_backend();
        let row = conn
            .query_one(Statement::from_string(
                backend,
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'users'"
                    .to_string(),
            ))
            .await
            .unwrap()
            .unwrap();
        let count: i64 = row.try_get("", "n").unwrap();
        conn.release().await;
        count
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = test_store("schema").await;
        store.ensure_schema(None).await.unwrap();

        assert_eq!(users_table_count(&store).await, 1);
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ensure_schema_keeps_caller_connection_open() {
        let provider = ConnectionProvider::new(temp_db_path("schema-conn"));
        let store = UserStore::new(provider.clone(), fast_security());

        let conn = provider.open().await.unwrap();
        store.ensure_schema(Some(&*conn)).await.unwrap();
        store.ensure_schema(Some(&*conn)).await.unwrap();

        let count = Users::find().count(&*conn).await.unwrap();
        assert_eq!(count, 0);
        conn.release().await;
    }

    #[tokio::test]
    async fn test_create_and_lookup_roundtrip() {
        let store = test_store("roundtrip").await;

        let id = store
            .create_user("alice", "secret123", "condomino")
            .await
            .unwrap();

        let user = store.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.id.value(), id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Condomino);
        assert_ne!(user.password_hash, "secret123");

        assert!(password::verify_password("secret123", &user.password_hash));
        assert!(!password::verify_password("wrongpass", &user.password_hash));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let store = test_store("duplicate").await;

        store
            .create_user("U1", "first-password", "condomino")
            .await
            .unwrap();
        let original = store.get_user_by_username("U1").await.unwrap().unwrap();

        let result = store
            .create_user("U1", "other-password", "amministratore")
            .await;
        assert!(matches!(result, Err(StoreError::UsernameTaken(ref name)) if name == "U1"));

        let after = store.get_user_by_username("U1").await.unwrap().unwrap();
        assert_eq!(after, original);
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_role_is_rejected_by_storage() {
        let store = test_store("role").await;

        let result = store.create_user("mallory", "pw", "guest").await;
        assert!(matches!(result, Err(StoreError::InvalidRole(ref role)) if role == "guest"));
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_credentials_are_rejected() {
        let store = test_store("empty").await;

        assert!(matches!(
            store.create_user("", "pw", "condomino").await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.create_user("bob", "", "condomino").await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let store = test_store("absent").await;
        assert!(store.get_user_by_username("nobody").await.unwrap().is_none());

        store
            .create_user("alice", "secret123", "condomino")
            .await
            .unwrap();
        assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let store = test_store("case").await;
        store
            .create_user("alice", "secret123", "condomino")
            .await
            .unwrap();

        assert!(store.get_user_by_username("Alice").await.unwrap().is_none());
        assert!(store.get_user_by_username("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sequential_ids_increase() {
        let store = test_store("ids").await;

        let first = store
            .create_user("bob_admin", "adminpass", "amministratore")
            .await
            .unwrap();
        let second = store
            .create_user("charlie_portiere", "portierepass", "portinaio")
            .await
            .unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let store = test_store("verify").await;
        let id = store
            .create_user("alice", "secret123", "condomino")
            .await
            .unwrap();

        let user = store
            .verify_credentials("alice", "secret123")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id.value(), id);

        assert!(store
            .verify_credentials("alice", "wrongpass")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .verify_credentials("nobody", "secret123")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_lookup_without_schema_is_a_storage_error() {
        let provider = ConnectionProvider::new(temp_db_path("no-schema"));
        let store = UserStore::new(provider, fast_security());

        let result = store.get_user_by_username("alice").await;
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    /// Open descriptors of this process pointing into the store's data directory.
    #[cfg(target_os = "linux")]
    fn open_handles(store: &UserStore) -> usize {
        let dir = store.provider().db_path().parent().unwrap().to_path_buf();
        std::fs::read_dir("/proc/self/fd")
            .unwrap()
            .filter_map(|entry| std::fs::read_link(entry.ok()?.path()).ok())
            .filter(|target| target.starts_with(&dir))
            .count()
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_connections_released_on_every_outcome() {
        let store = test_store("release").await;
        store
            .create_user("alice", "secret123", "condomino")
            .await
            .unwrap();
        assert_eq!(open_handles(&store), 0);

        for _ in 0..25 {
            assert!(matches!(
                store.create_user("alice", "other", "condomino").await,
                Err(StoreError::UsernameTaken(_))
            ));
            assert!(matches!(
                store.create_user("mallory", "pw", "guest").await,
                Err(StoreError::InvalidRole(_))
            ));
            assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
            assert!(store
                .verify_credentials("alice", "wrongpass")
                .await
                .unwrap()
                .is_none());
        }

        assert_eq!(open_handles(&store), 0);
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(open_handles(&store), 0);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_failed_lookup_releases_connection() {
        let provider = ConnectionProvider::new(temp_db_path("release-fault"));
        let store = UserStore::new(provider, fast_security());

        for _ in 0..10 {
            assert!(store.get_user_by_username("alice").await.is_err());
        }
        assert_eq!(open_handles(&store), 0);
    }
}
