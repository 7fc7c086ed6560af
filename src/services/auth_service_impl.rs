//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::UserStore;
use crate::services::auth_service::{AuthError, AuthService, RegisteredUser, UserInfo};
use async_trait::async_trait;
use tracing::debug;

pub struct SeaOrmAuthService {
    store: UserStore,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: UserStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<RegisteredUser, AuthError> {
        let id = self.store.create_user(username, password, role).await?;

        Ok(RegisteredUser {
            id: id.into(),
            username: username.to_string(),
            role: role.to_string(),
        })
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .verify_credentials(username, password)
            .await?
            .ok_or_else(|| {
                debug!(username, "Login rejected");
                AuthError::InvalidCredentials
            })?;

        Ok(UserInfo::from(user))
    }
}
