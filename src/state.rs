use std::sync::Arc;

use crate::config::Config;
use crate::db::{ConnectionProvider, UserStore};
use crate::services::{AnnouncementBoard, AuthService, SeaOrmAuthService};

/// Process-wide state shared by the HTTP layer and the CLI.
///
/// The announcement board lives here and nowhere else, so it is empty at
/// startup and gone at shutdown.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub user_store: UserStore,

    pub auth_service: Arc<dyn AuthService>,

    pub announcements: Arc<AnnouncementBoard>,
}

impl SharedState {
    /// Build the state and make sure the `users` table exists.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let provider = ConnectionProvider::from_config(&config.general);
        let user_store = UserStore::new(provider, config.security.clone());

        user_store.ensure_schema(None).await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(user_store.clone()));

        Ok(Self {
            config: Arc::new(config),
            user_store,
            auth_service,
            announcements: Arc::new(AnnouncementBoard::new()),
        })
    }
}
