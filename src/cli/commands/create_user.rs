use crate::config::Config;
use crate::db::{ConnectionProvider, StoreError, UserStore};

pub async fn cmd_create_user(
    config: &Config,
    username: &str,
    role: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = UserStore::new(
        ConnectionProvider::from_config(&config.general),
        config.security.clone(),
    );
    store.ensure_schema(None).await?;

    match store.create_user(username, password, role).await {
        Ok(id) => {
            println!("✓ User {username} created with ID: {id}");
            Ok(())
        }
        Err(StoreError::UsernameTaken(_)) => {
            anyhow::bail!("Username '{username}' already exists")
        }
        Err(StoreError::InvalidRole(_)) => {
            anyhow::bail!("Invalid role: {role} (use one of: condomino, amministratore, portinaio)")
        }
        Err(e) => Err(e.into()),
    }
}
