use crate::config::Config;
use crate::db::{ConnectionProvider, UserStore};

pub async fn cmd_init_db(config: &Config) -> anyhow::Result<()> {
    let provider = ConnectionProvider::from_config(&config.general);
    println!("Initializing database at {}...", provider.db_path().display());

    let store = UserStore::new(provider, config.security.clone());
    store.ensure_schema(None).await?;

    let count = store.count_users().await?;
    println!("✓ Database initialized ({count} users)");

    Ok(())
}
