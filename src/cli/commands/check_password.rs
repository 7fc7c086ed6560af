use crate::config::Config;
use crate::db::{ConnectionProvider, UserStore};

pub async fn cmd_check_password(
    config: &Config,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let store = UserStore::new(
        ConnectionProvider::from_config(&config.general),
        config.security.clone(),
    );
    store.ensure_schema(None).await?;

    match store.verify_credentials(username, password).await? {
        Some(user) => println!(
            "✓ Password matches for {} (ID: {}, role: {})",
            user.username, user.id, user.role
        ),
        None => println!("✗ Unknown user or wrong password"),
    }

    Ok(())
}
