pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;

/// Load the config named on the command line, or search the default locations.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.validate()?;
    Ok(config)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `general.log_level`.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.general.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.context("Failed to install tracing subscriber")?;

    Ok(())
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cli::cmd_serve(config).await,

        Commands::InitDb => cli::cmd_init_db(&config).await,

        Commands::CreateUser {
            username,
            role,
            password,
        } => cli::cmd_create_user(&config, &username, &role, &password).await,

        Commands::CheckPassword { username, password } => {
            cli::cmd_check_password(&config, &username, &password).await
        }

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}
