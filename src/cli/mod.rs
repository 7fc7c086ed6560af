//! CLI module - Command-line interface for Condominio
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Condominio - condominium management backend
#[derive(Parser)]
#[command(name = "condominio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config.toml (skips the default search paths)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    #[command(alias = "web")]
    Serve,

    /// Create the users table if missing and report the user count
    InitDb,

    /// Create a user account
    CreateUser {
        /// Username (must be unique)
        username: String,
        /// Role: condomino, amministratore or portinaio
        role: String,
        /// Plaintext password
        #[arg(long, env = "CONDOMINIO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Check a password against a stored account
    CheckPassword {
        /// Username to look up
        username: String,
        /// Candidate password
        #[arg(long, env = "CONDOMINIO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
