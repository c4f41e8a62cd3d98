//! # sowp-admin
//!
//! Maintenance console for the SOWP course platform.  Opens the same local
//! store the apps use and offers:
//! - retention sweeps (cooldown-aware or forced) and a periodic sweep loop
//! - paged course, topic and user listings with search and sort
//! - catalog import from a JSON dump
//! - chat mode control and a plain-text chat log

mod cli;
mod commands;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sowp_client::{AppState, ClientConfig};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sowp_admin=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = Some(db);
    }
    info!(?config, "Loaded configuration");

    let state = AppState::open(config)?;
    commands::run(&state, cli.command).await
}
