//! Squad Admin Configurator Bridge - Main Entry Point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use sac_bridge::cli::{Cli, Command};
use sac_bridge::config;
use sac_bridge::privileges::PrivilegesService;
use sac_bridge::render::render;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sac_bridge=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration; refuse to start on any inconsistency
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        guilds = config.permissions.guilds().count(),
        webhooks = config.webhooks.len(),
        "Starting privileges bridge"
    );

    let service = PrivilegesService::new(Arc::new(config));

    let outcome = match cli.command {
        Command::Get { steam_id, caller } => service.get(&caller.into(), &steam_id).await,
        Command::Grant {
            steam_id,
            role_name,
            name,
            comment,
            duration,
            caller,
        } => {
            let command = Command::grant_command(role_name, name, comment, duration);
            service.grant(&caller.into(), &steam_id, command).await
        }
    };

    println!("{}", render(&outcome));

    if !outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
