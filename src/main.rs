//! Strictly Morpion - server binary

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use strictly_morpion::{GameServer, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_morpion=debug")),
        )
        .init();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::CheckConfig { config } => check_config(config),
    }
}

/// Run the WebSocket game server
#[instrument]
async fn run_server(config: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config.as_deref())?.with_address(host, port);
    config.validate()?;

    info!(
        host = %config.host(),
        port = config.port(),
        game = ?config.game(),
        "Starting Strictly Morpion server on ws://{}:{}/ws",
        config.host(),
        config.port()
    );

    GameServer::new(config).run().await
}

/// Validate a config file
#[instrument]
fn check_config(path: PathBuf) -> Result<()> {
    let config = ServerConfig::from_file(&path)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<ServerConfig> {
    match path {
        Some(path) => Ok(ServerConfig::from_file(path)?),
        None => {
            info!("No config file given, using defaults");
            Ok(ServerConfig::default())
        }
    }
}
