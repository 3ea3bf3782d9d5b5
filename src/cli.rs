//! Command-line interface for strictly_morpion.

use clap::{Parser, Subcommand};

/// Strictly Morpion - real-time lobby server for grid games
#[derive(Parser, Debug)]
#[command(name = "strictly_morpion")]
#[command(about = "Real-time morpion lobby server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket game server
    Serve {
        /// Path to a TOML config file (defaults are used when absent)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate a config file and print the effective settings
    CheckConfig {
        /// Path to the TOML config file
        #[arg(short, long, default_value = "morpion.toml")]
        config: std::path::PathBuf,
    },
}
