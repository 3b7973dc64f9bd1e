//! Command-line interface for tictactoe_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tic-tac-toe in the browser against a random opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe_server")]
#[command(about = "Browser tic-tac-toe against a random opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to the TOML config file (defaults are used if it is missing)
        #[arg(short, long, default_value = "tictactoe.toml")]
        config: PathBuf,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Store sessions in this SQLite file instead of memory
        #[arg(long)]
        sqlite: Option<String>,

        /// Seed for the computer opponent (for reproducible games)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write a config file with default values
    InitConfig {
        /// Where to write the file
        #[arg(default_value = "tictactoe.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
