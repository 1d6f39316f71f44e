//! Command-line interface for othello_client.

use clap::{Parser, Subcommand};

/// Othello client - plays against a remote rules server
#[derive(Parser, Debug)]
#[command(name = "othello_client")]
#[command(about = "Terminal client for a remote Othello server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client config file (defaults are used if it is missing)
    #[arg(short, long, global = true, default_value = "othello_client.toml")]
    pub config: std::path::PathBuf,

    /// Rules server URL, overriding the config file and OTHELLO_SERVER_URL
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively in the terminal
    Play,

    /// Fetch the board and scores once and print them
    Board,

    /// Submit one move, let the CPU answer, and print the result
    Move {
        /// Row (0-7)
        #[arg(value_parser = clap::value_parser!(u8).range(0..8))]
        row: u8,

        /// Column (0-7)
        #[arg(value_parser = clap::value_parser!(u8).range(0..8))]
        col: u8,
    },
}
