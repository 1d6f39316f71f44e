//! Othello client - Unified CLI
//!
//! Headless commands for scripting plus an interactive terminal board.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use othello_client::{
    ClientConfig, Color, GameSession, HttpGameServer, NoopObserver, Position, RefreshReport,
    SERVER_URL_ENV, TurnOutcome,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play => {
            let config = load_config(&cli.config, cli.server_url)?;
            tui::run_tui(config).await
        }
        Command::Board => {
            initialize_tracing();
            let config = load_config(&cli.config, cli.server_url)?;
            run_board(config).await
        }
        Command::Move { row, col } => {
            initialize_tracing();
            let config = load_config(&cli.config, cli.server_url)?;
            run_move(config, row, col).await
        }
    }
}

/// Loads the config file, then applies the environment and CLI overrides.
#[instrument(skip(path))]
fn load_config(path: &std::path::Path, server_url: Option<String>) -> Result<ClientConfig> {
    let config = ClientConfig::load_or_default(path)?
        .with_server_override(std::env::var(SERVER_URL_ENV).ok())
        .with_server_override(server_url);
    config.validate()?;
    Ok(config)
}

/// Fetch and print the board once
#[instrument(skip_all)]
async fn run_board(config: ClientConfig) -> Result<()> {
    let server = HttpGameServer::new(&config)?;
    let session = GameSession::new(server, &config, Arc::new(NoopObserver));

    let report = session.refresh().await;
    print_state(&session).await;
    warn_incomplete(&report);
    Ok(())
}

/// Submit one move headlessly
#[instrument(skip(config))]
async fn run_move(config: ClientConfig, row: u8, col: u8) -> Result<()> {
    let position = Position::new(row, col)?;
    let server = HttpGameServer::new(&config)?;
    let session = GameSession::new(server, &config, Arc::new(NoopObserver));

    match session.submit_move(position).await? {
        TurnOutcome::Rejected => {
            println!("Move {} rejected as illegal", position);
        }
        TurnOutcome::Completed { ack, cpu } => {
            info!(ack = %ack, passes = cpu.passes, "Turn complete");
            println!("Move {} accepted ({})", position, ack);
            if cpu.passes > 0 {
                println!("You had no reply {} time(s); the CPU moved again", cpu.passes);
            }
            print_state(&session).await;
        }
    }
    Ok(())
}

async fn print_state(session: &GameSession<HttpGameServer>) {
    let board = session.board().await;
    let scores = session.scores().await;
    println!("{}", board.render());
    println!(
        "x = {}   o = {}",
        scores.score(Color::Black).value(),
        scores.score(Color::White).value()
    );
}

fn warn_incomplete(report: &RefreshReport) {
    for failure in &report.failures {
        warn!(query = %failure.target, error = %failure.error, "Refresh incomplete");
        eprintln!("Could not read {}: {}", failure.target, failure.error);
    }
}

fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
