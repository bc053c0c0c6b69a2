//! valueplay CLI - self-play TD value learning for Tic-Tac-Toe
//!
//! Trains two self-playing agents, optionally exports win/draw-rate curves
//! for plotting, and can drop into an interactive game against the trained
//! agents.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "valueplay")]
#[command(version, about = "Self-play TD value learning for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train two self-play agents (use --play to face them afterwards)
    Train(valueplay::cli::commands::train::TrainArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => valueplay::cli::commands::train::execute(args),
    }
}
