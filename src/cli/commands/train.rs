//! Train command - self-play training with optional interactive play

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::{
    cli::commands::play,
    learning::ValueAgent,
    pipeline::{TrainingConfig, TrainingPipeline},
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Train two self-play agents")]
pub struct TrainArgs {
    /// Number of self-play training episodes
    #[arg(long, short = 'e', default_value_t = 100_000)]
    pub episodes: usize,

    /// Learning rate for both agents (0.0 exclusive to 1.0 inclusive)
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Exploration probability for both agents during training
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Episode interval at which cumulative win/draw rates are sampled
    #[arg(long, default_value_t = 10)]
    pub sample_interval: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional CSV output for the win/draw-rate curves
    #[arg(long)]
    pub metrics: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true)]
    pub progress: bool,

    /// Play interactively against the trained agents afterwards
    #[arg(long, default_value_t = false)]
    pub play: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    if !(args.learning_rate > 0.0 && args.learning_rate <= 1.0) {
        bail!(
            "learning rate must be in (0.0, 1.0], got {}",
            args.learning_rate
        );
    }
    if !(0.0..=1.0).contains(&args.epsilon) {
        bail!("epsilon must be in [0.0, 1.0], got {}", args.epsilon);
    }

    let mut first = ValueAgent::new(Player::X, args.learning_rate, args.epsilon);
    let mut second = ValueAgent::new(Player::O, args.learning_rate, args.epsilon);

    let config = TrainingConfig {
        episodes: args.episodes,
        sample_interval: args.sample_interval,
        seed: args.seed,
        progress: args.progress,
    };

    let report = TrainingPipeline::new(config).run(&mut first, &mut second)?;
    let summary = &report.summary;

    println!("Training complete: {} episodes", summary.total_episodes);
    println!(
        "  X wins: {} ({:.1}%)",
        summary.first_wins,
        summary.first_win_rate * 100.0
    );
    println!(
        "  O wins: {} ({:.1}%)",
        summary.second_wins,
        summary.second_win_rate * 100.0
    );
    println!(
        "  draws:  {} ({:.1}%)",
        summary.draws,
        summary.draw_rate * 100.0
    );
    println!(
        "  states valued: X={} O={}",
        first.table().len(),
        second.table().len()
    );

    if let Some(path) = &args.metrics {
        report.metrics.save_csv(path)?;
        println!("Metrics written to {}", path.display());
    }

    if let Some(path) = &args.summary {
        report.summary.save(path)?;
        println!("Summary written to {}", path.display());
    }

    if args.play {
        play::play_session(&mut first, &mut second)?;
    }

    Ok(())
}
