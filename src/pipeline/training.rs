//! Training loop over repeated self-play episodes

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    learning::ValueAgent,
    pipeline::episode::run_episode,
    tictactoe::GameOutcome,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub episodes: usize,

    /// Cumulative win/draw rates are sampled every this many episodes
    pub sample_interval: usize,

    /// Random seed; the second agent is seeded with `seed + 1`
    pub seed: Option<u64>,

    /// Show a progress bar during training
    pub progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100_000,
            sample_interval: 10,
            seed: None,
            progress: false,
        }
    }
}

impl TrainingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "episodes must be greater than zero".to_string(),
            });
        }
        if self.sample_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "sample_interval must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Cumulative win/draw-rate curves sampled during training
///
/// Three parallel sequences indexed by sample point, intended for an external
/// plotting tool. Each value is cumulative over the run so far (wins or draws
/// divided by episodes played), matching the sampled episode number stored
/// alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub episodes: Vec<usize>,
    pub first_win_rate: Vec<f64>,
    pub second_win_rate: Vec<f64>,
    pub draw_rate: Vec<f64>,
}

impl TrainingMetrics {
    fn record(&mut self, episode: usize, first_wins: usize, second_wins: usize, draws: usize) {
        let played = episode as f64;
        self.episodes.push(episode);
        self.first_win_rate.push(first_wins as f64 / played);
        self.second_win_rate.push(second_wins as f64 / played);
        self.draw_rate.push(draws as f64 / played);
    }

    /// Number of sample points recorded
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Write the curves as CSV with columns
    /// `episode,first_win_rate,second_win_rate,draw_rate`
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["episode", "first_win_rate", "second_win_rate", "draw_rate"])?;
        for i in 0..self.episodes.len() {
            writer.write_record(&[
                self.episodes[i].to_string(),
                self.first_win_rate[i].to_string(),
                self.second_win_rate[i].to_string(),
                self.draw_rate[i].to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Episodes won by the first (X) agent
    pub first_wins: usize,

    /// Episodes won by the second (O) agent
    pub second_wins: usize,

    /// Drawn episodes
    pub draws: usize,

    /// First-agent win rate
    pub first_win_rate: f64,

    /// Second-agent win rate
    pub second_win_rate: f64,

    /// Draw rate
    pub draw_rate: f64,
}

impl TrainingResult {
    /// Create a new training result
    pub fn new(total_episodes: usize, first_wins: usize, second_wins: usize, draws: usize) -> Self {
        let rate = |count: usize| {
            if total_episodes > 0 {
                count as f64 / total_episodes as f64
            } else {
                0.0
            }
        };

        Self {
            total_episodes,
            first_wins,
            second_wins,
            draws,
            first_win_rate: rate(first_wins),
            second_win_rate: rate(second_wins),
            draw_rate: rate(draws),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Everything a training run produces, returned by value
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub summary: TrainingResult,
    pub metrics: TrainingMetrics,
}

/// Training pipeline repeating self-play episodes between two agents
///
/// The caller owns both agents and passes them in by mutable reference; the
/// pipeline holds no agent state of its own, so trained tables stay with the
/// caller for interactive play afterwards.
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    fn build_progress_bar(&self) -> Result<ProgressBar> {
        let pb = ProgressBar::new(self.config.episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        Ok(pb)
    }

    /// Run training episodes and return the summary plus sampled curves
    ///
    /// Episodes run strictly sequentially; each one, including its
    /// credit-assignment pass, completes before the next begins. Win counters
    /// accumulate inside the agents; the pipeline tracks only the draw count
    /// and this run's baseline, so agents carrying wins from an earlier run
    /// are handled correctly.
    pub fn run(
        &self,
        first: &mut ValueAgent,
        second: &mut ValueAgent,
    ) -> Result<TrainingReport> {
        self.config.validate()?;

        if let Some(seed) = self.config.seed {
            first.set_rng_seed(seed);
            second.set_rng_seed(seed.wrapping_add(1));
        }

        let progress_bar = if self.config.progress {
            Some(self.build_progress_bar()?)
        } else {
            None
        };

        let first_baseline = first.wins();
        let second_baseline = second.wins();
        let mut draws = 0usize;
        let mut metrics = TrainingMetrics::default();

        for episode in 1..=self.config.episodes {
            let record = run_episode(first, second)?;
            if record.outcome == GameOutcome::Draw {
                draws += 1;
            }

            if let Some(pb) = &progress_bar {
                pb.inc(1);
            }

            if episode.is_multiple_of(self.config.sample_interval) {
                let first_wins = first.wins() - first_baseline;
                let second_wins = second.wins() - second_baseline;
                metrics.record(episode, first_wins, second_wins, draws);

                if let Some(pb) = &progress_bar {
                    pb.set_message(format!("X:{first_wins} O:{second_wins} D:{draws}"));
                }
            }
        }

        let first_wins = first.wins() - first_baseline;
        let second_wins = second.wins() - second_baseline;

        if let Some(pb) = &progress_bar {
            pb.finish_with_message(format!("X:{first_wins} O:{second_wins} D:{draws}"));
        }

        let summary = TrainingResult::new(self.config.episodes, first_wins, second_wins, draws);
        Ok(TrainingReport { summary, metrics })
    }
}
