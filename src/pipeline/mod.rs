//! Self-play training pipeline
//!
//! This module drives complete episodes between two agents, performs the
//! backward credit-assignment pass when an episode ends in a win, and repeats
//! episodes for a configured number of rounds while sampling cumulative
//! win/draw rates for external plotting.

pub mod episode;
pub mod training;

pub use episode::{EpisodeRecord, propagate_outcome, run_episode};
pub use training::{
    TrainingConfig, TrainingMetrics, TrainingPipeline, TrainingReport, TrainingResult,
};
