//! Self-play temporal difference value learning for Tic-Tac-Toe
//!
//! This crate provides:
//! - A complete Tic-Tac-Toe board implementation
//! - Agents that learn a per-state value table through self-play, using a
//!   TD(0)-style update and a backward credit-assignment pass
//! - A training pipeline with cumulative win/draw-rate sampling for plotting
//! - An interactive console mode for playing against a trained agent

pub mod cli;
pub mod error;
pub mod learning;
pub mod pipeline;
pub mod tictactoe;

pub use error::{Error, Result};
pub use learning::{
    REWARD_DRAW, REWARD_LOSS, REWARD_ONGOING, REWARD_WIN, ValueAgent, ValueTable,
};
pub use pipeline::{
    EpisodeRecord, TrainingConfig, TrainingMetrics, TrainingPipeline, TrainingReport,
    TrainingResult,
};
pub use tictactoe::{BoardState, Cell, GameOutcome, Move, Player, WINNING_LINES};
