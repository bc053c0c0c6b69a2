//! Command-line interface for training and interactive play

pub mod commands;
