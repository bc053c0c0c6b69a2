//! Temporal difference state-value learning
//!
//! This module implements the value-learning core: a sparse per-state value
//! table and an agent that revises it with a TD(0)-style update.
//!
//! The update target sums the values of *all* candidate successor states
//! rather than taking the maximum:
//!
//! ```text
//! V(s) ← V(s) + α · (r + Σ_i V(s with own mark at empty cell i) − V(s))
//! ```
//!
//! The sum is deliberate. It is an averaging-over-successors variant of
//! TD(0), not a max-based Q-learning target, and it materially changes the
//! learning dynamics.

pub mod agent;
pub mod value_table;

pub use agent::ValueAgent;
pub use value_table::ValueTable;

/// Terminal payoff for the agent that completed a winning line
pub const REWARD_WIN: f64 = 2.0;

/// Terminal payoff for the agent on the losing side
pub const REWARD_LOSS: f64 = -2.0;

/// Payoff when the board fills with no winner
pub const REWARD_DRAW: f64 = 0.0;

/// Payoff for mid-game updates while the episode continues
pub const REWARD_ONGOING: f64 = 0.0;
