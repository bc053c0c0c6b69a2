//! Sparse state-value table

use std::collections::HashMap;

use crate::tictactoe::Cell;

/// State-value table mapping board snapshots to scalar value estimates
///
/// Keys are fixed-size cell arrays with structural equality and hashing, so
/// an entry can never alias a board that is still being mutated elsewhere.
/// Absence of a key means a value of 0.0; that is a domain rule, not a
/// missing-key failure. Entries are created lazily on first update and never
/// evicted: the state space is finite (at most 3^9 configurations), so the
/// table may grow to cover every reachable state over training.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable {
    values: HashMap<[Cell; 9], f64>,
}

impl ValueTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Value estimate for a board snapshot, 0.0 for unseen states. Never fails.
    pub fn get(&self, cells: &[Cell; 9]) -> f64 {
        self.values.get(cells).copied().unwrap_or(0.0)
    }

    /// Insert or overwrite the estimate for a board snapshot. Never fails.
    pub fn set(&mut self, cells: [Cell; 9], value: f64) {
        self.values.insert(cells, value);
    }

    /// Number of states with stored estimates
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
