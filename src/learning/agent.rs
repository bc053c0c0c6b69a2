//! Self-play value-learning agent
//!
//! The agent owns its value table exclusively. Two agents play against each
//! other during training but never share or merge tables.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    error::{Error, Result},
    learning::ValueTable,
    tictactoe::{BoardState, Cell, Player},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Value-learning agent with an ε-greedy policy
///
/// Holds the agent's mark, its state-value table, the learning rate α, the
/// exploration probability ε, and a cumulative win counter. Randomness is
/// drawn from an injectable seeded generator so that tie-breaking and
/// exploration are reproducible in tests.
#[derive(Debug, Clone)]
pub struct ValueAgent {
    player: Player,
    table: ValueTable,
    learning_rate: f64,
    epsilon: f64,
    wins: usize,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl ValueAgent {
    /// Create a new agent
    ///
    /// # Arguments
    ///
    /// * `player` - Which mark this agent places on the board
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `epsilon` - Probability of choosing a uniformly random empty cell
    pub fn new(player: Player, learning_rate: f64, epsilon: f64) -> Self {
        Self {
            player,
            table: ValueTable::new(),
            learning_rate,
            epsilon,
            wins: 0,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    /// Seed the internal random number generator for reproducible runs
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Change the exploration probability. Interactive play sets this to 0.0
    /// so a trained agent plays pure exploitation.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    /// Games won by this agent so far
    pub fn wins(&self) -> usize {
        self.wins
    }

    pub(crate) fn record_win(&mut self) {
        self.wins += 1;
    }

    /// Read-only access to the agent's value table
    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    /// Value estimate for a board snapshot
    pub fn value_of(&self, cells: &[Cell; 9]) -> f64 {
        self.table.get(cells)
    }

    /// The board after placing this agent's own mark at `pos`
    fn successor(&self, cells: &[Cell; 9], pos: usize) -> [Cell; 9] {
        let mut next = *cells;
        next[pos] = self.player.to_cell();
        next
    }

    /// Highest-valued move from this state
    ///
    /// Evaluates every empty cell by looking up the value of the board with
    /// this agent's mark placed there, and returns the maximum value together
    /// with the chosen cell. Ties are broken uniformly at random among the
    /// argmax set, not by first match; early in training every empty cell
    /// ties at 0.0 and a first-match rule would bias move selection.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoValidMoves` if the board is full.
    pub fn best_move(&mut self, state: &BoardState) -> Result<(f64, usize)> {
        let mut max_value = f64::NEG_INFINITY;
        let mut best_positions: Vec<usize> = Vec::new();

        for pos in state.empty_positions() {
            let value = self.value_of(&self.successor(&state.cells, pos));
            if value > max_value {
                max_value = value;
                best_positions.clear();
                best_positions.push(pos);
            } else if value == max_value {
                best_positions.push(pos);
            }
        }

        let chosen = best_positions
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::NoValidMoves)?;
        Ok((max_value, chosen))
    }

    /// Sum of the values of all candidate next states
    ///
    /// Sums, over every empty cell, the value of the board with this agent's
    /// mark placed there. This is the successor-value estimate used by the TD
    /// update; it sums rather than maximizes, and must stay that way (see the
    /// module docs in [`crate::learning`]).
    pub fn sum_next_values(&self, cells: &[Cell; 9]) -> f64 {
        cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(pos, _)| self.value_of(&self.successor(cells, pos)))
            .sum()
    }

    /// Apply the TD update to the estimate for a board snapshot
    ///
    /// ```text
    /// V(s) ← V(s) + α · (reward + sum_next_values(s) − V(s))
    /// ```
    ///
    /// This is the single learning primitive; every value change in the
    /// system routes through it.
    pub fn update_value(&mut self, cells: &[Cell; 9], reward: f64) {
        let old_value = self.value_of(cells);
        let target = reward + self.sum_next_values(cells);
        let new_value = old_value + self.learning_rate * (target - old_value);
        self.table.set(*cells, new_value);
    }

    /// ε-greedy move selection
    ///
    /// With probability ε picks a uniformly random empty cell; otherwise
    /// exploits via [`best_move`](Self::best_move).
    ///
    /// # Errors
    ///
    /// Returns `Error::NoValidMoves` if the board is full.
    pub fn select_move(&mut self, state: &BoardState) -> Result<usize> {
        if self.rng.random::<f64>() < self.epsilon {
            let options = state.empty_positions();
            options
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoValidMoves)
        } else {
            self.best_move(state).map(|(_, pos)| pos)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_td_update_terminal_state() {
        // On a full board sum_next_values is 0, so the update reduces to
        // v0 + α·(reward − v0). With v0=0, α=0.1, reward=2 → exactly 0.2.
        let mut agent = ValueAgent::new(Player::X, 0.1, 0.0);
        let mut board = BoardState::new();
        for pos in [0, 1, 2, 4, 3, 6, 5, 8, 7] {
            board = board.make_move(pos).unwrap();
        }
        assert!(board.is_full());

        agent.update_value(&board.cells, 2.0);
        assert_eq!(agent.value_of(&board.cells), 0.2);
    }

    #[test]
    fn test_td_update_uses_successor_sum() {
        let mut agent = ValueAgent::new(Player::X, 0.5, 0.0);
        let board = BoardState::new().make_move(4).unwrap(); // X at center

        // Successors place the agent's own mark. Give two successors of the
        // one-mark board known values.
        let with_x_at = |pos: usize| {
            let mut cells = board.cells;
            cells[pos] = Cell::X;
            cells
        };
        agent.table.set(with_x_at(0), 1.0);
        agent.table.set(with_x_at(8), 0.5);

        assert_eq!(agent.sum_next_values(&board.cells), 1.5);

        // v = 0 + 0.5 · (0 + 1.5 − 0) = 0.75
        agent.update_value(&board.cells, 0.0);
        assert_eq!(agent.value_of(&board.cells), 0.75);
    }

    #[test]
    fn test_best_move_prefers_highest_value() {
        let mut agent = ValueAgent::new(Player::O, 0.1, 0.0).with_seed(42);
        let board = BoardState::new().make_move(4).unwrap(); // X center, O to move

        let mut cells = board.cells;
        cells[6] = Cell::O;
        agent.table.set(cells, 3.0);

        for _ in 0..20 {
            let (value, pos) = agent.best_move(&board).unwrap();
            assert_eq!(value, 3.0);
            assert_eq!(pos, 6);
        }
    }

    #[test]
    fn test_best_move_never_picks_occupied_cell() {
        let mut agent = ValueAgent::new(Player::X, 0.1, 0.0).with_seed(7);
        let mut board = BoardState::new();
        for pos in [4, 0, 8, 2] {
            board = board.make_move(pos).unwrap();
        }

        for _ in 0..200 {
            let (_, pos) = agent.best_move(&board).unwrap();
            assert!(board.is_empty(pos), "picked occupied cell {pos}");
        }
    }

    #[test]
    fn test_best_move_fails_on_full_board() {
        let mut agent = ValueAgent::new(Player::X, 0.1, 0.0);
        let mut board = BoardState::new();
        for pos in [0, 1, 2, 4, 3, 6, 5, 8, 7] {
            board = board.make_move(pos).unwrap();
        }

        assert!(matches!(
            agent.best_move(&board),
            Err(Error::NoValidMoves)
        ));
        assert!(matches!(
            agent.select_move(&board),
            Err(Error::NoValidMoves)
        ));
    }

    #[test]
    fn test_tie_break_covers_all_tied_cells() {
        // On a fresh table every empty cell ties at 0.0, so repeated calls
        // must spread over all nine cells roughly uniformly.
        let mut agent = ValueAgent::new(Player::X, 0.1, 0.0).with_seed(123);
        let board = BoardState::new();

        let mut counts: HashMap<usize, usize> = HashMap::new();
        let trials = 9_000;
        for _ in 0..trials {
            let (_, pos) = agent.best_move(&board).unwrap();
            *counts.entry(pos).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 9, "every tied cell should be selected");
        let expected = trials / 9;
        for (pos, count) in counts {
            assert!(
                count > expected / 2 && count < expected * 2,
                "cell {pos} selected {count} times, expected near {expected}"
            );
        }
    }

    #[test]
    fn test_select_move_explores_when_epsilon_is_one() {
        let mut agent = ValueAgent::new(Player::O, 0.1, 1.0).with_seed(5);
        let board = BoardState::new().make_move(0).unwrap();

        let mut seen: HashMap<usize, usize> = HashMap::new();
        for _ in 0..2_000 {
            let pos = agent.select_move(&board).unwrap();
            assert!(board.is_empty(pos));
            *seen.entry(pos).or_insert(0) += 1;
        }
        assert_eq!(seen.len(), 8, "exploration should reach every empty cell");
    }

    #[test]
    fn test_seeded_agents_agree() {
        let board = BoardState::new();

        let mut a = ValueAgent::new(Player::X, 0.1, 0.3).with_seed(99);
        let mut b = ValueAgent::new(Player::X, 0.1, 0.3).with_seed(99);

        for _ in 0..50 {
            assert_eq!(
                a.select_move(&board).unwrap(),
                b.select_move(&board).unwrap()
            );
        }
    }
}
