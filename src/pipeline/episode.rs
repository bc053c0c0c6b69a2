//! Episode driver: one self-play game plus backward credit assignment

use crate::{
    error::{Error, Result},
    learning::{REWARD_DRAW, REWARD_LOSS, REWARD_ONGOING, REWARD_WIN, ValueAgent},
    tictactoe::{BoardState, Cell, GameOutcome, Move},
};

/// Record of one completed self-play episode
///
/// The move trace is returned for inspection; the credit-assignment pass has
/// already consumed it exactly once by the time the record is handed back.
#[derive(Debug, Clone)]
pub struct EpisodeRecord {
    pub outcome: GameOutcome,
    pub moves: Vec<Move>,
    pub final_state: BoardState,
}

/// Play one episode between two agents, applying value updates as the game
/// progresses and the backward credit-assignment pass on a win.
///
/// The agent holding X acts first. Per half-move:
///
/// 1. The acting agent selects a cell (ε-greedy) and its mark is placed.
/// 2. If that completes a line, the acting agent's value for the terminal
///    board is updated with the win reward, the other agent's with the loss
///    reward, the winner's counter increments, and [`propagate_outcome`]
///    walks the trace backward.
/// 3. If the board filled with no winner, the acting agent's value for the
///    terminal board is updated with the draw reward.
/// 4. Otherwise the *waiting* agent's value for the just-reached board is
///    updated with reward 0: the other agent acts next, so it is the one
///    whose estimate of this board needs revising. This mid-game target is
///    integral to the learning dynamics; keep it even though it looks
///    unconventional.
///
/// # Errors
///
/// Returns `Error::InvalidConfiguration` if both agents hold the same mark.
pub fn run_episode(first: &mut ValueAgent, second: &mut ValueAgent) -> Result<EpisodeRecord> {
    if first.player() == second.player() {
        return Err(Error::InvalidConfiguration {
            message: "both agents hold the same mark".to_string(),
        });
    }

    let mut state = BoardState::new();
    let mut moves: Vec<Move> = Vec::new();

    loop {
        let (actor, waiting) = if state.to_move == first.player() {
            (&mut *first, &mut *second)
        } else {
            (&mut *second, &mut *first)
        };

        let position = actor.select_move(&state)?;
        state = state.make_move(position)?;
        moves.push(Move {
            position,
            player: actor.player(),
        });

        if state.has_won(actor.player()) {
            let winner_mark = actor.player();
            actor.update_value(&state.cells, REWARD_WIN);
            waiting.update_value(&state.cells, REWARD_LOSS);
            actor.record_win();
            propagate_outcome(&moves, actor, waiting, state.cells);
            return Ok(EpisodeRecord {
                outcome: GameOutcome::Win(winner_mark),
                moves,
                final_state: state,
            });
        }

        if state.is_full() {
            actor.update_value(&state.cells, REWARD_DRAW);
            return Ok(EpisodeRecord {
                outcome: GameOutcome::Draw,
                moves,
                final_state: state,
            });
        }

        waiting.update_value(&state.cells, REWARD_ONGOING);
    }
}

/// Backward credit-assignment pass
///
/// Walks the move trace in reverse, clearing each move's cell to reconstruct
/// the board that existed before that move was made. Each predecessor state
/// is credited to the agent that did NOT make the undone move: where the
/// winner moved, the loser's estimate is updated with the loss reward; where
/// the loser moved, the winner's estimate is updated with the win reward.
/// This is what propagates the terminal outcome to states several moves
/// before the winning move. It runs exactly once per won episode,
/// synchronously, before the next episode begins.
pub fn propagate_outcome(
    moves: &[Move],
    winner: &mut ValueAgent,
    loser: &mut ValueAgent,
    final_cells: [Cell; 9],
) {
    let mut cells = final_cells;
    for mv in moves.iter().rev() {
        cells[mv.position] = Cell::Empty;
        if mv.player == winner.player() {
            loser.update_value(&cells, REWARD_LOSS);
        } else {
            winner.update_value(&cells, REWARD_WIN);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    fn agent_pair(epsilon: f64, seed: u64) -> (ValueAgent, ValueAgent) {
        (
            ValueAgent::new(Player::X, 0.1, epsilon).with_seed(seed),
            ValueAgent::new(Player::O, 0.1, epsilon).with_seed(seed.wrapping_add(1)),
        )
    }

    #[test]
    fn test_episode_reaches_terminal_state() {
        let (mut first, mut second) = agent_pair(1.0, 3);
        let record = run_episode(&mut first, &mut second).unwrap();

        assert!(record.final_state.is_terminal());
        assert!(record.moves.len() >= 5 && record.moves.len() <= 9);
        match record.outcome {
            GameOutcome::Win(player) => assert!(record.final_state.has_won(player)),
            GameOutcome::Draw => assert!(record.final_state.is_draw()),
        }
    }

    #[test]
    fn test_moves_alternate_starting_with_x() {
        let (mut first, mut second) = agent_pair(1.0, 11);
        let record = run_episode(&mut first, &mut second).unwrap();

        for (i, mv) in record.moves.iter().enumerate() {
            let expected = if i.is_multiple_of(2) {
                Player::X
            } else {
                Player::O
            };
            assert_eq!(mv.player, expected);
        }
    }

    #[test]
    fn test_win_counter_increments_for_winner_only() {
        let (mut first, mut second) = agent_pair(1.0, 0);

        let mut episodes = 0;
        let mut wins_seen = 0;
        for _ in 0..50 {
            let record = run_episode(&mut first, &mut second).unwrap();
            episodes += 1;
            if matches!(record.outcome, GameOutcome::Win(_)) {
                wins_seen += 1;
            }
        }

        assert_eq!(first.wins() + second.wins(), wins_seen);
        assert!(wins_seen <= episodes);
    }

    #[test]
    fn test_same_mark_agents_rejected() {
        let mut a = ValueAgent::new(Player::X, 0.1, 0.5);
        let mut b = ValueAgent::new(Player::X, 0.1, 0.5);
        assert!(matches!(
            run_episode(&mut a, &mut b),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_propagate_outcome_credits_predecessors() {
        // Fixed five-move X win on the top row:
        // X: 0, 1, 2 / O: 3, 4
        let mut winner = ValueAgent::new(Player::X, 0.1, 0.0);
        let mut loser = ValueAgent::new(Player::O, 0.1, 0.0);

        let mut state = BoardState::new();
        let mut moves = Vec::new();
        for pos in [0, 3, 1, 4, 2] {
            let player = state.to_move;
            state = state.make_move(pos).unwrap();
            moves.push(Move { position: pos, player });
        }
        assert!(state.has_won(Player::X));

        propagate_outcome(&moves, &mut winner, &mut loser, state.cells);

        // With both tables fresh, every reconstructed predecessor is unseen
        // and has unseen successors, so each update is exactly α·reward.
        // Undone in reverse: X's winning move, then O, X, O, X.
        let mut cells = state.cells;

        cells[2] = Cell::Empty; // before X's winning move -> loser updated
        assert_eq!(loser.value_of(&cells), -0.2);

        cells[4] = Cell::Empty; // before O's second move -> winner updated
        assert_eq!(winner.value_of(&cells), 0.2);

        cells[1] = Cell::Empty; // before X's second move -> loser updated
        assert_eq!(loser.value_of(&cells), -0.2);

        cells[3] = Cell::Empty; // before O's first move -> winner updated
        assert_eq!(winner.value_of(&cells), 0.2);

        cells[0] = Cell::Empty; // empty board -> loser updated
        assert_eq!(loser.value_of(&cells), -0.2);

        // One update per undone move, nothing else
        assert_eq!(winner.table().len(), 2);
        assert_eq!(loser.table().len(), 3);
    }
}
