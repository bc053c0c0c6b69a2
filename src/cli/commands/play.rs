//! Interactive play against a trained agent
//!
//! All console I/O lives here. Malformed input is re-prompted and never
//! reaches the learning core.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::{
    learning::ValueAgent,
    tictactoe::{BoardState, Player},
};

/// Run the interactive session loop
///
/// Both trained agents are switched to pure exploitation before any game
/// starts. X always opens, so letting the human open means the human holds X
/// against the trained O agent, and letting the computer open means the
/// trained X agent moves first.
pub fn play_session(first: &mut ValueAgent, second: &mut ValueAgent) -> Result<()> {
    first.set_epsilon(0.0);
    second.set_epsilon(0.0);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Enter 1 to open yourself, 2 to let the computer open, anything else to quit: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match line?.trim() {
            "1" => play_game(&mut lines, second, Player::X)?,
            "2" => play_game(&mut lines, first, Player::O)?,
            _ => break,
        }
    }
    Ok(())
}

/// One game between the human (holding `human_mark`) and a trained agent
fn play_game<B: BufRead>(
    lines: &mut io::Lines<B>,
    agent: &mut ValueAgent,
    human_mark: Player,
) -> Result<()> {
    let mut state = BoardState::new();

    while !state.is_terminal() {
        let position = if state.to_move == human_mark {
            match prompt_position(lines, &state, human_mark)? {
                Some(position) => position,
                None => return Ok(()), // stdin closed mid-game
            }
        } else {
            let (_, position) = agent.best_move(&state)?;
            position
        };

        state = state.make_move(position)?;
        println!("{state}");
        println!("--------");
    }

    match state.winner() {
        Some(winner) if winner == human_mark => println!("You won!"),
        Some(_) => println!("The computer won."),
        None => println!("Draw."),
    }
    Ok(())
}

/// Prompt until the human enters an empty cell index, re-prompting on
/// anything malformed, out of range, or occupied
fn prompt_position<B: BufRead>(
    lines: &mut io::Lines<B>,
    state: &BoardState,
    human_mark: Player,
) -> Result<Option<usize>> {
    loop {
        print!(
            "Your mark is {}. Choose a cell (0-8): ",
            human_mark.to_cell().to_char()
        );
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(None);
        };
        match line?.trim().parse::<usize>() {
            Ok(position) if position < 9 && state.is_empty(position) => {
                return Ok(Some(position));
            }
            _ => println!("Invalid choice, pick an empty cell between 0 and 8."),
        }
    }
}
