//! Interactive player reading UCI move text.
//!
//! Malformed text and illegal moves are handled here by prompting again.
//! They are never surfaced as errors. Typing `quit` (or closing the input)
//! raises the stop signal and ends the game.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use crate::errors::{MoveParseError, PlayerError};
use crate::game_state::chess_types::Side;
use crate::game_state::rules_engine::RulesEngine;
use crate::players::player_trait::{ensure_turn, Player};
use crate::search::stop_signal::StopSignal;

const MOVES_PER_ROW: usize = 4;

pub struct HumanPlayer<I: BufRead, O: Write> {
    side: Side,
    input: I,
    output: O,
    stop: Option<StopSignal>,
}

impl HumanPlayer<StdinLock<'static>, Stdout> {
    pub fn stdio(side: Side) -> Self {
        Self::new(side, io::stdin().lock(), io::stdout())
    }
}

impl<I: BufRead, O: Write> HumanPlayer<I, O> {
    pub fn new(side: Side, input: I, output: O) -> Self {
        Self {
            side,
            input,
            output,
            stop: None,
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn interrupt(&self) -> PlayerError {
        if let Some(stop) = &self.stop {
            stop.stop();
        }
        PlayerError::Interrupted
    }

    /// Prompt once. `None` means the player asked to stop.
    fn read_move_text(&mut self) -> Result<Option<String>, PlayerError> {
        write!(self.output, "({}) turn. Choose move in uci: ", self.side)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let text = line.trim();
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            return Ok(None);
        }
        Ok(Some(text.to_owned()))
    }
}

/// Lay out move texts in rows of four separated by ` | `.
pub fn format_move_table(moves: &[String]) -> String {
    moves
        .chunks(MOVES_PER_ROW)
        .map(|row| row.join(" | "))
        .collect::<Vec<_>>()
        .join("\n")
}

impl<R: RulesEngine, I: BufRead, O: Write> Player<R> for HumanPlayer<I, O> {
    fn side(&self) -> Side {
        self.side
    }

    fn solver(&self) -> &str {
        "human"
    }

    fn choose_move(&mut self, position: &mut R) -> Result<R::Move, PlayerError> {
        ensure_turn(self.side, position)?;

        let mut before = position.clone();
        if let Ok(last) = before.undo() {
            writeln!(self.output, "Last move: {}", before.move_text(&last))?;
        }
        writeln!(self.output, "Position: {}", position.board_fen())?;

        loop {
            let Some(text) = self.read_move_text()? else {
                return Err(self.interrupt());
            };

            match position.parse_move(&text) {
                Ok(mv) => return Ok(mv),
                Err(MoveParseError::Syntax(_)) => {
                    writeln!(self.output, "Invalid uci move, try again")?;
                }
                Err(MoveParseError::Illegal(_)) => {
                    let legal: Vec<String> = position
                        .legal_moves()
                        .iter()
                        .map(|mv| position.move_text(mv))
                        .collect();
                    writeln!(self.output, "Not a legal move. Available moves:\n")?;
                    writeln!(self.output, "{}", format_move_table(&legal))?;
                }
            }
        }
    }
}
