//! Fixed scores for finished games.
//!
//! Terminal positions bypass the material evaluator. Ties are checked first,
//! then checkmate from either side's point of view.

use serde::Serialize;

use crate::game_state::chess_types::{Score, Side};
use crate::game_state::rules_engine::{DrawPolicy, RulesEngine};

pub const WIN_SCORE: Score = 1000.0;
pub const LOSE_SCORE: Score = -1000.0;
pub const TIE_SCORE: Score = 0.0;

/// Scores assigned to won, lost and drawn positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndScores {
    pub win: Score,
    pub lose: Score,
    pub tie: Score,
}

impl Default for EndScores {
    fn default() -> Self {
        Self {
            win: WIN_SCORE,
            lose: LOSE_SCORE,
            tie: TIE_SCORE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    FivefoldRepetition,
    SeventyFiveMoves,
    Claimed,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminalState {
    Checkmate { winner: Side },
    Draw(DrawReason),
}

/// Classify `position` under `policy`, or `None` if the game is still running.
pub fn classify_terminal<R: RulesEngine>(position: &R, policy: DrawPolicy) -> Option<TerminalState> {
    if position.is_stalemate() {
        return Some(TerminalState::Draw(DrawReason::Stalemate));
    }
    if position.is_insufficient_material() {
        return Some(TerminalState::Draw(DrawReason::InsufficientMaterial));
    }
    if position.is_fivefold_repetition() {
        return Some(TerminalState::Draw(DrawReason::FivefoldRepetition));
    }
    if position.is_seventyfive_moves() {
        return Some(TerminalState::Draw(DrawReason::SeventyFiveMoves));
    }
    if policy == DrawPolicy::Claim && position.can_claim_draw() {
        return Some(TerminalState::Draw(DrawReason::Claimed));
    }
    if position.is_checkmate() {
        // The side to move is the side that got mated.
        return Some(TerminalState::Checkmate {
            winner: position.side_to_move().opposite(),
        });
    }
    None
}

/// Fixed score of a finished game from `perspective`, or `None` if the game is
/// still running under `policy`.
pub fn score_terminal<R: RulesEngine>(
    position: &R,
    perspective: Side,
    policy: DrawPolicy,
    scores: &EndScores,
) -> Option<Score> {
    classify_terminal(position, policy).map(|state| match state {
        TerminalState::Draw(_) => scores.tie,
        TerminalState::Checkmate { winner } if winner == perspective => scores.win,
        TerminalState::Checkmate { .. } => scores.lose,
    })
}
