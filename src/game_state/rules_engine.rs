//! Contract between the search core and the game rules.
//!
//! The search never inspects a position directly. It enumerates, applies and
//! undoes moves and asks for terminal classifications through this trait, so
//! any implementation honouring the apply/undo stack discipline can be
//! searched.

use std::fmt::Debug;

use crate::errors::{MoveParseError, RulesError};
use crate::game_state::chess_types::{PieceKind, Side};

/// Whether claimable draws (threefold repetition, fifty-move rule) end the game.
///
/// A single search must use one policy throughout. The minimax player always
/// searches with [`DrawPolicy::Strict`]. The game loop adjudicates with
/// [`DrawPolicy::Claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPolicy {
    #[default]
    Strict,
    Claim,
}

/// A mutable game position together with the rules that act on it.
pub trait RulesEngine: Clone {
    type Move: Clone + Eq + Debug;

    fn side_to_move(&self) -> Side;

    /// Legal moves in a stable order for the current state.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Play `mv` in place. `mv` must come from `legal_moves` on this exact state.
    fn apply(&mut self, mv: &Self::Move) -> Result<(), RulesError>;

    /// Revert the most recent `apply` and return the move it played.
    fn undo(&mut self) -> Result<Self::Move, RulesError>;

    /// Number of moves played since the game started.
    fn move_history_len(&self) -> usize;

    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;
    fn is_fivefold_repetition(&self) -> bool;
    fn is_seventyfive_moves(&self) -> bool;
    fn can_claim_draw(&self) -> bool;

    /// True when the game has ended in a draw under `policy`.
    fn is_tie(&self, policy: DrawPolicy) -> bool {
        let tie = self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_fivefold_repetition()
            || self.is_seventyfive_moves();
        match policy {
            DrawPolicy::Strict => tie,
            DrawPolicy::Claim => tie || self.can_claim_draw(),
        }
    }

    fn is_game_over(&self, policy: DrawPolicy) -> bool {
        self.is_checkmate() || self.is_tie(policy)
    }

    /// Number of `side`'s pieces of `kind` on the board.
    fn piece_count(&self, side: Side, kind: PieceKind) -> u32;

    /// Kind of the piece standing on the destination square of `mv`, if any.
    fn target_piece_kind(&self, mv: &Self::Move) -> Option<PieceKind>;

    /// Kind of the piece making `mv`.
    fn moved_piece_kind(&self, mv: &Self::Move) -> PieceKind;

    /// Parse move text, telling malformed text apart from illegal moves.
    fn parse_move(&self, text: &str) -> Result<Self::Move, MoveParseError>;

    /// Render `mv` in the notation accepted by `parse_move`.
    fn move_text(&self, mv: &Self::Move) -> String;

    /// Portable board-state string (FEN) for logs and result records.
    fn board_fen(&self) -> String;
}
