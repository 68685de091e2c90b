//! Standard chess rules backed by `shakmaty`.
//!
//! `ChessGame` wraps a `shakmaty::Chess` position with the two things the
//! search core needs on top of it: an undo stack for in-place make/unmake
//! and a Zobrist repetition history for the repetition draw rules.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role};

use crate::errors::{MoveParseError, RulesError};
use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, SEVENTY_FIVE_MOVE_HALFMOVES};
use crate::game_state::chess_types::{PieceKind, Side};
use crate::game_state::rules_engine::RulesEngine;
use crate::game_state::undo_state::UndoState;

/// Chess position with make/unmake history.
#[derive(Debug, Clone)]
pub struct ChessGame {
    position: Chess,
    undo_stack: Vec<UndoState>,
    // Hash of every position reached so far, current one last.
    repetition_history: Vec<Zobrist64>,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new_game()
    }
}

impl ChessGame {
    /// Standard starting position with an empty move history.
    pub fn new_game() -> Self {
        Self::from_position(Chess::default())
    }

    /// Position parsed from FEN, with an empty move history.
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let invalid = |reason: String| RulesError::InvalidFen {
            fen: fen.to_owned(),
            reason,
        };

        let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;

        Ok(Self::from_position(position))
    }

    fn from_position(position: Chess) -> Self {
        let hash = position_hash(&position);
        Self {
            position,
            undo_stack: Vec::new(),
            repetition_history: vec![hash],
        }
    }

    #[inline]
    fn repetition_count(&self) -> usize {
        let Some(current) = self.repetition_history.last() else {
            return 0;
        };
        self.repetition_history
            .iter()
            .filter(|h| *h == current)
            .count()
    }
}

impl RulesEngine for ChessGame {
    type Move = Move;

    fn side_to_move(&self) -> Side {
        side_from_color(self.position.turn())
    }

    fn legal_moves(&self) -> Vec<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    fn apply(&mut self, mv: &Move) -> Result<(), RulesError> {
        if !self.position.is_legal(mv) {
            return Err(RulesError::IllegalMove(self.move_text(mv)));
        }

        self.undo_stack.push(UndoState {
            mv: mv.clone(),
            prev_position: self.position.clone(),
        });
        self.position.play_unchecked(mv);
        self.repetition_history.push(position_hash(&self.position));
        Ok(())
    }

    fn undo(&mut self) -> Result<Move, RulesError> {
        let undo = self.undo_stack.pop().ok_or(RulesError::EmptyHistory)?;
        self.position = undo.prev_position;
        self.repetition_history.pop();
        Ok(undo.mv)
    }

    fn move_history_len(&self) -> usize {
        self.undo_stack.len()
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    fn is_fivefold_repetition(&self) -> bool {
        self.repetition_count() >= 5
    }

    fn is_seventyfive_moves(&self) -> bool {
        self.position.halfmoves() >= SEVENTY_FIVE_MOVE_HALFMOVES && !self.position.is_checkmate()
    }

    fn can_claim_draw(&self) -> bool {
        if self.position.is_checkmate() {
            return false;
        }
        self.position.halfmoves() >= FIFTY_MOVE_HALFMOVES || self.repetition_count() >= 3
    }

    fn piece_count(&self, side: Side, kind: PieceKind) -> u32 {
        let board = self.position.board();
        let pieces = board.by_color(color_from_side(side)) & board.by_role(role_from_kind(kind));
        pieces.count() as u32
    }

    fn target_piece_kind(&self, mv: &Move) -> Option<PieceKind> {
        match mv {
            // shakmaty encodes castling as king-takes-own-rook; the king's
            // real destination is always empty.
            Move::Castle { .. } => None,
            _ => self.position.board().role_at(mv.to()).map(kind_from_role),
        }
    }

    fn moved_piece_kind(&self, mv: &Move) -> PieceKind {
        kind_from_role(mv.role())
    }

    fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let trimmed = text.trim();
        let uci: UciMove = trimmed
            .parse()
            .map_err(|_| MoveParseError::Syntax(trimmed.to_owned()))?;
        uci.to_move(&self.position)
            .map_err(|_| MoveParseError::Illegal(trimmed.to_owned()))
    }

    fn move_text(&self, mv: &Move) -> String {
        mv.to_uci(CastlingMode::Standard).to_string()
    }

    fn board_fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }
}

#[inline]
fn position_hash(position: &Chess) -> Zobrist64 {
    position.zobrist_hash::<Zobrist64>(EnPassantMode::Legal)
}

#[inline]
pub fn side_from_color(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

#[inline]
pub fn color_from_side(side: Side) -> Color {
    match side {
        Side::White => Color::White,
        Side::Black => Color::Black,
    }
}

#[inline]
pub fn kind_from_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

#[inline]
pub fn role_from_kind(kind: PieceKind) -> Role {
    match kind {
        PieceKind::Pawn => Role::Pawn,
        PieceKind::Knight => Role::Knight,
        PieceKind::Bishop => Role::Bishop,
        PieceKind::Rook => Role::Rook,
        PieceKind::Queen => Role::Queen,
        PieceKind::King => Role::King,
    }
}
