//! Canonical chess-rule constants.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// First moves the minimax player picks from when no move has been played yet.
pub const OPENING_MOVES: [&str; 4] = ["e2e4", "d2d4", "c2c4", "g1f3"];

/// Halfmove clock at which a draw may be claimed (fifty-move rule).
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Halfmove clock at which the game is drawn automatically.
pub const SEVENTY_FIVE_MOVE_HALFMOVES: u32 = 150;
