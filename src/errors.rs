//! Error types shared across the rules adapter, search core, players and the
//! game harness.
//!
//! Each layer owns one enum. Lower layers convert upward through `#[from]` so
//! callers can propagate with `?` and still match on the originating failure.
//!
//! Recoverable input problems (malformed or illegal move text) are handled by
//! the human player before they ever reach these types. Everything that does
//! surface here indicates either a corrupt game state or a broken caller
//! contract, and the game harness treats it as fatal.

use thiserror::Error;

use crate::game_state::chess_types::Side;

/// Failures raised by a [`RulesEngine`](crate::game_state::rules_engine::RulesEngine)
/// implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The FEN string could not be parsed or describes an impossible position.
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// A move identifier was applied to a position it is not legal in.
    #[error("move {0} is not legal in the current position")]
    IllegalMove(String),

    /// `undo` was called with no applied move left on the stack.
    #[error("cannot undo: no move has been applied")]
    EmptyHistory,
}

/// Why a piece of move text was rejected by `RulesEngine::parse_move`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    /// The text is not a well-formed move in the engine's notation.
    #[error("'{0}' is not a well-formed move")]
    Syntax(String),

    /// The text is well-formed but does not name a legal move here.
    #[error("'{0}' is not a legal move in this position")]
    Illegal(String),
}

/// Failures of the minimax search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The root produced no move decision: the game is already over or the
    /// requested depth was zero.
    #[error("search produced no legal move")]
    NoLegalMove,

    /// The caller named a side that is not the one to move.
    #[error("search called for {expected} but {actual} is to move")]
    SideMismatch { expected: Side, actual: Side },

    /// The stop signal fired while the search was running.
    #[error("search cancelled")]
    Cancelled,

    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Failures of a player asked for a move.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// `choose_move` was called on a player whose side is not to move.
    #[error("not {expected}'s turn ({actual} to move)")]
    NotYourTurn { expected: Side, actual: Side },

    /// The player has no legal move to choose from.
    #[error("no legal move available")]
    NoLegalMove,

    /// The player asked to stop the game (for example a human typing `quit`).
    #[error("player interrupted the game")]
    Interrupted,

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error("player I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the game harness.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{side} player failed: {source}")]
    Player {
        side: Side,
        #[source]
        source: PlayerError,
    },

    #[error(transparent)]
    Rules(#[from] RulesError),
}
