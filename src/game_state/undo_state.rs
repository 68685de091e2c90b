use shakmaty::{Chess, Move};

/// Single undo record for `apply` / `undo`.
#[derive(Debug, Clone)]
pub struct UndoState {
    pub mv: Move,
    pub prev_position: Chess,
}
