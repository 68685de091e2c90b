//! Opt-in per-node tracing for the minimax search.
//!
//! The search owns a boxed [`SearchTrace`] and reports every scored child to
//! it. [`SilentTrace`] is the default and costs one branch per child.

use crate::game_state::chess_types::{PieceKind, Score, Side};

/// One child of a search node after it has been scored.
#[derive(Debug, Clone)]
pub struct ChildScored<'a> {
    /// Side to move in the child position.
    pub side_to_move: Side,
    /// Number of candidates at the parent node.
    pub candidates: usize,
    /// Remaining depth at the parent node.
    pub depth: u8,
    pub moved_piece: PieceKind,
    pub move_text: &'a str,
    pub score: Score,
}

pub trait SearchTrace {
    /// Whether events should be built at all. Move text is only rendered when true.
    fn enabled(&self) -> bool;

    fn child_scored(&mut self, event: &ChildScored<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentTrace;

impl SearchTrace for SilentTrace {
    fn enabled(&self) -> bool {
        false
    }

    fn child_scored(&mut self, _event: &ChildScored<'_>) {}
}

/// Emits one `tracing` event per scored child at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTrace;

impl SearchTrace for TracingTrace {
    fn enabled(&self) -> bool {
        true
    }

    fn child_scored(&mut self, event: &ChildScored<'_>) {
        tracing::info!(
            target: "horizon_chess::search",
            "{}, m{}, d{}, {}:{} - score: {:.3}",
            event.side_to_move,
            event.candidates,
            event.depth,
            event.moved_piece.name(),
            event.move_text,
            event.score
        );
    }
}
