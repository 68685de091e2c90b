//! Capture-first move ordering.
//!
//! Candidates are sorted by the weight of whatever stands on their destination
//! square, heaviest first. The sort is stable, so equal priorities keep the
//! rules engine's enumeration order. Ordering only affects how early alpha-beta
//! can cut off, never which score the search returns.

use std::cmp::Reverse;

use crate::game_state::chess_types::{PieceKind, PieceWeights};
use crate::game_state::rules_engine::RulesEngine;

/// A candidate move together with what it lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMove<M> {
    pub mv: M,
    pub target: Option<PieceKind>,
    pub priority: u32,
}

pub fn order_moves<R: RulesEngine>(position: &R, weights: &PieceWeights) -> Vec<OrderedMove<R::Move>> {
    let mut ordered: Vec<OrderedMove<R::Move>> = position
        .legal_moves()
        .into_iter()
        .map(|mv| {
            let target = position.target_piece_kind(&mv);
            OrderedMove {
                priority: target.map_or(0, |kind| weights.weight(kind)),
                target,
                mv,
            }
        })
        .collect();

    ordered.sort_by_key(|m| Reverse(m.priority));
    ordered
}
