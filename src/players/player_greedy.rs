//! One-ply greedy player.
//!
//! Plays every legal move on a scratch copy, scores the result with the
//! material evaluator from its own side, and keeps the first best move.

use crate::errors::PlayerError;
use crate::game_state::chess_types::{Score, Side};
use crate::game_state::rules_engine::RulesEngine;
use crate::players::player_trait::{ensure_turn, Player};
use crate::search::board_scoring::{BoardScorer, MaterialScorer};

pub struct GreedyPlayer<S: BoardScorer = MaterialScorer> {
    side: Side,
    scorer: S,
}

impl GreedyPlayer<MaterialScorer> {
    pub fn new(side: Side) -> Self {
        Self::with_scorer(side, MaterialScorer::new())
    }

    pub fn seeded(side: Side, seed: u64) -> Self {
        Self::with_scorer(side, MaterialScorer::seeded(seed))
    }
}

impl<S: BoardScorer> GreedyPlayer<S> {
    pub fn with_scorer(side: Side, scorer: S) -> Self {
        Self { side, scorer }
    }

    /// Every legal move paired with the evaluation of the position it leads to.
    pub fn score_moves<R: RulesEngine>(
        &mut self,
        position: &R,
    ) -> Result<Vec<(R::Move, Score)>, PlayerError> {
        position
            .legal_moves()
            .into_iter()
            .map(|mv| -> Result<(R::Move, Score), PlayerError> {
                let mut scratch = position.clone();
                scratch.apply(&mv)?;
                let score = self.scorer.score(&scratch, self.side);
                Ok((mv, score))
            })
            .collect()
    }
}

impl<R: RulesEngine, S: BoardScorer> Player<R> for GreedyPlayer<S> {
    fn side(&self) -> Side {
        self.side
    }

    fn solver(&self) -> &str {
        "greedy"
    }

    fn choose_move(&mut self, position: &mut R) -> Result<R::Move, PlayerError> {
        ensure_turn(self.side, position)?;

        let mut best: Option<(R::Move, Score)> = None;
        for (mv, score) in self.score_moves(position)? {
            // Strictly greater: the first move reaching the maximum is kept.
            if best.as_ref().map_or(true, |(_, best_score)| score > *best_score) {
                best = Some((mv, score));
            }
        }

        best.map(|(mv, _)| mv).ok_or(PlayerError::NoLegalMove)
    }
}
