//! Pluggable board evaluation interfaces and the baseline material scorer.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::{PieceKind, PieceWeights, Score, Side};
use crate::game_state::rules_engine::RulesEngine;

/// Upper bound (exclusive) of the default tie-breaking jitter.
pub const DEFAULT_JITTER: Score = 1.0;

pub trait BoardScorer {
    /// Score a non-terminal position from `perspective`'s point of view.
    fn score<R: RulesEngine>(&mut self, position: &R, perspective: Side) -> Score;

    /// Piece weights behind the score. Move ordering ranks captures with the
    /// same table.
    fn weights(&self) -> &PieceWeights;
}

/// Material balance plus a small random jitter.
///
/// The jitter lies in `[0, jitter)` and `jitter` never exceeds the smallest
/// positive weight, so it can reorder equal material but never invert a
/// material difference.
#[derive(Debug, Clone)]
pub struct MaterialScorer {
    weights: PieceWeights,
    jitter: Score,
    rng: StdRng,
}

impl Default for MaterialScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialScorer {
    pub fn new() -> Self {
        Self::with_rng(PieceWeights::default(), DEFAULT_JITTER, StdRng::from_os_rng())
    }

    /// Reproducible jitter sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(
            PieceWeights::default(),
            DEFAULT_JITTER,
            StdRng::seed_from_u64(seed),
        )
    }

    /// Pure material count, no jitter.
    pub fn without_jitter() -> Self {
        Self::with_rng(PieceWeights::default(), 0.0, StdRng::seed_from_u64(0))
    }

    pub fn with_rng(weights: PieceWeights, jitter: Score, rng: StdRng) -> Self {
        let cap = weights.smallest_positive().map_or(0.0, Score::from);
        Self {
            weights,
            jitter: jitter.clamp(0.0, cap),
            rng,
        }
    }

    /// Exclusive upper bound of the jitter actually applied.
    pub fn jitter(&self) -> Score {
        self.jitter
    }

    /// Material of `perspective` minus material of the other side.
    pub fn material_balance<R: RulesEngine>(&self, position: &R, perspective: Side) -> i64 {
        let opponent = perspective.opposite();
        PieceKind::ALL
            .iter()
            .map(|&kind| {
                let weight = i64::from(self.weights.weight(kind));
                let own = i64::from(position.piece_count(perspective, kind));
                let theirs = i64::from(position.piece_count(opponent, kind));
                own * weight - theirs * weight
            })
            .sum()
    }

    /// Largest material one side can ever hold, assuming every pawn promotes
    /// to the heaviest piece it may become.
    pub fn max_material(&self) -> Score {
        let w = |kind: PieceKind| Score::from(self.weights.weight(kind));
        let heaviest_promotion = [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ]
        .into_iter()
        .map(w)
        .fold(w(PieceKind::Pawn), Score::max);

        8.0 * heaviest_promotion
            + w(PieceKind::Queen)
            + 2.0 * (w(PieceKind::Rook) + w(PieceKind::Bishop) + w(PieceKind::Knight))
            + w(PieceKind::King)
    }
}

impl BoardScorer for MaterialScorer {
    fn score<R: RulesEngine>(&mut self, position: &R, perspective: Side) -> Score {
        let jitter = if self.jitter > 0.0 {
            self.rng.random::<Score>() * self.jitter
        } else {
            0.0
        };
        self.material_balance(position, perspective) as Score + jitter
    }

    fn weights(&self) -> &PieceWeights {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialScorer};
    use crate::game_state::chess_game::ChessGame;
    use crate::game_state::chess_types::{PieceWeights, Side};
    use crate::search::terminal_scoring::EndScores;

    #[test]
    fn start_position_is_balanced() {
        let game = ChessGame::new_game();
        let mut scorer = MaterialScorer::without_jitter();
        assert_eq!(scorer.score(&game, Side::White), 0.0);
        assert_eq!(scorer.score(&game, Side::Black), 0.0);
    }

    #[test]
    fn material_is_antisymmetric_between_perspectives() {
        // White has an extra queen and rook, black an extra knight.
        let game = ChessGame::from_fen("4k1n1/8/8/8/8/8/8/R2QK3 w - - 0 1").expect("FEN");
        let scorer = MaterialScorer::without_jitter();
        assert_eq!(scorer.material_balance(&game, Side::White), 10 + 3 - 5);
        assert_eq!(scorer.material_balance(&game, Side::Black), -(10 + 3 - 5));
    }

    #[test]
    fn jitter_stays_below_smallest_weight() {
        let game = ChessGame::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN");
        let mut scorer = MaterialScorer::seeded(7);
        for _ in 0..1000 {
            let score = scorer.score(&game, Side::White);
            assert!((1.0..2.0).contains(&score), "score {score} out of jitter range");
        }
    }

    #[test]
    fn requested_jitter_is_capped_by_weights() {
        let scorer = MaterialScorer::with_rng(
            PieceWeights::default(),
            5.0,
            rand::SeedableRng::seed_from_u64(1),
        );
        assert_eq!(scorer.jitter(), 1.0);
    }

    #[test]
    fn seeded_scorers_repeat_the_same_sequence() {
        let game = ChessGame::new_game();
        let mut a = MaterialScorer::seeded(99);
        let mut b = MaterialScorer::seeded(99);
        for _ in 0..10 {
            assert_eq!(a.score(&game, Side::White), b.score(&game, Side::White));
        }
    }

    #[test]
    fn evaluator_never_reaches_terminal_anchors() {
        let scorer = MaterialScorer::new();
        let ends = EndScores::default();
        let bound = scorer.max_material() + scorer.jitter();
        assert!(bound < ends.win, "material bound {bound} reaches WIN");
        assert!(-bound > ends.lose, "material bound {bound} reaches LOSE");
        assert!(bound > ends.tie);
    }
}
