//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Scores are always taken from the perspective of the side the search was
//! built for (the root side), regardless of whose turn it is at a node. Nodes
//! where the root side moves maximize; the others minimize.
//!
//! The position is mutated in place through `RulesEngine::apply`/`undo`.
//! Every applied move is undone before control leaves the node, including
//! on cutoffs, cancellation and errors from deeper nodes.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::errors::SearchError;
use crate::game_state::chess_rules::OPENING_MOVES;
use crate::game_state::chess_types::{Score, Side};
use crate::game_state::rules_engine::{DrawPolicy, RulesEngine};
use crate::search::board_scoring::{BoardScorer, MaterialScorer};
use crate::search::move_ordering::{order_moves, OrderedMove};
use crate::search::search_trace::{ChildScored, SearchTrace, SilentTrace, TracingTrace};
use crate::search::stop_signal::StopSignal;
use crate::search::terminal_scoring::{score_terminal, EndScores};

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    pub depth: u8,
    /// Log every scored child through `tracing`.
    pub verbose: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<M> {
    pub score: Score,
    /// `None` at terminal nodes and at depth 0.
    pub best_move: Option<M>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

pub struct MinimaxSearch<S: BoardScorer = MaterialScorer> {
    root_side: Side,
    scorer: S,
    end_scores: EndScores,
    opening_rng: StdRng,
    trace: Box<dyn SearchTrace + Send>,
    stop: Option<StopSignal>,
    stats: SearchStats,
}

impl MinimaxSearch<MaterialScorer> {
    pub fn new(root_side: Side) -> Self {
        Self::with_scorer(root_side, MaterialScorer::new(), StdRng::from_os_rng())
    }

    /// Fully reproducible search: jitter and opening choice derive from `seed`.
    pub fn seeded(root_side: Side, seed: u64) -> Self {
        Self::with_scorer(
            root_side,
            MaterialScorer::seeded(seed),
            StdRng::seed_from_u64(seed.rotate_left(17) ^ 0x5EED_0F_B00C),
        )
    }

    pub fn from_config(root_side: Side, config: &SearchConfig, seed: Option<u64>) -> Self {
        let search = match seed {
            Some(seed) => Self::seeded(root_side, seed),
            None => Self::new(root_side),
        };
        if config.verbose {
            search.with_trace(Box::new(TracingTrace))
        } else {
            search
        }
    }
}

impl<S: BoardScorer> MinimaxSearch<S> {
    pub fn with_scorer(root_side: Side, scorer: S, opening_rng: StdRng) -> Self {
        Self {
            root_side,
            scorer,
            end_scores: EndScores::default(),
            opening_rng,
            trace: Box::new(SilentTrace),
            stop: None,
            stats: SearchStats::default(),
        }
    }

    pub fn with_trace(mut self, trace: Box<dyn SearchTrace + Send>) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Counters accumulated since the last `best_move` call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search from the side to move with a fully open window.
    pub fn best_move<R: RulesEngine>(
        &mut self,
        position: &mut R,
        depth: u8,
    ) -> Result<SearchResult<R::Move>, SearchError> {
        self.stats = SearchStats::default();
        let side_to_move = position.side_to_move();
        self.search(position, side_to_move, depth, Score::NEG_INFINITY, Score::INFINITY)
    }

    /// Minimax value of `position` with `side_to_move` to play, searched
    /// `depth` plies deep inside the `(alpha, beta)` window.
    pub fn search<R: RulesEngine>(
        &mut self,
        position: &mut R,
        side_to_move: Side,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
    ) -> Result<SearchResult<R::Move>, SearchError> {
        if self.stop.as_ref().is_some_and(StopSignal::is_stopped) {
            return Err(SearchError::Cancelled);
        }
        let actual = position.side_to_move();
        if side_to_move != actual {
            return Err(SearchError::SideMismatch {
                expected: side_to_move,
                actual,
            });
        }
        self.stats.nodes += 1;

        if depth == 0 || position.is_game_over(DrawPolicy::Strict) {
            return Ok(SearchResult {
                score: self.leaf_score(position),
                best_move: None,
            });
        }

        if position.move_history_len() == 0 {
            if let Some(mv) = self.opening_move(position) {
                return Ok(SearchResult {
                    score: self.leaf_score(position),
                    best_move: Some(mv),
                });
            }
        }

        let candidates = self.ordered_moves(position);
        let maximizing = side_to_move == self.root_side;
        let mut best = if maximizing {
            Score::NEG_INFINITY
        } else {
            Score::INFINITY
        };
        let mut best_move = None;

        for candidate in &candidates {
            let traced = self.trace.enabled().then(|| {
                (
                    position.move_text(&candidate.mv),
                    position.moved_piece_kind(&candidate.mv),
                )
            });

            position.apply(&candidate.mv)?;
            let child = self.search(position, side_to_move.opposite(), depth - 1, alpha, beta);
            position.undo()?;
            let score = child?.score;

            if let Some((move_text, moved_piece)) = traced {
                self.trace.child_scored(&ChildScored {
                    side_to_move: side_to_move.opposite(),
                    candidates: candidates.len(),
                    depth,
                    moved_piece,
                    move_text: &move_text,
                    score,
                });
            }

            // Ties go to the later candidate.
            if maximizing {
                if score >= best {
                    best = score;
                    best_move = Some(candidate.mv.clone());
                }
                alpha = alpha.max(score);
            } else {
                if score <= best {
                    best = score;
                    best_move = Some(candidate.mv.clone());
                }
                beta = beta.min(score);
            }

            // Strict: a score equal to a bound is still exact, so later equal
            // candidates remain genuine ties.
            if beta < alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        Ok(SearchResult { score: best, best_move })
    }

    /// Legal moves in search order, ranked with the evaluator's own weights.
    pub fn ordered_moves<R: RulesEngine>(&self, position: &R) -> Vec<OrderedMove<R::Move>> {
        order_moves(position, self.scorer.weights())
    }

    /// Terminal score when the game is over, material evaluation otherwise.
    fn leaf_score<R: RulesEngine>(&mut self, position: &R) -> Score {
        match score_terminal(position, self.root_side, DrawPolicy::Strict, &self.end_scores) {
            Some(score) => score,
            None => self.scorer.score(position, self.root_side),
        }
    }

    /// Uniform pick among the fixed first moves that are legal here.
    fn opening_move<R: RulesEngine>(&mut self, position: &R) -> Option<R::Move> {
        let book: Vec<R::Move> = OPENING_MOVES
            .iter()
            .filter_map(|text| position.parse_move(text).ok())
            .collect();
        book.choose(&mut self.opening_rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use super::{MinimaxSearch, SearchResult};
    use crate::errors::SearchError;
    use crate::game_state::chess_game::ChessGame;
    use crate::game_state::chess_rules::OPENING_MOVES;
    use crate::game_state::chess_types::{PieceKind, PieceWeights, Score, Side};
    use crate::game_state::rules_engine::{DrawPolicy, RulesEngine};
    use crate::search::board_scoring::{BoardScorer, MaterialScorer};
    use crate::search::search_trace::{ChildScored, SearchTrace};
    use crate::search::stop_signal::StopSignal;
    use crate::search::terminal_scoring::{score_terminal, EndScores};

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const BACK_RANK: &str = "6k1/5ppp/8/8/8/8/5PPP/3R2K1 w - - 0 1";
    const ROOK_ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/6P1/8 w - - 0 1";
    const HANGING_QUEEN: &str = "4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1";

    fn exact_search(root: Side) -> MinimaxSearch {
        MinimaxSearch::with_scorer(
            root,
            MaterialScorer::without_jitter(),
            rand::SeedableRng::seed_from_u64(0),
        )
    }

    /// Plain minimax without pruning or move ordering.
    fn exhaustive(position: &mut ChessGame, root: Side, depth: u8, scorer: &mut MaterialScorer) -> Score {
        if depth == 0 || position.is_game_over(DrawPolicy::Strict) {
            return score_terminal(position, root, DrawPolicy::Strict, &EndScores::default())
                .unwrap_or_else(|| scorer.score(position, root));
        }

        let maximizing = position.side_to_move() == root;
        let mut best = if maximizing {
            Score::NEG_INFINITY
        } else {
            Score::INFINITY
        };
        for mv in position.legal_moves() {
            position.apply(&mv).expect("legal move should apply");
            let score = exhaustive(position, root, depth - 1, scorer);
            position.undo().expect("undo should succeed");
            best = if maximizing { best.max(score) } else { best.min(score) };
        }
        best
    }

    fn assert_matches_exhaustive(fen: &str, root: Side, depth: u8) {
        let mut game = ChessGame::from_fen(fen).expect("FEN should parse");
        let side_to_move = game.side_to_move();
        let mut search = exact_search(root);

        let result = search
            .search(&mut game, side_to_move, depth, Score::NEG_INFINITY, Score::INFINITY)
            .expect("search should run");
        let mut scorer = MaterialScorer::without_jitter();
        let expected = exhaustive(&mut game, root, depth, &mut scorer);
        assert_eq!(result.score, expected, "{fen} depth {depth} root {root}");

        let best_move = result.best_move.expect("non-terminal root should yield a move");
        game.apply(&best_move).expect("best move should be legal");
        let chosen_value = exhaustive(&mut game, root, depth - 1, &mut scorer);
        assert_eq!(chosen_value, expected, "chosen move is not optimal in {fen}");
    }

    #[test]
    fn depth_zero_returns_evaluation_without_move() {
        let mut game = ChessGame::from_fen("4k1n1/8/8/8/8/8/8/R2QK3 w - - 0 1").expect("FEN");
        let mut search = exact_search(Side::White);

        let result = search
            .search(&mut game, Side::White, 0, Score::NEG_INFINITY, Score::INFINITY)
            .expect("search should run");
        assert_eq!(
            result,
            SearchResult {
                score: 8.0,
                best_move: None
            }
        );
    }

    #[test]
    fn depth_zero_on_start_position_skips_opening_shortcut() {
        let mut game = ChessGame::new_game();
        let mut search = exact_search(Side::White);
        let result = search.best_move(&mut game, 0).expect("search should run");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn finished_game_scores_terminal_without_move() {
        let mut mated = ChessGame::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").expect("FEN");
        let mut search = exact_search(Side::Black);
        let result = search.best_move(&mut mated, 3).expect("search should run");
        assert_eq!(result.score, EndScores::default().lose);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn opening_shortcut_picks_from_fixed_set_at_any_depth() {
        let mut chosen = HashSet::new();
        for seed in 0..16u64 {
            for depth in 1..=4 {
                let mut game = ChessGame::new_game();
                let mut search = MinimaxSearch::seeded(Side::White, seed);
                let result = search.best_move(&mut game, depth).expect("search should run");
                let mv = result.best_move.expect("opening move expected");
                let text = game.move_text(&mv);

                assert!(OPENING_MOVES.contains(&text.as_str()), "{text} not in opening set");
                assert!(game.legal_moves().contains(&mv));
                assert_eq!(search.stats().nodes, 1);
                assert_eq!(game.move_history_len(), 0);
                chosen.insert(text);
            }
        }
        assert!(chosen.len() > 1, "opening choice never varied: {chosen:?}");
    }

    #[test]
    fn ordering_follows_the_scorer_weights() {
        let heavy_rook = PieceWeights::new([1, 5, 4, 20, 9, 0]);
        let scorer = MaterialScorer::with_rng(heavy_rook, 0.0, rand::SeedableRng::seed_from_u64(0));
        let mut search = MinimaxSearch::with_scorer(Side::White, scorer, rand::SeedableRng::seed_from_u64(0));
        let mut game = ChessGame::from_fen("4k3/8/8/3r1q2/8/4N3/8/4K3 w - - 0 1").expect("FEN");

        let ordered = search.ordered_moves(&game);
        assert_eq!(ordered[0].target, Some(PieceKind::Rook));
        assert_eq!(ordered[0].priority, 20);
        assert_eq!(ordered[1].target, Some(PieceKind::Queen));

        let result = search.best_move(&mut game, 1).expect("search should run");
        let best_move = result.best_move.expect("best move should exist");
        assert_eq!(game.move_text(&best_move), "e3d5");
        assert_eq!(result.score, -4.0);
    }

    #[test]
    fn search_for_the_side_not_to_move_is_rejected() {
        let mut game = ChessGame::new_game();
        let mut search = exact_search(Side::White);
        let err = search
            .search(&mut game, Side::Black, 2, Score::NEG_INFINITY, Score::INFINITY)
            .expect_err("black is not to move");
        assert_eq!(
            err,
            SearchError::SideMismatch {
                expected: Side::Black,
                actual: Side::White
            }
        );
        assert_eq!(search.stats().nodes, 0);
    }

    #[test]
    fn finds_back_rank_mate_in_one() {
        let mut game = ChessGame::from_fen(BACK_RANK).expect("FEN");
        let mut search = exact_search(Side::White);

        let result = search.best_move(&mut game, 1).expect("search should run");
        let best_move = result.best_move.expect("best move should exist");
        assert_eq!(game.move_text(&best_move), "d1d8");
        assert_eq!(result.score, EndScores::default().win);

        let deeper = search.best_move(&mut game, 3).expect("search should run");
        assert_eq!(deeper.score, EndScores::default().win);
    }

    #[test]
    fn captures_hanging_queen() {
        let mut game = ChessGame::from_fen(HANGING_QUEEN).expect("FEN");
        let mut search = exact_search(Side::White);
        let result = search.best_move(&mut game, 2).expect("search should run");
        let best_move = result.best_move.expect("best move should exist");
        assert_eq!(game.target_piece_kind(&best_move), Some(PieceKind::Queen));
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn pruning_search_matches_exhaustive_minimax() {
        assert_matches_exhaustive(KIWIPETE, Side::White, 2);
        assert_matches_exhaustive(KIWIPETE, Side::Black, 2);
        assert_matches_exhaustive(BACK_RANK, Side::White, 3);
        assert_matches_exhaustive(ROOK_ENDGAME, Side::White, 3);
        assert_matches_exhaustive(ROOK_ENDGAME, Side::Black, 3);
        assert_matches_exhaustive(HANGING_QUEEN, Side::White, 3);
    }

    #[test]
    fn search_restores_position_after_cutoffs() {
        let mut game = ChessGame::from_fen(KIWIPETE).expect("FEN");
        let fen_before = game.board_fen();
        let moves_before = game.legal_moves();
        let mut search = MinimaxSearch::seeded(Side::White, 11);

        let result = search.best_move(&mut game, 3).expect("search should run");

        assert!(result.best_move.is_some());
        assert!(search.stats().cutoffs > 0, "expected at least one cutoff");
        assert_eq!(game.board_fen(), fen_before);
        assert_eq!(game.legal_moves(), moves_before);
        assert_eq!(game.move_history_len(), 0);
    }

    struct StopAfter {
        remaining: usize,
        stop: StopSignal,
    }

    impl SearchTrace for StopAfter {
        fn enabled(&self) -> bool {
            true
        }

        fn child_scored(&mut self, _event: &ChildScored<'_>) {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.stop.stop();
            }
        }
    }

    #[test]
    fn cancellation_unwinds_with_every_move_undone() {
        let mut game = ChessGame::from_fen(KIWIPETE).expect("FEN");
        let fen_before = game.board_fen();
        let stop = StopSignal::new();
        let mut search = MinimaxSearch::seeded(Side::White, 3)
            .with_stop_signal(stop.clone())
            .with_trace(Box::new(StopAfter {
                remaining: 5,
                stop: stop.clone(),
            }));

        let err = search.best_move(&mut game, 3).expect_err("search should be cancelled");
        assert_eq!(err, SearchError::Cancelled);
        assert_eq!(game.board_fen(), fen_before);
        assert_eq!(game.move_history_len(), 0);
    }

    #[derive(Clone, Default)]
    struct Collect(Arc<Mutex<Vec<(Side, u8, String)>>>);

    impl SearchTrace for Collect {
        fn enabled(&self) -> bool {
            true
        }

        fn child_scored(&mut self, event: &ChildScored<'_>) {
            self.0
                .lock()
                .expect("trace lock")
                .push((event.side_to_move, event.depth, event.move_text.to_owned()));
        }
    }

    #[test]
    fn trace_reports_every_root_child() {
        let mut game = ChessGame::from_fen(BACK_RANK).expect("FEN");
        let events = Collect::default();
        let mut search = exact_search(Side::White).with_trace(Box::new(events.clone()));

        search.best_move(&mut game, 1).expect("search should run");

        let events = events.0.lock().expect("trace lock");
        assert_eq!(events.len(), game.legal_moves().len());
        assert!(events.iter().all(|(side, depth, _)| *side == Side::Black && *depth == 1));
        assert!(events.iter().any(|(_, _, text)| text == "d1d8"));
    }
}
