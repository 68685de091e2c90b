//! Fixed-depth alpha-beta player.

use tracing::debug;

use crate::errors::{PlayerError, SearchError};
use crate::game_state::chess_types::Side;
use crate::game_state::rules_engine::RulesEngine;
use crate::players::player_trait::{ensure_turn, Player};
use crate::search::board_scoring::{BoardScorer, MaterialScorer};
use crate::search::minimax::{MinimaxSearch, SearchConfig};
use crate::search::stop_signal::StopSignal;

pub struct MinimaxPlayer<S: BoardScorer = MaterialScorer> {
    side: Side,
    depth: u8,
    search: MinimaxSearch<S>,
}

impl MinimaxPlayer<MaterialScorer> {
    pub fn new(side: Side, depth: u8) -> Self {
        Self::from_config(
            side,
            SearchConfig {
                depth,
                ..SearchConfig::default()
            },
            None,
        )
    }

    pub fn from_config(side: Side, config: SearchConfig, seed: Option<u64>) -> Self {
        Self {
            side,
            depth: config.depth,
            search: MinimaxSearch::from_config(side, &config, seed),
        }
    }
}

impl<S: BoardScorer> MinimaxPlayer<S> {
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.search = self.search.with_stop_signal(stop);
        self
    }
}

impl<R: RulesEngine, S: BoardScorer> Player<R> for MinimaxPlayer<S> {
    fn side(&self) -> Side {
        self.side
    }

    fn solver(&self) -> &str {
        "minimax"
    }

    fn choose_move(&mut self, position: &mut R) -> Result<R::Move, PlayerError> {
        ensure_turn(self.side, position)?;

        let result = self.search.best_move(position, self.depth)?;
        let stats = self.search.stats();
        debug!(
            side = %self.side,
            depth = self.depth,
            score = result.score,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            "minimax search finished"
        );

        result
            .best_move
            .ok_or(PlayerError::Search(SearchError::NoLegalMove))
    }
}
