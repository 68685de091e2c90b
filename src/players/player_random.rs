//! Uniform random mover.
//!
//! Mostly useful as a sparring partner for the search players and for
//! exercising the game loop.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::errors::PlayerError;
use crate::game_state::chess_types::Side;
use crate::game_state::rules_engine::RulesEngine;
use crate::players::player_trait::{ensure_turn, Player};

pub struct RandomPlayer {
    side: Side,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(side: Side, seed: u64) -> Self {
        Self {
            side,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: RulesEngine> Player<R> for RandomPlayer {
    fn side(&self) -> Side {
        self.side
    }

    fn solver(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, position: &mut R) -> Result<R::Move, PlayerError> {
        ensure_turn(self.side, position)?;

        let legal_moves = position.legal_moves();
        legal_moves
            .choose(&mut self.rng)
            .cloned()
            .ok_or(PlayerError::NoLegalMove)
    }
}
