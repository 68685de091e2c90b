//! Player abstraction consumed by the game loop.
//!
//! Every strategy (human input, random, greedy, minimax) sits behind the same
//! trait so the driver can pick them at runtime.

use std::fmt;
use std::str::FromStr;

use crate::errors::PlayerError;
use crate::game_state::chess_game::ChessGame;
use crate::game_state::chess_types::Side;
use crate::game_state::rules_engine::RulesEngine;
use crate::players::player_greedy::GreedyPlayer;
use crate::players::player_human::HumanPlayer;
use crate::players::player_minimax::MinimaxPlayer;
use crate::players::player_random::RandomPlayer;
use crate::search::minimax::SearchConfig;
use crate::search::stop_signal::StopSignal;

pub trait Player<R: RulesEngine> {
    /// Side this player was built for. Fixed for the player's lifetime.
    fn side(&self) -> Side;

    /// Short strategy name used in result records.
    fn solver(&self) -> &str;

    /// Choose a legal move. The position is left as it was found.
    fn choose_move(&mut self, position: &mut R) -> Result<R::Move, PlayerError>;
}

/// Fail with `NotYourTurn` unless `side` is to move.
pub fn ensure_turn<R: RulesEngine>(side: Side, position: &R) -> Result<(), PlayerError> {
    let actual = position.side_to_move();
    if actual == side {
        Ok(())
    } else {
        Err(PlayerError::NotYourTurn {
            expected: side,
            actual,
        })
    }
}

/// Strategy selector for building players at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Random,
    Greedy,
    Minimax,
}

impl PlayerKind {
    /// Build a chess player for `side`. `seed` makes random choices reproducible.
    pub fn build(
        self,
        side: Side,
        search: SearchConfig,
        seed: Option<u64>,
        stop: &StopSignal,
    ) -> Box<dyn Player<ChessGame>> {
        match self {
            PlayerKind::Human => Box::new(HumanPlayer::stdio(side).with_stop_signal(stop.clone())),
            PlayerKind::Random => Box::new(match seed {
                Some(seed) => RandomPlayer::seeded(side, seed),
                None => RandomPlayer::new(side),
            }),
            PlayerKind::Greedy => Box::new(match seed {
                Some(seed) => GreedyPlayer::seeded(side, seed),
                None => GreedyPlayer::new(side),
            }),
            PlayerKind::Minimax => {
                Box::new(MinimaxPlayer::from_config(side, search, seed).with_stop_signal(stop.clone()))
            }
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerKind::Human => "human",
            PlayerKind::Random => "random",
            PlayerKind::Greedy => "greedy",
            PlayerKind::Minimax => "minimax",
        })
    }
}

impl FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(PlayerKind::Human),
            "random" => Ok(PlayerKind::Random),
            "greedy" => Ok(PlayerKind::Greedy),
            "minimax" => Ok(PlayerKind::Minimax),
            other => Err(format!(
                "unknown player '{other}' (expected human, random, greedy or minimax)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_turn, PlayerKind};
    use crate::errors::PlayerError;
    use crate::game_state::chess_game::ChessGame;
    use crate::game_state::chess_types::Side;
    use crate::search::minimax::SearchConfig;
    use crate::search::stop_signal::StopSignal;

    #[test]
    fn ensure_turn_rejects_wrong_side() {
        let game = ChessGame::new_game();
        assert!(ensure_turn(Side::White, &game).is_ok());
        assert!(matches!(
            ensure_turn(Side::Black, &game),
            Err(PlayerError::NotYourTurn {
                expected: Side::Black,
                actual: Side::White
            })
        ));
    }

    #[test]
    fn player_kind_parses_and_builds() {
        let stop = StopSignal::new();
        for name in ["random", "Greedy", "MINIMAX"] {
            let kind: PlayerKind = name.parse().expect("known player kind");
            let player = kind.build(Side::Black, SearchConfig::default(), Some(1), &stop);
            assert_eq!(player.side(), Side::Black);
            assert_eq!(player.solver(), kind.to_string());
        }
        assert!("stockfish".parse::<PlayerKind>().is_err());
    }
}
