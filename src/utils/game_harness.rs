//! Game loop and head-to-head series runner.
//!
//! Drives two `Player`s over a `ChessGame` until the game ends under the
//! claiming draw policy, the ply limit runs out, or the stop signal fires.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{MatchError, PlayerError, SearchError};
use crate::game_state::chess_game::ChessGame;
use crate::game_state::chess_types::Side;
use crate::game_state::rules_engine::{DrawPolicy, RulesEngine};
use crate::players::player_trait::Player;
use crate::search::stop_signal::StopSignal;
use crate::search::terminal_scoring::{classify_terminal, DrawReason, TerminalState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    WhiteWinCheckmate,
    BlackWinCheckmate,
    Draw(DrawReason),
    DrawMaxPlies,
    Stopped,
}

impl MatchOutcome {
    /// Result code of a game record: `1` White won, `-1` tie, `0` otherwise.
    pub fn result_code(self) -> i8 {
        match self {
            MatchOutcome::WhiteWinCheckmate => 1,
            MatchOutcome::Draw(_) | MatchOutcome::DrawMaxPlies => -1,
            MatchOutcome::BlackWinCheckmate | MatchOutcome::Stopped => 0,
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            MatchOutcome::WhiteWinCheckmate => Some(Side::White),
            MatchOutcome::BlackWinCheckmate => Some(Side::Black),
            _ => None,
        }
    }

    pub fn is_draw(self) -> bool {
        matches!(self, MatchOutcome::Draw(_) | MatchOutcome::DrawMaxPlies)
    }
}

impl From<TerminalState> for MatchOutcome {
    fn from(state: TerminalState) -> Self {
        match state {
            TerminalState::Checkmate {
                winner: Side::White,
            } => MatchOutcome::WhiteWinCheckmate,
            TerminalState::Checkmate {
                winner: Side::Black,
            } => MatchOutcome::BlackWinCheckmate,
            TerminalState::Draw(reason) => MatchOutcome::Draw(reason),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_plies: u32,
    /// End the game as soon as a draw could be claimed.
    pub claim_draw: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 500,
            claim_draw: true,
        }
    }
}

impl MatchConfig {
    fn draw_policy(&self) -> DrawPolicy {
        if self.claim_draw {
            DrawPolicy::Claim
        } else {
            DrawPolicy::Strict
        }
    }
}

/// Summary of one finished (or stopped) game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub fen: String,
    pub last_move: Option<String>,
    pub moves_history: Vec<String>,
    /// Plies played in this game.
    pub moves: u32,
    /// Wall time in seconds, rounded to two decimals.
    pub time: f64,
    pub result: i8,
    pub outcome: MatchOutcome,
    pub started_at: DateTime<Utc>,
    pub white_move_count: u32,
    pub black_move_count: u32,
    pub white_total_time_ns: u64,
    pub black_total_time_ns: u64,
}

/// Play one game from `start`. `white` and `black` must be built for their
/// sides; a player asked to move out of turn fails the game.
pub fn play_game(
    start: &ChessGame,
    white: &mut dyn Player<ChessGame>,
    black: &mut dyn Player<ChessGame>,
    config: &MatchConfig,
    stop: &StopSignal,
) -> Result<GameRecord, MatchError> {
    let mut game = start.clone();
    let policy = config.draw_policy();
    let started_at = Utc::now();
    let clock = Instant::now();
    let history_base = game.move_history_len();

    let mut plies = 0u32;
    let mut white_move_count = 0u32;
    let mut black_move_count = 0u32;
    let mut white_total_time_ns = 0u64;
    let mut black_total_time_ns = 0u64;

    info!(white = white.solver(), black = black.solver(), "game started");

    let outcome = loop {
        if let Some(terminal) = classify_terminal(&game, policy) {
            break MatchOutcome::from(terminal);
        }
        if stop.is_stopped() {
            break MatchOutcome::Stopped;
        }
        if plies >= config.max_plies {
            break MatchOutcome::DrawMaxPlies;
        }

        let mover = game.side_to_move();
        let started = Instant::now();
        let chosen = if mover == Side::White {
            white.choose_move(&mut game)
        } else {
            black.choose_move(&mut game)
        };
        let elapsed_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

        let mv = match chosen {
            Ok(mv) => mv,
            Err(PlayerError::Interrupted) | Err(PlayerError::Search(SearchError::Cancelled)) => {
                break MatchOutcome::Stopped;
            }
            Err(source) => return Err(MatchError::Player { side: mover, source }),
        };

        match mover {
            Side::White => {
                white_move_count = white_move_count.saturating_add(1);
                white_total_time_ns = white_total_time_ns.saturating_add(elapsed_ns);
            }
            Side::Black => {
                black_move_count = black_move_count.saturating_add(1);
                black_total_time_ns = black_total_time_ns.saturating_add(elapsed_ns);
            }
        }

        debug!(ply = plies + 1, side = %mover, mv = %game.move_text(&mv), "move played");
        game.apply(&mv)?;
        plies += 1;
    };

    if outcome == MatchOutcome::Stopped {
        info!("game stopped");
    }

    let moves_history = uci_history(&game, history_base);
    let record = GameRecord {
        white: white.solver().to_owned(),
        black: black.solver().to_owned(),
        fen: game.board_fen(),
        last_move: moves_history.last().cloned(),
        moves_history,
        moves: plies,
        time: (clock.elapsed().as_secs_f64() * 100.0).round() / 100.0,
        result: outcome.result_code(),
        outcome,
        started_at,
        white_move_count,
        black_move_count,
        white_total_time_ns,
        black_total_time_ns,
    };

    info!(
        outcome = ?record.outcome,
        result = record.result,
        plies = record.moves,
        "game finished"
    );

    Ok(record)
}

/// UCI text of the moves played since `base`, oldest first.
fn uci_history(game: &ChessGame, base: usize) -> Vec<String> {
    let mut replay = game.clone();
    let mut history = Vec::with_capacity(game.move_history_len().saturating_sub(base));
    while replay.move_history_len() > base {
        match replay.undo() {
            Ok(mv) => history.push(replay.move_text(&mv)),
            Err(_) => break,
        }
    }
    history.reverse();
    history
}

/// Builds a player for the given side.
pub type PlayerFactory<'a> = dyn Fn(Side) -> Box<dyn Player<ChessGame>> + 'a;

/// A game between player 1 and player 2 with randomly assigned colours.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesGame {
    pub player1_side: Side,
    pub record: GameRecord,
}

impl SeriesGame {
    pub fn player1_won(&self) -> bool {
        self.record.outcome.winner() == Some(self.player1_side)
    }

    pub fn player2_won(&self) -> bool {
        self.record.outcome.winner() == Some(self.player1_side.opposite())
    }
}

/// Flip a coin for colours, then play `player1` against `player2`.
pub fn start_game<G: Rng>(
    start: &ChessGame,
    player1: &PlayerFactory<'_>,
    player2: &PlayerFactory<'_>,
    config: &MatchConfig,
    rng: &mut G,
    stop: &StopSignal,
) -> Result<SeriesGame, MatchError> {
    let player1_side = if rng.random_bool(0.5) {
        Side::White
    } else {
        Side::Black
    };

    let mut first = player1(player1_side);
    let mut second = player2(player1_side.opposite());
    let record = match player1_side {
        Side::White => play_game(start, first.as_mut(), second.as_mut(), config, stop)?,
        Side::Black => play_game(start, second.as_mut(), first.as_mut(), config, stop)?,
    };

    Ok(SeriesGame {
        player1_side,
        record,
    })
}

#[derive(Debug, Clone)]
pub struct MatchSeriesConfig {
    pub games: u16,
    pub base_seed: u64,
    pub per_game: MatchConfig,
    pub verbose: bool,
}

impl Default for MatchSeriesConfig {
    fn default() -> Self {
        Self {
            games: 10,
            base_seed: 0,
            per_game: MatchConfig::default(),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchSeriesStats {
    pub games: u16,
    pub player1_wins: u16,
    pub player2_wins: u16,
    pub draws: u16,
    pub stopped: u16,
    pub results: Vec<SeriesGame>,
    pub player1_moves: u32,
    pub player2_moves: u32,
    pub player1_total_time_ns: u64,
    pub player2_total_time_ns: u64,
    pub player1_avg_move_time_ms: f64,
    pub player2_avg_move_time_ms: f64,
    pub overall_avg_move_time_ms: f64,
}

impl MatchSeriesStats {
    pub fn report(&self) -> String {
        format!(
            "games={} player1_wins={} player2_wins={} draws={} stopped={} p1_avg_ms={:.3} p2_avg_ms={:.3} overall_avg_ms={:.3}",
            self.games,
            self.player1_wins,
            self.player2_wins,
            self.draws,
            self.stopped,
            self.player1_avg_move_time_ms,
            self.player2_avg_move_time_ms,
            self.overall_avg_move_time_ms
        )
    }

    fn record(&mut self, game: SeriesGame) {
        let record = &game.record;
        let (p1_moves, p1_ns, p2_moves, p2_ns) = match game.player1_side {
            Side::White => (
                record.white_move_count,
                record.white_total_time_ns,
                record.black_move_count,
                record.black_total_time_ns,
            ),
            Side::Black => (
                record.black_move_count,
                record.black_total_time_ns,
                record.white_move_count,
                record.white_total_time_ns,
            ),
        };
        self.player1_moves = self.player1_moves.saturating_add(p1_moves);
        self.player2_moves = self.player2_moves.saturating_add(p2_moves);
        self.player1_total_time_ns = self.player1_total_time_ns.saturating_add(p1_ns);
        self.player2_total_time_ns = self.player2_total_time_ns.saturating_add(p2_ns);

        if game.player1_won() {
            self.player1_wins += 1;
        } else if game.player2_won() {
            self.player2_wins += 1;
        } else if record.outcome.is_draw() {
            self.draws += 1;
        } else {
            self.stopped += 1;
        }

        self.games += 1;
        self.results.push(game);
    }
}

/// Play a series of independent games from `start`.
///
/// Factories receive the side and a per-game seed derived from `base_seed`.
/// Colours are drawn per game from `base_seed`. A stopped game ends the series.
pub fn play_game_series<F1, F2>(
    start: &ChessGame,
    player1_factory: F1,
    player2_factory: F2,
    config: &MatchSeriesConfig,
    stop: &StopSignal,
) -> Result<MatchSeriesStats, MatchError>
where
    F1: Fn(Side, u64) -> Box<dyn Player<ChessGame>>,
    F2: Fn(Side, u64) -> Box<dyn Player<ChessGame>>,
{
    let mut stats = MatchSeriesStats::default();
    let mut color_rng = StdRng::seed_from_u64(config.base_seed ^ 0xA5A5_5A5A_0123_4567);

    for i in 0..config.games {
        let seed = config.base_seed.wrapping_add(u64::from(i));
        let player1 = |side: Side| player1_factory(side, seed);
        let player2 = |side: Side| player2_factory(side, seed.wrapping_add(1));

        let game = start_game(start, &player1, &player2, &config.per_game, &mut color_rng, stop)?;
        let stopped = game.record.outcome == MatchOutcome::Stopped;

        if config.verbose {
            info!(
                game = i + 1,
                games = config.games,
                seed,
                player1 = %game.player1_side,
                outcome = ?game.record.outcome,
                "series game finished"
            );
        }

        stats.record(game);
        if stopped {
            break;
        }
    }

    stats.player1_avg_move_time_ms =
        avg_ns_per_move_ms(stats.player1_total_time_ns, stats.player1_moves);
    stats.player2_avg_move_time_ms =
        avg_ns_per_move_ms(stats.player2_total_time_ns, stats.player2_moves);

    let total_ns = stats
        .player1_total_time_ns
        .saturating_add(stats.player2_total_time_ns);
    let total_moves = stats.player1_moves.saturating_add(stats.player2_moves);
    stats.overall_avg_move_time_ms = avg_ns_per_move_ms(total_ns, total_moves);

    Ok(stats)
}

#[inline]
fn avg_ns_per_move_ms(total_ns: u64, moves: u32) -> f64 {
    if moves == 0 {
        0.0
    } else {
        (total_ns as f64) / (moves as f64) / 1_000_000.0
    }
}
