//! Command-line front end.
//!
//! `horizon_chess play` runs a single game (human against minimax by default).
//! `horizon_chess series` runs engine-vs-engine games and prints a summary.
//! Set `RUST_LOG=debug` to see every move, `--verbose` to trace the search.

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use horizon_chess::game_state::chess_game::ChessGame;
use horizon_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use horizon_chess::game_state::chess_types::Side;
use horizon_chess::players::player_trait::{Player, PlayerKind};
use horizon_chess::search::minimax::SearchConfig;
use horizon_chess::search::stop_signal::StopSignal;
use horizon_chess::utils::game_harness::{
    play_game_series, start_game, MatchConfig, MatchSeriesConfig, PlayerFactory,
};

#[derive(Debug, Parser)]
#[command(name = "horizon_chess", version, about = "Depth-bounded minimax chess player")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play one game with randomly assigned colours.
    Play(PlayArgs),
    /// Play a series of games and report the totals.
    Series(SeriesArgs),
}

#[derive(Debug, Args)]
struct Common {
    /// Minimax search depth in plies.
    #[arg(long, default_value_t = 3)]
    depth: u8,
    /// Seed for colours, jitter and opening choice.
    #[arg(long)]
    seed: Option<u64>,
    /// Starting position as FEN.
    #[arg(long, default_value = STARTING_POSITION_FEN)]
    fen: String,
    /// Stop a game after this many plies and score it as a draw.
    #[arg(long, default_value_t = 500)]
    max_plies: u32,
    /// Log every scored child of the search.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct PlayArgs {
    #[command(flatten)]
    common: Common,
    /// First player: human, random, greedy or minimax.
    #[arg(long, default_value = "human")]
    player1: PlayerKind,
    /// Second player.
    #[arg(long, default_value = "minimax")]
    player2: PlayerKind,
}

#[derive(Debug, Args)]
struct SeriesArgs {
    #[command(flatten)]
    common: Common,
    /// First player: random, greedy or minimax.
    #[arg(long, default_value = "minimax")]
    player1: PlayerKind,
    /// Second player.
    #[arg(long, default_value = "random")]
    player2: PlayerKind,
    /// Number of games to play.
    #[arg(long, default_value_t = 10)]
    games: u16,
    /// Print each game record as a JSON line.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stop = interrupt_signal()?;
    match cli.command {
        Command::Play(args) => run_play(args, &stop),
        Command::Series(args) => run_series(args, &stop),
    }
}

/// Stop signal raised by Ctrl-C. The running game ends as `Stopped` and its
/// record (or the series report so far) is still printed.
fn interrupt_signal() -> Result<StopSignal> {
    let stop = StopSignal::new();
    let handler = stop.clone();
    ctrlc::set_handler(move || handler.stop()).context("failed to install Ctrl-C handler")?;
    Ok(stop)
}

fn start_position(fen: &str) -> Result<ChessGame> {
    ChessGame::from_fen(fen).with_context(|| format!("bad --fen '{fen}'"))
}

fn search_config(common: &Common) -> SearchConfig {
    SearchConfig {
        depth: common.depth,
        verbose: common.verbose,
    }
}

fn run_play(args: PlayArgs, stop: &StopSignal) -> Result<()> {
    let common = &args.common;
    let start = start_position(&common.fen)?;
    let search = search_config(common);
    let seed = common.seed;

    let player1 = |side: Side| -> Box<dyn Player<ChessGame>> {
        args.player1.build(side, search, seed, stop)
    };
    let player2 = |side: Side| -> Box<dyn Player<ChessGame>> {
        args.player2.build(side, search, seed.map(|s| s.wrapping_add(1)), stop)
    };

    let config = MatchConfig {
        max_plies: common.max_plies,
        ..MatchConfig::default()
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let player1: &PlayerFactory<'_> = &player1;
    let player2: &PlayerFactory<'_> = &player2;
    let game = start_game(&start, player1, player2, &config, &mut rng, stop)?;

    println!("player1 plays {}", game.player1_side);
    println!("{}", serde_json::to_string_pretty(&game.record)?);
    Ok(())
}

fn run_series(args: SeriesArgs, stop: &StopSignal) -> Result<()> {
    let common = &args.common;
    ensure!(
        args.player1 != PlayerKind::Human && args.player2 != PlayerKind::Human,
        "series games are engine against engine; pick random, greedy or minimax"
    );

    let start = start_position(&common.fen)?;
    let search = search_config(common);
    let per_game_seeded = common.seed.is_some();

    let config = MatchSeriesConfig {
        games: args.games,
        base_seed: common.seed.unwrap_or_else(rand::random),
        per_game: MatchConfig {
            max_plies: common.max_plies,
            ..MatchConfig::default()
        },
        verbose: true,
    };

    let stats = play_game_series(
        &start,
        |side, seed| args.player1.build(side, search, per_game_seeded.then_some(seed), stop),
        |side, seed| args.player2.build(side, search, per_game_seeded.then_some(seed), stop),
        &config,
        stop,
    )?;

    if args.json {
        for game in &stats.results {
            println!("{}", serde_json::to_string(game)?);
        }
    }
    println!("{}", stats.report());
    Ok(())
}
