use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use horizon_chess::game_state::chess_game::ChessGame;
use horizon_chess::game_state::chess_types::Side;
use horizon_chess::game_state::rules_engine::RulesEngine;
use horizon_chess::search::minimax::MinimaxSearch;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    depths: &'static [u8],
}

// Positions are past the opening so the search never takes a book move.
const CASES_QUICK: &[BenchCase] = &[
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[1, 2, 3],
    },
    BenchCase {
        name: "rook_endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/6P1/8 w - - 0 1",
        depths: &[1, 2, 3, 4],
    },
];

const CASES_STANDARD: &[BenchCase] = &[
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[1, 2, 3, 4],
    },
    BenchCase {
        name: "rook_endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/6P1/8 w - - 0 1",
        depths: &[1, 2, 3, 4, 5],
    },
    BenchCase {
        name: "middlegame",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        depths: &[1, 2, 3, 4],
    },
];

fn suite() -> (&'static str, &'static [BenchCase]) {
    match std::env::var("HORIZON_BENCH_SUITE") {
        Ok(value) if value.eq_ignore_ascii_case("standard") => ("standard", CASES_STANDARD),
        _ => ("quick", CASES_QUICK),
    }
}

fn bench_minimax(c: &mut Criterion) {
    let (suite_name, cases) = suite();

    let mut group = c.benchmark_group(format!("minimax_{suite_name}"));
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(10);

    for case in cases {
        let game = ChessGame::from_fen(case.fen).expect("benchmark FEN should parse");
        let side = game.side_to_move();

        for &depth in case.depths {
            let bench_name = format!("{}_d{}", case.name, depth);
            let mut bench_game = game.clone();

            group.bench_with_input(BenchmarkId::from_parameter(bench_name), &depth, |b, &depth| {
                b.iter(|| {
                    let mut search = MinimaxSearch::seeded(side, 7);
                    let result = search
                        .best_move(black_box(&mut bench_game), black_box(depth))
                        .expect("benchmark search should succeed");
                    black_box((result.score, search.stats().nodes))
                });
            });
        }
    }

    group.finish();
}

fn bench_cutoffs(c: &mut Criterion) {
    let game = ChessGame::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .expect("benchmark FEN should parse");

    // Correctness guard: alpha-beta must actually prune here.
    let mut scratch = game.clone();
    let mut search = MinimaxSearch::seeded(Side::White, 7);
    search.best_move(&mut scratch, 3).expect("search should run");
    assert!(search.stats().cutoffs > 0, "expected cutoffs at depth 3");

    c.bench_function("minimax_kiwipete_black_root_d2", |b| {
        let mut bench_game = game.clone();
        b.iter(|| {
            let mut search = MinimaxSearch::seeded(Side::Black, 7);
            black_box(search.search(
                black_box(&mut bench_game),
                Side::White,
                2,
                f64::NEG_INFINITY,
                f64::INFINITY,
            ))
        });
    });
}

criterion_group!(minimax_benches, bench_minimax, bench_cutoffs);
criterion_main!(minimax_benches);
