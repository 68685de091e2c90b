//! Crate root module declarations for the Horizon Chess player.
//!
//! Exposes the rules adapter, the depth-bounded alpha-beta search, the
//! player strategies and the game harness so the binary, benches and tests
//! can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_game;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod rules_engine;
    pub mod undo_state;
}

pub mod search {
    pub mod board_scoring;
    pub mod minimax;
    pub mod move_ordering;
    pub mod search_trace;
    pub mod stop_signal;
    pub mod terminal_scoring;
}

pub mod players {
    pub mod player_greedy;
    pub mod player_human;
    pub mod player_minimax;
    pub mod player_random;
    pub mod player_trait;
}

pub mod utils {
    pub mod game_harness;
}
