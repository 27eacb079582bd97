//! Crate root module declarations for the Plum Arbiter rules engine.
//!
//! Exposes the board model, movement geometry, legality arbiter, game-end
//! detectors, SAN notation, move execution, and history navigation so the
//! binaries, benches, and external tooling can import stable module paths.

pub mod config;
pub mod errors;
pub mod session;

pub mod board_model {
    pub mod board;
    pub mod en_passer;
    pub mod king_rays;
    pub mod piece;
    pub mod scratch_pool;
    pub mod square;
}

pub mod geometry {
    pub mod inverse;
    pub mod rays;
    pub mod valid_squares;
}

pub mod legality {
    pub mod arbiter;
    pub mod en_passant;
    pub mod king;
    pub mod pin;
}

pub mod game_end {
    pub mod check;
    pub mod checkmate;
    pub mod sacrifice;
    pub mod stalemate;
}

pub mod notation {
    pub mod disambiguation;
    pub mod move_meta;
    pub mod move_parser;
    pub mod san;
    pub mod token_stream;
}

pub mod execution {
    pub mod board_history;
    pub mod move_executor;
}

pub mod history {
    pub mod move_repo;
    pub mod navigator;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_parser;
    pub mod puzzle_regression;
    pub mod render_board;
}
