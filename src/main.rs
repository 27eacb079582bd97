//! Game viewer.
//!
//! Reads one game per line from stdin (comma-separated tokens or numbered
//! movetext), plays it through a read-only session and prints the movetext,
//! the final board and the game status.
//!
//! `echo "e4, e5, Bc4, Nc6, Qh5, Nf6, Qxf7#" | cargo run --release`
//! `cargo run --release -- --black < games.txt`

use std::io::{self, BufRead};

use plum_arbiter::board_model::piece::Color;
use plum_arbiter::history::move_repo::RepoMode;
use plum_arbiter::notation::token_stream::join_moves;
use plum_arbiter::session::Session;
use plum_arbiter::utils::puzzle_regression::game_tokens;
use plum_arbiter::utils::render_board::render_board_from;

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let viewer = if std::env::args().any(|a| a == "--black") {
        Color::Black
    } else {
        Color::White
    };

    let stdin = io::stdin();
    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.map_err(|e| format!("reading stdin: {e}"))?;
        let tokens = game_tokens(&line);
        if tokens.is_empty() {
            continue;
        }

        let mut session =
            Session::new(RepoMode::ReadOnly, &join_moves(&tokens)).map_err(|e| format!("line {}: {e}", line_no + 1))?;
        while session.go_ahead() {}
        if let Some(err) = session.navigator().last_error() {
            println!("line {}: stopped after {} plies: {err}", line_no + 1, session.navigator().applied_plies());
        }

        println!("{}", session.pgn());
        println!("{}", render_board_from(session.board(), viewer));
        println!("{} to move, {}\n", side_name(session.side_to_move()), session.status());
    }

    Ok(())
}

fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}
