//! Bulk regression over a corpus of recorded games.
//!
//! Each game is replayed from the starting position. Every ply is checked
//! three ways: the token resolves to a board change, writing the move back
//! as SAN reproduces the token, and random jumps through the finished game
//! land on the same positions as the straight replay.

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::config::EngineConfig;
use crate::execution::move_executor::{discover_piece, execute};
use crate::history::move_repo::{MoveRepo, RepoMode};
use crate::history::navigator::HistoryNavigator;
use crate::legality::arbiter::Arbiter;
use crate::legality::king::castle_squares;
use crate::notation::move_parser::analyze;
use crate::notation::san::translate;
use crate::notation::token_stream::{index_to_color, join_moves, parse_movetext, split_moves};

type Placement = Vec<(Square, Color, PieceKind)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegressionOptions {
    /// Compare the SAN written for every ply with the recorded token.
    pub check_translation: bool,
    /// Random cursor jumps per game after the replay.
    pub random_walks: usize,
    pub seed: u64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            check_translation: true,
            random_walks: 16,
            seed: 0x5eed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Parse,
    Play,
    Translate,
    Navigate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFailure {
    /// Zero-based position of the game in the corpus.
    pub game: usize,
    pub ply: Option<usize>,
    pub stage: FailureStage,
    pub message: String,
}

impl fmt::Display for GameFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ply {
            Some(ply) => write!(
                f,
                "game {} move {} ({:?}): {}",
                self.game,
                ply / 2 + 1,
                self.stage,
                self.message
            ),
            None => write!(f, "game {} ({:?}): {}", self.game, self.stage, self.message),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegressionReport {
    pub games: usize,
    pub plies: usize,
    pub translations: usize,
    pub navigations: usize,
    pub failures: Vec<GameFailure>,
    pub elapsed: Duration,
}

impl RegressionReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Tokens of one corpus line: either a comma-separated stream or numbered
/// movetext.
pub fn game_tokens(line: &str) -> Vec<String> {
    if line.contains(',') {
        split_moves(line)
    } else {
        parse_movetext(line)
    }
}

pub fn run_regression<S: AsRef<str>>(games: &[S], options: &RegressionOptions) -> RegressionReport {
    let started = Instant::now();
    let arbiter = Arbiter::with_config(EngineConfig::from_env());
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut report = RegressionReport::default();

    for (game, line) in games.iter().enumerate() {
        let tokens = game_tokens(line.as_ref());
        if tokens.is_empty() {
            continue;
        }
        report.games += 1;

        let outcome = replay_game(&arbiter, game, &tokens, options.check_translation, &mut report).and_then(
            |placements| {
                random_walks(
                    &arbiter,
                    game,
                    &tokens,
                    &placements,
                    options.random_walks,
                    &mut rng,
                    &mut report,
                )
            },
        );
        if let Err(failure) = outcome {
            warn!(game, ply = ?failure.ply, stage = ?failure.stage, "{}", failure.message);
            report.failures.push(failure);
        }
    }

    report.elapsed = started.elapsed();
    info!(
        games = report.games,
        plies = report.plies,
        failures = report.failures.len(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "regression finished"
    );
    report
}

fn failure(game: usize, ply: Option<usize>, stage: FailureStage, message: impl fmt::Display) -> GameFailure {
    GameFailure {
        game,
        ply,
        stage,
        message: message.to_string(),
    }
}

/// Recorded tokens may carry `!?` glyphs and zero-style castles.
fn expected_san(token: &str) -> String {
    let token = token.trim().trim_end_matches(['!', '?']);
    if token.starts_with("0-0") {
        token.replace('0', "O")
    } else {
        token.to_owned()
    }
}

/// Straight replay; returns the placement after every ply, starting position
/// first.
fn replay_game(
    arbiter: &Arbiter,
    game: usize,
    tokens: &[String],
    check_translation: bool,
    report: &mut RegressionReport,
) -> Result<Vec<Placement>, GameFailure> {
    let mut board = Board::standard();
    let mut placements = Vec::with_capacity(tokens.len() + 1);
    placements.push(board.placement());

    for (ply, token) in tokens.iter().enumerate() {
        let meta = analyze(token, index_to_color(ply), ply)
            .map_err(|err| failure(game, Some(ply), FailureStage::Parse, err))?;

        if check_translation {
            let from = discover_piece(arbiter, &meta, &board)
                .map_err(|err| failure(game, Some(ply), FailureStage::Play, err))?;
            let to = match (meta.castle_side(), meta.destination()) {
                (Some(side), _) => castle_squares(side, meta.color).king_to,
                (None, Some(to)) => to,
                (None, None) => return Err(failure(game, Some(ply), FailureStage::Parse, "no destination")),
            };
            let written = translate(arbiter, from, to, meta.promotion(), &board);
            let expected = expected_san(token);
            if written.as_deref() != Some(expected.as_str()) {
                let message = format!(
                    "expected {expected}, wrote {}",
                    written.as_deref().unwrap_or("nothing")
                );
                return Err(failure(game, Some(ply), FailureStage::Translate, message));
            }
            report.translations += 1;
        }

        let history =
            execute(arbiter, &meta, &board).map_err(|err| failure(game, Some(ply), FailureStage::Play, err))?;
        history
            .redo(&mut board)
            .map_err(|err| failure(game, Some(ply), FailureStage::Play, err))?;
        report.plies += 1;
        placements.push(board.placement());
    }

    Ok(placements)
}

fn random_walks(
    arbiter: &Arbiter,
    game: usize,
    tokens: &[String],
    placements: &[Placement],
    walks: usize,
    rng: &mut StdRng,
    report: &mut RegressionReport,
) -> Result<(), GameFailure> {
    let mut repo = MoveRepo::new(RepoMode::ReadOnly, &join_moves(tokens))
        .map_err(|err| failure(game, None, FailureStage::Navigate, err))?;
    let mut navigator = HistoryNavigator::new();
    let mut board = Board::standard();

    for _ in 0..walks {
        let plies = rng.random_range(0..=tokens.len());
        let target = plies.checked_sub(1);
        if !navigator.go_to(target, &mut repo, arbiter, &mut board) {
            let message = navigator
                .last_error()
                .map_or_else(|| "navigation refused".to_owned(), ToString::to_string);
            return Err(failure(game, target, FailureStage::Navigate, message));
        }
        if board.placement() != placements[plies] {
            return Err(failure(
                game,
                target,
                FailureStage::Navigate,
                format!("position after {plies} plies differs from the replay"),
            ));
        }
        report.navigations += 1;
    }

    Ok(())
}
