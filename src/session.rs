//! One game: the authoritative board, its move repository and the navigator
//! that keeps the two in step.
//!
//! This is the entry point binaries and UIs drive. Moves come in either as
//! SAN tokens or as square pairs; both end up as a token in the repository and
//! a cached diff in the navigator.

use std::fmt;

use tracing::{debug, info};

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::config::EngineConfig;
use crate::errors::{NavigationError, SessionError};
use crate::execution::move_executor::execute;
use crate::game_end::check::checkers;
use crate::game_end::checkmate::is_mate;
use crate::game_end::stalemate::is_stalemate;
use crate::history::move_repo::{MoveRepo, RepoMode};
use crate::history::navigator::HistoryNavigator;
use crate::legality::arbiter::Arbiter;
use crate::notation::move_parser::analyze;
use crate::notation::san::translate;
use crate::notation::token_stream::index_to_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub const fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        };
        f.write_str(label)
    }
}

pub struct Session {
    arbiter: Arbiter,
    board: Board,
    repo: MoveRepo,
    navigator: HistoryNavigator,
}

impl Session {
    /// Session over `stream` from the starting position, cursor before the
    /// first move.
    pub fn new(mode: RepoMode, stream: &str) -> Result<Self, SessionError> {
        Self::with_config(EngineConfig::from_env(), mode, stream)
    }

    pub fn with_config(config: EngineConfig, mode: RepoMode, stream: &str) -> Result<Self, SessionError> {
        Ok(Self {
            arbiter: Arbiter::with_config(config),
            board: Board::standard(),
            repo: MoveRepo::new(mode, stream)?,
            navigator: HistoryNavigator::new(),
        })
    }

    /// Empty game open for play.
    pub fn growing() -> Self {
        Self {
            arbiter: Arbiter::with_config(EngineConfig::from_env()),
            board: Board::standard(),
            repo: MoveRepo::growing(""),
            navigator: HistoryNavigator::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn repo(&self) -> &MoveRepo {
        &self.repo
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn navigator(&self) -> &HistoryNavigator {
        &self.navigator
    }

    pub fn current_index(&self) -> Option<usize> {
        self.repo.current_index()
    }

    /// Color to move in the position on the board.
    pub fn side_to_move(&self) -> Color {
        index_to_color(self.navigator.applied_plies())
    }

    pub fn go_to(&mut self, target: Option<usize>) -> bool {
        self.navigator
            .go_to(target, &mut self.repo, &self.arbiter, &mut self.board)
    }

    pub fn go_back(&mut self) -> bool {
        self.navigator
            .go_back(&mut self.repo, &self.arbiter, &mut self.board)
    }

    pub fn go_ahead(&mut self) -> bool {
        self.navigator
            .go_ahead(&mut self.repo, &self.arbiter, &mut self.board)
    }

    pub fn go_to_end(&mut self) -> bool {
        let last = self.repo.move_count().checked_sub(1);
        self.go_to(last)
    }

    /// Replace the game with `stream`; the board returns to the start.
    pub fn reload(&mut self, stream: &str) -> Result<(), SessionError> {
        self.repo.reload(stream)?;
        self.navigator.sync(&mut self.repo, &mut self.board)?;
        info!(moves = self.repo.move_count(), "game reloaded");
        Ok(())
    }

    pub fn change_mode(&mut self, mode: RepoMode) -> Result<(), SessionError> {
        self.repo.change_mode(mode);
        self.navigator.sync(&mut self.repo, &mut self.board)?;
        Ok(())
    }

    /// Play `token` after the cursor and return its index.
    ///
    /// When the cursor is not at the end, the stored next move is kept if it
    /// is the same token; otherwise it and everything after it are replaced.
    /// On failure the board, the moves and the cursor are unchanged.
    pub fn play(&mut self, token: &str) -> Result<usize, SessionError> {
        let cursor = self.repo.current_index();
        self.navigate_or_fail(cursor)?;

        let index = cursor.map_or(0, |index| index + 1);
        let token = token.trim();
        if self.repo.move_at(index) == Some(token) {
            self.navigate_or_fail(Some(index))?;
            return Ok(index);
        }

        let meta = analyze(token, index_to_color(index), index)?;
        let history = execute(&self.arbiter, &meta, &self.board)?;

        if index == self.repo.move_count() {
            self.repo.push(token)?;
        } else {
            self.repo.override_at(token, index)?;
        }
        self.navigator.sync(&mut self.repo, &mut self.board)?;
        self.navigator.record_and_apply(history, &mut self.board)?;
        self.repo.set_index_at(Some(index))?;
        self.repo.drain_events();
        debug!(token, index, "move played");
        Ok(index)
    }

    /// Play the piece on `from` to `to`, returning the token written for it.
    pub fn play_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<String, SessionError> {
        self.navigate_or_fail(self.repo.current_index())?;
        let mover_ok = self
            .board
            .piece(from)
            .is_some_and(|piece| piece.color == self.side_to_move());
        let token = mover_ok
            .then(|| translate(&self.arbiter, from, to, promotion, &self.board))
            .flatten()
            .ok_or(SessionError::Untranslatable { from, to })?;
        self.play(&token)?;
        Ok(token)
    }

    /// Legal destinations of the piece on `square`, if it belongs to the side
    /// to move.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Square> {
        match self.board.piece(square) {
            Some(piece) if piece.color == self.side_to_move() => {
                self.arbiter.possible_moves_for(square, &self.board)
            }
            _ => Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        let mover = self.side_to_move();
        let attackers = checkers(&self.arbiter, mover.opposite(), &self.board);
        match attackers.first() {
            Some(attacker) if is_mate(&self.arbiter, *attacker, &self.board) => GameStatus::Checkmate,
            Some(_) => GameStatus::Check,
            None if is_stalemate(&self.arbiter, mover, &self.board) => GameStatus::Stalemate,
            None => GameStatus::Ongoing,
        }
    }

    /// Numbered movetext of the whole game.
    pub fn pgn(&self) -> String {
        self.repo.to_string()
    }

    fn navigate_or_fail(&mut self, target: Option<usize>) -> Result<(), SessionError> {
        if self.go_to(target) {
            return Ok(());
        }
        let err = self
            .navigator
            .last_error()
            .cloned()
            .unwrap_or(NavigationError::MissingHistory(target.map_or(0, |index| index + 1)));
        Err(err.into())
    }
}
