//! The move list of a game and the cursor into it.
//!
//! Three modes decide which edits are allowed: `ReadOnly` (viewing a
//! finished game), `Growing` (free play with take-backs) and `Guarded`
//! (continue from a fixed opening whose moves may not be overridden).
//! Every change is delivered to registered [`RepoListener`]s right away and
//! journaled as a [`RepoEvent`] for the history navigator to drain.

use std::fmt;

use crate::board_model::piece::Color;
use crate::errors::{NotationError, RepoError};
use crate::notation::move_meta::MoveMeta;
use crate::notation::move_parser::analyze;
use crate::notation::token_stream::{format_moves, index_to_color, join_moves, split_moves};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoMode {
    ReadOnly,
    Growing,
    Guarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoEvent {
    MoveAdded(usize),
    MoveOverridden(usize),
    IndexSet(Option<usize>),
    ModeChanged(RepoMode),
    Invalidated,
}

/// Observer of repository changes. Implement only what you need.
pub trait RepoListener {
    fn move_added(&mut self, _index: usize) {}
    fn move_overridden(&mut self, _index: usize) {}
    fn index_set(&mut self, _index: Option<usize>) {}
    fn mode_changed(&mut self, _mode: RepoMode) {}
    fn invalidated(&mut self) {}
}

pub struct MoveRepo {
    moves: Vec<String>,
    mode: RepoMode,
    cursor: Option<usize>,
    /// Last index a guarded repository protects.
    safe_index: Option<usize>,
    listeners: Vec<Box<dyn RepoListener>>,
    journal: Vec<RepoEvent>,
}

impl MoveRepo {
    /// Repository over a comma-separated token stream. Read-only and guarded
    /// repositories need at least one move.
    pub fn new(mode: RepoMode, stream: &str) -> Result<Self, RepoError> {
        let moves = split_moves(stream);
        if moves.is_empty() && mode != RepoMode::Growing {
            return Err(RepoError::EmptyMoves(mode));
        }
        let mut repo = Self {
            moves,
            mode: RepoMode::Growing,
            cursor: None,
            safe_index: None,
            listeners: Vec::new(),
            journal: Vec::new(),
        };
        repo.configure(mode);
        Ok(repo)
    }

    /// Growing repository; never fails.
    pub fn growing(stream: &str) -> Self {
        Self {
            moves: split_moves(stream),
            mode: RepoMode::Growing,
            cursor: None,
            safe_index: None,
            listeners: Vec::new(),
            journal: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn RepoListener>) {
        self.listeners.push(listener);
    }

    pub fn mode(&self) -> RepoMode {
        self.mode
    }

    pub fn safe_index(&self) -> Option<usize> {
        self.safe_index
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// Index of the last played move; `None` before the first.
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn move_at(&self, index: usize) -> Option<&str> {
        self.moves.get(index).map(String::as_str)
    }

    /// Parsed token at `index`, with its color and index filled in.
    pub fn meta_at(&self, index: usize) -> Option<Result<MoveMeta, NotationError>> {
        self.move_at(index)
            .map(|token| analyze(token, index_to_color(index), index))
    }

    /// Side to play after the cursor.
    pub fn whose_turn(&self) -> Color {
        index_to_color(self.cursor.map_or(0, |index| index + 1))
    }

    pub fn set_index_at(&mut self, index: Option<usize>) -> Result<(), RepoError> {
        if let Some(index) = index {
            if index >= self.moves.len() {
                return Err(RepoError::OutOfRange {
                    index,
                    count: self.moves.len(),
                });
            }
        }
        self.cursor = index;
        self.emit(RepoEvent::IndexSet(index));
        Ok(())
    }

    /// Append `token` and point the cursor at it.
    pub fn push(&mut self, token: &str) -> Result<usize, RepoError> {
        if self.mode == RepoMode::ReadOnly {
            return Err(RepoError::ReadOnly);
        }
        self.moves.push(token.trim().to_owned());
        let index = self.moves.len() - 1;
        self.cursor = Some(index);
        self.emit(RepoEvent::MoveAdded(index));
        Ok(index)
    }

    /// Replace the move at `index`, discarding every move after it. Overriding
    /// one past the end appends.
    pub fn override_at(&mut self, token: &str, index: usize) -> Result<(), RepoError> {
        match self.mode {
            RepoMode::ReadOnly => return Err(RepoError::ReadOnly),
            RepoMode::Guarded => {
                if let Some(safe_index) = self.safe_index.filter(|safe| index <= *safe) {
                    return Err(RepoError::Guarded { index, safe_index });
                }
            }
            RepoMode::Growing => {}
        }
        if index > self.moves.len() {
            return Err(RepoError::OutOfRange {
                index,
                count: self.moves.len(),
            });
        }
        if index == self.moves.len() {
            return self.push(token).map(|_| ());
        }
        self.moves.truncate(index);
        self.moves.push(token.trim().to_owned());
        self.cursor = Some(index);
        self.emit(RepoEvent::MoveOverridden(index));
        Ok(())
    }

    /// Replace the whole move list, keeping the mode. The cursor goes back
    /// before the first move.
    pub fn reload(&mut self, stream: &str) -> Result<(), RepoError> {
        let moves = split_moves(stream);
        if moves.is_empty() && self.mode != RepoMode::Growing {
            return Err(RepoError::EmptyMoves(self.mode));
        }
        self.moves = moves;
        self.cursor = None;
        self.configure(self.mode);
        self.emit(RepoEvent::Invalidated);
        Ok(())
    }

    /// Switch modes keeping the moves; a guarded repository protects every
    /// move present at the time of the switch.
    pub fn change_mode(&mut self, mode: RepoMode) {
        self.configure(mode);
        self.emit(RepoEvent::ModeChanged(mode));
    }

    pub fn as_token_string(&self) -> String {
        join_moves(&self.moves)
    }

    /// Journal of changes since the last drain.
    pub fn drain_events(&mut self) -> Vec<RepoEvent> {
        std::mem::take(&mut self.journal)
    }

    fn configure(&mut self, mode: RepoMode) {
        self.mode = mode;
        self.safe_index = match mode {
            RepoMode::Guarded => self.moves.len().checked_sub(1),
            RepoMode::ReadOnly | RepoMode::Growing => None,
        };
    }

    fn emit(&mut self, event: RepoEvent) {
        for listener in &mut self.listeners {
            match event {
                RepoEvent::MoveAdded(index) => listener.move_added(index),
                RepoEvent::MoveOverridden(index) => listener.move_overridden(index),
                RepoEvent::IndexSet(index) => listener.index_set(index),
                RepoEvent::ModeChanged(mode) => listener.mode_changed(mode),
                RepoEvent::Invalidated => listener.invalidated(),
            }
        }
        self.journal.push(event);
    }
}

impl fmt::Display for MoveRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_moves(&self.moves))
    }
}

impl fmt::Debug for MoveRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoveRepo")
            .field("moves", &self.moves)
            .field("mode", &self.mode)
            .field("cursor", &self.cursor)
            .field("safe_index", &self.safe_index)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
