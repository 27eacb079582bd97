//! Error types surfaced by notation parsing, move execution, the move
//! repository, and the session facade.
//!
//! Legality predicates never return these; an illegal move is a normal
//! `false`/`None` outcome. Errors are reserved for inputs that cannot be
//! turned into a board change and for broken board invariants.

use crate::board_model::square::Square;
use crate::history::move_repo::RepoMode;
use crate::notation::move_meta::CastleSide;

/// A notation token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty move token")]
    EmptyToken,
    #[error("invalid square '{0}'")]
    InvalidSquare(String),
    #[error("invalid piece letter '{0}'")]
    InvalidPiece(char),
    #[error("malformed move token '{0}'")]
    MalformedToken(String),
}

/// A parsed move could not be resolved into a board change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// No piece satisfies the parsed move, or more than one does.
    #[error("no piece can play '{0}'")]
    NoPieceCanMove(String),
    /// A castle or en-passant landing square is unexpectedly occupied.
    #[error("square {0} must be empty")]
    SquareMustBeEmpty(Square),
    /// A piece the executor just observed is missing. Board corruption.
    #[error("expected a piece on {0}")]
    PieceNotFound(Square),
    /// The token claims an en-passant capture that no pawn can make.
    #[error("no pawn can capture en passant on {0}")]
    NoEnPassantTaker(Square),
    #[error("{0} castle is not allowed")]
    CastleNotAllowed(CastleSide),
    /// The capture marker disagrees with the occupancy of the destination.
    #[error("capture marker does not match the occupancy of {0}")]
    CaptureMismatch(Square),
    #[error("pawn move to {0} must name a promotion piece")]
    PromotionRequired(Square),
    #[error(transparent)]
    Notation(#[from] NotationError),
}

impl MoveError {
    /// True for invariant violations that callers should not try to recover
    /// from by asking for another move.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MoveError::PieceNotFound(_))
    }
}

/// A move-sequence edit was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoError {
    #[error("a {0:?} repository needs at least one move")]
    EmptyMoves(RepoMode),
    #[error("repository is read-only")]
    ReadOnly,
    #[error("index {index} is at or before the guarded boundary {safe_index}")]
    Guarded { index: usize, safe_index: usize },
    #[error("index {index} is beyond the {count} stored moves")]
    OutOfRange { index: usize, count: usize },
}

/// Why a history navigation was rolled back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("ply {target} is beyond the {count} stored moves")]
    OutOfRange { target: usize, count: usize },
    #[error("move {index} cannot be parsed: {source}")]
    Notation { index: usize, source: NotationError },
    #[error("move {index} cannot be played: {source}")]
    Move { index: usize, source: MoveError },
    /// A ply on the board has no cached diff. The navigator lost track of
    /// the board.
    #[error("no cached change for move {0}")]
    MissingHistory(usize),
    #[error("expected a change for move {expected}, got {got}")]
    OutOfOrder { expected: usize, got: usize },
}

/// Failures reported by [`crate::session::Session`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("no notation can be produced for {from}{to}")]
    Untranslatable { from: Square, to: Square },
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[cfg(test)]
mod tests {
    use super::{MoveError, NotationError};
    use crate::board_model::square::Square;

    #[test]
    fn only_missing_pieces_are_fatal() {
        let e4: Square = "e4".parse().expect("e4 should parse");
        assert!(MoveError::PieceNotFound(e4).is_fatal());
        assert!(!MoveError::SquareMustBeEmpty(e4).is_fatal());
        assert!(!MoveError::NoPieceCanMove("Nf3".to_owned()).is_fatal());
    }

    #[test]
    fn notation_errors_convert_transparently() {
        let err: MoveError = NotationError::EmptyToken.into();
        assert_eq!(err.to_string(), "empty move token");
    }
}
