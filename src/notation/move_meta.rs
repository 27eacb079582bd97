//! Parsed description of one notation token.

use std::fmt;

use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Short,
    Long,
}

impl CastleSide {
    pub const fn notation(self) -> &'static str {
        match self {
            CastleSide::Short => "O-O",
            CastleSide::Long => "O-O-O",
        }
    }
}

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CastleSide::Short => "short",
            CastleSide::Long => "long",
        })
    }
}

/// Check suffix of a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Annotation {
    #[default]
    None,
    Check,
    Checkmate,
}

impl Annotation {
    pub const fn suffix(self) -> &'static str {
        match self {
            Annotation::None => "",
            Annotation::Check => "+",
            Annotation::Checkmate => "#",
        }
    }
}

/// What the token says about where the mover comes from.
///
/// Pawn captures carry their origin file here (`exd5` is `File(4)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Any,
    File(u8),
    Rank(u8),
    Square(Square),
}

/// Every non-castling move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardMove {
    pub piece: PieceKind,
    pub to: Square,
    pub origin: Origin,
    pub capture: bool,
    pub promotion: Option<PieceKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveKind {
    Castle(CastleSide),
    Standard(StandardMove),
}

/// One token, parsed once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveMeta {
    pub token: String,
    pub color: Color,
    /// Ply index within its game, starting at 0.
    pub index: usize,
    pub annotation: Annotation,
    pub kind: MoveKind,
}

impl MoveMeta {
    pub fn piece(&self) -> PieceKind {
        match &self.kind {
            MoveKind::Castle(_) => PieceKind::King,
            MoveKind::Standard(standard) => standard.piece,
        }
    }

    /// Destination square; castles have none until resolved.
    pub fn destination(&self) -> Option<Square> {
        match &self.kind {
            MoveKind::Castle(_) => None,
            MoveKind::Standard(standard) => Some(standard.to),
        }
    }

    pub fn castle_side(&self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::Castle(side) => Some(side),
            MoveKind::Standard(_) => None,
        }
    }

    pub fn is_capture(&self) -> bool {
        matches!(&self.kind, MoveKind::Standard(standard) if standard.capture)
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        match &self.kind {
            MoveKind::Standard(standard) => standard.promotion,
            MoveKind::Castle(_) => None,
        }
    }
}

impl fmt::Display for MoveMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}
