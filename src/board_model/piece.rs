//! Piece identity and per-piece movement bookkeeping.

use crate::board_model::square::Square;

/// Army a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction pawns of this color advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Zero-based rank a pawn of this color starts on.
    #[inline]
    pub const fn pawn_home_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Zero-based rank holding this color's king and rooks at the start.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Zero-based rank a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::King => 0,
            PieceKind::Queen => 1,
            PieceKind::Rook => 2,
            PieceKind::Bishop => 3,
            PieceKind::Knight => 4,
            PieceKind::Pawn => 5,
        }
    }

    /// SAN letter; pawns have none.
    pub const fn san_letter(self) -> Option<char> {
        match self {
            PieceKind::King => Some('K'),
            PieceKind::Queen => Some('Q'),
            PieceKind::Rook => Some('R'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Knight => Some('N'),
            PieceKind::Pawn => None,
        }
    }

    pub const fn from_san_letter(letter: char) -> Option<PieceKind> {
        match letter {
            'K' => Some(PieceKind::King),
            'Q' => Some(PieceKind::Queen),
            'R' => Some(PieceKind::Rook),
            'B' => Some(PieceKind::Bishop),
            'N' => Some(PieceKind::Knight),
            _ => None,
        }
    }

    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop)
    }

    pub const fn is_minor(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Knight)
    }

    /// Kinds a pawn may promote to.
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }
}

/// A piece standing on a board.
///
/// `previous` remembers where the piece last came from (undo/redo and
/// animation); it equals `current` until the first relocation. Pieces are
/// deliberately not `Copy`: every copy into a diff or snapshot is an explicit
/// `clone()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub current: Square,
    pub previous: Square,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            kind,
            color,
            current: square,
            previous: square,
            has_moved: false,
        }
    }

    /// Record a move to `to`.
    pub fn relocate(&mut self, to: Square) {
        self.previous = self.current;
        self.current = to;
        self.has_moved = true;
    }

    /// Clone of this piece with `previous` pointing at `square`; used when a
    /// diff re-places a piece so the UI can animate it back from there.
    pub fn clone_from_square(&self, square: Square) -> Self {
        let mut piece = self.clone();
        piece.previous = square;
        piece
    }

    #[inline]
    pub fn is(&self, kind: PieceKind, color: Color) -> bool {
        self.kind == kind && self.color == color
    }
}
