//! Board coordinates.
//!
//! A `Square` is stored densely as `rank * 8 + file` (`a1 == 0`, `h8 == 63`).
//! Display code can also number squares from either side of the board, see
//! [`Orientation`].

use std::fmt;
use std::str::FromStr;

use crate::errors::NotationError;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

/// Which side of the board is drawn at the bottom.
///
/// White orientation numbers `a8 == 1 .. h8 == 8 .. a1 == 57 .. h1 == 64`;
/// black orientation is the same sequence reversed (`a8 == 64`, `h1 == 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    White,
    Black,
}

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    /// Build from zero-based file and rank.
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based file, `a == 0`.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Zero-based rank, `1 == 0`.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline]
    pub fn file_char(self) -> char {
        char::from(b'a' + self.file())
    }

    #[inline]
    pub fn rank_char(self) -> char {
        char::from(b'1' + self.rank())
    }

    /// The square `d_file` files and `d_rank` ranks away, if still on the board.
    #[inline]
    pub const fn offset(self, d_file: i8, d_rank: i8) -> Option<Square> {
        let file = self.file() as i8 + d_file;
        let rank = self.rank() as i8 + d_rank;
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            None
        } else {
            Some(Square((rank * 8 + file) as u8))
        }
    }

    /// One-based display index for the given orientation.
    pub const fn orientation_index(self, orientation: Orientation) -> u8 {
        let from_white = (7 - self.rank()) * 8 + self.file() + 1;
        match orientation {
            Orientation::White => from_white,
            Orientation::Black => 65 - from_white,
        }
    }

    pub const fn from_orientation_index(index: u8, orientation: Orientation) -> Option<Square> {
        if index == 0 || index > 64 {
            return None;
        }
        let from_white = match orientation {
            Orientation::White => index - 1,
            Orientation::Black => 64 - index,
        };
        Square::new(from_white % 8, 7 - from_white / 8)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&square_to_algebraic(*self))
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        algebraic_to_square(s).map_err(|_| NotationError::InvalidSquare(s.to_owned()))
    }
}
