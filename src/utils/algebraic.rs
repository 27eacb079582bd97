//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and the dense
//! square index reused by the notation parser, FEN setup, and rendering.

use crate::board_model::square::Square;

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, String> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(format!("Invalid algebraic square: {square}"));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(format!("Invalid algebraic file: {}", file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(format!("Invalid algebraic rank: {}", rank as char));
    }

    Square::new(file - b'a', rank - b'1').ok_or_else(|| format!("Invalid algebraic square: {square}"))
}

/// Convert a square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    format!("{}{}", square.file_char(), square.rank_char())
}

/// Zero-based file of an algebraic file letter.
#[inline]
pub fn file_from_char(file: char) -> Option<u8> {
    ('a'..='h').contains(&file).then(|| file as u8 - b'a')
}

/// Zero-based rank of an algebraic rank digit.
#[inline]
pub fn rank_from_char(rank: char) -> Option<u8> {
    ('1'..='8').contains(&rank).then(|| rank as u8 - b'1')
}
