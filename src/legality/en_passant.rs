//! En-passant bookkeeping: creating descriptors from double steps and
//! matching capturing pawns against them.

use smallvec::SmallVec;

use crate::board_model::board::Board;
use crate::board_model::en_passer::EnPasser;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;

/// Descriptor created by moving the pawn on `from` to `to`, when that move is
/// a double step landing beside at least one enemy pawn.
pub fn en_passer_for_double_step(from: Square, to: Square, board: &Board) -> Option<EnPasser> {
    let pawn = board.piece(from).filter(|piece| piece.kind == PieceKind::Pawn)?;
    let color = pawn.color;
    if from.rank() != color.pawn_home_rank() || from.file() != to.file() {
        return None;
    }
    if to.rank() as i8 - from.rank() as i8 != 2 * color.forward() {
        return None;
    }

    let takers: SmallVec<[Square; 2]> = [-1i8, 1]
        .into_iter()
        .filter_map(|d_file| to.offset(d_file, 0))
        .filter(|side| {
            board
                .piece(*side)
                .is_some_and(|piece| piece.is(PieceKind::Pawn, color.opposite()))
        })
        .collect();
    if takers.is_empty() {
        return None;
    }

    Some(EnPasser {
        taker_color: color.opposite(),
        before: from,
        intermediate: from.offset(0, color.forward())?,
        now: to,
        takers,
    })
}

#[inline]
pub fn is_taker(square: Square, en_passer: &EnPasser) -> bool {
    en_passer.has_taker(square)
}

/// Does a capture onto `dest` take the en-passant pawn?
#[inline]
pub fn is_taking(dest: Square, en_passer: &EnPasser) -> bool {
    dest == en_passer.intermediate
}

/// Whether the `color` pawn on `from` captures en passant by moving to `to`.
pub fn lands_en_passant(from: Square, to: Square, color: Color, board: &Board) -> bool {
    board
        .en_passer_for(color)
        .is_some_and(|en_passer| is_taker(from, en_passer) && is_taking(to, en_passer))
}

/// Pick the capturing pawn. With a known origin file only the pawn on that
/// file qualifies; without one a lone taker is accepted.
pub fn taker_for(en_passer: &EnPasser, origin_file: Option<u8>) -> Option<Square> {
    match origin_file {
        Some(file) => en_passer.takers.iter().copied().find(|taker| taker.file() == file),
        None if en_passer.takers.len() == 1 => en_passer.takers.first().copied(),
        None => None,
    }
}
