//! The extra file, rank or square a SAN token needs when several pieces of
//! the same kind could make the move.
//!
//! Queens, bishops and knights use the bidirectional count; rooks use the
//! half-discarding shortcut, which gives up on some three-rook layouts.
//! `None` means no suffix can be produced, `Some("")` means none is needed.

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::geometry::inverse::{possible_diagonal_to, possible_knight_to, possible_sideways_to};
use crate::geometry::rays::{association_sideways, count_along, unique_between, Association};
use crate::legality::arbiter::Arbiter;

pub fn suffix(
    arbiter: &Arbiter,
    kind: PieceKind,
    color: Color,
    from: Square,
    to: Square,
    board: &Board,
) -> Option<String> {
    match kind {
        PieceKind::Queen | PieceKind::Bishop | PieceKind::Knight => {
            bidirectional(arbiter, kind, color, from, to, board)
        }
        PieceKind::Rook => half_discarding(arbiter, color, from, to, board),
        PieceKind::King | PieceKind::Pawn => None,
    }
}

fn bidirectional(
    arbiter: &Arbiter,
    kind: PieceKind,
    color: Color,
    from: Square,
    to: Square,
    board: &Board,
) -> Option<String> {
    let candidates = match kind {
        PieceKind::Queen => {
            let mut squares = possible_sideways_to(to, kind, color, board);
            squares.extend(possible_diagonal_to(to, kind, color, board));
            squares
        }
        PieceKind::Bishop => possible_diagonal_to(to, kind, color, board),
        PieceKind::Knight => possible_knight_to(to, color, board),
        _ => return None,
    };
    let rivals = rivals(arbiter, candidates, from, to, board);

    match rivals.as_slice() {
        [] => Some(String::new()),
        [other] => unique_between(from, *other).map(String::from),
        _ => {
            let along_file = count_along(from, Association::ByFile, &rivals);
            let along_rank = count_along(from, Association::ByRank, &rivals);
            let designation = match (along_file, along_rank) {
                (0, 0) => from.file_char().to_string(),
                (1.., 1..) => from.to_string(),
                (1.., 0) => from.rank_char().to_string(),
                (0, 1..) => from.file_char().to_string(),
            };
            Some(designation)
        }
    }
}

fn half_discarding(arbiter: &Arbiter, color: Color, from: Square, to: Square, board: &Board) -> Option<String> {
    let candidates = possible_sideways_to(to, PieceKind::Rook, color, board);
    let rivals = rivals(arbiter, candidates, from, to, board);

    match rivals.as_slice() {
        [] => Some(String::new()),
        [other] => unique_between(from, *other).map(String::from),
        _ => match association_sideways(from, to)? {
            Association::ByFile => Some(from.rank_char().to_string()),
            Association::ByRank => Some(from.file_char().to_string()),
        },
    }
}

/// Candidates other than the mover that can legally reach `to`.
fn rivals(arbiter: &Arbiter, candidates: Vec<Square>, from: Square, to: Square, board: &Board) -> Vec<Square> {
    candidates
        .into_iter()
        .filter(|square| *square != from)
        .filter(|square| arbiter.piece_can_go(*square, to, true, board))
        .collect()
}
