//! King movement: plain steps, the king-clash rule, and castling.

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::geometry::rays::king_neighbours;
use crate::geometry::valid_squares::valid_squares;
use crate::legality::arbiter::Arbiter;
use crate::notation::move_meta::CastleSide;

/// Squares involved in one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleSquares {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
}

/// Fixed squares of a castle for `color`.
pub fn castle_squares(side: CastleSide, color: Color) -> CastleSquares {
    match (side, color) {
        (CastleSide::Short, Color::White) => CastleSquares {
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            rook_to: Square::F1,
        },
        (CastleSide::Long, Color::White) => CastleSquares {
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            rook_to: Square::D1,
        },
        (CastleSide::Short, Color::Black) => CastleSquares {
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            rook_to: Square::F8,
        },
        (CastleSide::Long, Color::Black) => CastleSquares {
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            rook_to: Square::D8,
        },
    }
}

/// King destinations that mean castling for `color`.
pub fn castle_destinations(color: Color) -> [Square; 2] {
    [
        castle_squares(CastleSide::Short, color).king_to,
        castle_squares(CastleSide::Long, color).king_to,
    ]
}

/// Which castle a king move `from` -> `to` asks for, if any.
pub fn wants_to_castle(from: Square, to: Square, color: Color) -> Option<CastleSide> {
    [CastleSide::Short, CastleSide::Long].into_iter().find(|side| {
        let squares = castle_squares(*side, color);
        squares.king_from == from && squares.king_to == to
    })
}

/// Would a king on `square` stand next to both kings at once?
pub fn king_clash_on(square: Square, board: &Board) -> bool {
    king_neighbours(square)
        .filter(|neighbour| board.piece(*neighbour).is_some_and(|piece| piece.kind == PieceKind::King))
        .count()
        >= 2
}

/// One king step from `from` to `to`, capturing whatever stands there, that
/// does not end next to the other king or on an attacked square.
pub fn can_go(arbiter: &Arbiter, from: Square, to: Square, board: &Board) -> bool {
    let Some(king) = board.piece(from).filter(|piece| piece.kind == PieceKind::King) else {
        return false;
    };
    let color = king.color;
    if !valid_squares(PieceKind::King, color, from, true, board).contains(&to) {
        return false;
    }
    if king_clash_on(to, board) {
        return false;
    }
    arbiter.with_scratch(board, |scratch| {
        scratch.delete(to);
        scratch.move_piece(from, to);
        scratch.update_king_rays(color, to);
        arbiter.am_i_safe(color, to, scratch)
    })
}

/// Castle the king on `king_square` towards `dest`, if every castling rule
/// holds: neither piece has moved, the squares between them are empty, the
/// king is not in check, and both the transit and the final square are safe.
pub fn can_castle(arbiter: &Arbiter, king_square: Square, dest: Square, board: &Board) -> Option<CastleSide> {
    let king = board
        .piece(king_square)
        .filter(|piece| piece.kind == PieceKind::King && !piece.has_moved)?;
    let color = king.color;
    let side = wants_to_castle(king_square, dest, color)?;
    let squares = castle_squares(side, color);

    board
        .piece(squares.rook_from)
        .filter(|rook| rook.is(PieceKind::Rook, color) && !rook.has_moved)?;

    let (low, high) = if squares.rook_from < king_square {
        (squares.rook_from.file() + 1, king_square.file())
    } else {
        (king_square.file() + 1, squares.rook_from.file())
    };
    let blocked = (low..high)
        .filter_map(|file| Square::new(file, king_square.rank()))
        .any(|between| board.any_piece_on(between));
    if blocked {
        return None;
    }

    if !arbiter.am_i_safe(color, king_square, board) {
        return None;
    }
    let transit = squares.rook_to;
    if !can_go(arbiter, king_square, transit, board) {
        return None;
    }

    let lands_safely = arbiter.with_scratch(board, |scratch| {
        scratch.move_piece(king_square, transit);
        scratch.update_king_rays(color, transit);
        can_go(arbiter, transit, dest, scratch)
    });
    lands_safely.then_some(side)
}
