//! Reachable squares by movement shape and occupancy alone.
//!
//! No check, pin, castling or en-passant rules here; the arbiter layers those
//! on top.

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::geometry::rays::{king_neighbours, knight_jumps, walk, DIAGONAL, ORTHOGONAL};

/// Squares a `kind`/`color` piece on `square` could move to.
///
/// Sliders stop at the first occupied square on each ray; an enemy there is
/// included, an own piece is included only when `own_army_filter` is off.
/// Knights and kings use their fixed jumps, filtered the same way. Pawns
/// push one square onto an empty square, two from their home rank across two
/// empty squares, and capture diagonally onto enemy pieces only.
pub fn valid_squares(
    kind: PieceKind,
    color: Color,
    square: Square,
    own_army_filter: bool,
    board: &Board,
) -> Vec<Square> {
    let mut out = Vec::with_capacity(27);
    match kind {
        PieceKind::Rook => slide(&ORTHOGONAL, color, square, own_army_filter, board, &mut out),
        PieceKind::Bishop => slide(&DIAGONAL, color, square, own_army_filter, board, &mut out),
        PieceKind::Queen => {
            slide(&ORTHOGONAL, color, square, own_army_filter, board, &mut out);
            slide(&DIAGONAL, color, square, own_army_filter, board, &mut out);
        }
        PieceKind::Knight => jump(knight_jumps(square), color, own_army_filter, board, &mut out),
        PieceKind::King => jump(king_neighbours(square), color, own_army_filter, board, &mut out),
        PieceKind::Pawn => pawn(color, square, board, &mut out),
    }
    out
}

fn slide(
    directions: &[(i8, i8)],
    color: Color,
    from: Square,
    own_army_filter: bool,
    board: &Board,
    out: &mut Vec<Square>,
) {
    for direction in directions {
        for square in walk(from, *direction) {
            match board.piece(square) {
                None => out.push(square),
                Some(piece) => {
                    if piece.color != color || !own_army_filter {
                        out.push(square);
                    }
                    break;
                }
            }
        }
    }
}

fn jump(
    targets: impl Iterator<Item = Square>,
    color: Color,
    own_army_filter: bool,
    board: &Board,
    out: &mut Vec<Square>,
) {
    out.extend(targets.filter(|square| !own_army_filter || !board.killing_own_army(*square, color)));
}

fn pawn(color: Color, from: Square, board: &Board, out: &mut Vec<Square>) {
    let forward = color.forward();
    if let Some(one) = from.offset(0, forward) {
        if !board.any_piece_on(one) {
            out.push(one);
            if from.rank() == color.pawn_home_rank() {
                if let Some(two) = one.offset(0, forward) {
                    if !board.any_piece_on(two) {
                        out.push(two);
                    }
                }
            }
        }
    }
    for d_file in [-1, 1] {
        if let Some(target) = from.offset(d_file, forward) {
            if board.is_enemy(target, color) {
                out.push(target);
            }
        }
    }
}
