//! Stalemate and dead-position detection.

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::legality::arbiter::Arbiter;

/// Is the game drawn for `color` to move, either because the material left
/// cannot mate or because `color` has no legal move?
///
/// Callers check for check first; a side in check with no moves is mated,
/// not stalemated.
pub fn is_stalemate(arbiter: &Arbiter, color: Color, board: &Board) -> bool {
    if insufficient_material(board) {
        return true;
    }
    !has_any_move(arbiter, color, board)
}

/// Material that can never deliver mate: bare kings, a single minor piece
/// against a bare king, or one minor piece each of the same kind.
pub fn insufficient_material(board: &Board) -> bool {
    let mut minors: [Option<PieceKind>; 2] = [None, None];
    for piece in board.pieces() {
        match piece.kind {
            PieceKind::King => {}
            kind if kind.is_minor() => {
                let slot = &mut minors[piece.color.index()];
                if slot.is_some() {
                    return false;
                }
                *slot = Some(kind);
            }
            _ => return false,
        }
    }
    match minors {
        [None, None] | [Some(_), None] | [None, Some(_)] => true,
        [Some(white), Some(black)] => white == black,
    }
}

fn has_any_move(arbiter: &Arbiter, color: Color, board: &Board) -> bool {
    board
        .squares_of_army(color)
        .into_iter()
        .any(|square| !arbiter.possible_moves_for(square, board).is_empty())
}
