//! Blocking and capturing a checking piece.

use crate::board_model::board::Board;
use crate::board_model::piece::PieceKind;
use crate::board_model::square::Square;
use crate::geometry::rays::squares_between;
use crate::legality::arbiter::Arbiter;

/// Does any of `movers`, played onto `target`, leave its own king safe?
///
/// `target` may hold the piece being captured or be an empty square the
/// mover steps into.
pub fn is_king_safe_after(arbiter: &Arbiter, target: Square, movers: &[Square], board: &Board) -> bool {
    movers.iter().any(|mover| {
        let Some(color) = board.piece(*mover).map(|piece| piece.color) else {
            return false;
        };
        arbiter.with_scratch(board, |scratch| {
            scratch.delete(target);
            if !scratch.move_piece(*mover, target) {
                return false;
            }
            scratch
                .king_square(color)
                .is_some_and(|king| arbiter.am_i_safe(color, king, scratch))
        })
    })
}

/// Can the side owning the king on `king_square` put a piece between it and
/// the attacker on `attacker`?
///
/// Adjacent attackers and knights leave nothing to block. The king itself
/// never counts as a blocker.
pub fn can_interpose(arbiter: &Arbiter, king_square: Square, attacker: Square, board: &Board) -> bool {
    let Some(defender) = board.piece(king_square).map(|king| king.color) else {
        return false;
    };
    let Some(between) = squares_between(king_square, attacker) else {
        return false;
    };

    between.into_iter().any(|gap| {
        let blockers: Vec<Square> = arbiter
            .who_can_go(gap, defender, true, board)
            .into_iter()
            .filter(|square| board.piece(*square).is_some_and(|piece| piece.kind != PieceKind::King))
            .collect();
        !blockers.is_empty() && is_king_safe_after(arbiter, gap, &blockers, board)
    })
}
