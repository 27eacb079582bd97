//! Board move to SAN token.
//!
//! The move is replayed on scratch boards only; the caller's board is never
//! touched. A `None` result means no token can be written for the move.

use crate::board_model::board::Board;
use crate::board_model::piece::PieceKind;
use crate::board_model::square::Square;
use crate::game_end::check::{mate_status, mate_status_after};
use crate::legality::arbiter::Arbiter;
use crate::legality::en_passant::lands_en_passant;
use crate::legality::king::{can_castle, castle_squares, wants_to_castle};
use crate::notation::disambiguation;

/// Asked for the promotion piece when a pawn reaches the last rank.
pub trait PromotionHandler {
    fn promotion_for(&mut self, from: Square, to: Square) -> PieceKind;
}

/// Always promotes to the same piece.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysPromoteTo(pub PieceKind);

impl PromotionHandler for AlwaysPromoteTo {
    fn promotion_for(&mut self, _from: Square, _to: Square) -> PieceKind {
        self.0
    }
}

/// Like [`translate`], consulting `handler` only for a pawn reaching its
/// promotion rank.
pub fn translate_with_handler(
    arbiter: &Arbiter,
    from: Square,
    to: Square,
    board: &Board,
    handler: &mut dyn PromotionHandler,
) -> Option<String> {
    let piece = board.piece(from)?;
    let promotion = (piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank())
        .then(|| handler.promotion_for(from, to));
    translate(arbiter, from, to, promotion, board)
}

/// SAN for the legal move `from` -> `to`.
///
/// A pawn reaching the last rank needs `promotion`; any other move must pass
/// `None`.
pub fn translate(
    arbiter: &Arbiter,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    board: &Board,
) -> Option<String> {
    let piece = board.piece(from)?;
    let kind = piece.kind;
    let color = piece.color;

    if kind == PieceKind::King && wants_to_castle(from, to, color).is_some() {
        let side = can_castle(arbiter, from, to, board)?;
        let squares = castle_squares(side, color);
        let annotation = arbiter.with_scratch(board, |scratch| {
            scratch.move_piece(squares.king_from, squares.king_to);
            scratch.move_piece(squares.rook_from, squares.rook_to);
            scratch.update_king_rays(color, squares.king_to);
            scratch.clear_en_passer_for(color);
            mate_status(arbiter, color, squares.rook_to, scratch)
        });
        return Some(format!("{}{}", side.notation(), annotation.suffix()));
    }

    if !arbiter.piece_can_go(from, to, true, board) {
        return None;
    }
    let promotes = kind == PieceKind::Pawn && to.rank() == color.promotion_rank();
    match promotion {
        Some(target) if !promotes || !target.is_promotion_target() => return None,
        None if promotes => return None,
        _ => {}
    }

    let en_passant_victim = (kind == PieceKind::Pawn && lands_en_passant(from, to, color, board))
        .then(|| board.en_passer_for(color).map(|en_passer| en_passer.now))
        .flatten();
    let capture = en_passant_victim.is_some() || board.any_piece_on(to);

    let annotation = arbiter.with_scratch(board, |scratch| {
        scratch.delete(to);
        if let Some(victim) = en_passant_victim {
            scratch.delete(victim);
        }
        mate_status_after(arbiter, from, to, promotion, scratch)
    });

    let takes = if capture { "x" } else { "" };
    let promoted = promotion
        .and_then(PieceKind::san_letter)
        .map(|letter| format!("={letter}"))
        .unwrap_or_default();
    let suffix = annotation.suffix();

    let token = match kind {
        PieceKind::Pawn if capture => format!("{}x{to}{promoted}{suffix}", from.file_char()),
        PieceKind::Pawn => format!("{to}{promoted}{suffix}"),
        PieceKind::King => format!("K{takes}{to}{suffix}"),
        _ => {
            let letter = kind.san_letter()?;
            let unique = disambiguation::suffix(arbiter, kind, color, from, to, board)?;
            format!("{letter}{unique}{takes}{to}{suffix}")
        }
    };
    Some(token)
}
