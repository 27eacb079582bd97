//! Check detection and the `+`/`#` annotation of a move.

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::game_end::checkmate::is_mate;
use crate::geometry::inverse::possible_knight_to;
use crate::legality::arbiter::Arbiter;
use crate::notation::move_meta::Annotation;

/// Does `color` give check to the opposing king?
///
/// Pins are not applied: a pinned piece still gives check.
pub fn is_check(arbiter: &Arbiter, color: Color, board: &Board) -> bool {
    let Some(enemy_king) = board.king_square(color.opposite()) else {
        return false;
    };
    !arbiter.who_can_go(enemy_king, color, false, board).is_empty()
        || !possible_knight_to(enemy_king, color, board).is_empty()
}

/// Squares of `color` pieces currently attacking the opposing king.
pub fn checkers(arbiter: &Arbiter, color: Color, board: &Board) -> Vec<Square> {
    let Some(enemy_king) = board.king_square(color.opposite()) else {
        return Vec::new();
    };
    arbiter.who_can_go(enemy_king, color, false, board)
}

/// Annotation for a position where `color` just moved a piece to `moved_to`.
pub fn mate_status(arbiter: &Arbiter, color: Color, moved_to: Square, board: &Board) -> Annotation {
    if !is_check(arbiter, color, board) {
        Annotation::None
    } else if is_mate(arbiter, moved_to, board) {
        Annotation::Checkmate
    } else {
        Annotation::Check
    }
}

/// Annotation after playing `from` -> `to` (with optional promotion) on a
/// scratch copy of `board`. The caller has already removed any captured
/// piece from `board`.
pub fn mate_status_after(
    arbiter: &Arbiter,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    board: &Board,
) -> Annotation {
    let Some(mover) = board.piece(from) else {
        return Annotation::None;
    };
    let color = mover.color;
    let is_king = mover.kind == PieceKind::King;
    arbiter.with_scratch(board, |scratch| {
        if !scratch.move_piece(from, to) {
            return Annotation::None;
        }
        if let Some(kind) = promotion {
            scratch.promote(to, kind);
        }
        if is_king {
            scratch.update_king_rays(color, to);
        }
        scratch.clear_en_passer_for(color);
        mate_status(arbiter, color, to, scratch)
    })
}

#[cfg(test)]
mod tests {
    use super::{checkers, is_check, mate_status_after};
    use crate::board_model::board::Board;
    use crate::board_model::piece::Color;
    use crate::board_model::square::Square;
    use crate::legality::arbiter::Arbiter;
    use crate::notation::move_meta::Annotation;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn start_position_has_no_check() {
        let arbiter = Arbiter::new();
        let board = Board::standard();
        assert!(!is_check(&arbiter, Color::White, &board));
        assert!(!is_check(&arbiter, Color::Black, &board));
    }

    #[test]
    fn pinned_pieces_still_give_check() {
        let arbiter = Arbiter::new();
        // The black bishop on d6 is pinned to its king by the rook on d1 yet
        // still attacks the white king on h2.
        let (board, _) = parse_fen("3k4/8/3b4/8/8/8/7K/3R4 w - - 0 1").expect("fen should parse");
        assert!(is_check(&arbiter, Color::Black, &board));
        assert_eq!(checkers(&arbiter, Color::Black, &board), vec![sq("d6")]);
    }

    #[test]
    fn knight_checks_are_seen() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/8/3N4/8/8/8/8/4K3 b - - 0 1").expect("fen should parse");
        assert!(is_check(&arbiter, Color::White, &board));
    }

    #[test]
    fn annotation_of_a_quiet_move_and_a_check() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("fen should parse");
        assert_eq!(mate_status_after(&arbiter, sq("a1"), sq("a2"), None, &board), Annotation::None);
        assert_eq!(mate_status_after(&arbiter, sq("a1"), sq("a8"), None, &board), Annotation::Check);
    }
}
