//! Pin detection against the mover's cached king rays.

use smallvec::SmallVec;

use crate::board_model::board::Board;
use crate::board_model::piece::PieceKind;
use crate::board_model::square::Square;
use crate::legality::arbiter::Arbiter;
use crate::legality::en_passant::lands_en_passant;

/// True when moving the piece on `from` to `to` lets an enemy piece reach the
/// mover's king that could not reach it before.
///
/// Only king rays through a square the move empties can open, so those are
/// the only rays replayed on the scratch board. Kings are never pinned.
pub fn is_pinned(arbiter: &Arbiter, from: Square, to: Square, board: &Board) -> bool {
    let Some(mover) = board.piece(from) else {
        return false;
    };
    if mover.kind == PieceKind::King {
        return false;
    }
    let color = mover.color;
    let rays = board.king_rays(color);
    let king = rays.king_square();
    if !board.piece(king).is_some_and(|piece| piece.is(PieceKind::King, color)) {
        return false;
    }

    let victim = en_passant_victim(from, to, board);

    let mut opened: SmallVec<[usize; 2]> = SmallVec::new();
    for vacated in std::iter::once(from).chain(victim) {
        if let Some(index) = rays.ray_index_of(vacated) {
            if !opened.contains(&index) {
                opened.push(index);
            }
        }
    }
    if opened.is_empty() {
        return false;
    }

    arbiter.with_scratch(board, |scratch| {
        scratch.delete(to);
        if let Some(victim) = victim {
            scratch.delete(victim);
        }
        scratch.move_piece(from, to);

        opened.iter().any(|index| {
            let Some(attacker) = rays.ray(*index).iter().copied().find(|s| scratch.any_piece_on(*s)) else {
                return false;
            };
            scratch.is_enemy(attacker, color)
                && arbiter.piece_can_go(attacker, king, false, scratch)
                && !arbiter.piece_can_go(attacker, king, false, board)
        })
    })
}

/// True when the mover's king stands attacked once the piece on `from` has
/// gone to `to`, with the piece on `to` and any en-passant victim removed.
///
/// Unlike [`is_pinned`] this sees every attacker, knights and checks that
/// were already there included.
pub fn leaves_king_in_check(arbiter: &Arbiter, from: Square, to: Square, board: &Board) -> bool {
    let Some(color) = board.piece(from).map(|mover| mover.color) else {
        return false;
    };
    let victim = en_passant_victim(from, to, board);

    arbiter.with_scratch(board, |scratch| {
        scratch.delete(to);
        if let Some(victim) = victim {
            scratch.delete(victim);
        }
        if !scratch.move_piece(from, to) {
            return true;
        }
        scratch
            .king_square(color)
            .is_some_and(|king| !arbiter.am_i_safe(color, king, scratch))
    })
}

/// Square of the pawn removed when `from` -> `to` is an en-passant capture.
fn en_passant_victim(from: Square, to: Square, board: &Board) -> Option<Square> {
    let mover = board.piece(from).filter(|piece| piece.kind == PieceKind::Pawn)?;
    if !lands_en_passant(from, to, mover.color, board) {
        return None;
    }
    board.en_passer_for(mover.color).map(|en_passer| en_passer.now)
}

#[cfg(test)]
mod tests {
    use super::{is_pinned, leaves_king_in_check};
    use crate::legality::arbiter::Arbiter;
    use crate::board_model::square::Square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn bishop_pin_on_knight() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("rnbqk1nr/pppp1ppp/8/4p3/1b1P4/2N5/PPP1PPPP/R1BQKBNR w KQkq - 0 1")
            .expect("fen should parse");
        assert!(is_pinned(&arbiter, sq("c3"), sq("e4"), &board));
        assert!(!is_pinned(&arbiter, sq("g1"), sq("f3"), &board));
        assert!(!arbiter.piece_can_go(sq("c3"), sq("d5"), true, &board));
        assert!(arbiter.piece_can_go(sq("c3"), sq("d5"), false, &board));
    }

    #[test]
    fn sliding_along_the_pin_line_is_allowed() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1").expect("fen should parse");
        assert!(!is_pinned(&arbiter, sq("e2"), sq("e5"), &board));
        assert!(!is_pinned(&arbiter, sq("e2"), sq("e7"), &board));
        assert!(is_pinned(&arbiter, sq("e2"), sq("d2"), &board));
    }

    #[test]
    fn existing_checks_are_not_pins() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/8/8/8/8/8/3P4/r3K3 w - - 0 1").expect("fen should parse");
        assert!(!is_pinned(&arbiter, sq("d2"), sq("d3"), &board));
        assert!(leaves_king_in_check(&arbiter, sq("d2"), sq("d3"), &board));
    }

    #[test]
    fn capturing_a_checking_knight_clears_the_check() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/8/8/8/8/3n4/8/2B1K3 w - - 0 1").expect("fen should parse");
        assert!(leaves_king_in_check(&arbiter, sq("c1"), sq("d2"), &board));
        assert!(!leaves_king_in_check(&arbiter, sq("e1"), sq("f1"), &board));
    }

    #[test]
    fn en_passant_removes_a_checking_pawn() {
        let arbiter = Arbiter::new();
        // d7-d5 gave check to the king on e4.
        let (board, _) = parse_fen("7k/8/8/3pP3/4K3/8/8/8 w - d6 0 1").expect("fen should parse");
        assert!(!leaves_king_in_check(&arbiter, sq("e5"), sq("d6"), &board));
        assert!(leaves_king_in_check(&arbiter, sq("e5"), sq("e6"), &board));
    }

    #[test]
    fn en_passant_capture_that_exposes_the_rank_is_pinned() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("8/8/8/K2Pp2r/8/8/8/7k w - e6 0 1").expect("fen should parse");
        assert!(is_pinned(&arbiter, sq("d5"), sq("e6"), &board));
        assert!(!is_pinned(&arbiter, sq("d5"), sq("d6"), &board));
    }
}
