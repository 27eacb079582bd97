//! Checkmate detection.

use crate::board_model::board::Board;
use crate::board_model::piece::PieceKind;
use crate::board_model::square::Square;
use crate::game_end::sacrifice::{can_interpose, is_king_safe_after};
use crate::geometry::valid_squares::valid_squares;
use crate::legality::arbiter::Arbiter;

/// Is the side attacked by the piece on `attacker_square` mated?
///
/// The defender escapes when any of these holds, tried in order:
/// 1. its king has a safe square to step to;
/// 2. the piece on `attacker_square` can be captured leaving the king safe;
/// 3. exactly one piece attacks the king (a discovered check lands here) and
///    it can be captured or blocked;
/// 4. the checking pawn can be taken en passant;
/// 5. a piece can be put between the king and `attacker_square`.
///
/// Callers are expected to have established that the king is in check.
pub fn is_mate(arbiter: &Arbiter, attacker_square: Square, board: &Board) -> bool {
    let Some(attacker) = board.piece(attacker_square) else {
        return false;
    };
    let attacker_color = attacker.color;
    let attacker_is_pawn = attacker.kind == PieceKind::Pawn;
    let defender = attacker_color.opposite();
    let Some(king_square) = board.king_square(defender) else {
        return false;
    };

    let king_can_flee = valid_squares(PieceKind::King, defender, king_square, true, board)
        .into_iter()
        .any(|flight| arbiter.piece_can_go(king_square, flight, false, board));
    if king_can_flee {
        return false;
    }

    if !arbiter.am_i_safe(attacker_color, attacker_square, board) {
        let capturers = arbiter.who_can_go(attacker_square, defender, true, board);
        if is_king_safe_after(arbiter, attacker_square, &capturers, board) {
            return false;
        }
    }

    let discoverers = arbiter.who_can_go(king_square, attacker_color, false, board);
    if let [discoverer] = discoverers.as_slice() {
        let capturers = arbiter.who_can_go(*discoverer, defender, true, board);
        if is_king_safe_after(arbiter, *discoverer, &capturers, board) {
            return false;
        }
        if can_interpose(arbiter, king_square, *discoverer, board) {
            return false;
        }
    }

    if attacker_is_pawn && takes_checker_en_passant(arbiter, attacker_square, board) {
        return false;
    }

    !can_interpose(arbiter, king_square, attacker_square, board)
}

fn takes_checker_en_passant(arbiter: &Arbiter, attacker_square: Square, board: &Board) -> bool {
    let Some(attacker) = board.piece(attacker_square) else {
        return false;
    };
    let defender = attacker.color.opposite();
    let Some(en_passer) = board.en_passer_for(defender).filter(|e| e.now == attacker_square) else {
        return false;
    };

    en_passer.takers.iter().any(|taker| {
        arbiter.piece_can_go(*taker, en_passer.intermediate, true, board)
            && arbiter.with_scratch(board, |scratch| {
                scratch.delete(en_passer.now);
                scratch.move_piece(*taker, en_passer.intermediate);
                scratch
                    .king_square(defender)
                    .is_some_and(|king| arbiter.am_i_safe(defender, king, scratch))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::{is_mate, takes_checker_en_passant};
    use crate::board_model::square::Square;
    use crate::legality::arbiter::Arbiter;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    fn mate_from(fen: &str, attacker: &str) -> bool {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen(fen).expect("fen should parse");
        is_mate(&arbiter, sq(attacker), &board)
    }

    #[test]
    fn scholars_mate() {
        assert!(mate_from(
            "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
            "f7"
        ));
    }

    #[test]
    fn flight_square_breaks_mate() {
        assert!(!mate_from("R3k3/8/8/8/8/8/8/4K3 b - - 0 1", "a8"));
    }

    #[test]
    fn back_rank_mate_and_its_defences() {
        assert!(mate_from("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", "a8"));
        // A rook on the eighth rank can take the checker.
        assert!(!mate_from("R5kr/5ppp/8/8/8/8/8/6K1 b - - 0 1", "a8"));
        // A bishop can block on e8.
        assert!(!mate_from("R5k1/5ppp/8/1b6/8/8/8/6K1 b - - 0 1", "a8"));
    }

    #[test]
    fn smothered_mate_has_nothing_to_block() {
        assert!(mate_from("6rk/5Npp/8/8/8/8/8/6K1 b - - 0 1", "f7"));
    }

    #[test]
    fn pinned_defender_cannot_capture_the_checker() {
        // The e8 bishop could take the checking knight but is pinned by a8.
        assert!(mate_from("R3b2k/4NNpp/8/8/8/8/8/6K1 b - - 0 1", "f7"));
        assert!(!mate_from("4b2k/4NNpp/8/8/8/8/8/6K1 b - - 0 1", "f7"));
    }

    #[test]
    fn en_passant_removes_the_checking_pawn() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("8/8/8/3pP3/4K3/8/8/k7 w - d6 0 1").expect("fen should parse");
        assert!(takes_checker_en_passant(&arbiter, sq("d5"), &board));

        let (no_right, _) = parse_fen("8/8/8/3pP3/4K3/8/8/k7 w - - 0 1").expect("fen should parse");
        assert!(!takes_checker_en_passant(&arbiter, sq("d5"), &no_right));
    }
}
