//! Inverse reachability: where could a piece stand to reach a focus square.
//!
//! Each query walks outward from the focus square and keeps only the first
//! occupied square per ray, if it holds the requested kind and color.

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::geometry::rays::{knight_jumps, walk, DIAGONAL, ORTHOGONAL};

pub fn possible_sideways_to(focus: Square, kind: PieceKind, color: Color, board: &Board) -> Vec<Square> {
    first_matches(&ORTHOGONAL, focus, kind, color, board)
}

pub fn possible_diagonal_to(focus: Square, kind: PieceKind, color: Color, board: &Board) -> Vec<Square> {
    first_matches(&DIAGONAL, focus, kind, color, board)
}

/// Knights of `color` one jump away from `focus`.
pub fn possible_knight_to(focus: Square, color: Color, board: &Board) -> Vec<Square> {
    knight_jumps(focus)
        .filter(|square| {
            board
                .piece(*square)
                .is_some_and(|piece| piece.is(PieceKind::Knight, color))
        })
        .collect()
}

fn first_matches(
    directions: &[(i8, i8)],
    focus: Square,
    kind: PieceKind,
    color: Color,
    board: &Board,
) -> Vec<Square> {
    directions
        .iter()
        .filter_map(|direction| {
            walk(focus, *direction)
                .find_map(|square| board.piece(square))
                .filter(|piece| piece.is(kind, color))
                .map(|piece| piece.current)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{possible_diagonal_to, possible_knight_to, possible_sideways_to};
    use crate::board_model::board::Board;
    use crate::board_model::piece::{Color, Piece, PieceKind};
    use crate::board_model::square::Square;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn sideways_sees_only_the_first_blocker() {
        let mut board = Board::empty();
        board.add(Piece::new(PieceKind::Rook, Color::White, sq("a4")));
        board.add(Piece::new(PieceKind::Rook, Color::White, sq("d8")));
        board.add(Piece::new(PieceKind::Pawn, Color::Black, sq("d6")));
        board.add(Piece::new(PieceKind::Rook, Color::White, sq("d1")));
        let found = possible_sideways_to(sq("d4"), PieceKind::Rook, Color::White, &board);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&sq("a4")));
        assert!(found.contains(&sq("d1")));
    }

    #[test]
    fn diagonal_and_knight_queries() {
        let board = Board::standard();
        assert_eq!(
            possible_knight_to(sq("f3"), Color::White, &board),
            vec![sq("g1")]
        );
        assert!(possible_diagonal_to(sq("e3"), PieceKind::Bishop, Color::White, &board).is_empty());

        let mut open = Board::standard();
        open.delete(sq("d2"));
        assert_eq!(
            possible_diagonal_to(sq("e3"), PieceKind::Bishop, Color::White, &open),
            vec![sq("c1")]
        );
    }
}
