//! Terminal-oriented Unicode board renderer.
//!
//! Debug view of a [`Board`] for tests, the CLI and regression output.

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;

/// Render the board from White's side: rank 8 on top, a-file on the left.
pub fn render_board(board: &Board) -> String {
    render_board_from(board, Color::White)
}

/// Render the board as seen by `viewer`.
pub fn render_board_from(board: &Board, viewer: Color) -> String {
    let files: Vec<u8> = match viewer {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };
    let ranks: Vec<u8> = match viewer {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };

    let header = files
        .iter()
        .map(|file| char::from(b'a' + file).to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str("  ");
    out.push_str(&header);
    out.push('\n');

    for rank in &ranks {
        let label = char::from(b'1' + rank);
        out.push(label);
        out.push(' ');

        for (column, file) in files.iter().enumerate() {
            let glyph = Square::new(*file, *rank)
                .and_then(|square| board.piece(square))
                .map_or('·', |piece| piece_to_unicode(piece.color, piece.kind));
            out.push(glyph);

            if column < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(label);
        out.push('\n');
    }

    out.push_str("  ");
    out.push_str(&header);

    out
}

fn piece_to_unicode(color: Color, kind: PieceKind) -> char {
    match (color, kind) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::{render_board, render_board_from};
    use crate::board_model::board::Board;
    use crate::board_model::piece::Color;

    #[test]
    fn starting_position_from_both_sides() {
        let board = Board::standard();
        let white = render_board(&board);
        let lines: Vec<&str> = white.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "  a b c d e f g h");
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[5], "4 · · · · · · · · 4");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");

        let black = render_board_from(&board, Color::Black);
        let lines: Vec<&str> = black.lines().collect();
        assert_eq!(lines[0], "  h g f e d c b a");
        assert_eq!(lines[1], "1 ♖ ♘ ♗ ♔ ♕ ♗ ♘ ♖ 1");
    }
}
