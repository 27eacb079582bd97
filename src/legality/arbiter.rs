//! Legality arbiter.
//!
//! Combines movement geometry with king safety, pins, castling and en
//! passant. An `Arbiter` owns the scratch-board pool of one analysis context;
//! every speculative position it builds comes from that pool and never touches
//! the caller's board.

use smallvec::SmallVec;

use crate::board_model::board::Board;
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::scratch_pool::{PoolStats, ScratchPool};
use crate::board_model::square::Square;
use crate::config::EngineConfig;
use crate::geometry::inverse::possible_knight_to;
use crate::geometry::rays::{calculate_king_aligned_rays, walk, RAY_DIRECTIONS};
use crate::geometry::valid_squares::valid_squares;
use crate::legality::{en_passant, king, pin};
use crate::notation::move_meta::{MoveKind, MoveMeta, Origin};

pub struct Arbiter {
    pool: ScratchPool,
}

impl Default for Arbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Arbiter {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            pool: ScratchPool::new(config.scratch_pool_capacity),
        }
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Run `f` against a scratch copy of `board`.
    pub fn with_scratch<R>(&self, board: &Board, f: impl FnOnce(&mut Board) -> R) -> R {
        self.pool.with_scratch(board, f)
    }

    /// Can the piece on `from` legally move to `to`?
    ///
    /// Geometry first; pawns also reach a pending en-passant landing square
    /// and kings defer to [`king::can_go`]. With `check_pin` the move must not
    /// expose the mover's king, and when that king is already in check the
    /// move has to leave it safe.
    pub fn piece_can_go(&self, from: Square, to: Square, check_pin: bool, board: &Board) -> bool {
        let Some(piece) = board.piece(from) else {
            return false;
        };
        if piece.kind == PieceKind::King {
            return king::can_go(self, from, to, board);
        }

        let reachable = valid_squares(piece.kind, piece.color, from, true, board).contains(&to)
            || (piece.kind == PieceKind::Pawn && en_passant::lands_en_passant(from, to, piece.color, board));
        if !reachable {
            return false;
        }
        if !check_pin {
            return true;
        }
        if pin::is_pinned(self, from, to, board) {
            return false;
        }
        let color = piece.color;
        let in_check = board
            .king_square(color)
            .is_some_and(|king| !self.am_i_safe(color, king, board));
        !in_check || !pin::leaves_king_in_check(self, from, to, board)
    }

    /// Is `square` out of reach of every enemy of `color`?
    ///
    /// Looks only at the first occupied square of each of the eight lines
    /// through `square`, then at enemy knights. Pins of the attackers are
    /// ignored.
    pub fn am_i_safe(&self, color: Color, square: Square, board: &Board) -> bool {
        for direction in RAY_DIRECTIONS {
            let Some(blocker) = walk(square, direction).find_map(|s| board.piece(s)) else {
                continue;
            };
            if blocker.color == color {
                continue;
            }
            if self.piece_can_go(blocker.current, square, false, board) {
                return false;
            }
        }
        possible_knight_to(square, color.opposite(), board).is_empty()
    }

    /// Pieces of `color` that can move to `focus`: per line the first own
    /// piece passing [`Self::piece_can_go`] (an enemy piece closes the line),
    /// plus knights.
    pub fn who_can_go(&self, focus: Square, color: Color, check_pin: bool, board: &Board) -> Vec<Square> {
        let rays = calculate_king_aligned_rays(focus);
        let mut found = Vec::new();
        for ray in rays.rays() {
            for square in ray {
                let Some(piece) = board.piece(*square) else {
                    continue;
                };
                if piece.color != color {
                    break;
                }
                if self.piece_can_go(*square, focus, check_pin, board) {
                    found.push(*square);
                    break;
                }
            }
        }
        found.extend(
            possible_knight_to(focus, color, board)
                .into_iter()
                .filter(|knight| self.piece_can_go(*knight, focus, check_pin, board)),
        );
        found
    }

    /// The single piece able to play a standard move, if exactly one can.
    pub fn get_piece(&self, meta: &MoveMeta, board: &Board) -> Option<Square> {
        let MoveKind::Standard(standard) = &meta.kind else {
            return None;
        };
        let candidates: SmallVec<[Square; 8]> = board
            .pieces_of(standard.piece, meta.color)
            .map(|piece| piece.current)
            .filter(|square| match standard.origin {
                Origin::Any if standard.piece == PieceKind::Pawn => square.file() == standard.to.file(),
                Origin::Any => true,
                Origin::File(file) => square.file() == file,
                Origin::Rank(rank) => square.rank() == rank,
                Origin::Square(origin) => *square == origin,
            })
            .collect();

        let mut found = None;
        for square in candidates {
            if self.piece_can_go(square, standard.to, true, board) {
                if found.is_some() {
                    return None;
                }
                found = Some(square);
            }
        }
        found
    }

    /// Every legal destination of the piece on `square`.
    pub fn possible_moves_for(&self, square: Square, board: &Board) -> Vec<Square> {
        let Some(piece) = board.piece(square) else {
            return Vec::new();
        };
        let mut targets = valid_squares(piece.kind, piece.color, square, true, board);
        if piece.kind == PieceKind::Pawn {
            if let Some(en_passer) = board.en_passer_for(piece.color) {
                if en_passer.has_taker(square) {
                    targets.push(en_passer.intermediate);
                }
            }
        }
        targets.retain(|target| self.piece_can_go(square, *target, true, board));
        if piece.kind == PieceKind::King {
            targets.extend(
                king::castle_destinations(piece.color)
                    .into_iter()
                    .filter(|destination| king::can_castle(self, square, *destination, board).is_some()),
            );
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::Arbiter;
    use crate::board_model::board::Board;
    use crate::board_model::piece::{Color, Piece, PieceKind};
    use crate::board_model::square::Square;
    use crate::geometry::inverse::possible_knight_to;
    use crate::notation::move_parser::analyze;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn opening_moves_are_legal() {
        let arbiter = Arbiter::new();
        let board = Board::standard();
        assert!(arbiter.piece_can_go(sq("e2"), sq("e4"), true, &board));
        assert!(arbiter.piece_can_go(sq("g1"), sq("f3"), true, &board));
        assert!(!arbiter.piece_can_go(sq("f1"), sq("c4"), true, &board));
        assert!(!arbiter.piece_can_go(sq("e4"), sq("e5"), true, &board));
    }

    #[test]
    fn safety_agrees_with_who_can_go() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("r3k2r/ppp2ppp/2n5/3pp1B1/1b1PP1n1/2N2N2/PPP2PPP/R2QKB1R w KQkq - 0 1")
            .expect("fen should parse");
        for square in Square::all() {
            for color in [Color::White, Color::Black] {
                if board.piece(square).is_some_and(|p| p.kind == PieceKind::King) {
                    continue;
                }
                let attacked = !arbiter.who_can_go(square, color.opposite(), false, &board).is_empty()
                    || !possible_knight_to(square, color.opposite(), &board).is_empty();
                assert_eq!(
                    arbiter.am_i_safe(color, square, &board),
                    !attacked,
                    "safety of {square} for {color:?}"
                );
            }
        }
    }

    #[test]
    fn who_can_go_collects_rays_and_knights() {
        let arbiter = Arbiter::new();
        let board = Board::standard();
        let mut movers = arbiter.who_can_go(sq("f3"), Color::White, true, &board);
        movers.sort();
        assert_eq!(movers, vec![sq("g1"), sq("f2")]);
        assert_eq!(arbiter.who_can_go(sq("d3"), Color::White, true, &board), vec![sq("d2")]);
    }

    #[test]
    fn get_piece_resolves_the_unique_mover() {
        let arbiter = Arbiter::new();
        let board = Board::standard();
        let meta = analyze("Nf3", Color::White, 0).expect("Nf3 should parse");
        assert_eq!(arbiter.get_piece(&meta, &board), Some(sq("g1")));
        let pawn = analyze("e4", Color::White, 0).expect("e4 should parse");
        assert_eq!(arbiter.get_piece(&pawn, &board), Some(sq("e2")));
        let nothing = analyze("Nd4", Color::White, 0).expect("Nd4 should parse");
        assert_eq!(arbiter.get_piece(&nothing, &board), None);
    }

    #[test]
    fn ambiguous_notation_yields_none() {
        let arbiter = Arbiter::new();
        let mut board = Board::empty();
        board.add(Piece::new(PieceKind::King, Color::White, sq("h1")));
        board.add(Piece::new(PieceKind::King, Color::Black, sq("h8")));
        board.add(Piece::new(PieceKind::Rook, Color::White, sq("a1")));
        board.add(Piece::new(PieceKind::Rook, Color::White, sq("f1")));
        board.update_king_rays(Color::White, sq("h1"));
        board.update_king_rays(Color::Black, sq("h8"));

        let bare = analyze("Rd1", Color::White, 0).expect("Rd1 should parse");
        assert_eq!(arbiter.get_piece(&bare, &board), None);
        let by_file = analyze("Rad1", Color::White, 0).expect("Rad1 should parse");
        assert_eq!(arbiter.get_piece(&by_file, &board), Some(sq("a1")));
    }

    #[test]
    fn possible_moves_include_en_passant() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1").expect("fen should parse");
        let mut moves = arbiter.possible_moves_for(sq("d5"), &board);
        moves.sort();
        assert_eq!(moves, vec![sq("d6"), sq("e6")]);
    }

    #[test]
    fn rook_check_allows_only_block_or_capture() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/8/8/7R/8/8/P3B3/4K2r w - - 0 1").expect("fen should parse");
        assert!(!arbiter.piece_can_go(sq("a2"), sq("a3"), true, &board));
        assert!(!arbiter.piece_can_go(sq("e2"), sq("d3"), true, &board));
        assert!(!arbiter.piece_can_go(sq("h5"), sq("a5"), true, &board));
        assert!(arbiter.piece_can_go(sq("e2"), sq("f1"), true, &board));
        assert!(arbiter.piece_can_go(sq("h5"), sq("h1"), true, &board));
        assert!(arbiter.piece_can_go(sq("a2"), sq("a3"), false, &board));

        assert!(arbiter.possible_moves_for(sq("a2"), &board).is_empty());
        assert_eq!(arbiter.possible_moves_for(sq("e2"), &board), vec![sq("f1")]);
        assert_eq!(arbiter.possible_moves_for(sq("h5"), &board), vec![sq("h1")]);
    }

    #[test]
    fn knight_check_allows_only_capture_or_king_moves() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("4k3/8/8/8/8/3n2R1/8/2B1K3 w - - 0 1").expect("fen should parse");
        assert_eq!(arbiter.possible_moves_for(sq("g3"), &board), vec![sq("d3")]);
        assert!(arbiter.possible_moves_for(sq("c1"), &board).is_empty());

        let king_moves = arbiter.possible_moves_for(sq("e1"), &board);
        assert!(king_moves.contains(&sq("d2")));
        assert!(!king_moves.contains(&sq("f2")));

        let mut movers = arbiter.who_can_go(sq("d3"), Color::White, true, &board);
        movers.sort();
        assert_eq!(movers, vec![sq("g3")]);
    }
}
