//! Parsed move to reversible diff.
//!
//! Resolution happens entirely against the caller's board without mutating
//! it; the returned [`BoardHistory`] is what changes a board, through
//! `redo`/`undo`.

use smallvec::smallvec;
use tracing::debug;

use crate::board_model::board::Board;
use crate::board_model::en_passer::{EnPassantState, EnPasser};
use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::errors::MoveError;
use crate::execution::board_history::{BoardChange, BoardHistory};
use crate::legality::arbiter::Arbiter;
use crate::legality::en_passant::{en_passer_for_double_step, taker_for};
use crate::legality::king::{can_castle, castle_squares};
use crate::notation::move_meta::{CastleSide, MoveKind, MoveMeta, Origin, StandardMove};
use crate::notation::move_parser::analyze;
use crate::notation::token_stream::index_to_color;

/// Build the undo/redo diffs for `meta` on `board`.
pub fn execute(arbiter: &Arbiter, meta: &MoveMeta, board: &Board) -> Result<BoardHistory, MoveError> {
    let result = match &meta.kind {
        MoveKind::Castle(side) => castle(arbiter, meta, *side, board),
        MoveKind::Standard(standard) => match resolve_en_passant(arbiter, meta.color, standard, board)? {
            Some((taker, en_passer)) => en_passant(meta, taker, &en_passer, board),
            None => standard_move(arbiter, meta, standard, board),
        },
    };
    if let Err(err) = &result {
        debug!(token = %meta.token, index = meta.index, %err, "move rejected");
    }
    result
}

/// Square of the piece that would play `meta`.
pub fn discover_piece(arbiter: &Arbiter, meta: &MoveMeta, board: &Board) -> Result<Square, MoveError> {
    match &meta.kind {
        MoveKind::Castle(side) => {
            let king_from = castle_squares(*side, meta.color).king_from;
            board
                .piece(king_from)
                .filter(|piece| piece.is(PieceKind::King, meta.color))
                .map(|_| king_from)
                .ok_or(MoveError::CastleNotAllowed(*side))
        }
        MoveKind::Standard(standard) => match resolve_en_passant(arbiter, meta.color, standard, board)? {
            Some((taker, _)) => Ok(taker),
            None => arbiter
                .get_piece(meta, board)
                .ok_or_else(|| MoveError::NoPieceCanMove(meta.token.clone())),
        },
    }
}

/// Parse and play every token from the current position of `board`,
/// returning the diffs in order. Stops at the first failure, leaving the
/// moves before it on the board.
pub fn play_tokens<S: AsRef<str>>(
    arbiter: &Arbiter,
    moves: &[S],
    board: &mut Board,
) -> Result<Vec<BoardHistory>, MoveError> {
    let mut histories = Vec::with_capacity(moves.len());
    for (index, token) in moves.iter().enumerate() {
        let meta = analyze(token.as_ref(), index_to_color(index), index)?;
        let history = execute(arbiter, &meta, board)?;
        history.redo(board)?;
        histories.push(history);
    }
    Ok(histories)
}

/// En-passant state after `color` moves: its own pending capture lapses and
/// a double step may hand one to the opponent.
fn en_passant_after(board: &Board, color: Color, created: Option<EnPasser>) -> EnPassantState {
    let mut state = board.en_passant_state().clone();
    state.clear_for(color);
    if let Some(en_passer) = created {
        state.store(en_passer);
    }
    state
}

fn castle(arbiter: &Arbiter, meta: &MoveMeta, side: CastleSide, board: &Board) -> Result<BoardHistory, MoveError> {
    let color = meta.color;
    let squares = castle_squares(side, color);
    let king = board
        .piece(squares.king_from)
        .filter(|piece| piece.is(PieceKind::King, color))
        .ok_or(MoveError::CastleNotAllowed(side))?;
    for landing in [squares.king_to, squares.rook_to] {
        if board.any_piece_on(landing) {
            return Err(MoveError::SquareMustBeEmpty(landing));
        }
    }
    if can_castle(arbiter, squares.king_from, squares.king_to, board) != Some(side) {
        return Err(MoveError::CastleNotAllowed(side));
    }
    let rook = board
        .piece(squares.rook_from)
        .ok_or(MoveError::PieceNotFound(squares.rook_from))?;

    let mut moved_king = king.clone();
    moved_king.relocate(squares.king_to);
    let mut moved_rook = rook.clone();
    moved_rook.relocate(squares.rook_to);

    Ok(BoardHistory {
        move_index: meta.index,
        undo: BoardChange {
            vacate: smallvec![squares.king_to, squares.rook_to],
            place: smallvec![
                king.clone_from_square(squares.king_to),
                rook.clone_from_square(squares.rook_to)
            ],
            en_passant: board.en_passant_state().clone(),
        },
        redo: BoardChange {
            vacate: smallvec![squares.king_from, squares.rook_from],
            place: smallvec![moved_king, moved_rook],
            en_passant: en_passant_after(board, color, None),
        },
    })
}

/// The capturing pawn and descriptor when `standard` is an en-passant
/// capture. A pawn capture onto an empty square that no pending en passant
/// explains is rejected rather than guessed at.
fn resolve_en_passant(
    arbiter: &Arbiter,
    color: Color,
    standard: &StandardMove,
    board: &Board,
) -> Result<Option<(Square, EnPasser)>, MoveError> {
    if standard.piece != PieceKind::Pawn || !standard.capture || board.any_piece_on(standard.to) {
        return Ok(None);
    }
    let no_taker = || MoveError::NoEnPassantTaker(standard.to);
    let en_passer = board
        .en_passer_for(color)
        .filter(|en_passer| en_passer.intermediate == standard.to)
        .ok_or_else(no_taker)?;
    let origin_file = match standard.origin {
        Origin::File(file) => Some(file),
        Origin::Square(square) => Some(square.file()),
        Origin::Any | Origin::Rank(_) => None,
    };
    let taker = taker_for(en_passer, origin_file)
        .filter(|taker| arbiter.piece_can_go(*taker, standard.to, true, board))
        .ok_or_else(no_taker)?;
    Ok(Some((taker, en_passer.clone())))
}

fn en_passant(meta: &MoveMeta, taker: Square, en_passer: &EnPasser, board: &Board) -> Result<BoardHistory, MoveError> {
    let landing = en_passer.intermediate;
    let pawn = board.piece(taker).ok_or(MoveError::PieceNotFound(taker))?;
    let victim = board
        .piece(en_passer.now)
        .ok_or(MoveError::PieceNotFound(en_passer.now))?;

    let mut moved = pawn.clone();
    moved.relocate(landing);

    Ok(BoardHistory {
        move_index: meta.index,
        undo: BoardChange {
            vacate: smallvec![landing],
            place: smallvec![pawn.clone_from_square(landing), victim.clone()],
            en_passant: board.en_passant_state().clone(),
        },
        redo: BoardChange {
            vacate: smallvec![taker, en_passer.now],
            place: smallvec![moved],
            en_passant: en_passant_after(board, meta.color, None),
        },
    })
}

fn standard_move(
    arbiter: &Arbiter,
    meta: &MoveMeta,
    standard: &StandardMove,
    board: &Board,
) -> Result<BoardHistory, MoveError> {
    let to = standard.to;
    let from = arbiter
        .get_piece(meta, board)
        .ok_or_else(|| MoveError::NoPieceCanMove(meta.token.clone()))?;
    let mover = board.piece(from).ok_or(MoveError::PieceNotFound(from))?;
    let captured = board.piece(to);
    if standard.capture != captured.is_some() {
        return Err(MoveError::CaptureMismatch(to));
    }
    let promotes = mover.kind == PieceKind::Pawn && to.rank() == mover.color.promotion_rank();
    if promotes && standard.promotion.is_none() {
        return Err(MoveError::PromotionRequired(to));
    }

    let mut moved = mover.clone();
    moved.relocate(to);
    if let Some(kind) = standard.promotion {
        moved.kind = kind;
    }
    let created = (mover.kind == PieceKind::Pawn)
        .then(|| en_passer_for_double_step(from, to, board))
        .flatten();

    let mut undo = BoardChange {
        vacate: smallvec![to],
        place: smallvec![mover.clone_from_square(to)],
        en_passant: board.en_passant_state().clone(),
    };
    let mut redo = BoardChange {
        vacate: smallvec![from],
        place: smallvec![moved],
        en_passant: en_passant_after(board, meta.color, created),
    };
    if let Some(captured) = captured {
        undo.place.push(captured.clone());
        redo.vacate.push(to);
    }

    Ok(BoardHistory {
        move_index: meta.index,
        undo,
        redo,
    })
}

#[cfg(test)]
mod tests {
    use super::{discover_piece, execute, play_tokens};
    use crate::board_model::board::Board;
    use crate::board_model::piece::{Color, PieceKind};
    use crate::board_model::square::Square;
    use crate::errors::MoveError;
    use crate::legality::arbiter::Arbiter;
    use crate::notation::move_meta::CastleSide;
    use crate::notation::move_parser::analyze;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn execute_leaves_the_board_alone() {
        let arbiter = Arbiter::new();
        let board = Board::standard();
        let meta = analyze("e4", Color::White, 0).expect("e4 should parse");
        let history = execute(&arbiter, &meta, &board).expect("e4 should execute");
        assert_eq!(history.move_index, 0);
        assert!(board.piece(sq("e2")).is_some());
        assert!(board.piece(sq("e4")).is_none());
    }

    #[test]
    fn ruy_lopez_replays_and_rewinds() {
        let arbiter = Arbiter::new();
        let mut board = Board::standard();
        let start = board.placement();
        let histories =
            play_tokens(&arbiter, &["e4", "e5", "Nf3", "Nc6", "Bb5"], &mut board).expect("opening should play");
        assert_eq!(histories.len(), 5);
        assert!(board.piece(sq("b5")).is_some_and(|p| p.is(PieceKind::Bishop, Color::White)));
        assert!(board.piece(sq("c6")).is_some_and(|p| p.is(PieceKind::Knight, Color::Black)));

        for history in histories.iter().rev() {
            history.undo(&mut board).expect("undo should apply");
        }
        assert_eq!(board.placement(), start);
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let arbiter = Arbiter::new();
        let mut board = Board::standard();
        let histories =
            play_tokens(&arbiter, &["e4", "a6", "e5", "d5"], &mut board).expect("setup should play");
        let en_passer = board.en_passer_for(Color::White).expect("d5 created an en passer").clone();
        assert_eq!(en_passer.now, sq("d5"));
        assert_eq!(en_passer.intermediate, sq("d6"));
        assert!(en_passer.has_taker(sq("e5")));

        let before = board.placement();
        let meta = analyze("exd6", Color::White, histories.len()).expect("exd6 should parse");
        assert_eq!(discover_piece(&arbiter, &meta, &board), Ok(sq("e5")));
        let capture = execute(&arbiter, &meta, &board).expect("en passant should execute");
        capture.redo(&mut board).expect("redo should apply");
        assert!(board.piece(sq("d5")).is_none());
        assert!(board.piece(sq("d6")).is_some_and(|p| p.is(PieceKind::Pawn, Color::White)));
        assert!(board.en_passer_for(Color::White).is_none());

        capture.undo(&mut board).expect("undo should apply");
        assert_eq!(board.placement(), before);
        assert_eq!(board.en_passer_for(Color::White), Some(&en_passer));
    }

    #[test]
    fn en_passant_lapses_after_one_move() {
        let arbiter = Arbiter::new();
        let mut board = Board::standard();
        play_tokens(&arbiter, &["e4", "a6", "e5", "d5", "h3", "h6"], &mut board).expect("moves should play");
        assert!(board.en_passer_for(Color::White).is_none());
        let meta = analyze("exd6", Color::White, 6).expect("exd6 should parse");
        assert_eq!(
            execute(&arbiter, &meta, &board),
            Err(MoveError::NoEnPassantTaker(sq("d6")))
        );
    }

    #[test]
    fn castling_moves_both_pieces_and_back() {
        let arbiter = Arbiter::new();
        let (mut board, _) = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("fen should parse");
        let before = board.placement();
        let meta = analyze("O-O-O", Color::White, 0).expect("castle should parse");
        let history = execute(&arbiter, &meta, &board).expect("castle should execute");
        history.redo(&mut board).expect("redo should apply");
        assert!(board.piece(sq("c1")).is_some_and(|p| p.kind == PieceKind::King));
        assert!(board.piece(sq("d1")).is_some_and(|p| p.kind == PieceKind::Rook));
        assert_eq!(board.king_rays(Color::White).king_square(), sq("c1"));

        history.undo(&mut board).expect("undo should apply");
        assert_eq!(board.placement(), before);
        assert_eq!(board.king_rays(Color::White).king_square(), sq("e1"));
        assert!(board.piece(sq("e1")).is_some_and(|p| !p.has_moved));
    }

    #[test]
    fn refused_moves_report_their_kind() {
        let arbiter = Arbiter::new();
        let board = Board::standard();
        let castle = analyze("O-O", Color::White, 0).expect("castle should parse");
        assert_eq!(
            execute(&arbiter, &castle, &board),
            Err(MoveError::SquareMustBeEmpty(sq("g1")))
        );
        let knight = analyze("Nd4", Color::White, 0).expect("Nd4 should parse");
        assert_eq!(
            execute(&arbiter, &knight, &board),
            Err(MoveError::NoPieceCanMove("Nd4".to_owned()))
        );

        let (open, _) = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").expect("fen should parse");
        assert_eq!(
            execute(&arbiter, &castle, &open),
            Err(MoveError::CastleNotAllowed(CastleSide::Short))
        );
    }

    #[test]
    fn capture_marker_and_promotion_are_checked() {
        let arbiter = Arbiter::new();
        let (board, _) = parse_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("fen should parse");
        let bare = analyze("a8", Color::White, 0).expect("a8 should parse");
        assert_eq!(
            execute(&arbiter, &bare, &board),
            Err(MoveError::PromotionRequired(sq("a8")))
        );
        let wrong_marker = analyze("Kxd2", Color::White, 0).expect("Kxd2 should parse");
        assert_eq!(
            execute(&arbiter, &wrong_marker, &board),
            Err(MoveError::CaptureMismatch(sq("d2")))
        );

        let mut promoted = board.snapshot();
        let meta = analyze("axb8=Q+", Color::White, 0).expect("promotion should parse");
        execute(&arbiter, &meta, &board)
            .expect("promotion should execute")
            .redo(&mut promoted)
            .expect("redo should apply");
        assert!(promoted.piece(sq("b8")).is_some_and(|p| p.is(PieceKind::Queen, Color::White)));
        assert!(promoted.piece(sq("a7")).is_none());
    }
}
