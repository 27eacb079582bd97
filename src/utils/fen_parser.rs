//! FEN-to-Board parser.
//!
//! Sets up an authoritative board from a Forsyth-Edwards Notation string.
//! Castling rights become `has_moved` flags on kings and rooks, and the
//! en-passant field becomes a pending [`EnPasser`] for the side to move.
//! The move clocks are validated but not kept.

use smallvec::SmallVec;

use crate::board_model::board::Board;
use crate::board_model::en_passer::EnPasser;
use crate::board_model::piece::{Color, Piece, PieceKind};
use crate::board_model::square::Square;
use crate::utils::algebraic::algebraic_to_square;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling rights as (king side, queen side) per color.
type CastlingRights = [(bool, bool); 2];

pub fn parse_fen(fen: &str) -> Result<(Board, Color), String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next().ok_or("Missing halfmove clock in FEN")?;
    let fullmove_part = parts.next().ok_or("Missing fullmove number in FEN")?;

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    halfmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid halfmove clock: {halfmove_part}"))?;
    fullmove_part
        .parse::<u16>()
        .map_err(|_| format!("Invalid fullmove number: {fullmove_part}"))?;

    let side_to_move = parse_side_to_move(side_part)?;
    let rights = parse_castling_rights(castling_part)?;

    let mut board = Board::empty();
    board.pause_reflection();
    parse_board(board_part, &rights, &mut board)?;

    for color in [Color::White, Color::Black] {
        if let Some(king) = board.king_square(color) {
            board.update_king_rays(color, king);
        }
    }

    if let Some(target) = parse_en_passant_square(en_passant_part)? {
        if let Some(en_passer) = en_passer_from_target(target, side_to_move, &board)? {
            board.store_en_passer(en_passer);
        }
    }

    board.resume_and_reflect();
    Ok((board, side_to_move))
}

fn parse_board(board_part: &str, rights: &CastlingRights, board: &mut Board) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7u8.saturating_sub(fen_rank_idx as u8);
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                file = file
                    .checked_add(empty_count as u8)
                    .filter(|sum| *sum <= 8)
                    .ok_or("Board rank has too many files")?;
                continue;
            }

            let (color, kind) = piece_from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;
            let square = Square::new(file, rank).ok_or("Board rank has too many files")?;

            let mut piece = Piece::new(kind, color, square);
            piece.has_moved = has_moved(kind, color, square, rights);
            board.add(piece);
            file += 1;
        }

        if file != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    Ok(())
}

/// Kings and rooks count as unmoved only when a castling right needs them;
/// pawns only on their home rank.
fn has_moved(kind: PieceKind, color: Color, square: Square, rights: &CastlingRights) -> bool {
    let (king_side, queen_side) = rights[color.index()];
    let home = square.rank() == color.back_rank();
    match kind {
        PieceKind::King => !(home && square.file() == 4 && (king_side || queen_side)),
        PieceKind::Rook => !(home && ((square.file() == 7 && king_side) || (square.file() == 0 && queen_side))),
        PieceKind::Pawn => square.rank() != color.pawn_home_rank(),
        _ => false,
    }
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    let mut rights: CastlingRights = [(false, false); 2];
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights[Color::White.index()].0 = true,
            'Q' => rights[Color::White.index()].1 = true,
            'k' => rights[Color::Black.index()].0 = true,
            'q' => rights[Color::Black.index()].1 = true,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    Ok(Some(algebraic_to_square(en_passant_part)?))
}

/// The pending capture behind an en-passant target square. `None` when no
/// pawn of `taker` stands beside the double-stepped pawn.
fn en_passer_from_target(target: Square, taker: Color, board: &Board) -> Result<Option<EnPasser>, String> {
    let mover = taker.opposite();
    let forward = mover.forward();
    let (Some(before), Some(now)) = (target.offset(0, -forward), target.offset(0, forward)) else {
        return Err(format!("Invalid en-passant square: {target}"));
    };
    if before.rank() != mover.pawn_home_rank() {
        return Err(format!("En-passant square {target} does not fit the side to move"));
    }
    if !board.piece(now).is_some_and(|piece| piece.is(PieceKind::Pawn, mover)) {
        return Err(format!("No pawn behind en-passant square {target}"));
    }

    let takers: SmallVec<[Square; 2]> = [-1, 1]
        .into_iter()
        .filter_map(|d_file| now.offset(d_file, 0))
        .filter(|square| board.piece(*square).is_some_and(|piece| piece.is(PieceKind::Pawn, taker)))
        .collect();
    if takers.is_empty() {
        return Ok(None);
    }

    Ok(Some(EnPasser {
        taker_color: taker,
        before,
        intermediate: target,
        now,
        takers,
    }))
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, kind))
}
