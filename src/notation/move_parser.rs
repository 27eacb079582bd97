//! SAN token parser.
//!
//! Accepts the tokens this crate writes plus common variants: `0-0` style
//! castles and trailing `!`/`?` annotation glyphs.

use crate::board_model::piece::{Color, PieceKind};
use crate::board_model::square::Square;
use crate::errors::NotationError;
use crate::notation::move_meta::{Annotation, CastleSide, MoveKind, MoveMeta, Origin, StandardMove};
use crate::utils::algebraic::{file_from_char, rank_from_char};

/// Parse one token played by `color` at ply `index`.
pub fn analyze(token: &str, color: Color, index: usize) -> Result<MoveMeta, NotationError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(NotationError::EmptyToken);
    }
    if !token.is_ascii() {
        return Err(NotationError::MalformedToken(token.to_owned()));
    }

    let body = token.trim_end_matches(['!', '?']);
    let annotation = if body.ends_with('#') {
        Annotation::Checkmate
    } else if body.ends_with('+') {
        Annotation::Check
    } else {
        Annotation::None
    };
    let body = body.trim_end_matches(['+', '#']);

    let kind = match body {
        "O-O" | "0-0" => MoveKind::Castle(CastleSide::Short),
        "O-O-O" | "0-0-0" => MoveKind::Castle(CastleSide::Long),
        _ => MoveKind::Standard(parse_standard(body, color, token)?),
    };

    Ok(MoveMeta {
        token: token.to_owned(),
        color,
        index,
        annotation,
        kind,
    })
}

fn parse_standard(body: &str, color: Color, token: &str) -> Result<StandardMove, NotationError> {
    let malformed = || NotationError::MalformedToken(token.to_owned());

    let (body, promotion) = match body.split_once('=') {
        Some((head, promo)) => {
            let mut letters = promo.chars();
            let letter = letters.next().ok_or_else(malformed)?;
            if letters.next().is_some() {
                return Err(malformed());
            }
            let kind = PieceKind::from_san_letter(letter)
                .filter(|kind| kind.is_promotion_target())
                .ok_or(NotationError::InvalidPiece(letter))?;
            (head, Some(kind))
        }
        None => (body, None),
    };

    let first = body.chars().next().ok_or_else(malformed)?;
    let (piece, rest) = match PieceKind::from_san_letter(first) {
        Some(kind) => (kind, &body[1..]),
        None if file_from_char(first).is_some() => (PieceKind::Pawn, body),
        None => return Err(NotationError::InvalidPiece(first)),
    };

    if rest.len() < 2 {
        return Err(malformed());
    }
    let (middle, destination) = rest.split_at(rest.len() - 2);
    let to: Square = destination.parse()?;

    let capture = middle.ends_with('x');
    let middle = middle.strip_suffix('x').unwrap_or(middle);
    let origin = parse_origin(middle).ok_or_else(malformed)?;

    if piece == PieceKind::Pawn {
        let pawn_shape_ok = match origin {
            Origin::Any => !capture,
            Origin::File(file) => capture && file.abs_diff(to.file()) == 1,
            _ => false,
        };
        if !pawn_shape_ok {
            return Err(malformed());
        }
        let on_last_rank = to.rank() == color.promotion_rank();
        if promotion.is_some() && !on_last_rank {
            return Err(malformed());
        }
    } else if promotion.is_some() {
        return Err(malformed());
    }

    Ok(StandardMove {
        piece,
        to,
        origin,
        capture,
        promotion,
    })
}

fn parse_origin(middle: &str) -> Option<Origin> {
    let mut chars = middle.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (None, _, _) => Some(Origin::Any),
        (Some(c), None, _) => file_from_char(c)
            .map(Origin::File)
            .or_else(|| rank_from_char(c).map(Origin::Rank)),
        (Some(_), Some(_), None) => middle.parse().ok().map(Origin::Square),
        _ => None,
    }
}
