//! Reversible board diffs.

use smallvec::SmallVec;

use crate::board_model::board::Board;
use crate::board_model::en_passer::EnPassantState;
use crate::board_model::piece::{Piece, PieceKind};
use crate::board_model::square::Square;
use crate::errors::MoveError;

/// One direction of a move: empty these squares, put these pieces down, then
/// install this en-passant state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardChange {
    pub vacate: SmallVec<[Square; 4]>,
    pub place: SmallVec<[Piece; 2]>,
    pub en_passant: EnPassantState,
}

impl BoardChange {
    /// Apply to `board`. Placed kings refresh their color's ray cache.
    ///
    /// Fails only when a placed piece finds its square still occupied, which
    /// means the diff does not belong to this position.
    pub fn apply(&self, board: &mut Board) -> Result<(), MoveError> {
        for square in &self.vacate {
            board.delete(*square);
        }
        for piece in &self.place {
            if !board.add(piece.clone()) {
                return Err(MoveError::SquareMustBeEmpty(piece.current));
            }
            if piece.kind == PieceKind::King {
                board.update_king_rays(piece.color, piece.current);
            }
        }
        board.set_en_passant_state(self.en_passant.clone());
        Ok(())
    }
}

/// Undo and redo diffs of the move at `move_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardHistory {
    pub move_index: usize,
    pub undo: BoardChange,
    pub redo: BoardChange,
}

impl BoardHistory {
    pub fn undo(&self, board: &mut Board) -> Result<(), MoveError> {
        self.undo.apply(board)
    }

    pub fn redo(&self, board: &mut Board) -> Result<(), MoveError> {
        self.redo.apply(board)
    }
}
