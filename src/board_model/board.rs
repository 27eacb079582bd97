//! The mutable position: one optional piece per square, a king-ray cache per
//! color, and the pending en-passant slots.
//!
//! The same type serves as the authoritative board and as scratch copies used
//! by speculative legality checks. Only the authoritative board normally has a
//! [`BoardObserver`] attached; snapshots never carry one.

use std::fmt;

use crate::board_model::en_passer::{EnPassantState, EnPasser};
use crate::board_model::king_rays::KingRays;
use crate::board_model::piece::{Color, Piece, PieceKind};
use crate::board_model::square::Square;

/// Optional port for a UI or logger that mirrors board changes.
///
/// Every hook has an empty default so implementors pick what they need.
pub trait BoardObserver {
    fn piece_added(&mut self, _piece: &Piece) {}
    fn piece_deleted(&mut self, _piece: &Piece) {}
    fn cleared(&mut self) {}
    /// Many squares changed at once; redraw everything.
    fn invalidated(&mut self) {}
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub struct Board {
    squares: [Option<Piece>; 64],
    king_rays: [KingRays; 2],
    en_passant: EnPassantState,
    observer: Option<Box<dyn BoardObserver>>,
    reflecting: bool,
}

impl Board {
    /// A board with no pieces. King-ray caches start on e1/e8.
    pub fn empty() -> Self {
        Self {
            squares: std::array::from_fn(|_| None),
            king_rays: [
                KingRays::from_square(Square::E1),
                KingRays::from_square(Square::E8),
            ],
            en_passant: EnPassantState::default(),
            observer: None,
            reflecting: true,
        }
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        board.place_standard_armies();
        board
    }

    fn place_standard_armies(&mut self) {
        for color in [Color::White, Color::Black] {
            let back = color.back_rank();
            let pawns = color.pawn_home_rank();
            for (file, kind) in BACK_RANK.iter().enumerate() {
                let file = file as u8;
                if let Some(square) = Square::new(file, back) {
                    self.add(Piece::new(*kind, color, square));
                }
                if let Some(square) = Square::new(file, pawns) {
                    self.add(Piece::new(PieceKind::Pawn, color, square));
                }
            }
        }
        self.update_king_rays(Color::White, Square::E1);
        self.update_king_rays(Color::Black, Square::E8);
    }

    #[inline]
    pub fn piece(&self, square: Square) -> Option<&Piece> {
        self.squares[square.index()].as_ref()
    }

    #[inline]
    pub fn any_piece_on(&self, square: Square) -> bool {
        self.squares[square.index()].is_some()
    }

    /// Place `piece` on its current square. Returns `false` and leaves the
    /// board untouched when that square is occupied.
    pub fn add(&mut self, piece: Piece) -> bool {
        let slot = &mut self.squares[piece.current.index()];
        if slot.is_some() {
            return false;
        }
        if self.reflecting {
            if let Some(observer) = self.observer.as_mut() {
                observer.piece_added(&piece);
            }
        }
        *slot = Some(piece);
        true
    }

    pub fn delete(&mut self, square: Square) -> Option<Piece> {
        let removed = self.squares[square.index()].take();
        if let (Some(piece), true) = (removed.as_ref(), self.reflecting) {
            if let Some(observer) = self.observer.as_mut() {
                observer.piece_deleted(piece);
            }
        }
        removed
    }

    /// Lift the piece on `from`, relocate it, and put it down on `to`.
    /// Refuses (returning `false`) when `from` is empty or `to` is occupied.
    pub fn move_piece(&mut self, from: Square, to: Square) -> bool {
        if from == to || self.any_piece_on(to) {
            return false;
        }
        match self.delete(from) {
            Some(mut piece) => {
                piece.relocate(to);
                self.add(piece)
            }
            None => false,
        }
    }

    /// Change the kind of the piece on `square` (promotion).
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> bool {
        match self.squares[square.index()].as_mut() {
            Some(piece) => {
                piece.kind = kind;
                true
            }
            None => false,
        }
    }

    /// True when `square` holds a piece of `color`.
    #[inline]
    pub fn killing_own_army(&self, square: Square, color: Color) -> bool {
        self.piece(square).is_some_and(|piece| piece.color == color)
    }

    #[inline]
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.piece(square).is_some_and(|piece| piece.color != color)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten()
    }

    pub fn pieces_of(&self, kind: PieceKind, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |piece| piece.is(kind, color))
    }

    pub fn squares_of_army(&self, color: Color) -> Vec<Square> {
        self.pieces()
            .filter(|piece| piece.color == color)
            .map(|piece| piece.current)
            .collect()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Where the king of `color` actually stands.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(PieceKind::King, color)
            .next()
            .map(|king| king.current)
    }

    /// Sorted `(square, color, kind)` triples, for comparing content.
    pub fn placement(&self) -> Vec<(Square, Color, PieceKind)> {
        self.pieces()
            .map(|piece| (piece.current, piece.color, piece.kind))
            .collect()
    }

    #[inline]
    pub fn king_rays(&self, color: Color) -> &KingRays {
        &self.king_rays[color.index()]
    }

    /// Refresh the cached rays after the king of `color` moved.
    pub fn update_king_rays(&mut self, color: Color, king_square: Square) {
        let rays = &mut self.king_rays[color.index()];
        if rays.king_square() != king_square {
            rays.recompute(king_square);
        }
    }

    pub fn en_passer_for(&self, taker_color: Color) -> Option<&EnPasser> {
        self.en_passant.for_taker(taker_color)
    }

    pub fn store_en_passer(&mut self, en_passer: EnPasser) {
        self.en_passant.store(en_passer);
    }

    pub fn clear_en_passer_for(&mut self, taker_color: Color) {
        self.en_passant.clear_for(taker_color);
    }

    pub fn en_passant_state(&self) -> &EnPassantState {
        &self.en_passant
    }

    pub fn set_en_passant_state(&mut self, state: EnPassantState) {
        self.en_passant = state;
    }

    /// Independent copy without the observer.
    pub fn snapshot(&self) -> Board {
        let mut copy = Board::empty();
        copy.copy_from(self);
        copy
    }

    /// Overwrite this board's content with `source`, reusing buffers. The
    /// observer of `self` is kept and told to redraw.
    pub fn copy_from(&mut self, source: &Board) {
        self.squares.clone_from(&source.squares);
        self.king_rays[0].copy_from(&source.king_rays[0]);
        self.king_rays[1].copy_from(&source.king_rays[1]);
        self.en_passant.clone_from(&source.en_passant);
        self.notify_invalidated();
    }

    /// Remove every piece and pending en passant.
    pub fn clear(&mut self) {
        self.squares.iter_mut().for_each(|slot| *slot = None);
        self.en_passant = EnPassantState::default();
        if self.reflecting {
            if let Some(observer) = self.observer.as_mut() {
                observer.cleared();
            }
        }
    }

    pub fn reset_to_standard(&mut self) {
        self.clear();
        self.pause_reflection();
        self.place_standard_armies();
        self.resume_and_reflect();
    }

    pub fn set_observer(&mut self, observer: Box<dyn BoardObserver>) {
        self.observer = Some(observer);
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn BoardObserver>> {
        self.observer.take()
    }

    /// Stop forwarding changes to the observer.
    pub fn pause_reflection(&mut self) {
        self.reflecting = false;
    }

    pub fn resume_reflection(&mut self) {
        self.reflecting = true;
    }

    /// Resume forwarding and ask the observer for a full redraw.
    pub fn resume_and_reflect(&mut self) {
        self.reflecting = true;
        self.notify_invalidated();
    }

    fn notify_invalidated(&mut self) {
        if self.reflecting {
            if let Some(observer) = self.observer.as_mut() {
                observer.invalidated();
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("placement", &self.placement())
            .field("en_passant", &self.en_passant)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}
