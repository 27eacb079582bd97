//! Pending en-passant opportunities.

use smallvec::SmallVec;

use crate::board_model::piece::Color;
use crate::board_model::square::Square;

/// A pawn that just advanced two squares next to one or two enemy pawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnPasser {
    /// Color allowed to capture.
    pub taker_color: Color,
    /// Square the pawn started from.
    pub before: Square,
    /// Skipped square, where a capturing pawn lands.
    pub intermediate: Square,
    /// Square the pawn stands on now; emptied by the capture.
    pub now: Square,
    /// Enemy pawns able to capture, one or two.
    pub takers: SmallVec<[Square; 2]>,
}

impl EnPasser {
    #[inline]
    pub fn has_taker(&self, square: Square) -> bool {
        self.takers.contains(&square)
    }
}

/// One optional [`EnPasser`] slot per taker color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnPassantState {
    slots: [Option<EnPasser>; 2],
}

impl EnPassantState {
    pub fn for_taker(&self, taker_color: Color) -> Option<&EnPasser> {
        self.slots[taker_color.index()].as_ref()
    }

    /// Store `en_passer` in its taker color's slot, replacing any previous one.
    pub fn store(&mut self, en_passer: EnPasser) {
        let slot = en_passer.taker_color.index();
        self.slots[slot] = Some(en_passer);
    }

    pub fn clear_for(&mut self, taker_color: Color) {
        self.slots[taker_color.index()] = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::{EnPassantState, EnPasser};
    use crate::board_model::piece::Color;
    use crate::board_model::square::Square;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn slots_are_keyed_by_taker_color() {
        let mut state = EnPassantState::default();
        assert!(state.is_empty());

        state.store(EnPasser {
            taker_color: Color::Black,
            before: sq("e2"),
            intermediate: sq("e3"),
            now: sq("e4"),
            takers: smallvec![sq("d4")],
        });
        assert!(state.for_taker(Color::White).is_none());
        let stored = state.for_taker(Color::Black).expect("black may capture");
        assert!(stored.has_taker(sq("d4")));
        assert!(!stored.has_taker(sq("f4")));

        state.clear_for(Color::Black);
        assert!(state.is_empty());
    }
}
