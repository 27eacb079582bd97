//! Cached lines radiating from a king.
//!
//! Eight rays in fixed order: up, down, left, right, up-left, up-right,
//! down-left, down-right. Each ray lists squares from the king outward and
//! ends at the board edge; ray boundaries are kept as offsets into one flat
//! buffer instead of sentinel squares.

use crate::board_model::square::Square;
use crate::geometry::rays::RAY_DIRECTIONS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KingRays {
    king: Square,
    squares: Vec<Square>,
    ends: [usize; 8],
}

impl KingRays {
    /// Compute the rays for a king standing on `king`.
    pub fn from_square(king: Square) -> Self {
        let mut rays = Self {
            king,
            squares: Vec::with_capacity(28),
            ends: [0; 8],
        };
        rays.recompute(king);
        rays
    }

    /// Recompute in place, reusing the buffer.
    pub fn recompute(&mut self, king: Square) {
        self.king = king;
        self.squares.clear();
        for (ray, (d_file, d_rank)) in RAY_DIRECTIONS.iter().enumerate() {
            let mut cursor = king.offset(*d_file, *d_rank);
            while let Some(square) = cursor {
                self.squares.push(square);
                cursor = square.offset(*d_file, *d_rank);
            }
            self.ends[ray] = self.squares.len();
        }
    }

    #[inline]
    pub fn king_square(&self) -> Square {
        self.king
    }

    /// Squares of ray `index` (see module docs for the order).
    pub fn ray(&self, index: usize) -> &[Square] {
        let start = if index == 0 { 0 } else { self.ends[index - 1] };
        &self.squares[start..self.ends[index]]
    }

    pub fn rays(&self) -> impl Iterator<Item = &[Square]> + '_ {
        (0..8).map(move |index| self.ray(index))
    }

    /// Index of the ray containing `square`, if any.
    pub fn ray_index_of(&self, square: Square) -> Option<usize> {
        (0..8).find(|&index| self.ray(index).contains(&square))
    }

    /// All squares of the ray that passes through `square`, excluding `square`
    /// itself, on both sides of it.
    pub fn filtered_through(&self, square: Square) -> Vec<Square> {
        match self.ray_index_of(square) {
            Some(index) => self
                .ray(index)
                .iter()
                .copied()
                .filter(|candidate| *candidate != square)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every aligned square, ray by ray.
    pub fn flatten(&self) -> &[Square] {
        &self.squares
    }

    pub(crate) fn copy_from(&mut self, source: &KingRays) {
        self.king = source.king;
        self.squares.clear();
        self.squares.extend_from_slice(&source.squares);
        self.ends = source.ends;
    }
}

#[cfg(test)]
mod tests {
    use super::KingRays;
    use crate::board_model::square::Square;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn corner_king_has_three_populated_rays() {
        let rays = KingRays::from_square(sq("a1"));
        let populated = rays.rays().filter(|ray| !ray.is_empty()).count();
        assert_eq!(populated, 3);
        assert_eq!(rays.flatten().len(), 21);
        assert_eq!(rays.ray(0).first(), Some(&sq("a2")));
        assert_eq!(rays.ray(5).last(), Some(&sq("h8")));
    }

    #[test]
    fn central_king_sees_twenty_seven_squares() {
        let rays = KingRays::from_square(sq("d4"));
        assert_eq!(rays.flatten().len(), 27);
        assert_eq!(rays.ray(2), &[sq("c4"), sq("b4"), sq("a4")]);
        assert_eq!(rays.ray_index_of(sq("g7")), Some(5));
        assert_eq!(rays.ray_index_of(sq("e6")), None);
    }

    #[test]
    fn filtered_ray_drops_the_pivot_square() {
        let rays = KingRays::from_square(sq("e1"));
        let through = rays.filtered_through(sq("e4"));
        assert!(!through.contains(&sq("e4")));
        assert!(through.contains(&sq("e2")));
        assert!(through.contains(&sq("e8")));
        assert_eq!(through.len(), 6);
    }

    #[test]
    fn recompute_reuses_the_buffer() {
        let mut rays = KingRays::from_square(sq("e1"));
        rays.recompute(sq("g1"));
        assert_eq!(rays.king_square(), sq("g1"));
        assert_eq!(rays, KingRays::from_square(sq("g1")));
    }
}
