//! Direction tables and small coordinate helpers shared by the geometry
//! queries, the legality arbiter, and disambiguation.

use crate::board_model::king_rays::KingRays;
use crate::board_model::square::Square;

/// `(d_file, d_rank)` per ray: up, down, left, right, then the diagonals
/// up-left, up-right, down-left, down-right.
pub const RAY_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
];

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

pub const DIAGONAL: [(i8, i8); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Shared coordinate of two squares on the same line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    ByFile,
    ByRank,
}

/// The square `d_file`/`d_rank` away from `from`.
#[inline]
pub fn square_at(from: Square, d_file: i8, d_rank: i8) -> Option<Square> {
    from.offset(d_file, d_rank)
}

/// Walk from `from` (exclusive) in one direction until the board edge.
pub fn walk(from: Square, (d_file, d_rank): (i8, i8)) -> impl Iterator<Item = Square> {
    std::iter::successors(from.offset(d_file, d_rank), move |square| {
        square.offset(d_file, d_rank)
    })
}

/// The eight rays from `king_square`, geometry only.
pub fn calculate_king_aligned_rays(king_square: Square) -> KingRays {
    KingRays::from_square(king_square)
}

pub fn king_neighbours(square: Square) -> impl Iterator<Item = Square> {
    RAY_DIRECTIONS
        .iter()
        .filter_map(move |(d_file, d_rank)| square.offset(*d_file, *d_rank))
}

pub fn knight_jumps(square: Square) -> impl Iterator<Item = Square> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(move |(d_file, d_rank)| square.offset(*d_file, *d_rank))
}

/// Squares strictly between `a` and `b` when they share a rank, file, or
/// diagonal; `None` when they are not aligned.
pub fn squares_between(a: Square, b: Square) -> Option<Vec<Square>> {
    if a == b {
        return None;
    }
    let d_file = b.file() as i8 - a.file() as i8;
    let d_rank = b.rank() as i8 - a.rank() as i8;
    let aligned = d_file == 0 || d_rank == 0 || d_file.abs() == d_rank.abs();
    if !aligned {
        return None;
    }
    let step = (d_file.signum(), d_rank.signum());
    Some(walk(a, step).take_while(|square| *square != b).collect())
}

/// Whether `a` and `b` share a file or a rank.
pub fn association_sideways(a: Square, b: Square) -> Option<Association> {
    if a.file() == b.file() {
        Some(Association::ByFile)
    } else if a.rank() == b.rank() {
        Some(Association::ByRank)
    } else {
        None
    }
}

/// How many of `others` share `square`'s file or rank.
pub fn count_along(square: Square, association: Association, others: &[Square]) -> usize {
    others
        .iter()
        .filter(|other| match association {
            Association::ByFile => other.file() == square.file(),
            Association::ByRank => other.rank() == square.rank(),
        })
        .count()
}

/// The shortest coordinate of `mover` that tells it apart from `other`: the
/// file letter when files differ, else the rank digit.
pub fn unique_between(mover: Square, other: Square) -> Option<char> {
    if mover.file() != other.file() {
        Some(mover.file_char())
    } else if mover.rank() != other.rank() {
        Some(mover.rank_char())
    } else {
        None
    }
}
