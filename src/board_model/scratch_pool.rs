//! Bounded free-list of scratch boards for speculative legality checks.
//!
//! A checkout lives exactly as long as the closure passed to
//! [`ScratchPool::with_scratch`]; the board goes back to the free-list on
//! every exit path, unwinding included. An empty free-list never fails, it
//! allocates. A full free-list drops the returned board.

use std::cell::{Cell, RefCell};

use tracing::trace;

use crate::board_model::board::Board;

/// Counters describing how well the free-list is sized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub requests: u64,
    pub hits: u64,
    pub created: u64,
    pub recycled: u64,
    pub recycle_missed: u64,
}

pub struct ScratchPool {
    free: RefCell<Vec<Board>>,
    capacity: usize,
    stats: Cell<PoolStats>,
}

struct Checkout<'pool> {
    pool: &'pool ScratchPool,
    board: Option<Board>,
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        if let Some(board) = self.board.take() {
            self.pool.release(board);
        }
    }
}

impl ScratchPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: RefCell::new(Vec::with_capacity(capacity)),
            capacity,
            stats: Cell::new(PoolStats::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn idle(&self) -> usize {
        self.free.borrow().len()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats.get()
    }

    /// Run `f` on a scratch copy of `source`.
    pub fn with_scratch<R>(&self, source: &Board, f: impl FnOnce(&mut Board) -> R) -> R {
        let mut checkout = Checkout {
            pool: self,
            board: None,
        };
        let board = checkout.board.insert(self.acquire(source));
        f(board)
    }

    fn acquire(&self, source: &Board) -> Board {
        let recycled = self.free.borrow_mut().pop();
        let mut stats = self.stats.get();
        stats.requests += 1;
        let board = match recycled {
            Some(mut board) => {
                stats.hits += 1;
                board.copy_from(source);
                board
            }
            None => {
                stats.created += 1;
                trace!(created = stats.created, "scratch pool empty, allocating");
                source.snapshot()
            }
        };
        self.stats.set(stats);
        board
    }

    fn release(&self, board: Board) {
        let mut free = self.free.borrow_mut();
        let mut stats = self.stats.get();
        if free.len() < self.capacity {
            free.push(board);
            stats.recycled += 1;
        } else {
            stats.recycle_missed += 1;
        }
        self.stats.set(stats);
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::ScratchPool;
    use crate::board_model::board::Board;
    use crate::board_model::square::Square;

    fn sq(name: &str) -> Square {
        name.parse().expect("test square should parse")
    }

    #[test]
    fn scratch_changes_never_reach_the_source() {
        let pool = ScratchPool::new(2);
        let board = Board::standard();
        let moved = pool.with_scratch(&board, |scratch| scratch.move_piece(sq("e2"), sq("e4")));
        assert!(moved);
        assert!(board.any_piece_on(sq("e2")));
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn recycled_boards_are_refreshed_from_the_new_source() {
        let pool = ScratchPool::new(1);
        let board = Board::standard();
        pool.with_scratch(&board, |scratch| {
            scratch.delete(sq("d1"));
        });
        let queen_back = pool.with_scratch(&board, |scratch| scratch.any_piece_on(sq("d1")));
        assert!(queen_back);
        assert_eq!(pool.stats().hits, 1);
    }

    #[test]
    fn nested_checkouts_fall_back_to_allocation() {
        let pool = ScratchPool::new(1);
        let board = Board::standard();
        pool.with_scratch(&board, |outer| {
            pool.with_scratch(outer, |inner| {
                pool.with_scratch(inner, |_| {});
            });
        });
        let stats = pool.stats();
        assert_eq!(stats.requests, 3);
        assert_eq!(stats.created, 3);
        assert_eq!(stats.recycled, 1);
        assert_eq!(stats.recycle_missed, 2);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn board_returns_to_the_pool_when_the_closure_panics() {
        let pool = ScratchPool::new(2);
        let board = Board::standard();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            pool.with_scratch(&board, |_| panic!("speculative check blew up"));
        }));
        assert!(outcome.is_err());
        assert_eq!(pool.idle(), 1);
    }
}
