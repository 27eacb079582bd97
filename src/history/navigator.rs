//! Walks the board along a [`MoveRepo`] with cached undo/redo diffs.
//!
//! The navigator owns the link between "plies on the board" and "cursor in
//! the repository". A ply is executed once; afterwards its [`BoardHistory`]
//! is replayed in either direction. A failed walk is rolled back so the board
//! and the cursor keep agreeing.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::board_model::board::Board;
use crate::errors::NavigationError;
use crate::execution::board_history::BoardHistory;
use crate::execution::move_executor::execute;
use crate::history::move_repo::{MoveRepo, RepoEvent};
use crate::legality::arbiter::Arbiter;

#[derive(Debug, Default)]
pub struct HistoryNavigator {
    entries: BTreeMap<usize, BoardHistory>,
    /// Plies currently on the board.
    applied: usize,
    last_error: Option<NavigationError>,
}

/// Plies on the board when the cursor points at `index`.
const fn plies_for(index: Option<usize>) -> usize {
    match index {
        Some(index) => index + 1,
        None => 0,
    }
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied_plies(&self) -> usize {
        self.applied
    }

    pub fn cached_plies(&self) -> usize {
        self.entries.len()
    }

    pub fn history_for(&self, index: usize) -> Option<&BoardHistory> {
        self.entries.get(&index)
    }

    /// Reason the last navigation was refused, if any.
    pub fn last_error(&self) -> Option<&NavigationError> {
        self.last_error.as_ref()
    }

    /// Consume the repository journal. Overridden and reloaded moves take
    /// their cached diffs with them, after the board has been walked back
    /// below them.
    pub fn sync(&mut self, repo: &mut MoveRepo, board: &mut Board) -> Result<(), NavigationError> {
        for event in repo.drain_events() {
            match event {
                RepoEvent::MoveOverridden(index) => {
                    self.rewind_to(index.min(self.applied), board)?;
                    let dropped = self.entries.split_off(&index);
                    debug!(index, dropped = dropped.len(), "dropped overridden plies");
                }
                RepoEvent::Invalidated => {
                    self.rewind_to(0, board)?;
                    self.entries.clear();
                    debug!("history invalidated");
                }
                RepoEvent::MoveAdded(_) | RepoEvent::IndexSet(_) | RepoEvent::ModeChanged(_) => {}
            }
        }
        Ok(())
    }

    /// Show the position after move `target` (`None`: the starting position)
    /// and point the repository cursor there.
    ///
    /// Returns `false` when some move on the way cannot be played; the board
    /// and cursor are then left where they were and [`Self::last_error`]
    /// says why.
    pub fn go_to(
        &mut self,
        target: Option<usize>,
        repo: &mut MoveRepo,
        arbiter: &Arbiter,
        board: &mut Board,
    ) -> bool {
        match self.try_go_to(target, repo, arbiter, board) {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(err) => {
                warn!(target = ?target, error = %err, "navigation refused");
                self.last_error = Some(err);
                false
            }
        }
    }

    pub fn go_back(&mut self, repo: &mut MoveRepo, arbiter: &Arbiter, board: &mut Board) -> bool {
        match repo.current_index() {
            Some(index) => self.go_to(index.checked_sub(1), repo, arbiter, board),
            None => false,
        }
    }

    pub fn go_ahead(&mut self, repo: &mut MoveRepo, arbiter: &Arbiter, board: &mut Board) -> bool {
        let next = plies_for(repo.current_index());
        if next >= repo.move_count() {
            return false;
        }
        self.go_to(Some(next), repo, arbiter, board)
    }

    /// Play an already executed ply on top of the board and cache it.
    pub fn record_and_apply(&mut self, history: BoardHistory, board: &mut Board) -> Result<(), NavigationError> {
        if history.move_index != self.applied {
            return Err(NavigationError::OutOfOrder {
                expected: self.applied,
                got: history.move_index,
            });
        }
        history.redo(board).map_err(|source| NavigationError::Move {
            index: history.move_index,
            source,
        })?;
        self.entries.insert(history.move_index, history);
        self.applied += 1;
        Ok(())
    }

    fn try_go_to(
        &mut self,
        target: Option<usize>,
        repo: &mut MoveRepo,
        arbiter: &Arbiter,
        board: &mut Board,
    ) -> Result<(), NavigationError> {
        self.sync(repo, board)?;
        let plies = plies_for(target);
        if plies > repo.move_count() {
            return Err(NavigationError::OutOfRange {
                target: plies,
                count: repo.move_count(),
            });
        }

        let start = self.applied;
        if let Err(err) = self.walk_to(plies, repo, arbiter, board) {
            if let Err(rollback) = self.walk_to(start, repo, arbiter, board) {
                warn!(error = %rollback, "rollback failed; board no longer matches the cursor");
            }
            return Err(err);
        }

        repo.set_index_at(target).map_err(|_| NavigationError::OutOfRange {
            target: plies,
            count: repo.move_count(),
        })?;
        // The cursor change was ours; nothing to react to.
        repo.drain_events();
        Ok(())
    }

    fn walk_to(
        &mut self,
        plies: usize,
        repo: &MoveRepo,
        arbiter: &Arbiter,
        board: &mut Board,
    ) -> Result<(), NavigationError> {
        self.rewind_to(plies, board)?;
        while self.applied < plies {
            let index = self.applied;
            if !self.entries.contains_key(&index) {
                let meta = match repo.meta_at(index) {
                    Some(parsed) => parsed.map_err(|source| NavigationError::Notation { index, source })?,
                    None => return Err(NavigationError::MissingHistory(index)),
                };
                let history =
                    execute(arbiter, &meta, board).map_err(|source| NavigationError::Move { index, source })?;
                self.entries.insert(index, history);
            }
            let entry = self.entries.get(&index).ok_or(NavigationError::MissingHistory(index))?;
            entry.redo(board).map_err(|source| NavigationError::Move { index, source })?;
            self.applied += 1;
        }
        Ok(())
    }

    fn rewind_to(&mut self, plies: usize, board: &mut Board) -> Result<(), NavigationError> {
        while self.applied > plies {
            let index = self.applied - 1;
            let entry = self.entries.get(&index).ok_or(NavigationError::MissingHistory(index))?;
            entry.undo(board).map_err(|source| NavigationError::Move { index, source })?;
            self.applied -= 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::HistoryNavigator;
    use crate::board_model::board::Board;
    use crate::errors::NavigationError;
    use crate::execution::move_executor::{execute, play_tokens};
    use crate::history::move_repo::{MoveRepo, RepoMode};
    use crate::legality::arbiter::Arbiter;
    use crate::notation::move_parser::analyze;
    use crate::notation::token_stream::{index_to_color, split_moves};

    const RUY_LOPEZ: &str = "e4, e5, Nf3, Nc6, Bb5";

    fn replayed(stream: &str, plies: usize) -> Board {
        let arbiter = Arbiter::new();
        let mut board = Board::standard();
        let moves = split_moves(stream);
        play_tokens(&arbiter, &moves[..plies], &mut board).expect("replay should succeed");
        board
    }

    struct Fixture {
        arbiter: Arbiter,
        board: Board,
        repo: MoveRepo,
        navigator: HistoryNavigator,
    }

    impl Fixture {
        fn new(mode: RepoMode, stream: &str) -> Self {
            Self {
                arbiter: Arbiter::new(),
                board: Board::standard(),
                repo: MoveRepo::new(mode, stream).expect("repo should build"),
                navigator: HistoryNavigator::new(),
            }
        }

        fn go_to(&mut self, target: Option<usize>) -> bool {
            self.navigator
                .go_to(target, &mut self.repo, &self.arbiter, &mut self.board)
        }
    }

    #[test]
    fn jumps_back_and_forth() {
        let mut fx = Fixture::new(RepoMode::ReadOnly, RUY_LOPEZ);
        let steps = [
            (Some(1), true, Some(1)),
            (None, true, None),
            (Some(5), false, None),
            (Some(0), true, Some(0)),
            (Some(4), true, Some(4)),
            (Some(2), true, Some(2)),
            (Some(4), true, Some(4)),
            (None, true, None),
        ];
        for (target, expected, cursor) in steps {
            assert_eq!(fx.go_to(target), expected, "go_to({target:?})");
            assert_eq!(fx.repo.current_index(), cursor);
            let plies = cursor.map_or(0, |index| index + 1);
            assert_eq!(fx.navigator.applied_plies(), plies);
            assert_eq!(fx.board.placement(), replayed(RUY_LOPEZ, plies).placement());
        }
        assert_eq!(fx.navigator.cached_plies(), 5);
        assert!(fx.navigator.last_error().is_none());
    }

    #[test]
    fn step_by_step() {
        let mut fx = Fixture::new(RepoMode::ReadOnly, "d4, d5");
        let Fixture { arbiter, board, repo, navigator } = &mut fx;
        assert!(!navigator.go_back(repo, arbiter, board));
        assert!(navigator.go_ahead(repo, arbiter, board));
        assert!(navigator.go_ahead(repo, arbiter, board));
        assert!(!navigator.go_ahead(repo, arbiter, board));
        assert_eq!(repo.current_index(), Some(1));
        assert!(navigator.go_back(repo, arbiter, board));
        assert!(navigator.go_back(repo, arbiter, board));
        assert_eq!(repo.current_index(), None);
        assert_eq!(board.placement(), Board::standard().placement());
    }

    #[test]
    fn failed_walk_is_rolled_back() {
        let mut fx = Fixture::new(RepoMode::Growing, "e4, e5, Nf3, Ke3");
        assert!(fx.go_to(Some(0)));
        let before = fx.board.placement();

        assert!(!fx.go_to(Some(3)));
        assert_eq!(fx.repo.current_index(), Some(0));
        assert_eq!(fx.navigator.applied_plies(), 1);
        assert_eq!(fx.board.placement(), before);
        assert!(matches!(
            fx.navigator.last_error(),
            Some(NavigationError::Move { index: 3, .. })
        ));

        assert!(fx.go_to(Some(2)));
        assert_eq!(fx.board.placement(), replayed("e4, e5, Nf3", 3).placement());
    }

    #[test]
    fn unparsable_move_is_reported_with_its_index() {
        let mut fx = Fixture::new(RepoMode::Growing, "e4, Zz9");
        assert!(!fx.go_to(Some(1)));
        assert!(matches!(
            fx.navigator.last_error(),
            Some(NavigationError::Notation { index: 1, .. })
        ));
        assert_eq!(fx.board.placement(), Board::standard().placement());
    }

    #[test]
    fn override_drops_stale_plies() {
        let mut fx = Fixture::new(RepoMode::Growing, RUY_LOPEZ);
        assert!(fx.go_to(Some(4)));
        assert_eq!(fx.navigator.cached_plies(), 5);

        fx.repo.override_at("d4", 2).expect("override should apply");
        fx.navigator
            .sync(&mut fx.repo, &mut fx.board)
            .expect("sync should rewind");
        assert_eq!(fx.navigator.applied_plies(), 2);
        assert_eq!(fx.navigator.cached_plies(), 2);
        assert_eq!(fx.board.placement(), replayed(RUY_LOPEZ, 2).placement());

        assert!(fx.go_to(Some(2)));
        assert_eq!(fx.board.placement(), replayed("e4, e5, d4", 3).placement());
    }

    #[test]
    fn reload_rewinds_to_the_start() {
        let mut fx = Fixture::new(RepoMode::Growing, RUY_LOPEZ);
        assert!(fx.go_to(Some(3)));
        fx.repo.reload("c4, e5").expect("reload should apply");
        assert!(fx.go_to(Some(1)));
        assert_eq!(fx.board.placement(), replayed("c4, e5", 2).placement());
        assert_eq!(fx.navigator.cached_plies(), 2);
    }

    #[test]
    fn recorded_plies_must_come_in_order() {
        let arbiter = Arbiter::new();
        let mut board = Board::standard();
        let mut navigator = HistoryNavigator::new();
        let meta = analyze("Nc6", index_to_color(1), 1).expect("Nc6 should parse");
        let history = execute(&arbiter, &meta, &board).expect("Nc6 resolves on the start board");
        assert_eq!(
            navigator.record_and_apply(history, &mut board),
            Err(NavigationError::OutOfOrder { expected: 0, got: 1 })
        );

        let meta = analyze("e4", index_to_color(0), 0).expect("e4 should parse");
        let history = execute(&arbiter, &meta, &board).expect("e4 is legal");
        navigator
            .record_and_apply(history, &mut board)
            .expect("first ply records");
        assert_eq!(navigator.applied_plies(), 1);
        assert!(navigator.history_for(0).is_some());
    }

    const ITALIAN: &str = "e4, e5, Nf3, Nc6, Bc4, Bc5, c3, Nf6, d4, exd4, cxd4, Bb4+, Bd2, Bxd2+";

    proptest! {
        #[test]
        fn random_walks_match_a_fresh_replay(
            targets in proptest::collection::vec(proptest::option::of(0usize..14), 1..12)
        ) {
            let mut fx = Fixture::new(RepoMode::ReadOnly, ITALIAN);
            for target in targets {
                prop_assert!(fx.go_to(target));
                let plies = target.map_or(0, |index| index + 1);
                let expected = replayed(ITALIAN, plies);
                prop_assert_eq!(fx.board.placement(), expected.placement());
                prop_assert_eq!(fx.board.en_passant_state(), expected.en_passant_state());
            }
        }
    }
}
