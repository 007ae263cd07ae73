//! Exact value solver for the 2x3 Threes variant.
//!
//! [`Solver::new`] explores the whole game tree once, from every possible
//! opening placement, and memoizes two kinds of node:
//! - before-states (player to slide), keyed by `(grid index, hint)`;
//! - after-states (tile to be placed), keyed by `(grid index, hint, last move)`.
//!
//! After construction the tables are read-only; [`Solver::solve`] is a plain
//! lookup and never explores.
//!
//! Quick start
//! ```no_run
//! use threes_solver::engine::Board;
//! use threes_solver::solver::{Solver, StateType};
//!
//! let solver = Solver::new().expect("fill");
//! let board = Board::from_ranks([1, 0, 0, 0, 0, 0], 2);
//! let answer = solver.solve(board, StateType::Before);
//! assert!(!answer.is_none() && answer.avg >= 0.0);
//! ```

use std::time::Duration;

use crate::engine::{Board, Move, Reward};

mod answer;
mod bag;
mod search;
mod table;

pub use answer::{Answer, Value};
pub use bag::TileBag;

use table::{AfterTable, BeforeTable};

/// Which node kind a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateType {
    /// The player is about to slide.
    Before,
    /// A tile is about to be placed after a slide. Supply the slide when known.
    After(Option<Move>),
}

/// Solver knobs.
///
/// - `scan_after_directions`: for `StateType::After(None)`, return the first
///   populated entry across the four last-directions instead of the sentinel.
///   This only fits callers that cannot know the last slide (such as the text
///   query protocol); the answer may belong to a different history.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub scan_after_directions: bool,
}

impl Default for SolverConfig {
    fn default() -> Self { Self { scan_after_directions: true } }
}

/// Counters from the fill phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillStats {
    pub before_nodes: u64,
    pub after_nodes: u64,
    pub elapsed: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum SolverError {
    #[error("board {0} is outside the encodable range")]
    Unencodable(Board),
}

/// Value of one slide from a before-state: the slide's reward plus the
/// after-state answer.
#[derive(Debug, Clone, Copy)]
pub struct BranchValue {
    pub dir: Move,
    pub reward: Reward,
    pub answer: Answer,
    pub legal: bool,
}

/// Owns the transposition tables and answers queries from them.
pub struct Solver {
    cfg: SolverConfig,
    before: BeforeTable,
    after: AfterTable,
    stats: FillStats,
}

impl Solver {
    pub fn new() -> Result<Self, SolverError> { Self::with_config(SolverConfig::default()) }

    /// Allocate the tables and run the full fill.
    pub fn with_config(cfg: SolverConfig) -> Result<Self, SolverError> {
        let mut solver = Self {
            cfg,
            before: BeforeTable::new(),
            after: AfterTable::new(),
            stats: FillStats::default(),
        };
        solver.fill()?;
        Ok(solver)
    }

    /// Statistics collected during construction.
    #[inline]
    pub fn stats(&self) -> FillStats { self.stats }

    /// Look up the memoized answer for `board` (its hint included).
    ///
    /// Returns [`Answer::NONE`] for grids with a rank at or above
    /// [`MAX_TILE`](crate::engine::MAX_TILE), for a hint outside 1..=3, and for
    /// positions the fill never reached.
    pub fn solve(&self, board: Board, state: StateType) -> Answer {
        let Some((index, hint)) = table::key(board) else {
            return Answer::NONE;
        };
        match state {
            StateType::Before => self.before.get(index, hint),
            StateType::After(Some(last)) => self.after.get(index, hint, last),
            StateType::After(None) if self.cfg.scan_after_directions => Move::ALL
                .into_iter()
                .map(|last| self.after.get(index, hint, last))
                .find(|a| !a.is_none())
                .unwrap_or(Answer::NONE),
            StateType::After(None) => Answer::NONE,
        }
    }

    /// Per-direction values for a before-state, in opcode order.
    ///
    /// Illegal slides are marked `legal = false` with a sentinel answer.
    pub fn branch_values(&self, board: Board) -> [BranchValue; 4] {
        Move::ALL.map(|dir| match board.slide(dir) {
            Some((after, reward)) => BranchValue {
                dir,
                reward,
                answer: self.solve(after, StateType::After(Some(dir))).shifted(reward as Value),
                legal: true,
            },
            None => BranchValue { dir, reward: 0, answer: Answer::NONE, legal: false },
        })
    }

    /// Legal slide with the highest expected score, if the position is known.
    pub fn best_move(&self, board: Board) -> Option<Move> {
        self.branch_values(board)
            .iter()
            .filter(|b| b.legal && !b.answer.is_none())
            .max_by(|a, b| a.answer.avg.partial_cmp(&b.answer.avg).unwrap_or(std::cmp::Ordering::Equal))
            .map(|b| b.dir)
    }

    /// Number of populated `(before, after)` entries.
    pub fn filled(&self) -> (usize, usize) { (self.before.filled(), self.after.filled()) }
}

/// One solver per test binary; the fill is the expensive part.
#[cfg(test)]
pub(crate) fn shared() -> &'static Solver {
    use std::sync::OnceLock;
    static SOLVER: OnceLock<Solver> = OnceLock::new();
    SOLVER.get_or_init(|| Solver::new().expect("fill must stay within the encodable range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{placement_cells, MAX_TILE};

    #[test]
    fn test_seeded_board_has_answer() {
        let solver = shared();
        for pos in 0..6 {
            for tile in 1..=3 {
                for hint in (1..=3).filter(|&h| h != tile) {
                    let (b, _) = Board::EMPTY.with_hint(hint).place(pos, tile).unwrap();
                    let a = solver.solve(b, StateType::Before);
                    assert!(!a.is_none(), "no answer for {}", b);
                    assert!(a.avg.is_finite() && a.avg >= 0.0);
                    assert!(a.min <= a.avg && a.avg <= a.max);
                }
            }
        }
    }

    #[test]
    fn test_single_tile_hint_two() {
        let a = shared().solve(Board::from_ranks([1, 0, 0, 0, 0, 0], 2), StateType::Before);
        assert!(!a.is_none());
        assert!(a.avg >= 0.0);
    }

    #[test]
    fn test_out_of_range_is_sentinel() {
        let solver = shared();
        let big = Board::from_ranks([MAX_TILE, 1, 0, 0, 0, 0], 1);
        for hint in 0..=3 {
            let b = big.with_hint(hint);
            assert!(solver.solve(b, StateType::Before).is_none());
            assert!(solver.solve(b, StateType::After(None)).is_none());
            for dir in Move::ALL {
                assert!(solver.solve(b, StateType::After(Some(dir))).is_none());
            }
        }
        let no_hint = Board::from_ranks([1, 0, 0, 0, 0, 0], 0);
        assert!(solver.solve(no_hint, StateType::Before).is_none());
    }

    #[test]
    fn test_unreached_is_sentinel() {
        // a before-state always holds at least one tile
        assert!(shared().solve(Board::EMPTY.with_hint(1), StateType::Before).is_none());
    }

    #[test]
    fn test_before_dominates_rewards() {
        let solver = shared();
        for (index, hint, answer) in solver.before.iter_filled() {
            let board = Board::from_index(index, hint as u8 + 1).unwrap();
            let best_reward = board.legal_moves().filter_map(|d| board.slide(d)).map(|(_, r)| r).max().unwrap_or(0);
            assert!(answer.avg >= best_reward as Value, "{} avg {} < {}", board, answer.avg, best_reward);
        }
    }

    #[test]
    fn test_fill_closure() {
        // Every populated before-state has all its legal after-states, and every
        // populated after-state has at least one populated child per open cell.
        let solver = shared();
        for (index, hint, _) in solver.before.iter_filled() {
            let board = Board::from_index(index, hint as u8 + 1).unwrap();
            for dir in Move::ALL {
                let Some((after, _)) = board.slide(dir) else { continue };
                let a = solver.solve(after, StateType::After(Some(dir)));
                assert!(!a.is_none(), "missing after-state {} ({})", after, dir);
                let placed = after.hint();
                for &pos in placement_cells(dir) {
                    let Some((child, _)) = after.place(pos, placed) else { continue };
                    let known = (1..=3).any(|next| !solver.solve(child.with_hint(next), StateType::Before).is_none());
                    assert!(known, "no child of {} at {}", after, pos);
                }
            }
        }
    }

    #[test]
    fn test_after_is_mean_of_children() {
        // The first seed is [1 0 0 0 0 0] +2 with only a 3 left in the bag, and
        // its first legal slide is Right, so that after-state was computed with
        // the placed 2 on cells 0 and 3 and a next hint of 3 on both branches.
        let solver = shared();
        let seed = Board::from_ranks([1, 0, 0, 0, 0, 0], 2);
        assert!(seed.slide(Move::Up).is_none());
        let (after, reward) = seed.slide(Move::Right).unwrap();
        assert_eq!(reward, 0);
        assert_eq!(after.ranks(), [0, 1, 0, 0, 0, 0]);
        assert_eq!(placement_cells(Move::Right), &[0, 3]);

        let children: Vec<Answer> = placement_cells(Move::Right)
            .iter()
            .map(|&pos| {
                let (child, r) = after.place(pos, after.hint()).unwrap();
                assert_eq!(child.rank(pos), Some(2));
                solver.solve(child.with_hint(3), StateType::Before).shifted(r as Value)
            })
            .collect();
        assert!(children.iter().all(|c| !c.is_none()));

        let got = solver.solve(after, StateType::After(Some(Move::Right)));
        let sum: Value = children.iter().map(|c| c.avg).sum();
        assert_eq!(got.avg, sum / children.len() as Value);
        assert_eq!(got.min, children.iter().map(|c| c.min).fold(Value::INFINITY, Value::min));
        assert_eq!(got.max, children.iter().map(|c| c.max).fold(Value::NEG_INFINITY, Value::max));
    }

    #[test]
    fn test_terminal_is_zero() {
        let solver = shared();
        let stuck = solver
            .before
            .iter_filled()
            .map(|(index, hint, a)| (Board::from_index(index, hint as u8 + 1).unwrap(), a))
            .find(|(b, _)| b.is_game_over());
        let (_, a) = stuck.expect("some reachable position is terminal");
        assert_eq!(a, Answer::ZERO);
    }

    #[test]
    fn test_after_lookup_modes() {
        let solver = shared();
        let (b, _) = Board::EMPTY.with_hint(1).place(0, 2).unwrap();
        let (after, _) = b.slide(Move::Right).unwrap();
        assert!(!solver.solve(after, StateType::After(Some(Move::Right))).is_none());
        assert!(!solver.solve(after, StateType::After(None)).is_none());

        let mut local = empty_solver();
        let probe = Board::from_ranks([0, 3, 0, 0, 0, 0], 2);
        let (index, hint) = table::key(probe).unwrap();
        local.after.set(index, hint, Move::Down, Answer::new(1.0, 2.0, 3.0));
        assert!(local.solve(probe, StateType::After(Some(Move::Up))).is_none());
        assert_eq!(local.solve(probe, StateType::After(Some(Move::Down))).avg, 2.0);
        assert_eq!(local.solve(probe, StateType::After(None)).avg, 2.0);
        local.cfg.scan_after_directions = false;
        assert!(local.solve(probe, StateType::After(None)).is_none());
    }

    #[test]
    fn test_branch_values_and_best_move() {
        let solver = shared();
        let b = Board::from_ranks([1, 0, 0, 0, 0, 0], 2);
        let branches = solver.branch_values(b);
        assert!(!branches[Move::Left.opcode()].legal);
        assert!(!branches[Move::Up.opcode()].legal);
        assert!(branches[Move::Right.opcode()].legal);
        assert!(branches[Move::Down.opcode()].legal);
        let best = solver.best_move(b).unwrap();
        let top = branches.iter().filter(|x| x.legal).map(|x| x.answer.avg).fold(Value::MIN, Value::max);
        assert_eq!(branches[best.opcode()].answer.avg, top);
        assert_eq!(solver.solve(b, StateType::Before).avg, top);
    }

    #[test]
    fn test_stats() {
        let solver = shared();
        let stats = solver.stats();
        let (before, after) = solver.filled();
        assert_eq!(stats.before_nodes as usize, before);
        assert_eq!(stats.after_nodes as usize, after);
        assert!(before > 0 && after > 0);
    }

    fn empty_solver() -> Solver {
        Solver {
            cfg: SolverConfig::default(),
            before: BeforeTable::new(),
            after: AfterTable::new(),
            stats: FillStats::default(),
        }
    }
}
