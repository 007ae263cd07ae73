//! Move policies that play against the tile dealer.
//!
//! Every policy implements [`Policy`]; the arena only needs that capability.
//! - [`RandomPolicy`]: a uniformly random legal slide (seeded).
//! - [`ScriptedPolicy`]: the first legal slide from a fixed priority list.
//! - [`SolverPolicy`]: the slide with the best exact expected score.
//!
//! ```
//! use threes_solver::engine::Board;
//! use threes_solver::policy::{Policy, ScriptedPolicy};
//!
//! let b = Board::from_ranks([0, 0, 1, 0, 0, 0], 2);
//! let mut p = ScriptedPolicy::default();
//! assert!(p.choose(b).is_some());
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::{Board, Move};
use crate::solver::Solver;

mod dealer;

pub use dealer::TileDealer;

/// Chooses the player's slide for a before-state.
pub trait Policy {
    fn name(&self) -> &str;

    /// A legal slide for `board`, or `None` when the game is over.
    fn choose(&mut self, board: Board) -> Option<Move>;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn name(&self) -> &str { (**self).name() }
    fn choose(&mut self, board: Board) -> Option<Move> { (**self).choose(board) }
}

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str { "random" }

    fn choose(&mut self, board: Board) -> Option<Move> {
        let mut dirs = Move::ALL;
        dirs.shuffle(&mut self.rng);
        dirs.into_iter().find(|&dir| board.slide(dir).is_some())
    }
}

pub struct ScriptedPolicy {
    order: Vec<Move>,
}

impl ScriptedPolicy {
    /// Directions are tried in `order`; missing ones are never played.
    pub fn new(order: Vec<Move>) -> Self { Self { order } }
}

impl Default for ScriptedPolicy {
    fn default() -> Self { Self::new(vec![Move::Left, Move::Down, Move::Right, Move::Up]) }
}

impl Policy for ScriptedPolicy {
    fn name(&self) -> &str { "scripted" }

    fn choose(&mut self, board: Board) -> Option<Move> {
        self.order.iter().copied().find(|&dir| board.slide(dir).is_some())
    }
}

/// Plays the solver's best move, falling back to the first legal slide for
/// positions outside the tables.
pub struct SolverPolicy<'a> {
    solver: &'a Solver,
}

impl<'a> SolverPolicy<'a> {
    pub fn new(solver: &'a Solver) -> Self { Self { solver } }
}

impl Policy for SolverPolicy<'_> {
    fn name(&self) -> &str { "solver" }

    fn choose(&mut self, board: Board) -> Option<Move> {
        self.solver.best_move(board).or_else(|| board.legal_moves().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{self, StateType};

    #[test]
    fn test_policies_stay_legal() {
        let b = Board::from_ranks([0, 1, 0, 2, 0, 0], 3);
        let mut policies: Vec<Box<dyn Policy>> = vec![
            Box::new(RandomPolicy::new(3)),
            Box::new(ScriptedPolicy::default()),
            Box::new(SolverPolicy::new(solver::shared())),
        ];
        for p in policies.iter_mut() {
            for _ in 0..8 {
                let dir = p.choose(b).unwrap();
                assert!(b.slide(dir).is_some(), "{} chose illegal {}", p.name(), dir);
            }
        }
    }

    #[test]
    fn test_game_over_yields_none() {
        let stuck = Board::from_ranks([1, 1, 1, 1, 1, 1], 1);
        assert_eq!(RandomPolicy::new(0).choose(stuck), None);
        assert_eq!(ScriptedPolicy::default().choose(stuck), None);
        assert_eq!(SolverPolicy::new(solver::shared()).choose(stuck), None);
    }

    #[test]
    fn test_scripted_order() {
        let b = Board::from_ranks([1, 0, 0, 0, 0, 0], 2);
        // left is blocked, down is next
        assert_eq!(ScriptedPolicy::default().choose(b), Some(Move::Down));
        assert_eq!(ScriptedPolicy::new(vec![Move::Up]).choose(b), None);
    }

    #[test]
    fn test_random_is_seeded() {
        let b = Board::from_ranks([0, 1, 0, 0, 2, 0], 1);
        let a: Vec<_> = (0..16).scan(RandomPolicy::new(9), |p, _| p.choose(b)).collect();
        let c: Vec<_> = (0..16).scan(RandomPolicy::new(9), |p, _| p.choose(b)).collect();
        assert_eq!(a, c);
    }

    #[test]
    fn test_solver_policy_matches_tables() {
        let solver = solver::shared();
        let b = Board::from_ranks([0, 0, 0, 0, 3, 0], 1);
        let dir = SolverPolicy::new(solver).choose(b).unwrap();
        let best = solver.solve(b, StateType::Before);
        let chosen = solver.branch_values(b)[dir.opcode()].answer;
        assert_eq!(chosen.avg, best.avg);
    }
}
