use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::{Board, Move, Rank, Reward};

/// A transition applied to a [`Board`]: the player's slide or the environment's placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Slide(Move),
    Place { pos: u8, tile: Rank },
}

impl Action {
    #[inline]
    pub fn slide(dir: Move) -> Self { Action::Slide(dir) }

    /// Positions that do not fit a `u8` are stored as `u8::MAX` and never apply.
    #[inline]
    pub fn place(pos: usize, tile: Rank) -> Self {
        Action::Place { pos: u8::try_from(pos).unwrap_or(u8::MAX), tile }
    }

    /// Apply to `board`, returning the resulting board and the reward.
    ///
    /// `None` marks an illegal action (a slide that changes nothing, or a
    /// placement on a bad cell or with a bad rank); callers should try another
    /// action. `board` itself is a copy and is never modified.
    ///
    /// ```
    /// use threes_solver::action::Action;
    /// use threes_solver::engine::{Board, Move};
    /// let (b, r) = Action::place(0, 2).apply(Board::EMPTY).unwrap();
    /// assert_eq!(r, 0);
    /// assert!(Action::slide(Move::Left).apply(b).is_none());
    /// assert!(Action::slide(Move::Right).apply(b).is_some());
    /// ```
    pub fn apply(self, board: Board) -> Option<(Board, Reward)> {
        match self {
            Action::Slide(dir) => board.slide(dir),
            Action::Place { pos, tile } => board.place(pos as usize, tile),
        }
    }

    #[inline]
    pub fn is_slide(self) -> bool { matches!(self, Action::Slide(_)) }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Slide(dir) => write!(f, "slide {}", dir),
            Action::Place { pos, tile } => write!(f, "place {} at {}", tile, pos),
        }
    }
}

impl From<Move> for Action { fn from(dir: Move) -> Self { Action::Slide(dir) } }
