//! Run episodes of a [`Policy`] against the [`TileDealer`].

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::engine::{rank_to_value, Board, Reward};
use crate::policy::{Policy, TileDealer};

/// One applied action and the reward it earned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub action: Action,
    pub reward: Reward,
}

/// A complete game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub policy: String,
    pub steps: Vec<Step>,
    pub final_board: Board,
    pub score: u64,
}

impl Episode {
    /// Number of slides played.
    pub fn moves(&self) -> usize { self.steps.iter().filter(|s| s.action.is_slide()).count() }

    /// Face value of the largest tile at the end.
    pub fn highest_tile(&self) -> u32 { rank_to_value(self.final_board.max_rank()) }

    /// Replay the actions from an empty board, returning the final board.
    ///
    /// `None` if any recorded action is illegal. Hints are not recorded, so the
    /// returned board has none.
    pub fn replay(&self) -> Option<Board> {
        self.steps.iter().try_fold(Board::EMPTY, |b, s| s.action.apply(b).map(|(next, _)| next))
    }
}

/// Play until the policy has no legal slide.
///
/// ```
/// use threes_solver::arena::play_episode;
/// use threes_solver::policy::{RandomPolicy, TileDealer};
///
/// let ep = play_episode(&mut RandomPolicy::new(1), &mut TileDealer::new(2));
/// assert!(ep.final_board.is_game_over());
/// assert_eq!(ep.score, ep.steps.iter().map(|s| s.reward as u64).sum::<u64>());
/// ```
pub fn play_episode<P: Policy + ?Sized>(policy: &mut P, dealer: &mut TileDealer) -> Episode {
    let (mut board, pos, tile, reward) = dealer.open();
    let mut steps = vec![Step { action: Action::place(pos, tile), reward }];

    while let Some(dir) = policy.choose(board) {
        let Some((after, reward)) = board.slide(dir) else { break };
        steps.push(Step { action: Action::slide(dir), reward });
        let Some((next, pos, reward)) = dealer.place(after, dir) else {
            board = after;
            break;
        };
        steps.push(Step { action: Action::place(pos, after.hint()), reward });
        board = next;
    }

    let score = steps.iter().map(|s| s.reward as u64).sum();
    Episode { policy: policy.name().to_string(), steps, final_board: board, score }
}

/// Aggregates over many episodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    pub episodes: u64,
    pub total_score: u64,
    pub best_score: u64,
    pub total_moves: u64,
    pub highest_tile: u32,
}

impl Summary {
    pub fn record(&mut self, ep: &Episode) {
        self.episodes += 1;
        self.total_score += ep.score;
        self.best_score = self.best_score.max(ep.score);
        self.total_moves += ep.moves() as u64;
        self.highest_tile = self.highest_tile.max(ep.highest_tile());
    }

    pub fn mean_score(&self) -> f64 {
        if self.episodes == 0 { 0.0 } else { self.total_score as f64 / self.episodes as f64 }
    }
}
