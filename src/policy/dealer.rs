use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::engine::{placement_cells, Board, Move, Rank, Reward, CELLS};
use crate::solver::TileBag;

/// Random tile environment.
///
/// Tiles come out of a [`TileBag`] (each of 1, 2, 3 once per three draws) and
/// are announced one placement ahead through the board's hint. After a slide
/// the tile lands on a random open cell on the side the slide moved away from.
pub struct TileDealer {
    rng: StdRng,
    bag: TileBag,
}

impl TileDealer {
    pub fn new(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed), bag: TileBag::FULL } }

    /// Start an episode: one tile anywhere on an empty board, and the hint for the next.
    ///
    /// Returns the board, the cell and rank placed, and the placement reward.
    pub fn open(&mut self) -> (Board, usize, Rank, Reward) {
        self.bag = TileBag::FULL;
        let tile = self.draw();
        let hint = self.draw();
        let pos = self.rng.gen_range(0..CELLS);
        // an empty board accepts any rank-1..3 placement
        let (board, reward) = Board::EMPTY.place(pos, tile).unwrap_or((Board::EMPTY, 0));
        (board.with_hint(hint), pos, tile, reward)
    }

    /// Place the hinted tile after a slide in `last` and draw the next hint.
    ///
    /// `None` if no eligible cell is open (the slide was not legal).
    pub fn place(&mut self, board: Board, last: Move) -> Option<(Board, usize, Reward)> {
        let tile = board.hint();
        let open: Vec<usize> = placement_cells(last).iter().copied().filter(|&pos| board.rank(pos) == Some(0)).collect();
        let &pos = open.choose(&mut self.rng)?;
        let (placed, reward) = board.place(pos, tile)?;
        let next = self.draw();
        Some((placed.with_hint(next), pos, reward))
    }

    /// Tiles left in the current cycle.
    #[inline]
    pub fn bag(&self) -> TileBag { self.bag }

    fn draw(&mut self) -> Rank {
        let tiles: Vec<Rank> = self.bag.tiles().collect();
        let tile = tiles.choose(&mut self.rng).copied().unwrap_or(1);
        self.bag = self.bag.take(tile);
        tile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open() {
        let mut dealer = TileDealer::new(5);
        for _ in 0..20 {
            let (b, pos, tile, reward) = dealer.open();
            assert_eq!(b.count_empty(), CELLS - 1);
            assert_eq!(b.rank(pos), Some(tile));
            assert_ne!(b.hint(), tile);
            assert_eq!(reward, if tile == 3 { 3 } else { 0 });
            assert_eq!(dealer.bag().len(), 1);
        }
    }

    #[test]
    fn test_place_respects_side() {
        let mut dealer = TileDealer::new(11);
        let (b, _, _, _) = dealer.open();
        for dir in Move::ALL {
            let Some((after, _)) = b.slide(dir) else { continue };
            let (placed, pos, _) = dealer.place(after, dir).unwrap();
            assert!(placement_cells(dir).contains(&pos));
            assert_eq!(placed.rank(pos), Some(after.hint()));
            assert!((1..=3).contains(&placed.hint()));
        }
    }

    #[test]
    fn test_draws_cycle_through_bag() {
        let mut dealer = TileDealer::new(1);
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(dealer.draw());
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(dealer.bag(), TileBag::FULL);
    }

    #[test]
    fn test_place_without_room() {
        let mut dealer = TileDealer::new(2);
        let full = Board::from_ranks([1, 1, 1, 1, 1, 1], 2);
        assert!(dealer.place(full, Move::Left).is_none());
    }
}
