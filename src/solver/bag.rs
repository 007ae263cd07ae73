use crate::engine::Rank;

const FULL_MASK: u8 = 0b1110;

/// Ranks {1, 2, 3} not yet drawn in the current three-draw cycle, as a bitmask
/// (bit `r` set when rank `r` is still in the bag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileBag(u8);

impl TileBag {
    pub const FULL: TileBag = TileBag(FULL_MASK);

    #[inline]
    pub fn is_empty(self) -> bool { self.0 == 0 }

    #[inline]
    pub fn contains(self, tile: Rank) -> bool { (1..=3).contains(&tile) && self.0 & (1 << tile) != 0 }

    /// Remove `tile`, starting a new cycle if that empties the bag.
    ///
    /// ```
    /// use threes_solver::solver::TileBag;
    /// let bag = TileBag::FULL.take(1).take(3);
    /// assert_eq!(bag.tiles().collect::<Vec<_>>(), vec![2]);
    /// assert_eq!(bag.take(2), TileBag::FULL);
    /// ```
    #[inline]
    pub fn take(self, tile: Rank) -> TileBag {
        let rest = self.0 & !(1u8 << tile);
        TileBag(rest).refilled()
    }

    /// The full bag if this one is empty, else `self`.
    #[inline]
    pub fn refilled(self) -> TileBag { if self.is_empty() { TileBag::FULL } else { self } }

    /// Ranks still in the bag, ascending.
    pub fn tiles(self) -> impl Iterator<Item = Rank> { (1..=3).filter(move |&t| self.contains(t)) }

    pub fn len(self) -> usize { self.0.count_ones() as usize }
}

impl Default for TileBag {
    fn default() -> Self { TileBag::FULL }
}
