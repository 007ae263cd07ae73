use crate::engine::{Board, Move, Rank, MAX_INDEX};

use super::answer::Answer;

const HINTS: usize = 3;
const DIRS: usize = 4;

/// Table key for a board: its grid index and zero-based hint slot.
///
/// `None` when the grid is not encodable or the hint is not 1, 2 or 3.
#[inline]
pub(crate) fn key(board: Board) -> Option<(usize, usize)> {
    let index = board.index()?;
    hint_slot(board.hint()).map(|h| (index, h))
}

#[inline]
fn hint_slot(hint: Rank) -> Option<usize> {
    (1..=HINTS as Rank).contains(&hint).then(|| hint as usize - 1)
}

/// Dense arena `before[index][hint]`.
pub(crate) struct BeforeTable {
    entries: Box<[Answer]>,
}

impl BeforeTable {
    pub(crate) fn new() -> Self {
        // Allocate on the heap to avoid large stack frames
        Self { entries: vec![Answer::NONE; MAX_INDEX * HINTS].into_boxed_slice() }
    }

    #[inline]
    pub(crate) fn get(&self, index: usize, hint: usize) -> Answer { self.entries[index * HINTS + hint] }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, hint: usize, answer: Answer) {
        self.entries[index * HINTS + hint] = answer;
    }

    pub(crate) fn filled(&self) -> usize { self.entries.iter().filter(|a| !a.is_none()).count() }

    /// Populated entries as `(index, hint slot, answer)`.
    pub(crate) fn iter_filled(&self) -> impl Iterator<Item = (usize, usize, Answer)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.is_none())
            .map(|(slot, &a)| (slot / HINTS, slot % HINTS, a))
    }
}

/// Dense arena `after[index][hint][last direction]`.
pub(crate) struct AfterTable {
    entries: Box<[Answer]>,
}

impl AfterTable {
    pub(crate) fn new() -> Self {
        Self { entries: vec![Answer::NONE; MAX_INDEX * HINTS * DIRS].into_boxed_slice() }
    }

    #[inline]
    fn slot(index: usize, hint: usize, last: Move) -> usize { (index * HINTS + hint) * DIRS + last.opcode() }

    #[inline]
    pub(crate) fn get(&self, index: usize, hint: usize, last: Move) -> Answer {
        self.entries[Self::slot(index, hint, last)]
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, hint: usize, last: Move, answer: Answer) {
        self.entries[Self::slot(index, hint, last)] = answer;
    }

    pub(crate) fn filled(&self) -> usize { self.entries.iter().filter(|a| !a.is_none()).count() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key() {
        let b = Board::from_ranks([0, 0, 0, 0, 0, 1], 2);
        assert_eq!(key(b), Some((1, 1)));
        assert_eq!(key(b.with_hint(0)), None);
        assert_eq!(key(b.with_hint(4)), None);
        assert_eq!(key(Board::from_ranks([9, 0, 0, 0, 0, 0], 1)), None);
    }

    #[test]
    fn test_slots_are_disjoint() {
        let mut before = BeforeTable::new();
        let mut after = AfterTable::new();
        before.set(7, 2, Answer::ZERO);
        after.set(7, 2, Move::Left, Answer::new(1.0, 1.0, 1.0));
        assert!(before.get(7, 1).is_none());
        assert!(before.get(8, 0).is_none());
        assert_eq!(before.get(7, 2), Answer::ZERO);
        assert!(after.get(7, 2, Move::Down).is_none());
        assert_eq!(after.get(7, 2, Move::Left).avg, 1.0);
        assert!(after.get(MAX_INDEX - 1, 2, Move::Left).is_none());
        assert_eq!(before.filled(), 1);
        assert_eq!(after.filled(), 1);
        assert_eq!(before.iter_filled().collect::<Vec<_>>(), vec![(7, 2, Answer::ZERO)]);
    }
}
