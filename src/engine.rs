use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A direction to slide tiles, in opcode order (`Up = 0` .. `Left = 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Move {
    /// All four directions in opcode order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    #[inline]
    pub fn opcode(self) -> usize { self as usize }

    #[inline]
    pub fn from_opcode(op: usize) -> Option<Move> { Move::ALL.get(op).copied() }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Right => "right",
            Move::Down => "down",
            Move::Left => "left",
        };
        f.write_str(name)
    }
}

impl FromStr for Move {
    type Err = ParseBoardError;

    /// Accepts an opcode digit (`0..=3`) or a direction name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "up" | "u" => Ok(Move::Up),
            "1" | "right" | "r" => Ok(Move::Right),
            "2" | "down" | "d" => Ok(Move::Down),
            "3" | "left" | "l" => Ok(Move::Left),
            _ => Err(ParseBoardError::Direction(s.to_string())),
        }
    }
}

pub const ROWS: usize = 2;
pub const COLS: usize = 3;
pub const CELLS: usize = ROWS * COLS;

/// Ranks at or above this cannot be encoded into a table index.
pub const MAX_TILE: Rank = 9;

/// Size of the encodable index range: `MAX_TILE ^ CELLS` (9^6).
pub const MAX_INDEX: usize = 531_441;

/// Face value for each rank: 0 (empty), 1, 2, 3, 6, 12, ...
pub const VALUE_TABLE: [u32; 15] = [0, 1, 2, 3, 6, 12, 24, 48, 96, 192, 384, 768, 1536, 3072, 6144];

const CELL_BITS: u32 = 4;
const CELL_MASK: BoardRaw = 0x00ff_ffff;
const HINT_SHIFT: u32 = 24;

/// Packed storage for a [`Board`].
pub type BoardRaw = u32;
/// Tile rank stored in a cell (0 = empty).
pub type Rank = u8;
/// Score gained by a legal action.
pub type Reward = u32;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("expected 6 cells, found {0}")]
    CellCount(usize),
    #[error("not a tile value: {0}")]
    Value(String),
    #[error("invalid hint: {0}")]
    Hint(String),
    #[error("invalid direction: {0}")]
    Direction(String),
}

/// Packed 2x3 Threes board: six 4-bit rank nibbles plus the hint nibble, in a `u32`.
///
/// Cells are numbered row-major, cell 0 in the most significant nibble:
///
/// ```text
/// (0) (1) (2)
/// (3) (4) (5)
/// ```
///
/// The hint is the rank of the tile that will be placed next. It rides along
/// with the board but is not part of the grid: slides never touch it. Compare
/// [`Board::grid`] to ignore it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board with no hint.
    pub const EMPTY: Board = Board(0);

    /// Borrow the raw packed `u32` for this `Board`.
    #[inline]
    pub fn raw(&self) -> BoardRaw { self.0 }

    /// Build a board from per-cell ranks (row-major) and a hint.
    ///
    /// ```
    /// use threes_solver::engine::Board;
    /// let b = Board::from_ranks([1, 2, 0, 0, 0, 3], 2);
    /// assert_eq!(b.rank(5), Some(3));
    /// assert_eq!(b.hint(), 2);
    /// ```
    pub fn from_ranks(ranks: [Rank; CELLS], hint: Rank) -> Self {
        ranks
            .iter()
            .enumerate()
            .fold(Board::EMPTY.with_hint(hint), |b, (pos, &r)| b.with_rank(pos, r))
    }

    /// Per-cell ranks, row-major.
    pub fn ranks(self) -> [Rank; CELLS] {
        let mut out = [0; CELLS];
        for (pos, slot) in out.iter_mut().enumerate() {
            *slot = self.cell(pos);
        }
        out
    }

    /// Rank stored at `pos`, or `None` past the last cell.
    #[inline]
    pub fn rank(self, pos: usize) -> Option<Rank> { (pos < CELLS).then(|| self.cell(pos)) }

    #[inline]
    fn cell(self, pos: usize) -> Rank {
        debug_assert!(pos < CELLS);
        ((self.0 >> shift_of(pos)) & 0xf) as Rank
    }

    #[inline]
    fn with_rank(self, pos: usize, rank: Rank) -> Self {
        debug_assert!(rank < 16);
        let shift = shift_of(pos);
        Board((self.0 & !(0xf << shift)) | ((rank as BoardRaw & 0xf) << shift))
    }

    /// Rank of the tile that will be placed next (0 if unset).
    #[inline]
    pub fn hint(self) -> Rank { (self.0 >> HINT_SHIFT) as Rank & 0xf }

    /// Return a copy of this board carrying `hint`.
    #[inline]
    pub fn with_hint(self, hint: Rank) -> Self {
        Board((self.0 & CELL_MASK) | ((hint as BoardRaw & 0xf) << HINT_SHIFT))
    }

    /// The grid without its hint.
    #[inline]
    pub fn grid(self) -> Board { Board(self.0 & CELL_MASK) }

    /// Put `tile` (rank 1, 2 or 3) on the empty cell `pos`.
    ///
    /// Returns the new board and the reward (3 when placing a 3, else 0), or
    /// `None` if `pos` is out of range, the cell is occupied, or `tile` is not
    /// a placeable rank. `self` is left untouched.
    ///
    /// ```
    /// use threes_solver::engine::Board;
    /// let (b, reward) = Board::EMPTY.place(4, 3).unwrap();
    /// assert_eq!((b.rank(4), reward), (Some(3), 3));
    /// assert!(b.place(4, 1).is_none());
    /// ```
    pub fn place(self, pos: usize, tile: Rank) -> Option<(Board, Reward)> {
        if pos >= CELLS || !(1..=3).contains(&tile) || self.cell(pos) != 0 {
            return None;
        }
        let reward = if tile == 3 { 3 } else { 0 };
        Some((self.with_rank(pos, tile), reward))
    }

    /// Slide every line toward `dir`, merging compatible neighbours.
    ///
    /// Returns the new board and the sum of merge rewards, or `None` when the
    /// move leaves the grid unchanged. The hint is carried over as is.
    ///
    /// ```
    /// use threes_solver::engine::{Board, Move};
    /// let b = Board::from_ranks([1, 2, 0, 0, 0, 0], 0);
    /// let (after, reward) = b.slide(Move::Left).unwrap();
    /// assert_eq!(after.ranks(), [3, 0, 0, 0, 0, 0]);
    /// assert_eq!(reward, 3);
    /// assert!(after.slide(Move::Left).is_none());
    /// ```
    pub fn slide(self, dir: Move) -> Option<(Board, Reward)> {
        let mut cells = self.ranks();
        let mut score = 0;
        let mut buf: [Rank; COLS] = [0; COLS];
        for line in lines(dir) {
            let tiles = &mut buf[..line.len()];
            for (slot, &pos) in tiles.iter_mut().zip(line.iter()) {
                *slot = cells[pos];
            }
            score += slide_line(tiles);
            for (&pos, &rank) in line.iter().zip(tiles.iter()) {
                cells[pos] = rank;
            }
        }
        let moved = Board::from_ranks(cells, self.hint());
        if moved.grid() != self.grid() { Some((moved, score)) } else { None }
    }

    /// Mirror left-right.
    pub fn reflect_horizontal(self) -> Self { self.remap(&[2, 1, 0, 5, 4, 3]) }

    /// Mirror top-bottom.
    pub fn reflect_vertical(self) -> Self { self.remap(&[3, 4, 5, 0, 1, 2]) }

    /// Rotate by 180 degrees. Quarter turns would change the grid to 3x2.
    pub fn rotate_half(self) -> Self { self.reflect_horizontal().reflect_vertical() }

    fn remap(self, from: &[usize; CELLS]) -> Self {
        let ranks = self.ranks();
        let mut out = [0; CELLS];
        for (pos, &src) in from.iter().enumerate() {
            out[pos] = ranks[src];
        }
        Board::from_ranks(out, self.hint())
    }

    /// Fixed-radix (base [`MAX_TILE`]) index of the grid, cell 0 most significant.
    ///
    /// `None` when any cell holds a rank of [`MAX_TILE`] or more.
    ///
    /// ```
    /// use threes_solver::engine::Board;
    /// let b = Board::from_ranks([0, 0, 0, 0, 1, 2], 3);
    /// assert_eq!(b.index(), Some(11));
    /// assert_eq!(Board::from_index(11, 3), Some(b));
    /// ```
    pub fn index(self) -> Option<usize> {
        self.ranks().iter().try_fold(0usize, |acc, &r| {
            (r < MAX_TILE).then(|| acc * MAX_TILE as usize + r as usize)
        })
    }

    /// Inverse of [`Board::index`].
    pub fn from_index(index: usize, hint: Rank) -> Option<Board> {
        if index >= MAX_INDEX {
            return None;
        }
        let mut ranks = [0; CELLS];
        let mut rest = index;
        for slot in ranks.iter_mut().rev() {
            *slot = (rest % MAX_TILE as usize) as Rank;
            rest /= MAX_TILE as usize;
        }
        Some(Board::from_ranks(ranks, hint))
    }

    /// Count the number of empty cells.
    pub fn count_empty(self) -> usize { self.ranks().iter().filter(|&&r| r == 0).count() }

    /// Highest rank on the grid.
    pub fn max_rank(self) -> Rank { self.ranks().into_iter().max().unwrap_or(0) }

    /// Directions that change the grid.
    pub fn legal_moves(self) -> impl Iterator<Item = Move> {
        Move::ALL.into_iter().filter(move |&dir| self.slide(dir).is_some())
    }

    /// Return true if no slide changes the grid.
    pub fn is_game_over(self) -> bool { self.legal_moves().next().is_none() }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#09x})", self.0)
    }
}

/// Six face values separated by spaces, then `+hint` (`+x` without a hint).
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, &rank) in self.ranks().iter().enumerate() {
            if pos > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", rank_to_value(rank))?;
        }
        match self.hint() {
            0 => f.write_str(" +x"),
            h => write!(f, " +{}", h),
        }
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses the [`Display`](fmt::Display) format; the `+hint` token is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let (cells, hint) = match tokens.split_last() {
            Some((last, rest)) if last.starts_with('+') => (rest, parse_hint(last)?),
            _ => (&tokens[..], 0),
        };
        if cells.len() != CELLS {
            return Err(ParseBoardError::CellCount(cells.len()));
        }
        let mut ranks = [0; CELLS];
        for (slot, tok) in ranks.iter_mut().zip(cells) {
            *slot = tok
                .parse::<u32>()
                .ok()
                .and_then(value_to_rank)
                .ok_or_else(|| ParseBoardError::Value(tok.to_string()))?;
        }
        Ok(Board::from_ranks(ranks, hint))
    }
}


/// Parse a `+h` hint token; `+x` means no hint.
pub fn parse_hint(tok: &str) -> Result<Rank, ParseBoardError> {
    let body = tok.strip_prefix('+').ok_or_else(|| ParseBoardError::Hint(tok.to_string()))?;
    match body {
        "x" => Ok(0),
        "1" => Ok(1),
        "2" => Ok(2),
        "3" => Ok(3),
        _ => Err(ParseBoardError::Hint(tok.to_string())),
    }
}

/// Face value of a rank; ranks past the table saturate to the last entry.
#[inline]
pub fn rank_to_value(rank: Rank) -> u32 {
    VALUE_TABLE[(rank as usize).min(VALUE_TABLE.len() - 1)]
}

/// Rank of a face value, if it is one.
pub fn value_to_rank(value: u32) -> Option<Rank> {
    VALUE_TABLE.iter().position(|&v| v == value).map(|r| r as Rank)
}

/// Cells eligible for the placement that follows a slide in `last`: the side
/// of the grid the slide moved away from.
pub fn placement_cells(last: Move) -> &'static [usize] {
    match last {
        Move::Up => &[3, 4, 5],
        Move::Right => &[0, 3],
        Move::Down => &[0, 1, 2],
        Move::Left => &[2, 5],
    }
}

#[inline]
fn shift_of(pos: usize) -> u32 {
    debug_assert!(pos < CELLS);
    (CELLS - 1 - pos) as u32 * CELL_BITS
}

/// Cell positions of each line, ordered from the wall `dir` slides toward.
fn lines(dir: Move) -> &'static [&'static [usize]] {
    match dir {
        Move::Left => &[&[0, 1, 2], &[3, 4, 5]],
        Move::Right => &[&[2, 1, 0], &[5, 4, 3]],
        Move::Up => &[&[0, 3], &[1, 4], &[2, 5]],
        Move::Down => &[&[3, 0], &[4, 1], &[5, 2]],
    }
}

/// Rank produced by merging `moving` into `hold`, if they are compatible.
#[inline]
fn merge(hold: Rank, moving: Rank) -> Option<Rank> {
    if hold >= 3 && hold == moving {
        Some(hold + 1)
    } else if hold + moving == 3 && hold != 0 && moving != 0 {
        Some(3)
    } else {
        None
    }
}

/// Score for creating a tile of `rank` by a merge: 3^(rank - 2).
#[inline]
fn merge_reward(rank: Rank) -> Reward { 3u32.pow(rank.saturating_sub(2) as u32) }

/// Slide one line toward index 0. Each tile moves at most one cell.
fn slide_line(line: &mut [Rank]) -> Reward {
    let mut score = 0;
    for c in 1..line.len() {
        let (tile, hold) = (line[c], line[c - 1]);
        if tile == 0 {
            continue;
        }
        if hold == 0 {
            line[c - 1] = tile;
            line[c] = 0;
        } else if let Some(merged) = merge(hold, tile) {
            score += merge_reward(merged);
            line[c - 1] = merged;
            line[c] = 0;
        }
    }
    score
}
