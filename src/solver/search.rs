use std::time::Instant;

use log::{debug, info};

use crate::engine::{placement_cells, Board, Move, CELLS};

use super::answer::{Answer, Value};
use super::bag::TileBag;
use super::table;
use super::{FillStats, Solver, SolverError};

impl Solver {
    /// Seed the tables from every opening placement and recurse to completion.
    pub(super) fn fill(&mut self) -> Result<(), SolverError> {
        let start = Instant::now();
        info!("exploring 2x3 game tree from {} opening placements", CELLS * 6);
        for pos in 0..CELLS {
            for tile in 1..=3 {
                for hint in (1..=3).filter(|&h| h != tile) {
                    let Some((board, _)) = Board::EMPTY.with_hint(hint).place(pos, tile) else { continue };
                    // the opening draw already consumed `tile` and `hint` from the bag
                    let bag = TileBag::FULL.take(tile).take(hint);
                    let value = self.before_value(board, bag)?;
                    debug!("seed {} -> {}", board, value);
                }
            }
        }
        self.stats = FillStats { elapsed: start.elapsed(), ..self.stats };
        info!(
            "fill complete: {} before-states, {} after-states in {:.2}s",
            self.stats.before_nodes,
            self.stats.after_nodes,
            self.stats.elapsed.as_secs_f64()
        );
        Ok(())
    }

    /// Player node: best slide by average, ties keep the first direction.
    fn before_value(&mut self, board: Board, bag: TileBag) -> Result<Answer, SolverError> {
        let (index, hint) = table::key(board).ok_or(SolverError::Unencodable(board))?;
        let cached = self.before.get(index, hint);
        if !cached.is_none() {
            return Ok(cached);
        }

        let mut best: Option<Answer> = None;
        for dir in Move::ALL {
            let Some((after, reward)) = board.slide(dir) else { continue };
            let value = self.after_value(after, bag, dir)?.shifted(reward as Value);
            if best.map_or(true, |b| value.avg > b.avg) {
                best = Some(value);
            }
        }

        let answer = best.unwrap_or(Answer::ZERO);
        self.before.set(index, hint, answer);
        self.stats.before_nodes += 1;
        Ok(answer)
    }

    /// Chance node: the hinted tile lands on an open cell of the vacated side
    /// while the next hint is drawn from the bag, all branches equally likely.
    fn after_value(&mut self, board: Board, bag: TileBag, last: Move) -> Result<Answer, SolverError> {
        let (index, hint) = table::key(board).ok_or(SolverError::Unencodable(board))?;
        let cached = self.after.get(index, hint, last);
        if !cached.is_none() {
            return Ok(cached);
        }

        let bag = bag.refilled();
        let placed = board.hint();
        let mut count = 0u32;
        let mut sum: Value = 0.0;
        let mut min = Value::INFINITY;
        let mut max = Value::NEG_INFINITY;
        for &pos in placement_cells(last) {
            let Some((child, reward)) = board.place(pos, placed) else { continue };
            for next in bag.tiles() {
                let value = self.before_value(child.with_hint(next), bag.take(next))?.shifted(reward as Value);
                min = min.min(value.min);
                max = max.max(value.max);
                sum += value.avg;
                count += 1;
            }
        }

        // a legal slide always opens its trailing edge, so `count` is non-zero
        debug_assert!(count > 0, "no placement after {} ({})", board, last);
        let answer = if count == 0 { Answer::ZERO } else { Answer::new(min, sum / count as Value, max) };
        self.after.set(index, hint, last, answer);
        self.stats.after_nodes += 1;
        Ok(answer)
    }
}
