//! Line protocol for solver queries.
//!
//! A query is the six face values of a grid, the hint as `+h`, and the state
//! type `b` (before) or `a` (after), optionally followed by the last slide
//! for after-states:
//!
//! ```text
//! 0 1 0 0 0 0 +2 b
//! 0 0 1 0 0 3 +1 a right
//! ```
//!
//! The reply echoes the query and appends ` = min avg max`, or ` = -1` when
//! the solver has no answer.

use std::fmt;
use std::str::FromStr;

use crate::engine::{parse_hint, Board, Move, ParseBoardError, CELLS};
use crate::solver::{Answer, Solver, StateType};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty query")]
    Empty,
    #[error(transparent)]
    Board(#[from] ParseBoardError),
    #[error("expected state type 'b' or 'a', got {0:?}")]
    StateType(String),
    #[error("unexpected trailing input: {0:?}")]
    Trailing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub board: Board,
    pub state: StateType,
}

impl Query {
    pub fn answer(&self, solver: &Solver) -> Answer { solver.solve(self.board, self.state) }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(QueryError::Empty);
        }
        if tokens.len() < CELLS + 2 {
            return Err(ParseBoardError::CellCount(tokens.len().min(CELLS)).into());
        }
        let board: Board = tokens[..CELLS].join(" ").parse()?;
        let hint = parse_hint(tokens[CELLS])?;
        let board = board.with_hint(hint);

        let rest = &tokens[CELLS + 2..];
        let state = match (tokens[CELLS + 1], rest) {
            ("b", []) => StateType::Before,
            ("a", []) => StateType::After(None),
            ("a", [dir]) => StateType::After(Some(dir.parse()?)),
            ("b", _) | ("a", _) => return Err(QueryError::Trailing(rest.join(" "))),
            (other, _) => return Err(QueryError::StateType(other.to_string())),
        };
        Ok(Query { board, state })
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            StateType::Before => write!(f, "{} b", self.board),
            StateType::After(None) => write!(f, "{} a", self.board),
            StateType::After(Some(dir)) => write!(f, "{} a {}", self.board, dir),
        }
    }
}

/// Parse one line and format the reply.
pub fn answer_line(solver: &Solver, line: &str) -> Result<String, QueryError> {
    let query: Query = line.parse()?;
    Ok(format!("{} = {}", query, query.answer(solver)))
}
