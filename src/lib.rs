//! threes-solver: an exact solver for Threes on a 2x3 grid
//!
//! This crate provides:
//! - A compact `Board` type with slide/place mechanics and a canonical index (`engine`)
//! - `Action`, the tagged slide/place transition (`action`)
//! - The exhaustive before/after-state value tables and their lookup (`solver`)
//! - Policies and a random tile dealer that consume the same primitives (`policy`, `arena`)
//! - A text query protocol (`query`) and a binary episode trace format (`trace`)
//!
//! Quick start:
//! ```
//! use threes_solver::engine::{Board, Move};
//!
//! let b0 = Board::from_ranks([0, 0, 1, 0, 0, 2], 3);
//! let (b1, reward) = b0.slide(Move::Up).unwrap();
//! assert_eq!(b1.ranks(), [0, 0, 3, 0, 0, 0]);
//! assert_eq!(reward, 3);
//! assert_eq!(b1.hint(), 3);
//! ```
//!
//! Solver quick start (the fill takes a while, so this is not run as a doctest)
//! ```no_run
//! use threes_solver::engine::Board;
//! use threes_solver::solver::{Solver, StateType};
//!
//! let solver = Solver::new().expect("fill");
//! let b = Board::from_ranks([0, 0, 0, 0, 2, 0], 1);
//! println!("{}", solver.solve(b, StateType::Before));
//! println!("{:?}", solver.best_move(b));
//! ```
//!
pub mod action;
pub mod arena;
pub mod engine;
pub mod policy;
pub mod query;
pub mod solver;
pub mod trace;
