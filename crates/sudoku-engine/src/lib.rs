//! Sudoku engine: board generation, mutation, and concurrent validation.
//!
//! The [`Game`] facade owns a 9x9 [`Board`] and exposes the full operation
//! surface: checked cell access, randomized backtracking generation and
//! carving, whole-board completion, and three validation strategies of
//! increasing concurrency: a sequential remove-then-recheck pass, an 11-way
//! decomposition (all rows, all columns, one task per 3x3 block), and a
//! fully parallel 27-way decomposition. Each run blocks until every task
//! reports, then publishes a [`ValidationStats`] snapshot.

mod board;
mod game;
mod generator;
mod validate;

pub use board::{Board, BoardError};
pub use game::{FillMode, Game};
pub use generator::{Difficulty, Generator};
pub use validate::{Strategy, ValidationOutcome, ValidationStats};
