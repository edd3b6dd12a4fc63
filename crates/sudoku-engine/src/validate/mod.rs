//! Validation engine.
//!
//! One generic partition-dispatch-reduce pipeline serves all three
//! strategies: the work is split into independent unit tasks, each task runs
//! on its own thread against the immutably borrowed board, and the
//! coordinator joins every handle before folding the per-task reports into a
//! single verdict. Tasks never share mutable state, so no lock guards the
//! statistics. A run cannot be cancelled; the caller blocks until every task
//! has reported.

mod background;
mod report;
mod scope;

use crate::board::Board;
use log::debug;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Instant;

pub(crate) use background::BackgroundValidation;
pub use report::{ValidationOutcome, ValidationStats};
pub(crate) use report::{reduce, TaskReport};

/// How to decompose a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// One worker thread scans the whole board with remove-then-recheck.
    Sequential,
    /// 11 tasks: all rows, all columns, and one per 3x3 block.
    Split11,
    /// 27 tasks: one per row, per column, and per block.
    Split27,
}

impl Strategy {
    /// Number of concurrent tasks this strategy dispatches.
    pub fn task_count(self) -> u32 {
        match self {
            Strategy::Sequential => 1,
            Strategy::Split11 => 11,
            Strategy::Split27 => 27,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Split11 => write!(f, "11-way"),
            Strategy::Split27 => write!(f, "27-way"),
        }
    }
}

/// Run a full validation of `board` under `strategy`, blocking until every
/// dispatched task has reported.
pub(crate) fn run(board: &Board, strategy: Strategy) -> ValidationOutcome {
    let started = Instant::now();
    let tasks = scope::partition(strategy);

    let reports: Vec<TaskReport> = thread::scope(|s| {
        let handles: Vec<_> = tasks
            .iter()
            .map(|task| s.spawn(move || scope::run_task(board, task)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("validation task panicked"))
            .collect()
    });

    let outcome = reduce(reports, started.elapsed(), strategy.task_count());
    debug!(
        "{} validation: {} ({} cells, {} conflicts, {} incomplete, {:?})",
        strategy,
        if outcome.valid { "valid" } else { "invalid" },
        outcome.stats.cells_checked,
        outcome.stats.conflicts,
        outcome.stats.incomplete_units,
        outcome.stats.elapsed
    );
    outcome
}

/// Sequential validation executed directly on the calling thread. The
/// background worker uses this so the whole mode costs exactly one thread
/// in addition to the caller that spawned it.
pub(crate) fn run_on_current_thread(board: &Board) -> ValidationOutcome {
    let started = Instant::now();
    let report = scope::run_task(board, &scope::Task::WholeBoard);
    reduce([report], started.elapsed(), 1)
}
