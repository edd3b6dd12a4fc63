use crate::board::Board;
use crate::validate::report::TaskReport;
use log::debug;
use std::fmt;
use std::time::Instant;

/// One Sudoku constraint scope: a row, a column, or a 3x3 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Row(usize),
    Col(usize),
    Block(usize),
}

impl Scope {
    /// The nine (row, col) coordinates covered by this scope, in scan order.
    fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        let mut cells = [(0usize, 0usize); 9];
        match self {
            Scope::Row(row) => {
                for (col, cell) in cells.iter_mut().enumerate() {
                    *cell = (row, col);
                }
            }
            Scope::Col(col) => {
                for (row, cell) in cells.iter_mut().enumerate() {
                    *cell = (row, col);
                }
            }
            Scope::Block(block) => {
                let base_row = block / 3 * 3;
                let base_col = block % 3 * 3;
                for (i, cell) in cells.iter_mut().enumerate() {
                    *cell = (base_row + i / 3, base_col + i % 3);
                }
            }
        }
        cells.into_iter()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Row(i) => write!(f, "row {}", i),
            Scope::Col(i) => write!(f, "column {}", i),
            Scope::Block(i) => write!(f, "block {}", i),
        }
    }
}

/// The work assigned to one validation task.
#[derive(Debug, Clone)]
pub(crate) enum Task {
    /// Remove-then-recheck over every filled cell of the board.
    WholeBoard,
    /// Linear duplicate scan over a group of scopes.
    Scopes(Vec<Scope>),
}

/// Split the validation work for `strategy` into independent tasks.
pub(crate) fn partition(strategy: super::Strategy) -> Vec<Task> {
    use super::Strategy;
    match strategy {
        Strategy::Sequential => vec![Task::WholeBoard],
        // All rows as one task, all columns as one task, one task per block.
        Strategy::Split11 => {
            let mut tasks = vec![
                Task::Scopes((0..9).map(Scope::Row).collect()),
                Task::Scopes((0..9).map(Scope::Col).collect()),
            ];
            tasks.extend((0..9).map(|block| Task::Scopes(vec![Scope::Block(block)])));
            tasks
        }
        Strategy::Split27 => (0..9)
            .map(Scope::Row)
            .chain((0..9).map(Scope::Col))
            .chain((0..9).map(Scope::Block))
            .map(|scope| Task::Scopes(vec![scope]))
            .collect(),
    }
}

/// Run one task against a read-only board, producing its own report.
pub(crate) fn run_task(board: &Board, task: &Task) -> TaskReport {
    let started = Instant::now();
    let mut report = TaskReport::default();

    match task {
        Task::WholeBoard => scan_whole_board(board, &mut report),
        Task::Scopes(scopes) => {
            for &scope in scopes {
                let complete = scan_scope(board, scope, &mut report);
                // An empty cell invalidates the whole task; stop early.
                if !complete {
                    report.incomplete_units += 1;
                    break;
                }
            }
        }
    }

    report.busy = started.elapsed();
    report
}

/// Scan a single scope with a 10-slot seen-marker, counting duplicates among
/// the digits encountered. Returns false as soon as an empty cell is found;
/// duplicates seen up to that point stay counted.
fn scan_scope(board: &Board, scope: Scope, report: &mut TaskReport) -> bool {
    let mut seen = [false; 10];
    let mut conflicts = 0u32;

    for (row, col) in scope.cells() {
        let value = board.cell(row, col) as usize;
        report.cells_checked += 1;
        if value == 0 {
            debug!("{}: incomplete (empty cell at {}, {})", scope, row, col);
            report.conflicts += conflicts;
            return false;
        }
        if seen[value] {
            conflicts += 1;
        }
        seen[value] = true;
    }

    if conflicts > 0 {
        debug!("{}: {} duplicate(s)", scope, conflicts);
    }
    report.conflicts += conflicts;
    true
}

/// Whole-board sequential check: temporarily clear each filled cell, recheck
/// its value at its own coordinate, restore it. Clearing first keeps the cell
/// from conflicting with itself. The scan always covers every cell, so the
/// conflict count is a total, not a first hit.
fn scan_whole_board(board: &Board, report: &mut TaskReport) {
    let mut scratch = board.clone();
    let mut saw_empty = false;

    for row in 0..9 {
        for col in 0..9 {
            let value = scratch.cell(row, col);
            if value == 0 {
                saw_empty = true;
                continue;
            }
            report.cells_checked += 1;
            scratch.set_cell(row, col, 0);
            if !scratch.is_consistent(row, col, value) {
                debug!("board: {} at ({}, {}) conflicts", value, row, col);
                report.conflicts += 1;
            }
            scratch.set_cell(row, col, value);
        }
    }

    if saw_empty {
        debug!("board: incomplete (at least one empty cell)");
        report.incomplete_units += 1;
    }
}
