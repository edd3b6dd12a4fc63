use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What one validation task observed. Each task owns its report; the
/// coordinator reduces them after joining, so no shared state is written
/// while tasks run.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TaskReport {
    pub cells_checked: u32,
    pub conflicts: u32,
    pub incomplete_units: u32,
    pub busy: Duration,
}

/// Immutable snapshot of the most recent validation run.
///
/// `cells_checked` counts every cell a task visited. The split strategies
/// cover each cell three times (row, column, and block decompositions all
/// include it), so a complete board reports 243, not 81. Documented
/// behavior, not a bug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Wall-clock time from dispatch to the last join.
    pub elapsed: Duration,
    /// Summed busy time across all tasks.
    pub busy: Duration,
    /// Cells examined across all tasks.
    pub cells_checked: u32,
    /// Duplicate digits found.
    pub conflicts: u32,
    /// Tasks that stopped on an empty cell. Distinct from a conflict: the
    /// unit was not wrong, it was unfinished.
    pub incomplete_units: u32,
    /// Concurrent tasks dispatched for the run.
    pub tasks: u32,
}

/// Verdict of a validation run plus the statistics that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub stats: ValidationStats,
}

impl ValidationOutcome {
    /// True iff the verdict is invalid because some unit saw an empty cell.
    pub fn is_incomplete(&self) -> bool {
        self.stats.incomplete_units > 0
    }

    /// True iff the verdict is invalid because of duplicate digits.
    pub fn has_conflicts(&self) -> bool {
        self.stats.conflicts > 0
    }
}

/// Fold per-task reports into a single outcome. Pure sums and a logical
/// AND, so the result does not depend on task completion order.
pub(crate) fn reduce(
    reports: impl IntoIterator<Item = TaskReport>,
    elapsed: Duration,
    tasks: u32,
) -> ValidationOutcome {
    let mut stats = ValidationStats {
        elapsed,
        tasks,
        ..Default::default()
    };

    for report in reports {
        stats.busy += report.busy;
        stats.cells_checked += report.cells_checked;
        stats.conflicts += report.conflicts;
        stats.incomplete_units += report.incomplete_units;
    }

    ValidationOutcome {
        valid: stats.conflicts == 0 && stats.incomplete_units == 0,
        stats,
    }
}
