use crate::board::Board;
use crate::validate::{self, ValidationOutcome};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

/// A sequential validation running on its own worker thread.
///
/// The worker scans a snapshot of the board and publishes its outcome under
/// a mutex, signalling a condition variable so observers can wait for
/// "validation concluded" without participating in the join. At most one
/// run exists per board; [`crate::Game`] retires an outstanding run before
/// mutating the board, starting another run, or dropping.
pub(crate) struct BackgroundValidation {
    slot: Arc<(Mutex<Option<ValidationOutcome>>, Condvar)>,
    handle: JoinHandle<()>,
}

impl BackgroundValidation {
    /// Spawn the worker. The snapshot keeps the run isolated from any
    /// later board mutation.
    pub(crate) fn spawn(snapshot: Board) -> Self {
        let slot = Arc::new((Mutex::new(None), Condvar::new()));
        let worker_slot = Arc::clone(&slot);

        let handle = thread::spawn(move || {
            let outcome = validate::run_on_current_thread(&snapshot);
            let (result, concluded) = &*worker_slot;
            *result.lock().expect("validation result lock poisoned") = Some(outcome);
            concluded.notify_all();
        });

        Self { slot, handle }
    }

    /// True once the worker has published its outcome. Never blocks.
    pub(crate) fn is_finished(&self) -> bool {
        self.slot
            .0
            .lock()
            .expect("validation result lock poisoned")
            .is_some()
    }

    /// Block until the outcome is published, then join the worker.
    pub(crate) fn wait(self) -> ValidationOutcome {
        let outcome = {
            let (result, concluded) = &*self.slot;
            let mut guard = result.lock().expect("validation result lock poisoned");
            while guard.is_none() {
                guard = concluded
                    .wait(guard)
                    .expect("validation result lock poisoned");
            }
            guard.take().expect("outcome published before signal")
        };

        self.handle
            .join()
            .expect("background validation worker panicked");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;

    #[test]
    fn test_background_run_matches_blocking_sequential() {
        let mut board = Board::new();
        assert!(Generator::with_seed(17).fill_solved(&mut board));

        let blocking = validate::run(&board, validate::Strategy::Sequential);
        let background = BackgroundValidation::spawn(board.clone()).wait();

        assert_eq!(background.valid, blocking.valid);
        assert_eq!(background.stats.cells_checked, blocking.stats.cells_checked);
        assert_eq!(background.stats.conflicts, blocking.stats.conflicts);
    }

    #[test]
    fn test_wait_blocks_until_finished() {
        let board = Board::new();
        let run = BackgroundValidation::spawn(board);
        let outcome = run.wait();
        assert!(!outcome.valid, "an empty board is incomplete, never valid");
        assert!(outcome.is_incomplete());
    }
}
