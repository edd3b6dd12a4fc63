use crate::board::{Board, BoardError};
use crate::generator::{Difficulty, Generator};
use crate::validate::{self, BackgroundValidation, Strategy, ValidationOutcome, ValidationStats};
use log::debug;

/// How a fill operation chooses digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Consistent digits via backtracking.
    Solved,
    /// Uniformly random digits, consistency ignored.
    Random,
}

/// A Sudoku game: the board plus the machinery around it, namely the
/// generator, the validation strategies, the last stats snapshot, and at
/// most one outstanding background validation run.
///
/// Every mutating operation and every validation entry point first retires
/// an outstanding background run, so a run always observes the board state
/// it was started with and the board is never mutated or moved out from
/// under it. Dropping the game joins too.
pub struct Game {
    board: Board,
    generator: Generator,
    last_stats: Option<ValidationStats>,
    validation: Option<BackgroundValidation>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create a game with an empty board.
    pub fn new() -> Self {
        Self::with_generator(Generator::new())
    }

    /// Create a game with an empty board and the given generator. Lets
    /// tests inject a deterministic randomness source.
    pub fn with_generator(generator: Generator) -> Self {
        Self {
            board: Board::new(),
            generator,
            last_stats: None,
            validation: None,
        }
    }

    /// Create a game pre-populated with a puzzle carved to `difficulty`.
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        let mut game = Self::new();
        game.new_puzzle(difficulty);
        game
    }

    /// Replace the board with a freshly generated puzzle at `difficulty`.
    pub fn new_puzzle(&mut self, difficulty: Difficulty) {
        self.retire_validation();
        self.board = self.generator.generate(difficulty);
        self.last_stats = None;
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Take the board out of the game, joining any outstanding background
    /// run first so no task is left reading a moved-from board.
    pub fn into_board(mut self) -> Board {
        self.retire_validation();
        std::mem::take(&mut self.board)
    }

    /// Write a cell; 0 clears it. Out-of-range input is refused without
    /// mutating the board.
    pub fn set_value(&mut self, row: usize, col: usize, value: u8) -> Result<(), BoardError> {
        self.retire_validation();
        self.board.set(row, col, value)
    }

    /// Read a cell.
    pub fn value(&self, row: usize, col: usize) -> Result<u8, BoardError> {
        self.board.get(row, col)
    }

    /// True iff no cell is empty.
    pub fn is_complete(&self) -> bool {
        self.board.is_complete()
    }

    /// Refill the whole board from scratch: either a consistent solution
    /// via backtracking, or uniformly random digits.
    pub fn fill_board(&mut self, mode: FillMode) {
        self.retire_validation();
        match mode {
            FillMode::Solved => {
                self.board = Board::new();
                let filled = self.generator.fill_solved(&mut self.board);
                debug_assert!(filled, "an empty board always has a solution");
            }
            FillMode::Random => self.generator.fill_random(&mut self.board),
        }
    }

    /// Complete only the empty cells, preserving the filled ones. In
    /// `Solved` mode the operation is atomic: if no consistent completion
    /// exists the board is left exactly as it was and
    /// [`BoardError::Unsolvable`] is returned.
    pub fn complete_board(&mut self, mode: FillMode) -> Result<(), BoardError> {
        self.retire_validation();
        match mode {
            FillMode::Solved => self.generator.complete_preserving_givens(&mut self.board),
            FillMode::Random => {
                self.generator.fill_random_empty(&mut self.board);
                Ok(())
            }
        }
    }

    /// Validate the board under `strategy`, blocking until every dispatched
    /// task has reported. Updates the last-stats snapshot.
    pub fn validate(&mut self, strategy: Strategy) -> ValidationOutcome {
        self.retire_validation();
        let outcome = validate::run(&self.board, strategy);
        self.last_stats = Some(outcome.stats);
        outcome
    }

    /// Single-pass sequential validation on one worker thread.
    pub fn validate_sequential(&mut self) -> ValidationOutcome {
        self.validate(Strategy::Sequential)
    }

    /// 11-way decomposition: all rows, all columns, one task per block.
    pub fn validate_11_way(&mut self) -> ValidationOutcome {
        self.validate(Strategy::Split11)
    }

    /// 27-way decomposition: one task per row, per column, per block.
    pub fn validate_27_way(&mut self) -> ValidationOutcome {
        self.validate(Strategy::Split27)
    }

    /// Copy of the stats from the most recent validation run, if any.
    pub fn last_stats(&self) -> Option<ValidationStats> {
        self.last_stats
    }

    /// Start a background sequential validation of the current board state.
    /// Any previous run is retired first, so at most one is outstanding.
    pub fn start_validation(&mut self) {
        self.retire_validation();
        self.validation = Some(BackgroundValidation::spawn(self.board.clone()));
    }

    /// True while a background validation run has not yet concluded.
    pub fn is_validating(&self) -> bool {
        self.validation
            .as_ref()
            .is_some_and(|run| !run.is_finished())
    }

    /// Block until the outstanding background run concludes and return its
    /// outcome; `None` if no run was started. Updates the last-stats
    /// snapshot.
    pub fn wait_validation(&mut self) -> Option<ValidationOutcome> {
        let run = self.validation.take()?;
        let outcome = run.wait();
        self.last_stats = Some(outcome.stats);
        debug!(
            "background validation finished: {}",
            if outcome.valid { "valid" } else { "invalid" }
        );
        Some(outcome)
    }

    fn retire_validation(&mut self) {
        if self.validation.is_some() {
            self.wait_validation();
        }
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.retire_validation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_starts_empty() {
        let game = Game::new();
        assert!(!game.is_complete());
        assert_eq!(game.value(0, 0), Ok(0));
        assert!(game.last_stats().is_none());
    }

    #[test]
    fn test_with_difficulty_carves_exact_givens() {
        let game = Game::with_difficulty(Difficulty::Hard);
        assert_eq!(game.board().filled_count(), 8);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut game = Game::new();
        assert!(game.set_value(0, 9, 1).is_err());
        assert!(game.set_value(0, 0, 10).is_err());
        assert_eq!(game.value(0, 0), Ok(0));
    }

    #[test]
    fn test_fill_solved_then_sequential_validation_is_clean() {
        let mut game = Game::with_generator(Generator::with_seed(13));
        game.fill_board(FillMode::Solved);

        assert!(game.is_complete());
        let outcome = game.validate_sequential();
        assert!(outcome.valid);
        assert_eq!(outcome.stats.conflicts, 0);

        let stats = game.last_stats().unwrap();
        assert_eq!(stats.conflicts, 0);
        assert_eq!(stats.tasks, 1);
    }

    #[test]
    fn test_row_duplicate_reported_by_27_way() {
        let mut game = Game::new();
        game.set_value(0, 0, 5).unwrap();
        game.set_value(0, 1, 5).unwrap();

        let outcome = game.validate_27_way();
        assert!(!outcome.valid);
        // The row 0 task sees both fives before its first empty cell, so the
        // conflict is counted even though other units stop as incomplete.
        assert!(outcome.has_conflicts());
        assert!(outcome.is_incomplete());
        assert_eq!(outcome.stats.tasks, 27);
    }

    #[test]
    fn test_all_strategies_agree_via_facade() {
        let mut game = Game::with_generator(Generator::with_seed(23));
        game.fill_board(FillMode::Solved);

        let sequential = game.validate_sequential();
        let split11 = game.validate_11_way();
        let split27 = game.validate_27_way();
        assert!(sequential.valid && split11.valid && split27.valid);
        assert_eq!(split11.stats.cells_checked, 243);
        assert_eq!(split27.stats.cells_checked, 243);
        assert_eq!(split11.stats.tasks, 11);
    }

    #[test]
    fn test_validate_updates_last_stats_snapshot() {
        let mut game = Game::with_generator(Generator::with_seed(29));
        game.fill_board(FillMode::Solved);

        game.validate_11_way();
        let first = game.last_stats().unwrap();
        assert_eq!(first.tasks, 11);

        game.validate_27_way();
        let second = game.last_stats().unwrap();
        assert_eq!(second.tasks, 27);
    }

    #[test]
    fn test_random_fill_modes() {
        let mut game = Game::with_generator(Generator::with_seed(31));
        game.fill_board(FillMode::Random);
        assert!(game.is_complete());

        let mut partial = Game::with_generator(Generator::with_seed(31));
        partial.set_value(3, 3, 7).unwrap();
        partial.complete_board(FillMode::Random).unwrap();
        assert!(partial.is_complete());
        assert_eq!(partial.value(3, 3), Ok(7));
    }

    #[test]
    fn test_unsolvable_completion_leaves_board_untouched() {
        let mut game = Game::with_generator(Generator::with_seed(37));
        // Two identical digits in one row, then enough surrounding structure
        // that the contradiction is reached quickly
        game.fill_board(FillMode::Solved);
        let dup = game.value(2, 0).unwrap();
        game.set_value(2, 1, dup).unwrap();
        for row in 0..9 {
            for col in 0..9 {
                if row != 2 && game.value(row, col).unwrap() == dup {
                    game.set_value(row, col, 0).unwrap();
                }
            }
        }

        let before = game.board().clone();
        assert_eq!(
            game.complete_board(FillMode::Solved),
            Err(BoardError::Unsolvable)
        );
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_background_validation_lifecycle() {
        let mut game = Game::with_generator(Generator::with_seed(41));
        game.fill_board(FillMode::Solved);

        game.start_validation();
        let outcome = game.wait_validation().expect("a run was started");
        assert!(outcome.valid);
        assert!(!game.is_validating());
        assert!(game.last_stats().is_some());

        // No outstanding run: wait returns None
        assert!(game.wait_validation().is_none());
    }

    #[test]
    fn test_background_run_retired_before_mutation() {
        let mut game = Game::with_generator(Generator::with_seed(43));
        game.fill_board(FillMode::Solved);

        game.start_validation();
        // The setter joins the run before touching the board
        game.set_value(0, 0, 0).unwrap();
        assert!(!game.is_validating());
        // The retired run's stats are still published
        assert!(game.last_stats().is_some());
    }

    #[test]
    fn test_start_validation_twice_keeps_one_run() {
        let mut game = Game::with_generator(Generator::with_seed(47));
        game.fill_board(FillMode::Solved);

        game.start_validation();
        game.start_validation();
        assert!(game.wait_validation().is_some());
        assert!(game.wait_validation().is_none());
    }

    #[test]
    fn test_into_board_joins_outstanding_run() {
        let mut game = Game::with_generator(Generator::with_seed(53));
        game.fill_board(FillMode::Solved);
        game.start_validation();

        let board = game.into_board();
        assert!(board.is_complete());
    }

    #[test]
    fn test_drop_with_outstanding_run_is_clean() {
        let mut game = Game::with_generator(Generator::with_seed(59));
        game.fill_board(FillMode::Solved);
        game.start_validation();
        drop(game);
    }
}
