use crate::board::{Board, BoardError};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Difficulty level of a carved puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of givens left on the board after carving: the difficulty's
    /// fill fraction applied to all 81 cells, rounded down.
    pub fn givens(self) -> usize {
        let fraction = match self {
            Difficulty::Easy => 0.5,
            Difficulty::Medium => 0.2,
            Difficulty::Hard => 0.1,
        };
        (81.0 * fraction) as usize
    }

    /// All difficulty levels, easiest first.
    pub fn all_levels() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Randomized backtracking board generator.
///
/// Fills empty (or partially filled) boards into fully consistent solutions
/// and carves solved boards into puzzles. No uniqueness guarantee: a carved
/// puzzle may admit more than one solution.
pub struct Generator {
    rng: StdRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a puzzle: a fully solved board carved down to the
    /// difficulty's given count.
    pub fn generate(&mut self, difficulty: Difficulty) -> Board {
        let mut board = Board::new();
        let filled = self.fill_solved(&mut board);
        debug_assert!(filled, "an empty board always has a solution");
        self.carve(&mut board, difficulty);
        board
    }

    /// Complete every empty cell of `board` with backtracking, leaving
    /// filled cells untouched. Returns false if no consistent completion
    /// exists; the recursion unwinds its own placements on the way out, so
    /// the board is back in its starting state when that happens.
    pub fn fill_solved(&mut self, board: &mut Board) -> bool {
        self.fill_from(board, 0, 0)
    }

    fn fill_from(&mut self, board: &mut Board, row: usize, col: usize) -> bool {
        // Past the last cell: the whole board is consistent.
        if row == 9 {
            return true;
        }
        let (next_row, next_col) = if col == 8 { (row + 1, 0) } else { (row, col + 1) };

        if board.cell(row, col) != 0 {
            return self.fill_from(board, next_row, next_col);
        }

        let mut digits: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        digits.shuffle(&mut self.rng);

        for &digit in &digits {
            if board.is_consistent(row, col, digit) {
                board.set_cell(row, col, digit);
                if self.fill_from(board, next_row, next_col) {
                    return true;
                }
                // Undo before trying the next digit
                board.set_cell(row, col, 0);
            }
        }

        false
    }

    /// Fill every cell with a uniformly random digit 1-9, ignoring
    /// consistency. Produces a deliberately conflicting board for
    /// negative-path testing and demos.
    pub fn fill_random(&mut self, board: &mut Board) {
        for row in 0..9 {
            for col in 0..9 {
                board.set_cell(row, col, self.rng.gen_range(1..=9));
            }
        }
    }

    /// Fill only the empty cells with uniformly random digits, keeping the
    /// rest as they are.
    pub fn fill_random_empty(&mut self, board: &mut Board) {
        for row in 0..9 {
            for col in 0..9 {
                if board.cell(row, col) == 0 {
                    board.set_cell(row, col, self.rng.gen_range(1..=9));
                }
            }
        }
    }

    /// Blank a randomized subset of cells so that exactly
    /// `difficulty.givens()` remain filled.
    pub fn carve(&mut self, board: &mut Board, difficulty: Difficulty) {
        let mut positions: Vec<(usize, usize)> = (0..9)
            .flat_map(|row| (0..9).map(move |col| (row, col)))
            .collect();
        positions.shuffle(&mut self.rng);

        let to_blank = 81 - difficulty.givens();
        for &(row, col) in positions.iter().take(to_blank) {
            board.set_cell(row, col, 0);
        }
        debug!(
            "carved {} board: {} givens left",
            difficulty,
            board.filled_count()
        );
    }

    /// Complete the current partial board, preserving its givens. All or
    /// nothing: if backtracking cannot extend the board to a full consistent
    /// solution, the board is restored to its pre-call state exactly and
    /// [`BoardError::Unsolvable`] is returned.
    pub fn complete_preserving_givens(&mut self, board: &mut Board) -> Result<(), BoardError> {
        let snapshot = board.clone();
        if self.fill_solved(board) {
            Ok(())
        } else {
            *board = snapshot;
            debug!("completion failed, board restored");
            Err(BoardError::Unsolvable)
        }
    }
}
