//! Sudoku.
//!
//! Candidates are filled-in copies of a puzzle. The puzzle's givens are
//! "static" cells: they are recorded in a mask shared by every candidate and
//! no operator may change them.

use crate::error::ProblemError;
use crate::ga::{FitnessDirection, GeneticProblem};
use crate::random::chance;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Side length of the grid.
pub const SIZE: usize = 9;
/// Side length of a block.
const BLOCK: usize = 3;

type Grid = [[u8; SIZE]; SIZE];
type Mask = [[bool; SIZE]; SIZE];

/// A 9×9 grid of digits `0..=9` (0 = unfilled) with a fixed set of static
/// cells.
#[derive(Debug, Clone)]
pub struct SudokuBoard {
    cells: Grid,
    fixed: Arc<Mask>,
}

impl SudokuBoard {
    /// Builds a puzzle: every non-zero cell becomes static.
    pub fn from_puzzle(cells: Grid) -> Result<Self, ProblemError> {
        for (r, row) in cells.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value > 9 {
                    return Err(ProblemError::InvalidCandidate(format!(
                        "cell ({r}, {c}) holds {value}, expected 0..=9"
                    )));
                }
            }
        }
        let mut fixed = [[false; SIZE]; SIZE];
        for r in 0..SIZE {
            for c in 0..SIZE {
                fixed[r][c] = cells[r][c] != 0;
            }
        }
        Ok(Self {
            cells,
            fixed: Arc::new(fixed),
        })
    }

    /// Parses 81 cells from text, row by row.
    ///
    /// Digits `1`–`9` are givens, `0` or `.` is blank; whitespace and `|`,
    /// `-`, `+` separators are ignored.
    pub fn parse(text: &str) -> Result<Self, ProblemError> {
        let mut values = Vec::with_capacity(SIZE * SIZE);
        for ch in text.chars() {
            match ch {
                '.' | '0' => values.push(0),
                '1'..='9' => values.push(ch as u8 - b'0'),
                c if c.is_whitespace() || matches!(c, '|' | '-' | '+') => {}
                other => {
                    return Err(ProblemError::InvalidCandidate(format!(
                        "unexpected character {other:?} in puzzle"
                    )))
                }
            }
        }
        if values.len() != SIZE * SIZE {
            return Err(ProblemError::InvalidCandidate(format!(
                "puzzle has {} cells, expected {}",
                values.len(),
                SIZE * SIZE
            )));
        }
        let mut cells = [[0u8; SIZE]; SIZE];
        for (i, value) in values.into_iter().enumerate() {
            cells[i / SIZE][i % SIZE] = value;
        }
        Self::from_puzzle(cells)
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn is_static(&self, row: usize, col: usize) -> bool {
        self.fixed[row][col]
    }

    /// Writes `value` into a non-static cell.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), ProblemError> {
        if self.fixed[row][col] {
            return Err(ProblemError::InvalidCandidate(format!(
                "cell ({row}, {col}) is static"
            )));
        }
        if value > 9 {
            return Err(ProblemError::InvalidCandidate(format!(
                "{value} is not a sudoku digit"
            )));
        }
        self.cells[row][col] = value;
        Ok(())
    }

    pub fn cells(&self) -> &Grid {
        &self.cells
    }

    /// Number of static cells.
    pub fn givens(&self) -> usize {
        self.fixed.iter().flatten().filter(|&&f| f).count()
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v != 0)
    }

    pub fn is_solved(&self) -> bool {
        self.is_complete() && self.conflicts() == 0
    }

    /// Duplicate count.
    ///
    /// For every filled cell, counts the other cells in its row, its column
    /// and its block holding the same digit. Unfilled cells are skipped.
    pub fn conflicts(&self) -> usize {
        let mut conflicts = 0;
        for row in 0..SIZE {
            for col in 0..SIZE {
                let value = self.cells[row][col];
                if value == 0 {
                    continue;
                }
                for i in 0..SIZE {
                    if i != row && self.cells[i][col] == value {
                        conflicts += 1;
                    }
                    if i != col && self.cells[row][i] == value {
                        conflicts += 1;
                    }
                }
                let (r0, c0) = (row / BLOCK * BLOCK, col / BLOCK * BLOCK);
                for r in r0..r0 + BLOCK {
                    for c in c0..c0 + BLOCK {
                        if (r, c) != (row, col) && self.cells[r][c] == value {
                            conflicts += 1;
                        }
                    }
                }
            }
        }
        conflicts
    }

    fn same_givens(&self, other: &SudokuBoard) -> bool {
        Arc::ptr_eq(&self.fixed, &other.fixed) || *self.fixed == *other.fixed
    }
}

impl PartialEq for SudokuBoard {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells && self.same_givens(other)
    }
}

impl Eq for SudokuBoard {}

impl fmt::Display for SudokuBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 && r % BLOCK == 0 {
                writeln!(f, "------+-------+------")?;
            }
            for (c, &value) in row.iter().enumerate() {
                if c > 0 && c % BLOCK == 0 {
                    write!(f, " |")?;
                }
                if c > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, ".")?;
                } else {
                    write!(f, "{value}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fill in a Sudoku puzzle. Fitness is [`SudokuBoard::conflicts`], minimized.
#[derive(Debug, Clone)]
pub struct SudokuProblem {
    puzzle: SudokuBoard,
}

impl SudokuProblem {
    /// Fails if the givens already contradict each other.
    pub fn new(puzzle: SudokuBoard) -> Result<Self, ProblemError> {
        let clashes = puzzle.conflicts();
        if clashes > 0 {
            return Err(ProblemError::Unsatisfiable(format!(
                "puzzle givens contain {clashes} conflicts"
            )));
        }
        Ok(Self { puzzle })
    }

    pub fn puzzle(&self) -> &SudokuBoard {
        &self.puzzle
    }

    fn check(&self, board: &SudokuBoard) -> Result<(), ProblemError> {
        if !self.puzzle.same_givens(board) {
            return Err(ProblemError::InvalidCandidate(
                "board does not share this puzzle's static cells".into(),
            ));
        }
        Ok(())
    }
}

impl GeneticProblem for SudokuProblem {
    type Candidate = SudokuBoard;

    fn direction(&self) -> FitnessDirection {
        FitnessDirection::Minimize
    }

    /// The puzzle with every non-static cell set to a random digit.
    fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<SudokuBoard, ProblemError> {
        self.mutate(&self.puzzle, 1.0, rng)
    }

    /// The rectangle of rows `0..=r`, columns `0..=c` from `parent_a`, every
    /// other cell from `parent_b`.
    fn crossover<R: Rng>(
        &self,
        parent_a: &SudokuBoard,
        parent_b: &SudokuBoard,
        rng: &mut R,
    ) -> Result<SudokuBoard, ProblemError> {
        self.check(parent_a)?;
        self.check(parent_b)?;

        let split_row = rng.random_range(0..SIZE);
        let split_col = rng.random_range(0..SIZE);
        let mut child = parent_b.clone();
        for r in 0..=split_row {
            for c in 0..=split_col {
                child.cells[r][c] = parent_a.cells[r][c];
            }
        }
        Ok(child)
    }

    fn mutate<R: Rng>(
        &self,
        board: &SudokuBoard,
        rate: f64,
        rng: &mut R,
    ) -> Result<SudokuBoard, ProblemError> {
        self.check(board)?;

        let mut mutated = board.clone();
        for r in 0..SIZE {
            for c in 0..SIZE {
                if !mutated.fixed[r][c] && chance(rng, rate) {
                    mutated.cells[r][c] = rng.random_range(1..=9);
                }
            }
        }
        Ok(mutated)
    }

    fn fitness(&self, board: &SudokuBoard) -> f64 {
        board.conflicts() as f64
    }
}
