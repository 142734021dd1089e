//! N-Queens.
//!
//! A board places one queen per column; the gene for column `c` is the row of
//! its queen. Rows may repeat, so fitness counts both row and diagonal clashes.

use crate::error::ProblemError;
use crate::ga::{FitnessDirection, GeneticProblem};
use crate::random::chance;
use rand::Rng;
use std::fmt;

/// One queen per column, `rows[c]` in `[0, n)`.
///
/// With the `serde` feature it serializes as the list of rows and
/// deserializes through [`NQueensBoard::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<usize>", into = "Vec<usize>")
)]
pub struct NQueensBoard {
    rows: Vec<usize>,
}

impl NQueensBoard {
    /// Builds a board, checking every row is on the board.
    pub fn new(rows: Vec<usize>) -> Result<Self, ProblemError> {
        let n = rows.len();
        if let Some((column, &row)) = rows.iter().enumerate().find(|(_, &r)| r >= n) {
            return Err(ProblemError::InvalidCandidate(format!(
                "queen in column {column} is on row {row}, board has {n} rows"
            )));
        }
        Ok(Self { rows })
    }

    /// A board of side `n` with every queen on a uniformly random row.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        Self {
            rows: (0..n).map(|_| rng.random_range(0..n)).collect(),
        }
    }

    /// Board side length.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row of the queen in `column`.
    pub fn row(&self, column: usize) -> usize {
        self.rows[column]
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of attacking queen pairs.
    ///
    /// Each pair of columns contributes one for sharing a row and one for
    /// sharing a diagonal.
    pub fn conflicts(&self) -> usize {
        let mut conflicts = 0;
        for (i, &ri) in self.rows.iter().enumerate() {
            for (offset, &rj) in self.rows[i + 1..].iter().enumerate() {
                if ri == rj {
                    conflicts += 1;
                }
                if ri.abs_diff(rj) == offset + 1 {
                    conflicts += 1;
                }
            }
        }
        conflicts
    }

    /// Whether no two queens attack each other.
    pub fn is_solution(&self) -> bool {
        self.conflicts() == 0
    }
}

impl TryFrom<Vec<usize>> for NQueensBoard {
    type Error = ProblemError;

    fn try_from(rows: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<NQueensBoard> for Vec<usize> {
    fn from(board: NQueensBoard) -> Self {
        board.rows
    }
}

impl fmt::Display for NQueensBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{row}")?;
        }
        write!(f, "]")
    }
}

/// Place `n` non-attacking queens on an `n × n` board.
///
/// Fitness is [`NQueensBoard::conflicts`], minimized.
#[derive(Debug, Clone)]
pub struct NQueensProblem {
    n: usize,
}

impl NQueensProblem {
    pub fn new(n: usize) -> Result<Self, ProblemError> {
        if n == 0 {
            return Err(ProblemError::InvalidDefinition(
                "board must have at least one column".into(),
            ));
        }
        Ok(Self { n })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn check(&self, board: &NQueensBoard) -> Result<(), ProblemError> {
        if board.len() != self.n {
            return Err(ProblemError::InvalidCandidate(format!(
                "board has {} columns, expected {}",
                board.len(),
                self.n
            )));
        }
        Ok(())
    }
}

impl GeneticProblem for NQueensProblem {
    type Candidate = NQueensBoard;

    fn direction(&self) -> FitnessDirection {
        FitnessDirection::Minimize
    }

    fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<NQueensBoard, ProblemError> {
        Ok(NQueensBoard::random(self.n, rng))
    }

    /// Columns `0..=split` from `parent_a`, the rest from `parent_b`.
    fn crossover<R: Rng>(
        &self,
        parent_a: &NQueensBoard,
        parent_b: &NQueensBoard,
        rng: &mut R,
    ) -> Result<NQueensBoard, ProblemError> {
        self.check(parent_a)?;
        self.check(parent_b)?;

        let split = rng.random_range(0..self.n);
        let mut rows = parent_a.rows[..=split].to_vec();
        rows.extend_from_slice(&parent_b.rows[split + 1..]);
        Ok(NQueensBoard { rows })
    }

    fn mutate<R: Rng>(
        &self,
        board: &NQueensBoard,
        rate: f64,
        rng: &mut R,
    ) -> Result<NQueensBoard, ProblemError> {
        self.check(board)?;

        let mut mutated = board.clone();
        for row in mutated.rows.iter_mut() {
            if chance(rng, rate) {
                *row = rng.random_range(0..self.n);
            }
        }
        Ok(mutated)
    }

    fn fitness(&self, board: &NQueensBoard) -> f64 {
        board.conflicts() as f64
    }
}
