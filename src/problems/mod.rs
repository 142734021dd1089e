//! Ready-made problem definitions.
//!
//! Each module pairs a candidate type with a [`GeneticProblem`](crate::ga::GeneticProblem)
//! implementation:
//!
//! | Problem | Candidate | Fitness | Direction |
//! |---|---|---|---|
//! | [`NQueensProblem`] | [`NQueensBoard`] | attacking pairs | minimize |
//! | [`KnapsackProblem`] | [`Knapsack`] | packed value | maximize |
//! | [`StringMatchProblem`] | [`PrintableString`] | distance to target | minimize |
//! | [`SudokuProblem`] | [`SudokuBoard`] | duplicate digits | minimize |

pub mod knapsack;
pub mod nqueens;
pub mod string_match;
pub mod sudoku;

pub use knapsack::{ItemId, Knapsack, KnapsackItem, KnapsackProblem};
pub use nqueens::{NQueensBoard, NQueensProblem};
pub use string_match::{PrintableString, StringMatchProblem};
pub use sudoku::{SudokuBoard, SudokuProblem};
