//! Domain-agnostic generational genetic optimizer.
//!
//! - **Genetic Algorithm (GA)**: a generational loop with truncation
//!   selection, parallel reproduction and a fixed mutation rate, generic over
//!   a pluggable problem definition.
//! - **Problems**: ready-made problem definitions that plug into the GA:
//!   N-Queens, 0/1 Knapsack, String Match and Sudoku.
//!
//! # Example
//!
//! ```
//! use u_genopt::ga::{GaConfig, GaRunner};
//! use u_genopt::problems::StringMatchProblem;
//!
//! let problem = StringMatchProblem::new("HI").unwrap();
//! let config = GaConfig::default().with_generation_limit(50).with_seed(42);
//! let result = GaRunner::run(&problem, 100, &config).unwrap();
//! assert_eq!(result.population.len(), 100);
//! assert!(result.best_fitness >= 0.0);
//! ```
//!
//! # Architecture
//!
//! The engine owns no candidates between calls: it consumes one population
//! and returns another. Problem definitions own any immutable data (item
//! pools, targets, puzzle givens) that candidates refer to.

pub mod error;
pub mod ga;
pub mod problems;
pub mod random;

pub use error::{OptimizeError, ProblemError};
