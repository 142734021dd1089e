//! Generational Genetic Algorithm.
//!
//! A generic, domain-agnostic GA built on one trait. Users define their
//! problem by implementing [`GeneticProblem`], which specifies how to create,
//! recombine, mutate and score candidates, and in which direction fitness
//! improves.
//!
//! # Core Traits
//!
//! - [`Candidate`]: A solution value (clone, compare, share across threads)
//! - [`GeneticProblem`]: Problem definition — generation, operators, fitness
//!
//! # Key Types
//!
//! - [`GaConfig`]: Generation limit, mutation rate, selection ratio, seed
//! - [`GaRunner`]: Executes the generational loop
//! - [`GaResult`]: Final sorted population with statistics
//!
//! # Algorithm
//!
//! Each generation, every slot of the next population is filled
//! independently: two parents are drawn uniformly from the fittest
//! `round(n * selection_ratio)` individuals (truncation selection), combined
//! by crossover, and mutated. The new population is then sorted best-first.
//! Slots are reproduced in parallel with rayon, each with its own seeded RNG.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Mühlenbein & Schlierkamp-Voosen (1993), "Predictive Models for the
//!   Breeder Genetic Algorithm"

mod config;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use types::{Candidate, FitnessDirection, GeneticProblem};
