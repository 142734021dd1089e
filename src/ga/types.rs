//! Core trait definitions for the GA framework.
//!
//! [`GeneticProblem`] is the contract between the generic engine and a
//! concrete problem: it creates, recombines, mutates and scores candidates,
//! and states explicitly whether lower or higher fitness is better.

use crate::error::ProblemError;
use crate::random::{slot_rng, INITIAL_POPULATION_STREAM};
use rand::Rng;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Whether a problem's fitness is a cost or a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitnessDirection {
    /// Lower fitness is better (conflicts, distance, cost).
    Minimize,
    /// Higher fitness is better (value, score).
    Maximize,
}

impl FitnessDirection {
    /// Orders two fitness values best-first.
    ///
    /// `NaN` ranks after every number in both directions.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                FitnessDirection::Minimize => a.total_cmp(&b),
                FitnessDirection::Maximize => b.total_cmp(&a),
            },
        }
    }

    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// A candidate solution.
///
/// Candidates are plain values: cloning one never aliases mutable state with
/// the original. Blanket-implemented for every type with the required bounds.
pub trait Candidate: Clone + PartialEq + std::fmt::Debug + Send + Sync {}

impl<T> Candidate for T where T: Clone + PartialEq + std::fmt::Debug + Send + Sync {}

/// Defines a genetic optimization problem.
///
/// Implementors supply:
///
/// 1. **Direction**: whether fitness is minimized or maximized
/// 2. **Generation**: how to create a random candidate
/// 3. **Crossover**: how to combine two parents into one child
/// 4. **Mutation**: how to perturb a candidate at a per-unit rate
/// 5. **Fitness**: a pure score
///
/// `crossover` and `mutate` return new values; the engine never mutates a
/// candidate that belongs to the current population.
///
/// # Thread Safety
///
/// `GeneticProblem` must be `Send + Sync` because reproduction runs on rayon
/// workers that all borrow the problem. Any data the problem shares with its
/// candidates must be immutable.
pub trait GeneticProblem: Send + Sync {
    /// The candidate type evolved for this problem.
    type Candidate: Candidate;

    /// Whether lower or higher fitness is better for this problem.
    fn direction(&self) -> FitnessDirection;

    /// Creates a random, structurally valid candidate.
    ///
    /// Returns [`ProblemError::Unsatisfiable`] if no valid candidate exists.
    fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<Self::Candidate, ProblemError>;

    /// Combines two parents into one child.
    fn crossover<R: Rng>(
        &self,
        parent_a: &Self::Candidate,
        parent_b: &Self::Candidate,
        rng: &mut R,
    ) -> Result<Self::Candidate, ProblemError>;

    /// Returns a copy of `candidate` where each mutation unit was altered with
    /// probability `rate`.
    ///
    /// The unit (gene, character, cell, item) is problem-defined.
    fn mutate<R: Rng>(
        &self,
        candidate: &Self::Candidate,
        rate: f64,
        rng: &mut R,
    ) -> Result<Self::Candidate, ProblemError>;

    /// Scores a candidate. Must be pure and deterministic.
    ///
    /// A `NaN` score ranks below every other candidate.
    fn fitness(&self, candidate: &Self::Candidate) -> f64;

    /// Generates `size` independent random candidates in parallel.
    ///
    /// Candidate `i` is created from an RNG derived from `(seed, i)`, so the
    /// result does not depend on thread scheduling.
    fn generate_initial_population(
        &self,
        size: usize,
        seed: u64,
    ) -> Result<Vec<Self::Candidate>, ProblemError>
    where
        Self: Sized,
    {
        (0..size)
            .into_par_iter()
            .map(|i| {
                let mut rng = slot_rng(seed, INITIAL_POPULATION_STREAM, i);
                self.create_candidate(&mut rng)
            })
            .collect()
    }

    /// Orders two candidates best-first under this problem's direction.
    fn compare(&self, a: &Self::Candidate, b: &Self::Candidate) -> Ordering {
        self.direction().compare(self.fitness(a), self.fitness(b))
    }

    /// Called after each generation with the best fitness of that generation.
    ///
    /// The default implementation is a no-op.
    fn on_generation(&self, _generation: usize, _best_fitness: f64) {}
}
