//! Error types.
//!
//! [`ProblemError`] is raised by problem definitions; [`OptimizeError`] is
//! what the engine returns to callers. The engine never retries or skips a
//! failed reproduction step: the first error ends the run.

use thiserror::Error;

/// Failure inside a problem definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProblemError {
    /// The problem itself was constructed with invalid parameters.
    #[error("invalid problem definition: {0}")]
    InvalidDefinition(String),

    /// No structurally valid candidate can be produced.
    #[error("unsatisfiable problem: {0}")]
    Unsatisfiable(String),

    /// Raw data violates a candidate shape invariant.
    #[error("invalid candidate: {0}")]
    InvalidCandidate(String),
}

/// Failure of an optimization run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("population must not be empty")]
    EmptyPopulation,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Initial population generation failed.
    #[error(transparent)]
    Generation(#[from] ProblemError),

    /// Reproduction failed while building the given generation (1-based).
    #[error("reproduction failed in generation {generation}: {source}")]
    Problem {
        generation: usize,
        #[source]
        source: ProblemError,
    },
}
