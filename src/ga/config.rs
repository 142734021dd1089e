//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the generational loop.

use crate::error::OptimizeError;

/// Configuration for the generational optimizer.
///
/// # Defaults
///
/// ```
/// use u_genopt::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.generation_limit, 500);
/// assert!((config.selection_ratio - 0.25).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_genopt::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_generation_limit(2000)
///     .with_mutation_rate(0.05)
///     .with_selection_ratio(0.25)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of generations to run. `0` only sorts the input population.
    ///
    /// There is no early stopping: exactly this many generations run unless
    /// the run is cancelled.
    pub generation_limit: usize,

    /// Per-unit probability of mutation (0.0–1.0).
    ///
    /// The unit (gene, character, cell, item) is defined by the problem.
    pub mutation_rate: f64,

    /// Fraction of the sorted population allowed to reproduce, in `(0, 1]`.
    ///
    /// Typical range: 0.1–0.5.
    pub selection_ratio: f64,

    /// Whether to reproduce the slots of a generation in parallel using rayon.
    ///
    /// Results are identical either way for a fixed seed.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            generation_limit: 500,
            mutation_rate: 0.05,
            selection_ratio: 0.25,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the number of generations.
    pub fn with_generation_limit(mut self, n: usize) -> Self {
        self.generation_limit = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the selection ratio.
    ///
    /// Not clamped: an out-of-range ratio is reported by [`validate`](Self::validate).
    pub fn with_selection_ratio(mut self, ratio: f64) -> Self {
        self.selection_ratio = ratio;
        self
    }

    /// Enables or disables parallel reproduction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !self.mutation_rate.is_finite() || !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(OptimizeError::InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !self.selection_ratio.is_finite()
            || self.selection_ratio <= 0.0
            || self.selection_ratio > 1.0
        {
            return Err(OptimizeError::InvalidConfig(format!(
                "selection_ratio must be in (0, 1], got {}",
                self.selection_ratio
            )));
        }
        Ok(())
    }
}
