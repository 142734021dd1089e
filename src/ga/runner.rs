//! Generational loop execution.
//!
//! [`GaRunner`] drives the evolutionary process:
//! sort → (select → crossover → mutate for every slot) → sort → repeat.

use super::config::GaConfig;
use super::selection::{sample_bound, select_pair};
use super::types::{FitnessDirection, GeneticProblem};
use crate::error::{OptimizeError, ProblemError};
use crate::random::slot_rng;
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<C> {
    /// Final population, sorted best-first under the problem's direction.
    ///
    /// Always the same length as the input population.
    pub population: Vec<C>,

    /// Fitness of `population[0]`.
    pub best_fitness: f64,

    /// Number of generations executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best fitness of the sorted input, then of each generation.
    pub fitness_history: Vec<f64>,
}

impl<C> GaResult<C> {
    /// The best individual of the final population.
    pub fn best(&self) -> &C {
        &self.population[0]
    }
}

/// Executes the generational loop.
///
/// # Usage
///
/// ```ignore
/// let problem = StringMatchProblem::new("HELLO")?;
/// let config = GaConfig::default().with_seed(42);
/// let population = problem.generate_initial_population(200, 42)?;
/// let result = GaRunner::optimize(&problem, population, &config)?;
/// println!("{} ({})", result.best(), result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Generates a population of `population_size` candidates and optimizes it.
    pub fn run<P: GeneticProblem>(
        problem: &P,
        population_size: usize,
        config: &GaConfig,
    ) -> Result<GaResult<P::Candidate>, OptimizeError> {
        config.validate()?;
        if population_size == 0 {
            return Err(OptimizeError::EmptyPopulation);
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let population = problem.generate_initial_population(population_size, seed)?;
        let config = GaConfig {
            seed: Some(seed),
            ..config.clone()
        };
        Self::optimize(problem, population, &config)
    }

    /// Evolves `population` for `config.generation_limit` generations.
    pub fn optimize<P: GeneticProblem>(
        problem: &P,
        population: Vec<P::Candidate>,
        config: &GaConfig,
    ) -> Result<GaResult<P::Candidate>, OptimizeError> {
        Self::optimize_with_cancel(problem, population, config, None)
    }

    /// Evolves `population` with an optional cancellation token.
    ///
    /// The flag is checked before each generation. When it is set, the run
    /// stops and returns the last complete generation.
    pub fn optimize_with_cancel<P: GeneticProblem>(
        problem: &P,
        population: Vec<P::Candidate>,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Candidate>, OptimizeError> {
        config.validate()?;
        if population.is_empty() {
            return Err(OptimizeError::EmptyPopulation);
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let direction = problem.direction();
        let size = population.len();
        let bound = sample_bound(size, config.selection_ratio);

        debug!(
            "optimizing population of {size} for {} generations ({direction:?}, sample bound {bound}, mutation rate {})",
            config.generation_limit, config.mutation_rate
        );

        // Initial sort: index 0 is the best even when no generation runs.
        let mut current = score_and_sort(problem, direction, population, config.parallel);
        let mut fitness_history = Vec::with_capacity(config.generation_limit + 1);
        fitness_history.push(current[0].fitness);

        let mut generations = 0usize;
        let mut cancelled = false;

        for generation in 1..=config.generation_limit {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    warn!("optimization cancelled after {generations} generations");
                    cancelled = true;
                    break;
                }
            }

            let children = reproduce(problem, &current, bound, seed, generation, config)
                .map_err(|source| OptimizeError::Problem { generation, source })?;
            current = score_and_sort(problem, direction, children, config.parallel);
            generations = generation;

            let best_fitness = current[0].fitness;
            fitness_history.push(best_fitness);
            trace!("generation {generation}: best fitness {best_fitness}");
            problem.on_generation(generation, best_fitness);
        }

        let best_fitness = current[0].fitness;
        debug!("finished after {generations} generations, best fitness {best_fitness}");

        Ok(GaResult {
            population: current.into_iter().map(|s| s.candidate).collect(),
            best_fitness,
            generations,
            cancelled,
            fitness_history,
        })
    }
}

/// A candidate with its fitness evaluated once.
struct Scored<C> {
    fitness: f64,
    candidate: C,
}

/// Evaluates every candidate and sorts best-first.
///
/// The sort is stable, so equally fit candidates keep their slot order.
fn score_and_sort<P: GeneticProblem>(
    problem: &P,
    direction: FitnessDirection,
    population: Vec<P::Candidate>,
    parallel: bool,
) -> Vec<Scored<P::Candidate>> {
    let score = |candidate: P::Candidate| Scored {
        fitness: problem.fitness(&candidate),
        candidate,
    };
    let mut scored: Vec<_> = if parallel {
        population.into_par_iter().map(score).collect()
    } else {
        population.into_iter().map(score).collect()
    };
    scored.sort_by(|a, b| direction.compare(a.fitness, b.fitness));
    scored
}

/// Produces the next generation, one child per slot.
///
/// Each slot reads only the sorted `current` generation and its own RNG.
fn reproduce<P: GeneticProblem>(
    problem: &P,
    current: &[Scored<P::Candidate>],
    bound: usize,
    seed: u64,
    generation: usize,
    config: &GaConfig,
) -> Result<Vec<P::Candidate>, ProblemError> {
    let breed = |slot: usize| -> Result<P::Candidate, ProblemError> {
        let mut rng = slot_rng(seed, generation as u64, slot);
        let (a, b) = select_pair(bound, &mut rng);
        let child = problem.crossover(&current[a].candidate, &current[b].candidate, &mut rng)?;
        problem.mutate(&child, config.mutation_rate, &mut rng)
    };

    if config.parallel {
        (0..current.len()).into_par_iter().map(breed).collect()
    } else {
        (0..current.len()).map(breed).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::sync::atomic::AtomicUsize;

    // ---- OneMax: maximize the number of set bits ----

    #[derive(Clone, Debug, PartialEq)]
    struct BitString {
        bits: Vec<bool>,
    }

    struct OneMaxProblem {
        n: usize,
        generations_seen: AtomicUsize,
    }

    impl OneMaxProblem {
        fn new(n: usize) -> Self {
            Self {
                n,
                generations_seen: AtomicUsize::new(0),
            }
        }
    }

    impl GeneticProblem for OneMaxProblem {
        type Candidate = BitString;

        fn direction(&self) -> FitnessDirection {
            FitnessDirection::Maximize
        }

        fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<BitString, ProblemError> {
            Ok(BitString {
                bits: (0..self.n).map(|_| rng.random_bool(0.5)).collect(),
            })
        }

        fn crossover<R: Rng>(
            &self,
            a: &BitString,
            b: &BitString,
            rng: &mut R,
        ) -> Result<BitString, ProblemError> {
            let split = rng.random_range(0..self.n);
            let bits = (0..self.n)
                .map(|i| if i <= split { a.bits[i] } else { b.bits[i] })
                .collect();
            Ok(BitString { bits })
        }

        fn mutate<R: Rng>(
            &self,
            c: &BitString,
            rate: f64,
            rng: &mut R,
        ) -> Result<BitString, ProblemError> {
            let mut bits = c.bits.clone();
            for bit in bits.iter_mut() {
                if crate::random::chance(rng, rate) {
                    *bit = !*bit;
                }
            }
            Ok(BitString { bits })
        }

        fn fitness(&self, c: &BitString) -> f64 {
            c.bits.iter().filter(|&&b| b).count() as f64
        }

        fn on_generation(&self, _generation: usize, _best_fitness: f64) {
            self.generations_seen.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn config() -> GaConfig {
        GaConfig::default()
            .with_generation_limit(100)
            .with_mutation_rate(0.02)
            .with_selection_ratio(0.25)
            .with_seed(42)
    }

    #[test]
    fn test_onemax_convergence() {
        let problem = OneMaxProblem::new(30);
        let result = GaRunner::run(&problem, 100, &config()).unwrap();

        assert!(
            result.best_fitness >= 27.0,
            "expected near-optimal OneMax, got {}",
            result.best_fitness
        );
        assert_eq!(result.generations, 100);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_population_size_preserved() {
        let problem = OneMaxProblem::new(10);
        let population = problem.generate_initial_population(37, 1).unwrap();
        let result = GaRunner::optimize(&problem, population, &config()).unwrap();
        assert_eq!(result.population.len(), 37);
    }

    #[test]
    fn test_result_is_sorted_best_first() {
        let problem = OneMaxProblem::new(16);
        let result = GaRunner::run(&problem, 50, &config()).unwrap();
        let fitness: Vec<f64> = result.population.iter().map(|c| problem.fitness(c)).collect();
        for pair in fitness.windows(2) {
            assert!(pair[0] >= pair[1], "not sorted descending: {fitness:?}");
        }
        assert_eq!(problem.fitness(result.best()), result.best_fitness);
    }

    #[test]
    fn test_zero_generations_only_sorts() {
        let problem = OneMaxProblem::new(8);
        let population = problem.generate_initial_population(20, 3).unwrap();
        let config = config().with_generation_limit(0);

        let result = GaRunner::optimize(&problem, population.clone(), &config).unwrap();

        let mut expected = population;
        expected.sort_by(|a, b| problem.compare(a, b));
        assert_eq!(result.population, expected);
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
    }

    #[test]
    fn test_fitness_history_and_hook() {
        let problem = OneMaxProblem::new(10);
        let result = GaRunner::run(&problem, 20, &config().with_generation_limit(30)).unwrap();

        assert_eq!(result.fitness_history.len(), 31);
        assert_eq!(problem.generations_seen.load(Ordering::Relaxed), 30);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let problem = OneMaxProblem::new(20);
        let population = problem.generate_initial_population(64, 9).unwrap();

        let par = GaRunner::optimize(&problem, population.clone(), &config().with_parallel(true))
            .unwrap();
        let seq = GaRunner::optimize(&problem, population, &config().with_parallel(false))
            .unwrap();

        assert_eq!(par.population, seq.population);
        assert_eq!(par.fitness_history, seq.fitness_history);
    }

    #[test]
    fn test_empty_population_rejected() {
        let problem = OneMaxProblem::new(4);
        let err = GaRunner::optimize(&problem, Vec::new(), &config()).unwrap_err();
        assert_eq!(err, OptimizeError::EmptyPopulation);

        let err = GaRunner::run(&problem, 0, &config()).unwrap_err();
        assert_eq!(err, OptimizeError::EmptyPopulation);
    }

    #[test]
    fn test_invalid_ratio_rejected_before_work() {
        let problem = OneMaxProblem::new(4);
        let population = problem.generate_initial_population(10, 1).unwrap();
        let err = GaRunner::optimize(&problem, population, &config().with_selection_ratio(0.0))
            .unwrap_err();
        assert!(matches!(err, OptimizeError::InvalidConfig(_)));
        assert_eq!(problem.generations_seen.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_cancellation() {
        let problem = OneMaxProblem::new(10);
        let population = problem.generate_initial_population(20, 1).unwrap();
        let cancel = Arc::new(AtomicBool::new(true));

        let result =
            GaRunner::optimize_with_cancel(&problem, population, &config(), Some(cancel)).unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.population.len(), 20);
    }

    /// OneMax that raises the cancel flag from its generation hook.
    struct CancelAt {
        inner: OneMaxProblem,
        at: usize,
        flag: Arc<AtomicBool>,
    }

    impl GeneticProblem for CancelAt {
        type Candidate = BitString;

        fn direction(&self) -> FitnessDirection {
            self.inner.direction()
        }

        fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<BitString, ProblemError> {
            self.inner.create_candidate(rng)
        }

        fn crossover<R: Rng>(
            &self,
            a: &BitString,
            b: &BitString,
            rng: &mut R,
        ) -> Result<BitString, ProblemError> {
            self.inner.crossover(a, b, rng)
        }

        fn mutate<R: Rng>(
            &self,
            c: &BitString,
            rate: f64,
            rng: &mut R,
        ) -> Result<BitString, ProblemError> {
            self.inner.mutate(c, rate, rng)
        }

        fn fitness(&self, c: &BitString) -> f64 {
            self.inner.fitness(c)
        }

        fn on_generation(&self, generation: usize, best_fitness: f64) {
            self.inner.on_generation(generation, best_fitness);
            if generation == self.at {
                self.flag.store(true, Ordering::Relaxed);
            }
        }
    }

    #[test]
    fn test_cancellation_during_run() {
        let flag = Arc::new(AtomicBool::new(false));
        let problem = CancelAt {
            inner: OneMaxProblem::new(30),
            at: 7,
            flag: Arc::clone(&flag),
        };
        let population = problem.generate_initial_population(40, 3).unwrap();

        let result = GaRunner::optimize_with_cancel(
            &problem,
            population.clone(),
            &config(),
            Some(Arc::clone(&flag)),
        )
        .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 7);
        assert_eq!(result.fitness_history.len(), 8);
        assert_eq!(problem.inner.generations_seen.load(Ordering::Relaxed), 7);
        assert_eq!(result.population.len(), 40);
        for pair in result.population.windows(2) {
            assert!(problem.fitness(&pair[0]) >= problem.fitness(&pair[1]));
        }
        assert_eq!(problem.fitness(result.best()), result.best_fitness);

        // Same seed, stopped by the limit instead: the same generation comes back.
        let limited = OneMaxProblem::new(30);
        let expected =
            GaRunner::optimize(&limited, population, &config().with_generation_limit(7)).unwrap();
        assert!(!expected.cancelled);
        assert_eq!(result.population, expected.population);
        assert_eq!(result.fitness_history, expected.fitness_history);
    }

    // ---- Tagged candidates: record which ranks reproduce ----

    struct RankProbe {
        max_parent: AtomicUsize,
    }

    impl GeneticProblem for RankProbe {
        type Candidate = usize;

        fn direction(&self) -> FitnessDirection {
            FitnessDirection::Minimize
        }

        fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<usize, ProblemError> {
            Ok(rng.random_range(0..1000))
        }

        fn crossover<R: Rng>(&self, a: &usize, b: &usize, _rng: &mut R) -> Result<usize, ProblemError> {
            self.max_parent.fetch_max(*a.max(b), Ordering::Relaxed);
            Ok(*a)
        }

        fn mutate<R: Rng>(&self, c: &usize, _rate: f64, _rng: &mut R) -> Result<usize, ProblemError> {
            Ok(*c)
        }

        fn fitness(&self, c: &usize) -> f64 {
            *c as f64
        }
    }

    #[test]
    fn test_parents_drawn_from_fittest_prefix() {
        let problem = RankProbe {
            max_parent: AtomicUsize::new(0),
        };
        // Tags equal ranks once sorted; reversed so the engine must sort first.
        let population: Vec<usize> = (0..40).rev().collect();
        let config = config().with_generation_limit(1).with_selection_ratio(0.25);

        let result = GaRunner::optimize(&problem, population, &config).unwrap();

        assert!(problem.max_parent.load(Ordering::Relaxed) <= 9);
        assert!(result.population.iter().all(|&c| c < 10));
    }

    // ---- Failing problem: errors propagate, no retries ----

    struct Failing;

    impl GeneticProblem for Failing {
        type Candidate = u8;

        fn direction(&self) -> FitnessDirection {
            FitnessDirection::Minimize
        }

        fn create_candidate<R: Rng>(&self, _rng: &mut R) -> Result<u8, ProblemError> {
            Ok(0)
        }

        fn crossover<R: Rng>(&self, _a: &u8, _b: &u8, _rng: &mut R) -> Result<u8, ProblemError> {
            Err(ProblemError::InvalidCandidate("broken crossover".into()))
        }

        fn mutate<R: Rng>(&self, c: &u8, _rate: f64, _rng: &mut R) -> Result<u8, ProblemError> {
            Ok(*c)
        }

        fn fitness(&self, c: &u8) -> f64 {
            *c as f64
        }
    }

    #[test]
    fn test_reproduction_error_propagates() {
        let err = GaRunner::run(&Failing, 10, &config()).unwrap_err();
        assert_eq!(
            err,
            OptimizeError::Problem {
                generation: 1,
                source: ProblemError::InvalidCandidate("broken crossover".into()),
            }
        );
    }

    #[test]
    fn test_reproduction_error_with_zero_generations_is_not_hit() {
        let result = GaRunner::run(&Failing, 10, &config().with_generation_limit(0)).unwrap();
        assert_eq!(result.population, vec![0; 10]);
    }
}
