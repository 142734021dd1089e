//! Truncation selection.
//!
//! Only the fittest prefix of a best-first sorted population reproduces.
//! Both parents are drawn uniformly and independently from that prefix, so
//! the same individual may be drawn twice.
//!
//! # References
//!
//! - Mühlenbein & Schlierkamp-Voosen (1993), "Predictive Models for the
//!   Breeder Genetic Algorithm"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use rand::Rng;

/// Size of the reproducing prefix.
///
/// `round(population_len * ratio)`, clamped to `[1, population_len]`.
/// Returns 0 only for an empty population.
pub fn sample_bound(population_len: usize, ratio: f64) -> usize {
    if population_len == 0 {
        return 0;
    }
    let bound = (population_len as f64 * ratio).round();
    if bound.is_finite() && bound >= 1.0 {
        (bound as usize).min(population_len)
    } else {
        1
    }
}

/// Draws one parent index uniformly from `[0, bound)`.
///
/// Callers pass a bound from [`sample_bound`] over a non-empty population,
/// which is never 0.
pub(crate) fn select_parent<R: Rng>(bound: usize, rng: &mut R) -> usize {
    assert!(bound > 0, "cannot select from an empty sample");
    rng.random_range(0..bound)
}

/// Draws a pair of parent indices from `[0, bound)`.
pub(crate) fn select_pair<R: Rng>(bound: usize, rng: &mut R) -> (usize, usize) {
    let a = select_parent(bound, rng);
    let b = select_parent(bound, rng);
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    #[test]
    fn test_sample_bound_rounds() {
        assert_eq!(sample_bound(200, 0.25), 50);
        assert_eq!(sample_bound(10, 0.25), 3); // 2.5 rounds away from zero
        assert_eq!(sample_bound(10, 0.24), 2);
        assert_eq!(sample_bound(7, 1.0), 7);
    }

    #[test]
    fn test_sample_bound_clamps_to_one() {
        assert_eq!(sample_bound(3, 0.01), 1);
        assert_eq!(sample_bound(1, 0.25), 1);
    }

    #[test]
    fn test_sample_bound_empty() {
        assert_eq!(sample_bound(0, 0.5), 0);
    }

    #[test]
    fn test_select_covers_window() {
        let mut rng = create_rng(42);
        let mut counts = [0u32; 5];
        for _ in 0..10_000 {
            counts[select_parent(5, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform draws, got {counts:?}");
        }
    }

    #[test]
    #[should_panic(expected = "cannot select from an empty sample")]
    fn test_select_zero_bound_panics() {
        let mut rng = create_rng(42);
        select_parent(0, &mut rng);
    }

    proptest! {
        #[test]
        fn prop_parents_stay_in_window(len in 1usize..500, ratio in 0.001f64..=1.0, seed in any::<u64>()) {
            let bound = sample_bound(len, ratio);
            prop_assert!(bound >= 1 && bound <= len);
            let mut rng = create_rng(seed);
            for _ in 0..32 {
                let (a, b) = select_pair(bound, &mut rng);
                prop_assert!(a < bound && b < bound);
            }
        }
    }
}
