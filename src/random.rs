//! Random number helpers.
//!
//! Every reproduction slot gets its own [`StdRng`], seeded from the run seed,
//! the generation number and the slot index. Workers never share a random
//! source, and a seeded run produces the same population whether it executes
//! on one thread or many.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stream id used when generating an initial population.
///
/// Reproduction uses the 1-based generation number as its stream.
pub const INITIAL_POPULATION_STREAM: u64 = u64::MAX;

/// Creates a seeded RNG.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derives the seed for one slot of one generation.
///
/// `stream` separates independent uses of the same base seed (initial
/// population generation vs. reproduction).
pub fn derive_seed(base: u64, stream: u64, index: u64) -> u64 {
    let mut h = splitmix64(base ^ 0x5851_F42D_4C95_7F2D);
    h = splitmix64(h ^ stream);
    splitmix64(h ^ index)
}

/// Creates the RNG for a single slot.
pub fn slot_rng(base: u64, stream: u64, index: usize) -> StdRng {
    create_rng(derive_seed(base, stream, index as u64))
}

/// Returns `true` with probability `rate`.
///
/// `rate <= 0.0` never fires, `rate >= 1.0` always fires.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> bool {
    if rate <= 0.0 {
        false
    } else if rate >= 1.0 {
        true
    } else {
        rng.random::<f64>() < rate
    }
}

/// SplitMix64 finalizer (Steele, Lea & Flood 2014).
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
