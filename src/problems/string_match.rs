//! String Match: evolve a printable ASCII string towards a fixed target.

use crate::error::ProblemError;
use crate::ga::{FitnessDirection, GeneticProblem};
use crate::random::chance;
use rand::Rng;
use std::fmt;
use std::ops::Range;

/// Printable ASCII, space through tilde.
pub const PRINTABLE: Range<u8> = 32..127;

/// A fixed-length string of printable ASCII characters.
///
/// With the `serde` feature it serializes as a plain string and
/// deserializes through [`PrintableString::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct PrintableString {
    bytes: Vec<u8>,
}

impl PrintableString {
    /// Wraps `text`, rejecting any character outside [`PRINTABLE`].
    pub fn new(text: &str) -> Result<Self, ProblemError> {
        if let Some(c) = text.chars().find(|c| !c.is_ascii() || !PRINTABLE.contains(&(*c as u8))) {
            return Err(ProblemError::InvalidCandidate(format!(
                "{c:?} is not printable ASCII"
            )));
        }
        Ok(Self {
            bytes: text.as_bytes().to_vec(),
        })
    }

    /// A uniformly random printable string of `len` characters.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self {
            bytes: (0..len).map(|_| random_printable(rng)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        // Printable ASCII is always valid UTF-8.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }

    /// Sum of absolute character-code differences to `other`.
    pub fn distance(&self, other: &PrintableString) -> u64 {
        self.bytes
            .iter()
            .zip(&other.bytes)
            .map(|(&a, &b)| u64::from(a.abs_diff(b)))
            .sum()
    }
}

impl fmt::Display for PrintableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PrintableString {
    type Error = ProblemError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(&text)
    }
}

impl From<PrintableString> for String {
    fn from(s: PrintableString) -> Self {
        s.as_str().to_owned()
    }
}

fn random_printable<R: Rng>(rng: &mut R) -> u8 {
    rng.random_range(PRINTABLE)
}

/// Reconstruct a target string. Fitness is the character-code distance to
/// the target, minimized; 0 means an exact match.
#[derive(Debug, Clone)]
pub struct StringMatchProblem {
    target: PrintableString,
}

impl StringMatchProblem {
    pub fn new(target: &str) -> Result<Self, ProblemError> {
        let target = PrintableString::new(target)
            .map_err(|e| ProblemError::InvalidDefinition(format!("target: {e}")))?;
        if target.is_empty() {
            return Err(ProblemError::InvalidDefinition("target must not be empty".into()));
        }
        Ok(Self { target })
    }

    pub fn target(&self) -> &PrintableString {
        &self.target
    }

    fn check(&self, candidate: &PrintableString) -> Result<(), ProblemError> {
        if candidate.len() != self.target.len() {
            return Err(ProblemError::InvalidCandidate(format!(
                "candidate has {} characters, target has {}",
                candidate.len(),
                self.target.len()
            )));
        }
        Ok(())
    }
}

impl GeneticProblem for StringMatchProblem {
    type Candidate = PrintableString;

    fn direction(&self) -> FitnessDirection {
        FitnessDirection::Minimize
    }

    fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<PrintableString, ProblemError> {
        Ok(PrintableString::random(self.target.len(), rng))
    }

    /// Characters `0..=split` from `parent_a`, the rest from `parent_b`.
    fn crossover<R: Rng>(
        &self,
        parent_a: &PrintableString,
        parent_b: &PrintableString,
        rng: &mut R,
    ) -> Result<PrintableString, ProblemError> {
        self.check(parent_a)?;
        self.check(parent_b)?;

        let split = rng.random_range(0..self.target.len());
        let mut bytes = parent_a.bytes[..=split].to_vec();
        bytes.extend_from_slice(&parent_b.bytes[split + 1..]);
        Ok(PrintableString { bytes })
    }

    fn mutate<R: Rng>(
        &self,
        candidate: &PrintableString,
        rate: f64,
        rng: &mut R,
    ) -> Result<PrintableString, ProblemError> {
        self.check(candidate)?;

        let mut mutated = candidate.clone();
        for byte in mutated.bytes.iter_mut() {
            if chance(rng, rate) {
                *byte = random_printable(rng);
            }
        }
        Ok(mutated)
    }

    fn fitness(&self, candidate: &PrintableString) -> f64 {
        self.target.distance(candidate) as f64
    }
}
