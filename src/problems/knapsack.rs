//! 0/1 Knapsack.
//!
//! The problem owns an immutable pool of items. A [`Knapsack`] candidate
//! shares that pool through an `Arc` and records which items it holds by
//! identity, so two items with equal weight and value are still different
//! items.
//!
//! Capacity policy: [`Knapsack::put`] refuses any item that would overflow the
//! capacity, and every operator builds candidates through `put`. Crossover
//! skips items that no longer fit; a mutation whose replacement does not fit
//! leaves the slot empty. A knapsack therefore never exceeds its capacity.

use crate::error::ProblemError;
use crate::ga::{FitnessDirection, GeneticProblem};
use crate::random::chance;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of an item within its problem's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(usize);

impl ItemId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An item that can be packed. Equality is by [`ItemId`] only.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnapsackItem {
    id: ItemId,
    weight: u32,
    value: u32,
}

impl KnapsackItem {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}

impl PartialEq for KnapsackItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for KnapsackItem {}

impl Hash for KnapsackItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A selection of items from a shared pool, bounded by a capacity.
///
/// Invariant: `total_weight() <= capacity()`.
#[derive(Clone)]
pub struct Knapsack {
    pool: Arc<[KnapsackItem]>,
    capacity: u32,
    selected: BTreeSet<ItemId>,
    weight: u64,
    value: u64,
}

impl Knapsack {
    /// An empty knapsack drawing from `pool`.
    ///
    /// `pool[i]` must carry `ItemId(i)`; [`KnapsackProblem::empty_knapsack`]
    /// is the public way to get one.
    pub(crate) fn new(pool: Arc<[KnapsackItem]>, capacity: u32) -> Self {
        Self {
            pool,
            capacity,
            selected: BTreeSet::new(),
            weight: 0,
            value: 0,
        }
    }

    /// Adds the item with identity `id`.
    ///
    /// Returns `false`, leaving the knapsack unchanged, if the item is not in
    /// the pool, is already packed, or would exceed the capacity.
    pub fn put(&mut self, id: ItemId) -> bool {
        let Some(item) = self.pool.get(id.index()).copied() else {
            return false;
        };
        if item.id != id {
            return false;
        }
        if self.selected.contains(&id) {
            return false;
        }
        if self.weight + u64::from(item.weight) > u64::from(self.capacity) {
            return false;
        }
        self.selected.insert(id);
        self.weight += u64::from(item.weight);
        self.value += u64::from(item.value);
        true
    }

    /// Removes the item with identity `id`. Returns whether it was packed.
    pub fn remove(&mut self, id: ItemId) -> bool {
        if !self.selected.remove(&id) {
            return false;
        }
        let item = self.pool[id.index()];
        self.weight -= u64::from(item.weight);
        self.value -= u64::from(item.value);
        true
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    /// Packed items in identity order.
    pub fn items(&self) -> impl Iterator<Item = &KnapsackItem> + '_ {
        self.selected.iter().map(|id| &self.pool[id.index()])
    }

    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn total_weight(&self) -> u64 {
        self.weight
    }

    pub fn total_value(&self) -> u64 {
        self.value
    }

    fn shares_pool(&self, pool: &Arc<[KnapsackItem]>) -> bool {
        Arc::ptr_eq(&self.pool, pool)
    }
}

impl PartialEq for Knapsack {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity && self.selected == other.selected
    }
}

impl fmt::Debug for Knapsack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Knapsack")
            .field("capacity", &self.capacity)
            .field("items", &self.selected)
            .field("weight", &self.weight)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Knapsack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "weight {}/{}, value {}",
            self.weight, self.capacity, self.value
        )?;
        for item in self.items() {
            writeln!(
                f,
                "  item {}: weight {}, value {}",
                item.id.index(),
                item.weight,
                item.value
            )?;
        }
        Ok(())
    }
}

/// Maximize the value packed into a knapsack of fixed capacity.
#[derive(Debug, Clone)]
pub struct KnapsackProblem {
    pool: Arc<[KnapsackItem]>,
    capacity: u32,
}

impl KnapsackProblem {
    /// Builds the item pool from `(weight, value)` pairs.
    ///
    /// Each pair becomes a distinct item, identified by its position.
    /// Fails if there are no items or none of them fits the capacity.
    pub fn new(capacity: u32, items: &[(u32, u32)]) -> Result<Self, ProblemError> {
        if items.is_empty() {
            return Err(ProblemError::InvalidDefinition(
                "knapsack problem needs at least one item".into(),
            ));
        }
        if items.iter().all(|&(weight, _)| weight > capacity) {
            return Err(ProblemError::Unsatisfiable(format!(
                "no item fits a knapsack of capacity {capacity}"
            )));
        }

        let pool: Arc<[KnapsackItem]> = items
            .iter()
            .enumerate()
            .map(|(i, &(weight, value))| KnapsackItem {
                id: ItemId(i),
                weight,
                value,
            })
            .collect();
        Ok(Self { pool, capacity })
    }

    /// Builds the pool from parallel weight and value slices.
    pub fn from_weights_and_values(
        capacity: u32,
        weights: &[u32],
        values: &[u32],
    ) -> Result<Self, ProblemError> {
        if weights.len() != values.len() {
            return Err(ProblemError::InvalidDefinition(format!(
                "{} weights but {} values",
                weights.len(),
                values.len()
            )));
        }
        let items: Vec<(u32, u32)> = weights.iter().copied().zip(values.iter().copied()).collect();
        Self::new(capacity, &items)
    }

    pub fn items(&self) -> &[KnapsackItem] {
        &self.pool
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// An empty knapsack for this problem.
    pub fn empty_knapsack(&self) -> Knapsack {
        Knapsack::new(Arc::clone(&self.pool), self.capacity)
    }

    fn check(&self, knapsack: &Knapsack) -> Result<(), ProblemError> {
        if !knapsack.shares_pool(&self.pool) || knapsack.capacity != self.capacity {
            return Err(ProblemError::InvalidCandidate(
                "knapsack does not belong to this problem".into(),
            ));
        }
        Ok(())
    }

    /// Packs `ids` in the given order, skipping any that do not fit.
    fn pack(&self, ids: &[ItemId]) -> Knapsack {
        let mut knapsack = self.empty_knapsack();
        for &id in ids {
            knapsack.put(id);
        }
        knapsack
    }
}

impl GeneticProblem for KnapsackProblem {
    type Candidate = Knapsack;

    fn direction(&self) -> FitnessDirection {
        FitnessDirection::Maximize
    }

    /// Tries every pool item once, in random order.
    fn create_candidate<R: Rng>(&self, rng: &mut R) -> Result<Knapsack, ProblemError> {
        let mut ids: Vec<ItemId> = self.pool.iter().map(|item| item.id).collect();
        ids.shuffle(rng);
        Ok(self.pack(&ids))
    }

    /// Union of both parents' items, re-packed in random order.
    fn crossover<R: Rng>(
        &self,
        parent_a: &Knapsack,
        parent_b: &Knapsack,
        rng: &mut R,
    ) -> Result<Knapsack, ProblemError> {
        self.check(parent_a)?;
        self.check(parent_b)?;

        let mut ids: Vec<ItemId> = parent_a.selected.union(&parent_b.selected).copied().collect();
        ids.shuffle(rng);
        Ok(self.pack(&ids))
    }

    /// For each pool item, with probability `rate`: take it out (if packed)
    /// and try to put in a random pool item instead.
    fn mutate<R: Rng>(
        &self,
        knapsack: &Knapsack,
        rate: f64,
        rng: &mut R,
    ) -> Result<Knapsack, ProblemError> {
        self.check(knapsack)?;

        let mut mutated = knapsack.clone();
        for item in self.pool.iter() {
            if chance(rng, rate) {
                let replacement = self.pool[rng.random_range(0..self.pool.len())].id;
                mutated.remove(item.id);
                mutated.put(replacement);
            }
        }
        Ok(mutated)
    }

    fn fitness(&self, knapsack: &Knapsack) -> f64 {
        knapsack.total_value() as f64
    }
}
