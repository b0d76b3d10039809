//! Where new-round ids come from.

use std::collections::VecDeque;

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Number of entries in the default catalog.
pub const DEFAULT_CATALOG_SIZE: u32 = 1017;

/// Supplies catalog ids for new rounds.
pub trait IdSource {
    /// The next id, always within `[1, catalog_size]`.
    fn next_id(&mut self) -> u32;
}

/// Uniformly random ids in `[1, max]`.
#[derive(Debug, Clone)]
pub struct UniformIds {
    rng: StdRng,
    range: Uniform<u32>,
    max: u32,
}

impl UniformIds {
    /// Random ids seeded from the operating system.
    ///
    /// A `max` of zero is treated as one.
    #[must_use]
    pub fn new(max: u32) -> Self {
        Self::with_rng(StdRng::from_entropy(), max)
    }

    /// Reproducible ids from a fixed seed.
    #[must_use]
    pub fn seeded(max: u32, seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), max)
    }

    fn with_rng(rng: StdRng, max: u32) -> Self {
        let max = max.max(1);
        Self {
            rng,
            range: Uniform::new_inclusive(1, max),
            max,
        }
    }

    /// Largest id this source produces.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }
}

impl Default for UniformIds {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_SIZE)
    }
}

impl IdSource for UniformIds {
    fn next_id(&mut self) -> u32 {
        self.range.sample(&mut self.rng)
    }
}

/// Replays a fixed list of ids, then repeats the last one.
#[derive(Debug, Clone)]
pub struct FixedIds {
    ids: VecDeque<u32>,
    last: u32,
}

impl FixedIds {
    /// Ids in the order they will be handed out.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            last: 1,
        }
    }
}

impl IdSource for FixedIds {
    fn next_id(&mut self) -> u32 {
        if let Some(id) = self.ids.pop_front() {
            self.last = id;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_ids_stay_in_range() {
        let mut ids = UniformIds::seeded(10, 7);
        for _ in 0..1000 {
            let id = ids.next_id();
            assert!((1..=10).contains(&id), "id {id} out of range");
        }
    }

    #[test]
    fn test_uniform_ids_cover_the_range() {
        let mut ids = UniformIds::seeded(5, 42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[(ids.next_id() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a: Vec<_> = {
            let mut ids = UniformIds::seeded(DEFAULT_CATALOG_SIZE, 99);
            (0..8).map(|_| ids.next_id()).collect()
        };
        let b: Vec<_> = {
            let mut ids = UniformIds::seeded(DEFAULT_CATALOG_SIZE, 99);
            (0..8).map(|_| ids.next_id()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_max_is_one() {
        let mut ids = UniformIds::seeded(0, 1);
        assert_eq!(ids.max(), 1);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_fixed_ids_replay() {
        let mut ids = FixedIds::new([5, 7]);
        assert_eq!(ids.next_id(), 5);
        assert_eq!(ids.next_id(), 7);
        assert_eq!(ids.next_id(), 7);
    }
}
