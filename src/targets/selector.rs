use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::TargetList;

/// Uniform random picker over a [`TargetList`], owned by one virtual user.
#[derive(Debug)]
pub struct UrlSelector {
    rng: StdRng,
}

impl UrlSelector {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Selector for virtual user `vu`: seeded with `seed + vu` when a run seed
    /// is set, from OS entropy otherwise.
    #[must_use]
    pub fn for_virtual_user(seed: Option<u64>, vu: usize) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed.wrapping_add(u64::try_from(vu).unwrap_or(u64::MAX))),
            None => Self::from_entropy(),
        }
    }

    /// Picks a target index uniformly and returns it with its URL.
    pub fn pick<'list>(&mut self, targets: &'list TargetList) -> (usize, &'list str) {
        let index = self.rng.gen_range(0..targets.len());
        (index, targets.url(index))
    }
}
