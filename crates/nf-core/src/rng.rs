//! Simulation-level RNG wrapper.
//!
//! One `SimRng` per simulation instance drives every random draw: threshold
//! response delays, response head-counts and random-event rolls.  Instances
//! never share RNG state, so running several simulations side by side needs
//! no synchronisation.
//!
//! Replay determinism is not a goal of the core.  Seed the RNG explicitly
//! (tests, debugging) or let it pull from OS entropy (normal play).

use std::ops::RangeInclusive;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// An entropy-seeded RNG.
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }

    /// Seeded when `seed` is `Some`, entropy-seeded otherwise.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => SimRng::new(s),
            None => SimRng::from_entropy(),
        }
    }

    /// Uniform draw from `range`, tolerating reversed or single-point bounds.
    pub fn between(&mut self, range: RangeInclusive<u64>) -> u64 {
        let (lo, hi) = (*range.start(), *range.end());
        if lo >= hi {
            return lo.min(hi);
        }
        self.0.gen_range(lo..=hi)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
