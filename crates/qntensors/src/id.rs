//! Index identity generation.
//!
//! Every non-null [`Index`](crate::index::Index) carries a process-unique
//! 64-bit identifier. Uniqueness relies on the size of the identifier space,
//! not on cross-thread coordination: each worker constructs its own
//! [`IdGenerator`] and passes it to the constructors that mint ids, so no
//! shared mutable state exists.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Opaque index identifier. `0` denotes the null/unset identity.
pub type Id = u64;

/// RNG-backed identifier generator.
///
/// One instance per worker or thread; never shared. Collisions between
/// generators are possible in principle but vanishingly unlikely over a
/// process lifetime.
#[derive(Debug)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    /// Create a generator seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministically seeded generator (reproducible tests).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Return a fresh non-zero identifier.
    pub fn generate(&mut self) -> Id {
        loop {
            let id: u64 = self.rng.gen();
            if id != 0 {
                return id;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
