//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through the single `SimRng` seeded once per run.
//! The simulation consumes draws in a fixed sequential order, so the
//! draw sites themselves are part of the determinism contract: a policy
//! that sometimes rolls and sometimes doesn't would shift every draw
//! after it.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::types::Minutes;

/// The run's shared deterministic generator.
pub struct SimRng {
    inner: Pcg64Mcg,
}

impl SimRng {
    pub fn seed_from(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform whole minutes in the inclusive range [low, high].
    pub fn minutes_between(&mut self, low: Minutes, high: Minutes) -> Minutes {
        debug_assert!(low <= high, "empty duration range");
        low + self.next_u64_below((high - low + 1) as u64) as Minutes
    }

    /// The charting escalation roll: uniform in 1..=9, compared against a
    /// configured threshold by the nursing duration formula.
    pub fn escalation_roll(&mut self) -> u32 {
        1 + self.next_u64_below(9) as u32
    }
}
