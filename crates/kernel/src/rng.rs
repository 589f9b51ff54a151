//! Seeded pseudo-random source for world generation.
//!
//! A string seed is folded into a 32-bit state with a rolling `hash * 31 + unit`
//! polynomial over its UTF-16 code units, and the stream is a plain LCG
//! (Numerical Recipes constants) over that state. Each generator owns its
//! state, so independent worlds and tests never interfere.

/// LCG multiplier.
const MULTIPLIER: u32 = 1_664_525;
/// LCG increment.
const INCREMENT: u32 = 1_013_904_223;
/// 2^32, the LCG modulus and output divisor.
const MODULUS: f64 = 4_294_967_296.0;

/// Deterministic generator of floats in `[0, 1)`.
///
/// Identical seeds yield identical infinite sequences. Callers that need to
/// reproduce a sequence must start from a fresh instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Build a generator from a string seed. The empty seed hashes to 0.
    pub fn from_seed(seed: &str) -> Self {
        Self::from_state(hash_seed(seed).unsigned_abs())
    }

    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Current generator state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance one LCG step and return the new state scaled into `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT);
        self.state as f64 / MODULUS
    }
}

/// Rolling polynomial hash of the seed, truncated to a signed 32-bit integer.
pub fn hash_seed(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}
