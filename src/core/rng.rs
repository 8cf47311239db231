//! Deterministic random number generation for shuffles and AI choices.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for different purposes, so an
//!   AI policy drawing random numbers never changes how decks shuffle
//!
//! ```
//! use card_combat::core::GameRng;
//!
//! let rng = GameRng::new(42);
//! let mut shuffles = rng.for_context("shuffle");
//! let mut ai = rng.for_context("ai");
//!
//! let a: Vec<_> = (0..5).map(|_| shuffles.gen_range_usize(0..100)).collect();
//! let b: Vec<_> = (0..5).map(|_| ai.gen_range_usize(0..100)).collect();
//! assert_ne!(a, b);
//! ```

use im::Vector;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Fisher–Yates shuffle of a persistent vector.
    ///
    /// Walks from the back, swapping each position with a uniformly chosen
    /// index at or before it, so every permutation is equally likely.
    pub fn shuffle_vector<T: Clone>(&mut self, cards: &mut Vector<T>) {
        for i in (1..cards.len()).rev() {
            let j = self.inner.gen_range(0..=i);
            cards.swap(i, j);
        }
    }
}
