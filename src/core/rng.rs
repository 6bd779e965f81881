//! Deterministic random number generation and the dice/coin randomizer.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Injectable**: Anything implementing `RngCore` is a `Randomizer`,
//!   so tests can script outcomes and production can seed from the OS
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use duel_engine::core::{CoinFace, GameRng, Randomizer};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//!
//! let roll = a.roll_dice();
//! assert!((1..=6).contains(&roll));
//! assert_eq!(roll, b.roll_dice());
//! assert_eq!(a.flip_coin(), b.flip_coin());
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Result of a coin flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinFace {
    Heads,
    Tails,
}

impl std::fmt::Display for CoinFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoinFace::Heads => f.write_str("Heads"),
            CoinFace::Tails => f.write_str("Tails"),
        }
    }
}

/// Source of dice rolls and coin flips.
///
/// Blanket-implemented for every `RngCore`, so the match RNG, a seeded
/// test RNG, or `rand::thread_rng()` can all be used interchangeably.
pub trait Randomizer {
    /// Roll a six-sided die: uniform in `1..=6`.
    fn roll_dice(&mut self) -> u8;

    /// Flip a fair coin.
    fn flip_coin(&mut self) -> CoinFace;
}

impl<R: RngCore> Randomizer for R {
    fn roll_dice(&mut self) -> u8 {
        self.gen_range(1..=6)
    }

    fn flip_coin(&mut self) -> CoinFace {
        if self.gen_bool(0.5) {
            CoinFace::Heads
        } else {
            CoinFace::Tails
        }
    }
}

/// Deterministic match RNG.
///
/// Uses ChaCha8 for speed while maintaining good statistical quality.
/// The seed is kept so a whole match can be replayed from it.
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

    /// Create an RNG seeded from the operating system.
    ///
    /// Production matches use this; the chosen seed is still recorded
    /// and available through `seed()` for replays.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Serializable RNG state for snapshots.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
