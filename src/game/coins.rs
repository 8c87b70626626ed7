//! Injectable coin flips
//!
//! Every random outcome in a match (coin flips, shuffles, the opening flip)
//! goes through a `CoinSource`, so a match replays exactly under a fixed seed
//! and tests can script the outcomes they need.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coin {
    Heads,
    Tails,
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coin::Heads => write!(f, "heads"),
            Coin::Tails => write!(f, "tails"),
        }
    }
}

/// Source of coin flips and random indices
pub trait CoinSource {
    fn flip(&mut self) -> Coin;

    /// Uniform index in `0..bound` (0 when `bound` is 0)
    fn index(&mut self, bound: usize) -> usize;

    /// Flip `flips` coins and count how many landed on `want`
    fn count(&mut self, flips: u8, want: Coin) -> u32 {
        (0..flips).filter(|_| self.flip() == want).count() as u32
    }
}

/// Seeded source backed by ChaCha12
///
/// Serializable so a paused match can be resumed with the same future flips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededCoins {
    rng: ChaCha12Rng,
}

impl SeededCoins {
    pub fn new(seed: u64) -> Self {
        SeededCoins {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl CoinSource for SeededCoins {
    fn flip(&mut self) -> Coin {
        if self.rng.gen_bool(0.5) {
            Coin::Heads
        } else {
            Coin::Tails
        }
    }

    fn index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            0
        } else {
            self.rng.gen_range(0..bound)
        }
    }
}

/// Replays a fixed list of outcomes
///
/// Once the script runs out, flips come up heads and indices are 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCoins {
    flips: VecDeque<Coin>,
    indices: VecDeque<usize>,
    flips_made: usize,
}

impl ScriptedCoins {
    pub fn new(flips: Vec<Coin>) -> Self {
        ScriptedCoins {
            flips: flips.into(),
            indices: VecDeque::new(),
            flips_made: 0,
        }
    }

    pub fn with_indices(mut self, indices: Vec<usize>) -> Self {
        self.indices = indices.into();
        self
    }

    /// Number of flips consumed so far
    pub fn flips_made(&self) -> usize {
        self.flips_made
    }

    pub fn remaining(&self) -> usize {
        self.flips.len()
    }
}

impl CoinSource for ScriptedCoins {
    fn flip(&mut self) -> Coin {
        self.flips_made += 1;
        self.flips.pop_front().unwrap_or(Coin::Heads)
    }

    fn index(&mut self, bound: usize) -> usize {
        match self.indices.pop_front() {
            Some(i) if bound > 0 => i % bound,
            _ => 0,
        }
    }
}
