//! Round generation.
//!
//! Each round is two independent uniform draws from `0..=9`. The generator is
//! generic over any [`rand::Rng`] so tests can inject a seeded source, while the
//! batch layer derives one ChaCha20 stream per run from a master seed:
//! run `i` uses `ChaCha20Rng::seed_from_u64(master)` on stream `i`. Streams never
//! overlap, so runs stay independent and results do not depend on whether the
//! batch executes sequentially or in parallel.

use martingale_types::{RoundOutcome, MAX_SCORE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Anything that can produce successive round outcomes.
pub trait RoundSource {
    fn next_round(&mut self) -> RoundOutcome;
}

impl<S: RoundSource + ?Sized> RoundSource for &mut S {
    fn next_round(&mut self) -> RoundOutcome {
        (**self).next_round()
    }
}

/// Draws rounds from a random number generator.
#[derive(Clone, Debug)]
pub struct RoundGenerator<R> {
    rng: R,
}

impl<R: Rng> RoundGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draw one round, advancing the underlying generator by two samples.
    pub fn generate(&mut self) -> RoundOutcome {
        let player = self.rng.gen_range(0..=MAX_SCORE);
        let banker = self.rng.gen_range(0..=MAX_SCORE);
        RoundOutcome::saturating(player, banker)
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RoundGenerator<ChaCha20Rng> {
    /// Deterministic generator for a single seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha20Rng::seed_from_u64(seed))
    }

    /// Generator for run `run` of a batch derived from `master`.
    pub fn for_run(master: u64, run: usize) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(master);
        rng.set_stream(run as u64);
        Self::new(rng)
    }

    /// Non-deterministic generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha20Rng::from_entropy())
    }
}

impl<R: Rng> RoundSource for RoundGenerator<R> {
    fn next_round(&mut self) -> RoundOutcome {
        self.generate()
    }
}

/// Draw a fresh master seed from the operating system.
pub fn entropy_seed() -> u64 {
    rand::rngs::OsRng.gen()
}
