//! Uniform random sources.
//!
//! RULE: Nothing in the synthesizer calls a platform RNG directly.
//! All randomness flows through a `UniformSource` handed in by the
//! caller, so tests can script every draw.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A source of independent uniform draws in [0.0, 1.0).
///
/// Every helper below is defined in terms of `next_f64`, so a stub
/// that scripts `next_f64` scripts everything.
pub trait UniformSource {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Roll an index in [0, n). Panics if n is 0.
    fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }

    /// Roll a float in [lo, lo + span).
    fn span(&mut self, lo: f64, span: f64) -> f64 {
        lo + self.next_f64() * span
    }

    /// Symmetric noise in [-half_width, +half_width).
    fn noise(&mut self, half_width: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * half_width
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element uniformly.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T
    where
        Self: Sized,
    {
        &items[self.below(items.len())]
    }
}

/// PCG-backed source. Seeded runs are reproducible; entropy runs are not.
pub struct SeedRng {
    inner: Pcg64Mcg,
}

impl SeedRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: Pcg64Mcg::from_entropy(),
        }
    }
}

impl UniformSource for SeedRng {
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
/// Used by tests to pin every random input of a record.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "scripted source needs at least one draw");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "scripted draws must lie in [0, 1)"
        );
        Self { draws, cursor: 0 }
    }

    /// A source that returns the same value forever.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// How many draws have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_streams_are_reproducible() {
        let mut a = SeedRng::seeded(12345);
        let mut b = SeedRng::seeded(12345);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        let mut rng = SeedRng::seeded(7);
        for _ in 0..10_000 {
            let d = rng.next_f64();
            assert!((0.0..1.0).contains(&d), "draw out of range: {d}");
        }
    }

    #[test]
    fn below_never_reaches_n() {
        let mut rng = ScriptedSource::constant(0.999_999_999);
        assert_eq!(rng.below(50), 49);
        let mut rng = ScriptedSource::constant(0.0);
        assert_eq!(rng.below(50), 0);
    }

    #[test]
    fn scripted_source_cycles() {
        let mut rng = ScriptedSource::new(vec![0.1, 0.2]);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.next_f64(), 0.2);
        assert_eq!(rng.next_f64(), 0.1);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn noise_is_symmetric_around_midpoint() {
        let mut rng = ScriptedSource::new(vec![0.0, 0.5]);
        assert_eq!(rng.noise(25.0), -25.0);
        assert_eq!(rng.noise(25.0), 0.0);
    }
}
