//! Pseudo-random source used by every simulator.
//!
//! Simulators never reach for a global generator. They draw through
//! [`RandomSource`], which any `rand` generator satisfies, so a dashboard can
//! run on OS entropy in production and on a fixed seed (or a scripted
//! [`SequenceSource`]) under test.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A source of uniform draws in `[0, 1)`.
///
/// Only [`next_f64`](RandomSource::next_f64) is required; the ranged helpers
/// are derived from it so that every draw consumes exactly one value.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform draw in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform draw in `[-half_width, half_width)`.
    fn symmetric(&mut self, half_width: f64) -> f64 {
        (self.next_f64() - 0.5) * 2.0 * half_width
    }

    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Deterministic generator for reproducible runs.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generator seeded from the operating system.
pub fn from_os_entropy() -> StdRng {
    StdRng::from_os_rng()
}

// ---------------------------------------------------------------------------
// SequenceSource
// ---------------------------------------------------------------------------

/// Replays a fixed list of draws, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` on construction. An empty list yields
/// `0.0` forever.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, pos: 0 }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            self.pos += 1;
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sources_repeat() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn draws_stay_in_unit_interval() {
        let mut rng = seeded(42);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "draw out of range: {v}");
        }
    }

    #[test]
    fn symmetric_maps_midpoint_to_zero() {
        let mut src = SequenceSource::new([0.0, 0.5, 0.75]);
        assert!((src.symmetric(0.05) + 0.05).abs() < 1e-12);
        assert_eq!(src.symmetric(0.05), 0.0);
        assert!((src.symmetric(0.05) - 0.025).abs() < 1e-12);
    }

    #[test]
    fn uniform_scales_into_range() {
        let mut src = SequenceSource::new([0.0, 0.5]);
        assert_eq!(src.uniform(2.0, 4.0), 2.0);
        assert_eq!(src.uniform(2.0, 4.0), 3.0);
    }

    #[test]
    fn index_covers_range_without_overflow() {
        let mut src = SequenceSource::new([0.0, 0.124, 0.125, 0.999_999]);
        assert_eq!(src.index(8), 0);
        assert_eq!(src.index(8), 0);
        assert_eq!(src.index(8), 1);
        assert_eq!(src.index(8), 7);
        assert_eq!(src.index(0), 0);
    }

    #[test]
    fn sequence_wraps_and_counts() {
        let mut src = SequenceSource::new([0.1, 0.2]);
        assert_eq!(src.next_f64(), 0.1);
        assert_eq!(src.next_f64(), 0.2);
        assert_eq!(src.next_f64(), 0.1);
        assert_eq!(src.draws(), 3);
    }

    #[test]
    fn sequence_clamps_out_of_range_values() {
        let mut src = SequenceSource::new([1.5, -0.2]);
        assert!(src.next_f64() < 1.0);
        assert_eq!(src.next_f64(), 0.0);
    }

    #[test]
    fn empty_sequence_yields_zero() {
        let mut src = SequenceSource::default();
        assert_eq!(src.next_f64(), 0.0);
        assert_eq!(src.index(10), 0);
    }

    #[test]
    fn usable_as_trait_object() {
        let mut rng = seeded(1);
        let dynamic: &mut dyn RandomSource = &mut rng;
        let v = dynamic.uniform(0.0, 10.0);
        assert!((0.0..10.0).contains(&v));
    }
}
