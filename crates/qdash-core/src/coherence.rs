//! Coherence decay time series: a 50-sample sliding window advanced every
//! 500ms.
//!
//! Coherence and fidelity drift downward toward floors of 0.3 and 0.7; the
//! error rate drifts upward toward a ceiling of 0.15.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bounded::BoundedLog;
use crate::random::RandomSource;
use crate::unit::Simulator;

/// Samples retained in the window.
pub const WINDOW: usize = 50;

pub const COHERENCE_FLOOR: f64 = 0.3;
pub const FIDELITY_FLOOR: f64 = 0.7;
pub const ERROR_RATE_CEILING: f64 = 0.15;

/// Latest coherence above this is reported healthy.
pub const HEALTHY_COHERENCE: f64 = 0.7;

/// One point of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoherenceSample {
    pub tick: u64,
    pub coherence: f64,
    pub fidelity: f64,
    pub error_rate: f64,
}

impl CoherenceSample {
    /// Seed sample for position `tick` of the initial window.
    pub fn initial(tick: u64, rng: &mut dyn RandomSource) -> Self {
        let t = tick as f64;
        Self {
            tick,
            coherence: 0.95 - t * 0.008 + rng.uniform(0.0, 0.05),
            fidelity: 0.99 - t * 0.002 + rng.uniform(0.0, 0.02),
            error_rate: 0.01 + t * 0.001 + rng.uniform(0.0, 0.005),
        }
    }

    /// The sample that follows `self`.
    pub fn successor(&self, rng: &mut dyn RandomSource) -> Self {
        Self {
            tick: self.tick + 1,
            coherence: (self.coherence - 0.008 + rng.uniform(0.0, 0.01)).max(COHERENCE_FLOOR),
            fidelity: (self.fidelity - 0.002 + rng.uniform(0.0, 0.004)).max(FIDELITY_FLOOR),
            error_rate: (self.error_rate + 0.001 + rng.uniform(0.0, 0.002))
                .min(ERROR_RATE_CEILING),
        }
    }
}

/// Which column of the series to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Coherence,
    Fidelity,
    ErrorRate,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Coherence, Metric::Fidelity, Metric::ErrorRate];

    pub fn label(self) -> &'static str {
        match self {
            Self::Coherence => "COHERENCE",
            Self::Fidelity => "FIDELITY",
            Self::ErrorRate => "ERROR",
        }
    }

    pub fn value_of(self, s: &CoherenceSample) -> f64 {
        match self {
            Self::Coherence => s.coherence,
            Self::Fidelity => s.fidelity,
            Self::ErrorRate => s.error_rate,
        }
    }

    /// Decimal places used when the value is shown as a percentage.
    pub fn precision(self) -> usize {
        match self {
            Self::Coherence => 1,
            Self::Fidelity => 2,
            Self::ErrorRate => 3,
        }
    }

    /// `value * 100` with this metric's precision, e.g. `"97.52%"`.
    pub fn format_percent(self, value: f64) -> String {
        format!("{:.*}%", self.precision(), value * 100.0)
    }
}

/// Formatted latest values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceReadout {
    pub coherence: String,
    pub fidelity: String,
    pub error_rate: String,
    pub coherence_healthy: bool,
}

/// The sliding window, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceSeries {
    window: BoundedLog<CoherenceSample>,
}

impl CoherenceSeries {
    /// Initial window for ticks `0..50`.
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        let mut window = BoundedLog::new(WINDOW);
        for tick in 0..WINDOW as u64 {
            window.push(CoherenceSample::initial(tick, rng));
        }
        Self { window }
    }

    /// Window built from explicit samples; keeps the last [`WINDOW`].
    pub fn from_samples(samples: impl IntoIterator<Item = CoherenceSample>) -> Self {
        let mut window = BoundedLog::new(WINDOW);
        for s in samples {
            window.push(s);
        }
        Self { window }
    }

    /// Append the successor of the newest sample, evicting the oldest.
    pub fn step(&mut self, rng: &mut dyn RandomSource) {
        let Some(last) = self.window.latest().copied() else {
            return;
        };
        self.window.push(last.successor(rng));
    }

    pub fn samples(&self) -> &BoundedLog<CoherenceSample> {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn latest(&self) -> Option<&CoherenceSample> {
        self.window.latest()
    }

    /// `(tick, value)` pairs for charting.
    pub fn series(&self, metric: Metric) -> Vec<(f64, f64)> {
        self.window
            .iter()
            .map(|s| (s.tick as f64, metric.value_of(s)))
            .collect()
    }

    pub fn readout(&self) -> Option<CoherenceReadout> {
        self.latest().map(|s| CoherenceReadout {
            coherence: Metric::Coherence.format_percent(s.coherence),
            fidelity: Metric::Fidelity.format_percent(s.fidelity),
            error_rate: Metric::ErrorRate.format_percent(s.error_rate),
            coherence_healthy: s.coherence > HEALTHY_COHERENCE,
        })
    }
}

impl Simulator for CoherenceSeries {
    const NAME: &'static str = "coherence";
    const PERIOD: Duration = Duration::from_millis(500);

    fn mount(rng: &mut dyn RandomSource) -> Self {
        Self::random(rng)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource, _wall_ms: u64) {
        self.step(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{SequenceSource, seeded};

    fn sample(tick: u64, coherence: f64, fidelity: f64, error_rate: f64) -> CoherenceSample {
        CoherenceSample {
            tick,
            coherence,
            fidelity,
            error_rate,
        }
    }

    #[test]
    fn initial_window_is_full_and_ordered() {
        let mut rng = seeded(5);
        let series = CoherenceSeries::random(&mut rng);
        assert_eq!(series.len(), WINDOW);
        let ticks: Vec<u64> = series.samples().iter().map(|s| s.tick).collect();
        assert_eq!(ticks, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn initial_sample_follows_formula() {
        let mut src = SequenceSource::new([0.5, 0.5, 0.5]);
        let s = CoherenceSample::initial(10, &mut src);
        assert!((s.coherence - (0.95 - 0.08 + 0.025)).abs() < 1e-12);
        assert!((s.fidelity - (0.99 - 0.02 + 0.01)).abs() < 1e-12);
        assert!((s.error_rate - (0.01 + 0.01 + 0.0025)).abs() < 1e-12);
    }

    #[test]
    fn successor_follows_formula() {
        let mut src = SequenceSource::new([0.5, 0.5, 0.5]);
        let next = sample(7, 0.8, 0.9, 0.05).successor(&mut src);
        assert_eq!(next.tick, 8);
        assert!((next.coherence - 0.797).abs() < 1e-12);
        assert!((next.fidelity - 0.9).abs() < 1e-12);
        assert!((next.error_rate - 0.052).abs() < 1e-12);
    }

    #[test]
    fn successor_respects_floors_and_ceiling() {
        let mut src = SequenceSource::constant(0.0);
        let next = sample(0, 0.301, 0.7005, 0.1495).successor(&mut src);
        assert_eq!(next.coherence, COHERENCE_FLOOR);
        assert_eq!(next.fidelity, FIDELITY_FLOOR);
        assert_eq!(next.error_rate, ERROR_RATE_CEILING);
    }

    #[test]
    fn step_slides_window() {
        let mut rng = seeded(9);
        let mut series = CoherenceSeries::random(&mut rng);
        series.step(&mut rng);
        assert_eq!(series.len(), WINDOW);
        assert_eq!(series.samples().oldest().map(|s| s.tick), Some(1));
        assert_eq!(series.latest().map(|s| s.tick), Some(50));
    }

    #[test]
    fn empty_series_does_not_step() {
        let mut src = SequenceSource::constant(0.5);
        let mut series = CoherenceSeries::from_samples([]);
        series.step(&mut src);
        assert!(series.is_empty());
        assert!(series.readout().is_none());
    }

    #[test]
    fn readout_uses_per_metric_precision() {
        let series = CoherenceSeries::from_samples([sample(3, 0.8312, 0.975_24, 0.041_234)]);
        let r = series.readout().unwrap();
        assert_eq!(r.coherence, "83.1%");
        assert_eq!(r.fidelity, "97.52%");
        assert_eq!(r.error_rate, "4.123%");
        assert!(r.coherence_healthy);
    }

    #[test]
    fn readout_flags_low_coherence() {
        let series = CoherenceSeries::from_samples([sample(3, 0.65, 0.9, 0.05)]);
        assert!(!series.readout().unwrap().coherence_healthy);
    }

    #[test]
    fn series_extracts_column() {
        let series = CoherenceSeries::from_samples([
            sample(4, 0.9, 0.95, 0.02),
            sample(5, 0.85, 0.94, 0.03),
        ]);
        assert_eq!(series.series(Metric::Fidelity), vec![(4.0, 0.95), (5.0, 0.94)]);
        assert_eq!(Metric::ErrorRate.label(), "ERROR");
    }
}
