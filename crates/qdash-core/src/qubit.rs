//! Qubit register: eight amplitude/phase/coherence records on a 100ms walk.
//!
//! Each record starts normalized (`alpha² + beta² = 1`) but `alpha` and
//! `beta` are perturbed independently afterwards and are not renormalized,
//! so the norm drifts over a session. [`QubitRecord::norm_squared`] exposes
//! that drift.

use std::f64::consts::TAU;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::unit::Simulator;

/// Records in the register.
pub const QUBIT_COUNT: usize = 8;

/// Records shown in the state-vector preview.
pub const PREVIEW_QUBITS: usize = 4;

const AMPLITUDE_STEP: f64 = 0.05;
const PHASE_STEP: f64 = 0.1;
const COHERENCE_DRIFT: f64 = 0.002;
const COHERENCE_FLOOR: f64 = 0.5;
const COHERENCE_INIT_MIN: f64 = 0.7;
const COHERENCE_INIT_SPREAD: f64 = 0.3;

/// Display band for a qubit's coherence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoherenceBand {
    /// Above 0.8.
    High,
    /// Above 0.6.
    Medium,
    Low,
}

impl CoherenceBand {
    pub fn of(coherence: f64) -> Self {
        if coherence > 0.8 {
            Self::High
        } else if coherence > 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// One two-level state-like record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QubitRecord {
    /// Amplitude of |0⟩, in `[0, 1]`.
    pub alpha: f64,
    /// Amplitude of |1⟩, in `[0, 1]`.
    pub beta: f64,
    /// Relative phase in radians, in `[0, 2π)`.
    pub phase: f64,
    /// In `[0.5, 1]`.
    pub coherence: f64,
}

impl QubitRecord {
    /// Fresh normalized record. Draws alpha, phase, coherence in that order.
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        let alpha = rng.next_f64();
        let beta = (1.0 - alpha * alpha).sqrt();
        let phase = rng.uniform(0.0, TAU) % TAU;
        let coherence = COHERENCE_INIT_MIN + rng.uniform(0.0, COHERENCE_INIT_SPREAD);
        Self {
            alpha,
            beta,
            phase,
            coherence,
        }
    }

    /// One 100ms step. Draws alpha, beta, coherence in that order.
    pub fn step(&mut self, rng: &mut dyn RandomSource) {
        self.alpha = (self.alpha + rng.symmetric(AMPLITUDE_STEP)).clamp(0.0, 1.0);
        self.beta = (self.beta + rng.symmetric(AMPLITUDE_STEP)).clamp(0.0, 1.0);
        self.phase = (self.phase + PHASE_STEP) % TAU;
        self.coherence = (self.coherence - COHERENCE_DRIFT + rng.uniform(0.0, 2.0 * COHERENCE_DRIFT))
            .clamp(COHERENCE_FLOOR, 1.0);
    }

    /// `alpha² + beta²`; exactly 1 only until the first step.
    pub fn norm_squared(&self) -> f64 {
        self.alpha * self.alpha + self.beta * self.beta
    }

    /// Marker position on a unit disc: `(cos φ · alpha, sin φ · beta)`.
    pub fn bloch_point(&self) -> (f64, f64) {
        (self.phase.cos() * self.alpha, self.phase.sin() * self.beta)
    }

    pub fn band(&self) -> CoherenceBand {
        CoherenceBand::of(self.coherence)
    }

    /// Coherence as a whole percentage, e.g. `"87%"`.
    pub fn coherence_label(&self) -> String {
        format!("{:.0}%", self.coherence * 100.0)
    }
}

/// The full register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubitRegister {
    qubits: [QubitRecord; QUBIT_COUNT],
}

impl QubitRegister {
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        Self {
            qubits: std::array::from_fn(|_| QubitRecord::random(rng)),
        }
    }

    pub fn from_records(qubits: [QubitRecord; QUBIT_COUNT]) -> Self {
        Self { qubits }
    }

    pub fn records(&self) -> &[QubitRecord; QUBIT_COUNT] {
        &self.qubits
    }

    pub fn step(&mut self, rng: &mut dyn RandomSource) {
        for q in &mut self.qubits {
            q.step(rng);
        }
    }

    /// `"0.42|000⟩ + 0.97|001⟩ + 0.13|010⟩ + 0.66|011⟩ + ..."`
    pub fn state_vector_preview(&self) -> String {
        let mut out = String::new();
        for (i, q) in self.qubits.iter().take(PREVIEW_QUBITS).enumerate() {
            out.push_str(&format!("{:.2}|{i:03b}⟩ + ", q.alpha));
        }
        out.push_str("...");
        out
    }

    /// Mean coherence across the register.
    pub fn mean_coherence(&self) -> f64 {
        self.qubits.iter().map(|q| q.coherence).sum::<f64>() / QUBIT_COUNT as f64
    }
}

impl Simulator for QubitRegister {
    const NAME: &'static str = "qubits";
    const PERIOD: Duration = Duration::from_millis(100);

    fn mount(rng: &mut dyn RandomSource) -> Self {
        Self::random(rng)
    }

    fn tick(&mut self, rng: &mut dyn RandomSource, _wall_ms: u64) {
        self.step(rng);
    }
}
