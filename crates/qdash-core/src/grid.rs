//! 16×16 probability heatmap, perturbed every 200ms.
//!
//! Aggregates are recomputed from the cells on every read; 256 cells make a
//! full pass cheaper than keeping running totals consistent.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::unit::Simulator;

/// Cells per side.
pub const GRID_SIZE: usize = 16;

/// Total cells.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

const CELL_STEP: f64 = 0.05;

/// Heatmap color at value 0 (`#2563eb`).
pub const LOW_COLOR: (u8, u8, u8) = (37, 99, 235);
/// Heatmap color at value 1 (`#06b6d4`).
pub const HIGH_COLOR: (u8, u8, u8) = (6, 182, 212);

/// Display color of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0.2, 1.0]`.
    pub alpha: f64,
}

impl Rgba {
    /// Composite over a black background.
    pub fn over_black(&self) -> (u8, u8, u8) {
        let scale = |c: u8| (c as f64 * self.alpha).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Linear blend from [`LOW_COLOR`] to [`HIGH_COLOR`]; opacity `0.2 + 0.8p`.
pub fn cell_color(p: f64) -> Rgba {
    let p = p.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * p).floor() as u8;
    Rgba {
        r: lerp(LOW_COLOR.0, HIGH_COLOR.0),
        g: lerp(LOW_COLOR.1, HIGH_COLOR.1),
        b: lerp(LOW_COLOR.2, HIGH_COLOR.2),
        alpha: 0.2 + p * 0.8,
    }
}

/// Four-bit ket label for a row or column index, e.g. `|0101⟩`.
pub fn basis_label(index: usize) -> String {
    format!("|{:04b}⟩", index % GRID_SIZE)
}

/// Aggregates over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStats {
    pub max: f64,
    pub min: f64,
    /// Shannon entropy (bits) of the cells normalized by their sum.
    pub entropy: f64,
    /// `256 · Σp² / (Σp)²`; at least 1 for any non-zero grid.
    pub purity: f64,
}

impl GridStats {
    /// Over any slice of non-negative values. An all-zero slice reports zero
    /// entropy and zero purity.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                max: 0.0,
                min: 0.0,
                entropy: 0.0,
                purity: 0.0,
            };
        }
        let max = values.iter().copied().fold(f64::MIN, f64::max);
        let min = values.iter().copied().fold(f64::MAX, f64::min);
        let sum: f64 = values.iter().sum();
        if sum <= 0.0 {
            return Self {
                max,
                min,
                entropy: 0.0,
                purity: 0.0,
            };
        }

        let mut entropy = 0.0;
        let mut sum_sq = 0.0;
        for &p in values {
            let q = p / sum;
            if q > 0.0 {
                entropy -= q * q.log2();
            }
            sum_sq += p * p;
        }
        let purity = values.len() as f64 * sum_sq / (sum * sum);

        Self {
            max,
            min,
            entropy,
            purity,
        }
    }

    /// `"MAX 99.12%"`-style percentage for max/min.
    pub fn percent(value: f64) -> String {
        format!("{:.2}%", value * 100.0)
    }
}

/// The grid, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityGrid {
    cells: [[f64; GRID_SIZE]; GRID_SIZE],
}

impl ProbabilityGrid {
    /// Every cell drawn from `Uniform(0, 1)`, row by row.
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| rng.next_f64())),
        }
    }

    /// Every cell set to `value` (clamped into `[0, 1]`).
    pub fn filled(value: f64) -> Self {
        Self {
            cells: [[value.clamp(0.0, 1.0); GRID_SIZE]; GRID_SIZE],
        }
    }

    pub fn from_rows(cells: [[f64; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Perturb every cell by `Uniform(-0.05, 0.05)`, clamped into `[0, 1]`.
    pub fn step(&mut self, rng: &mut dyn RandomSource) {
        for row in &mut self.cells {
            for p in row.iter_mut() {
                *p = (*p + rng.symmetric(CELL_STEP)).clamp(0.0, 1.0);
            }
        }
    }

    pub fn rows(&self) -> &[[f64; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Cells flattened row-major.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }

    pub fn stats(&self) -> GridStats {
        let flat: Vec<f64> = self.values().collect();
        GridStats::compute(&flat)
    }
}

impl Simulator for ProbabilityGrid {
    const NAME: &'static str = "grid";
    const PERIOD: Duration = Duration::from_millis(200);

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

    #[test]
    fn uniform_half_grid_has_maximal_entropy_and_unit_purity() {
        let stats = ProbabilityGrid::filled(0.5).stats();
        assert!((stats.entropy - 8.0).abs() < 1e-9);
        assert!((stats.purity - 1.0).abs() < 1e-9);
        assert_eq!(stats.max, 0.5);
        assert_eq!(stats.min, 0.5);
    }

    #[test]
    fn single_hot_cell_has_zero_entropy() {
        let mut cells = [[0.0; GRID_SIZE]; GRID_SIZE];
        cells[3][7] = 0.9;
        let stats = ProbabilityGrid::from_rows(cells).stats();
        assert!(stats.entropy.abs() < 1e-12);
        assert!((stats.purity - 256.0).abs() < 1e-9);
        assert_eq!(stats.max, 0.9);
        assert_eq!(stats.min, 0.0);
    }

    #[test]
    fn all_zero_grid_is_total() {
        let stats = ProbabilityGrid::filled(0.0).stats();
        assert_eq!(stats.entropy, 0.0);
        assert_eq!(stats.purity, 0.0);
    }

    #[test]
    fn random_grids_satisfy_bounds() {
        let mut rng = seeded(21);
        let mut grid = ProbabilityGrid::random(&mut rng);
        for _ in 0..200 {
            grid.step(&mut rng);
            let s = grid.stats();
            assert!(s.entropy >= 0.0 && s.entropy <= 8.0 + 1e-9);
            assert!(s.purity >= 1.0 - 1e-9);
            assert!(s.min >= 0.0 && s.max <= 1.0);
        }
    }

    #[test]
    fn step_perturbs_and_clamps() {
        let mut grid = ProbabilityGrid::filled(0.98);
        grid.step(&mut SequenceSource::constant(0.9));
        assert!(grid.values().all(|p| p == 1.0));

        let mut grid = ProbabilityGrid::filled(0.5);
        grid.step(&mut SequenceSource::constant(0.75));
        assert!(grid.values().all(|p| (p - 0.525).abs() < 1e-12));
    }

    #[test]
    fn random_draws_row_major() {
        let values: Vec<f64> = (0..CELL_COUNT).map(|i| i as f64 / 1000.0).collect();
        let mut src = SequenceSource::new(values);
        let grid = ProbabilityGrid::random(&mut src);
        assert_eq!(grid.get(0, 1), Some(0.001));
        assert_eq!(grid.get(1, 0), Some(0.016));
        assert_eq!(grid.get(16, 0), None);
    }

    #[test]
    fn colors_blend_between_endpoints() {
        let lo = cell_color(0.0);
        assert_eq!((lo.r, lo.g, lo.b), LOW_COLOR);
        assert!((lo.alpha - 0.2).abs() < 1e-12);
        let hi = cell_color(1.0);
        assert_eq!((hi.r, hi.g, hi.b), HIGH_COLOR);
        assert!((hi.alpha - 1.0).abs() < 1e-12);
        let mid = cell_color(0.5);
        assert_eq!((mid.r, mid.g, mid.b), (21, 140, 223));
    }

    #[test]
    fn full_opacity_is_unchanged_over_black() {
        assert_eq!(cell_color(1.0).over_black(), HIGH_COLOR);
        assert_eq!(cell_color(0.0).over_black(), (7, 20, 47));
    }

    #[test]
    fn basis_labels_are_four_bits() {
        assert_eq!(basis_label(0), "|0000⟩");
        assert_eq!(basis_label(15), "|1111⟩");
        assert_eq!(basis_label(5), "|0101⟩");
    }
}
