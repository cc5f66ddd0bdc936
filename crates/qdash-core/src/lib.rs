//! # qdash-core
//!
//! Simulation core for a quantum-processor telemetry dashboard. Nothing here
//! talks to real hardware: every metric is a clamped random walk produced
//! locally on a timer.
//!
//! ## Quick Start
//!
//! ```
//! use std::time::Duration;
//! use qdash_core::{Dashboard, DashboardConfig, ManualClock};
//!
//! let clock = ManualClock::new(0);
//! let mut dashboard = Dashboard::new(&DashboardConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! });
//! dashboard.mount(&clock);
//! dashboard.run_for(&clock, Duration::from_secs(2));
//!
//! let stats = dashboard.grid().unwrap().stats();
//! assert!(stats.purity >= 1.0);
//! println!("{}", dashboard.qubits().unwrap().state_vector_preview());
//! ```
//!
//! ## Architecture
//!
//! Four independent units, each an owned simulator plus its own timer:
//!
//! | unit       | period | state                          |
//! |------------|--------|--------------------------------|
//! | qubits     | 100ms  | 8 [`QubitRecord`]s             |
//! | coherence  | 500ms  | 50-sample [`CoherenceSeries`]  |
//! | gates      | 300ms  | 16-entry [`GateFeed`] log      |
//! | grid       | 200ms  | 16×16 [`ProbabilityGrid`]      |
//!
//! The [`Dashboard`] shell mounts them, polls them against a [`Clock`] and
//! unmounts them. Randomness comes in through [`RandomSource`] so a session
//! can be replayed from a seed.

pub mod bounded;
pub mod clock;
pub mod coherence;
pub mod dashboard;
pub mod gates;
pub mod grid;
pub mod qubit;
pub mod random;
pub mod snapshot;
pub mod unit;

pub use bounded::BoundedLog;
pub use clock::{Clock, ManualClock, SystemClock, format_time_of_day, format_uptime, format_wall};
pub use coherence::{CoherenceReadout, CoherenceSample, CoherenceSeries, Metric};
pub use dashboard::{Dashboard, DashboardConfig, TickReport};
pub use gates::{GateEvent, GateFeed, GateName};
pub use grid::{GridStats, ProbabilityGrid, Rgba, basis_label, cell_color};
pub use qubit::{CoherenceBand, QubitRecord, QubitRegister};
pub use random::{RandomSource, SequenceSource};
pub use snapshot::DashboardSnapshot;
pub use unit::{Simulator, Unit, Uptime};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
