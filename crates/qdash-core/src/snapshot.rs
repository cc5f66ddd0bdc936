//! Serializable capture of a mounted dashboard.
//!
//! Used by the monitor's export key and by the headless `stream` and
//! `snapshot` commands. Every field round-trips through JSON unchanged.

use serde::{Deserialize, Serialize};

use crate::coherence::CoherenceSeries;
use crate::gates::GateFeed;
use crate::grid::{GridStats, ProbabilityGrid};
use crate::qubit::QubitRegister;

/// Full dashboard state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub session_id: String,
    /// `YYYY-MM-DD HH:MM:SS` (UTC).
    pub captured_at: String,
    pub wall_millis: u64,
    pub uptime_secs: u64,
    pub qubits: QubitRegister,
    pub coherence: CoherenceSeries,
    pub gates: GateFeed,
    pub grid: ProbabilityGrid,
    /// Derived from `grid` at capture time.
    pub grid_stats: GridStats,
}

impl DashboardSnapshot {
    /// Single-line JSON, one snapshot per line when streaming.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
