//! Host shell: four independent simulator units plus the uptime counter.
//!
//! The dashboard owns one random source and hands it to whichever unit is
//! due. Units never see each other's state; the shell only mounts, polls and
//! unmounts them.

use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use uuid::Uuid;

use crate::clock::{Clock, ManualClock, format_uptime, format_wall};
use crate::coherence::CoherenceSeries;
use crate::gates::GateFeed;
use crate::grid::ProbabilityGrid;
use crate::qubit::{QUBIT_COUNT, QubitRegister};
use crate::random::{self, RandomSource};
use crate::snapshot::DashboardSnapshot;
use crate::unit::{Unit, Uptime};

// ---------------------------------------------------------------------------
// Static header content
// ---------------------------------------------------------------------------

pub const LAB_NAME: &str = "OBARO LABS";
pub const TITLE: &str = "QUANTUM DASHBOARD v1.0";
pub const PROCESSOR_STATUS: &str = "QUANTUM PROCESSOR ONLINE";
pub const NOMINAL_FIDELITY: &str = "99.2%";
pub const TEMPERATURE: &str = "15mK";
pub const SOURCE_URL: &str = "https://github.com/kloudski/obaro-quantum-dashboard";
pub const PORTFOLIO_URL: &str = "https://kloudski.dev";

/// Qubit count shown in the status bar.
pub const QUBITS: usize = QUBIT_COUNT;

/// Smallest unit period; virtual-time runs step by this much so that no
/// unit ever needs to catch up.
pub const VIRTUAL_STEP: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Dashboard construction options.
#[derive(Debug, Clone, Default)]
pub struct DashboardConfig {
    /// Fixed seed for a reproducible session; OS entropy when `None`.
    pub seed: Option<u64>,
    /// Mount the gate feed paused.
    pub start_paused: bool,
}

/// Ticks fired by one [`Dashboard::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub qubits: u32,
    pub coherence: u32,
    pub gates: u32,
    pub grid: u32,
    pub uptime: u32,
}

impl TickReport {
    pub fn total(&self) -> u32 {
        self.qubits + self.coherence + self.gates + self.grid + self.uptime
    }

    fn accumulate(&mut self, other: TickReport) {
        self.qubits += other.qubits;
        self.coherence += other.coherence;
        self.gates += other.gates;
        self.grid += other.grid;
        self.uptime += other.uptime;
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub struct Dashboard<R: RandomSource = StdRng> {
    rng: R,
    start_paused: bool,
    session_id: Option<Uuid>,
    qubits: Unit<QubitRegister>,
    coherence: Unit<CoherenceSeries>,
    gates: Unit<GateFeed>,
    grid: Unit<ProbabilityGrid>,
    uptime: Unit<Uptime>,
}

impl Dashboard<StdRng> {
    pub fn new(config: &DashboardConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => random::seeded(seed),
            None => random::from_os_entropy(),
        };
        let mut dashboard = Self::with_rng(rng);
        dashboard.start_paused = config.start_paused;
        dashboard
    }
}

impl<R: RandomSource> Dashboard<R> {
    /// Unmounted dashboard drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            start_paused: false,
            session_id: None,
            qubits: Unit::new(),
            coherence: Unit::new(),
            gates: Unit::new(),
            grid: Unit::new(),
            uptime: Unit::new(),
        }
    }

    /// Activate every unit. Initial state is drawn in the order qubits,
    /// coherence, gates, grid.
    pub fn mount(&mut self, clock: &impl Clock) {
        if self.is_mounted() {
            return;
        }
        let now = clock.elapsed();
        self.qubits.mount(now, &mut self.rng);
        self.coherence.mount(now, &mut self.rng);
        self.gates.mount(now, &mut self.rng);
        self.grid.mount(now, &mut self.rng);
        self.uptime.mount(now, &mut self.rng);

        if self.start_paused {
            if let Some(feed) = self.gates.state_mut() {
                feed.set_running(false);
            }
            self.gates.sync(now);
        }

        let id = Uuid::new_v4();
        self.session_id = Some(id);
        info!("dashboard session {id} mounted");
    }

    /// Deactivate every unit, cancelling all timers and discarding state.
    pub fn unmount(&mut self) {
        if let Some(id) = self.session_id.take() {
            info!("dashboard session {id} unmounted");
        }
        self.qubits.unmount();
        self.coherence.unmount();
        self.gates.unmount();
        self.grid.unmount();
        self.uptime.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.session_id.is_some()
    }

    /// Fire every due tick across all units.
    pub fn poll(&mut self, clock: &impl Clock) -> TickReport {
        let now = clock.elapsed();
        let wall = clock.wall_millis();
        TickReport {
            qubits: self.qubits.advance(now, &mut self.rng, wall),
            coherence: self.coherence.advance(now, &mut self.rng, wall),
            gates: self.gates.advance(now, &mut self.rng, wall),
            grid: self.grid.advance(now, &mut self.rng, wall),
            uptime: self.uptime.advance(now, &mut self.rng, wall),
        }
    }

    /// Advance a virtual clock by `total`, polling at every
    /// [`VIRTUAL_STEP`] so that each tick sees its own due time.
    pub fn run_for(&mut self, clock: &ManualClock, total: Duration) -> TickReport {
        let mut report = TickReport::default();
        let mut remaining = total;
        while !remaining.is_zero() {
            let step = remaining.min(VIRTUAL_STEP);
            clock.advance(step);
            remaining -= step;
            report.accumulate(self.poll(clock));
        }
        report
    }

    /// Pause or resume the gate feed. Returns the new running state, or
    /// `None` when unmounted.
    pub fn toggle_gate_feed(&mut self, clock: &impl Clock) -> Option<bool> {
        let running = self.gates.state_mut()?.toggle();
        self.gates.sync(clock.elapsed());
        debug!("gate feed {}", if running { "resumed" } else { "paused" });
        Some(running)
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn qubits(&self) -> Option<&QubitRegister> {
        self.qubits.state()
    }

    pub fn coherence(&self) -> Option<&CoherenceSeries> {
        self.coherence.state()
    }

    pub fn gates(&self) -> Option<&GateFeed> {
        self.gates.state()
    }

    pub fn grid(&self) -> Option<&ProbabilityGrid> {
        self.grid.state()
    }

    /// Whether the gate feed has a timer registered.
    pub fn gate_timer_armed(&self) -> bool {
        self.gates.is_armed()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.uptime.state().map_or(0, |u| u.seconds)
    }

    /// `HH:MM:SS`.
    pub fn uptime_label(&self) -> String {
        format_uptime(self.uptime_secs())
    }

    /// `YYYY-MM-DD HH:MM:SS` (UTC).
    pub fn wall_label(&self, clock: &impl Clock) -> String {
        format_wall(clock.wall_millis())
    }

    /// Capture of every unit's state; `None` when unmounted.
    pub fn snapshot(&self, clock: &impl Clock) -> Option<DashboardSnapshot> {
        let wall_millis = clock.wall_millis();
        let grid = self.grid()?.clone();
        Some(DashboardSnapshot {
            session_id: self.session_id?.to_string(),
            captured_at: format_wall(wall_millis),
            wall_millis,
            uptime_secs: self.uptime_secs(),
            grid_stats: grid.stats(),
            qubits: self.qubits()?.clone(),
            coherence: self.coherence()?.clone(),
            gates: self.gates()?.clone(),
            grid,
        })
    }
}

impl<R: RandomSource> Drop for Dashboard<R> {
    fn drop(&mut self) {
        self.unmount();
    }
}
