//! Gate-operation feed: a random gate every 300ms into a 16-entry log,
//! pausable without losing history.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bounded::BoundedLog;
use crate::clock::format_time_of_day;
use crate::qubit::QUBIT_COUNT;
use crate::random::RandomSource;
use crate::unit::Simulator;

/// Entries retained in the log.
pub const LOG_CAPACITY: usize = 16;

/// Entries shown in the operation log view.
pub const RECENT_LINES: usize = 5;

/// Gate labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateName {
    H,
    X,
    Y,
    Z,
    Cnot,
    T,
    S,
    Rx,
    Ry,
    Rz,
}

impl GateName {
    /// Draw table, in draw-index order.
    pub const ALL: [GateName; 10] = [
        GateName::H,
        GateName::X,
        GateName::Y,
        GateName::Z,
        GateName::Cnot,
        GateName::T,
        GateName::S,
        GateName::Rx,
        GateName::Ry,
        GateName::Rz,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::H => "H",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::Cnot => "CNOT",
            Self::T => "T",
            Self::S => "S",
            Self::Rx => "RX",
            Self::Ry => "RY",
            Self::Rz => "RZ",
        }
    }

    /// Only CNOT carries a control qubit.
    pub fn is_controlled(self) -> bool {
        self == Self::Cnot
    }
}

impl fmt::Display for GateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One simulated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateEvent {
    /// Unique within the feed that produced it.
    pub id: u64,
    pub gate: GateName,
    pub target: u8,
    /// Present for CNOT only; may equal `target`.
    pub control: Option<u8>,
    pub timestamp_ms: u64,
}

impl GateEvent {
    /// `"14:07:05.042 CNOT on Q3 (ctrl: Q5)"`
    pub fn log_line(&self) -> String {
        let mut line = format!(
            "{} {} on Q{}",
            format_time_of_day(self.timestamp_ms),
            self.gate,
            self.target
        );
        if let Some(c) = self.control {
            line.push_str(&format!(" (ctrl: Q{c})"));
        }
        line
    }
}

/// Running/paused gate generator plus its bounded log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateFeed {
    running: bool,
    log: BoundedLog<GateEvent>,
    next_id: u64,
}

impl Default for GateFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl GateFeed {
    /// Empty log, running.
    pub fn new() -> Self {
        Self {
            running: true,
            log: BoundedLog::new(LOG_CAPACITY),
            next_id: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Flip running/paused; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    /// Append one random event. Does nothing while paused.
    ///
    /// Draws gate, target, then control (CNOT only).
    pub fn emit(&mut self, rng: &mut dyn RandomSource, wall_ms: u64) -> Option<&GateEvent> {
        if !self.running {
            return None;
        }
        let gate = GateName::ALL[rng.index(GateName::ALL.len())];
        let target = rng.index(QUBIT_COUNT) as u8;
        let control = gate
            .is_controlled()
            .then(|| rng.index(QUBIT_COUNT) as u8);

        let event = GateEvent {
            id: self.next_id,
            gate,
            target,
            control,
            timestamp_ms: wall_ms,
        };
        self.next_id += 1;
        self.log.push(event);
        self.log.latest()
    }

    pub fn log(&self) -> &BoundedLog<GateEvent> {
        &self.log
    }

    /// Up to `n` events, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &GateEvent> {
        self.log.newest_first(n)
    }

    /// Operation-log view: the five newest events, newest first.
    pub fn recent_lines(&self) -> Vec<String> {
        self.recent(RECENT_LINES).map(GateEvent::log_line).collect()
    }

    /// Events emitted since mount, including evicted ones.
    pub fn total_emitted(&self) -> u64 {
        self.next_id
    }
}

impl Simulator for GateFeed {
    const NAME: &'static str = "gates";
    const PERIOD: Duration = Duration::from_millis(300);

    fn mount(_rng: &mut dyn RandomSource) -> Self {
        Self::new()
    }

    fn tick(&mut self, rng: &mut dyn RandomSource, wall_ms: u64) {
        self.emit(rng, wall_ms);
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
