//! Simulator lifecycle: mount, recurring timer, unmount.
//!
//! A [`Unit`] owns one simulator's state together with its timer. The timer
//! is nothing more than the next due instant on the host's monotonic clock,
//! so it cannot outlive the unit: unmounting (or dropping) the unit disarms
//! it and discards the state in one step.

use std::time::Duration;

use log::{debug, trace, warn};

use crate::random::RandomSource;

/// Ticks a unit may fire in one [`Unit::advance`] call before its schedule
/// is re-aligned to the current instant.
pub const MAX_CATCH_UP: u32 = 64;

/// A self-contained, timer-driven simulation.
pub trait Simulator {
    /// Short name for logs.
    const NAME: &'static str;
    /// Interval between ticks.
    const PERIOD: Duration;

    /// Build fresh state on activation.
    fn mount(rng: &mut dyn RandomSource) -> Self
    where
        Self: Sized;

    /// Advance the state by one period. `wall_ms` is the wall-clock time
    /// the tick was due at.
    fn tick(&mut self, rng: &mut dyn RandomSource, wall_ms: u64);

    /// Whether the timer should stay armed. Units that report `false` are
    /// skipped until [`Unit::sync`] re-arms them.
    fn is_running(&self) -> bool {
        true
    }
}

/// One mounted (or unmounted) simulator plus its timer.
#[derive(Debug)]
pub struct Unit<S: Simulator> {
    state: Option<S>,
    next_due: Option<Duration>,
    ticks: u64,
}

impl<S: Simulator> Default for Unit<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Simulator> Unit<S> {
    pub fn new() -> Self {
        Self {
            state: None,
            next_due: None,
            ticks: 0,
        }
    }

    /// Create state and arm the timer for `now + PERIOD`. Mounting an
    /// already-mounted unit keeps the existing state.
    pub fn mount(&mut self, now: Duration, rng: &mut dyn RandomSource) {
        if self.state.is_some() {
            debug!("{} already mounted", S::NAME);
            return;
        }
        self.state = Some(S::mount(rng));
        self.ticks = 0;
        self.next_due = None;
        self.sync(now);
        debug!("{} mounted, period {:?}", S::NAME, S::PERIOD);
    }

    /// Disarm the timer and discard state.
    pub fn unmount(&mut self) {
        self.next_due = None;
        if self.state.take().is_some() {
            debug!("{} unmounted after {} ticks", S::NAME, self.ticks);
        }
    }

    /// Re-evaluate whether the timer should be armed after the state's
    /// running flag changed. A newly armed timer first fires one full period
    /// after `now`.
    pub fn sync(&mut self, now: Duration) {
        match &self.state {
            Some(state) if state.is_running() => {
                if self.next_due.is_none() {
                    self.next_due = Some(now + S::PERIOD);
                }
            }
            _ => self.next_due = None,
        }
    }

    /// Fire every tick that is due at `now`, oldest first. Returns the number
    /// of ticks fired.
    pub fn advance(&mut self, now: Duration, rng: &mut dyn RandomSource, wall_ms: u64) -> u32 {
        let Some(state) = self.state.as_mut() else {
            return 0;
        };

        let mut fired = 0;
        while let Some(due) = self.next_due {
            if due > now {
                break;
            }
            if !state.is_running() {
                self.next_due = None;
                break;
            }
            if fired == MAX_CATCH_UP {
                warn!(
                    "{} fell behind by {:?}; skipping missed ticks",
                    S::NAME,
                    now - due
                );
                self.next_due = Some(now + S::PERIOD);
                break;
            }
            let lag_ms = (now - due).as_millis() as u64;
            state.tick(rng, wall_ms.saturating_sub(lag_ms));
            fired += 1;
            self.ticks += 1;
            self.next_due = Some(due + S::PERIOD);
        }

        if fired > 0 {
            trace!("{} fired {fired} tick(s)", S::NAME);
        }
        fired
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    /// Whether a timer is currently registered.
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Monotonic instant of the next tick, if armed.
    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Ticks fired since the last mount.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut S> {
        self.state.as_mut()
    }
}

impl<S: Simulator> Drop for Unit<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// ---------------------------------------------------------------------------
// Uptime
// ---------------------------------------------------------------------------

/// Seconds counter for the host shell, incremented once per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Uptime {
    pub seconds: u64,
}

impl Simulator for Uptime {
    const NAME: &'static str = "uptime";
    const PERIOD: Duration = Duration::from_secs(1);

    fn mount(_rng: &mut dyn RandomSource) -> Self {
        Self::default()
    }

    fn tick(&mut self, _rng: &mut dyn RandomSource, _wall_ms: u64) {
        self.seconds += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceSource;

    /// Records the wall time of every tick; pausable.
    #[derive(Debug, Default)]
    struct Probe {
        stamps: Vec<u64>,
        running: bool,
    }

    impl Simulator for Probe {
        const NAME: &'static str = "probe";
        const PERIOD: Duration = Duration::from_millis(100);

        fn mount(_rng: &mut dyn RandomSource) -> Self {
            Self {
                stamps: Vec::new(),
                running: true,
            }
        }

        fn tick(&mut self, _rng: &mut dyn RandomSource, wall_ms: u64) {
            self.stamps.push(wall_ms);
        }

        fn is_running(&self) -> bool {
            self.running
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn unmounted_unit_never_ticks() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        assert_eq!(unit.advance(ms(10_000), &mut rng, 0), 0);
        assert!(!unit.is_armed());
    }

    #[test]
    fn first_tick_is_one_period_after_mount() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(50), &mut rng);
        assert_eq!(unit.next_due(), Some(ms(150)));
        assert_eq!(unit.advance(ms(149), &mut rng, 0), 0);
        assert_eq!(unit.advance(ms(150), &mut rng, 0), 1);
        assert_eq!(unit.next_due(), Some(ms(250)));
    }

    #[test]
    fn missed_periods_fire_in_order_with_backdated_wall_time() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        assert_eq!(unit.advance(ms(350), &mut rng, 10_350), 3);
        let stamps = &unit.state().unwrap().stamps;
        assert_eq!(stamps, &vec![10_100, 10_200, 10_300]);
        assert_eq!(unit.ticks(), 3);
    }

    #[test]
    fn long_stall_is_capped_and_realigned() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        let fired = unit.advance(ms(60_000), &mut rng, 60_000);
        assert_eq!(fired, MAX_CATCH_UP);
        assert_eq!(unit.next_due(), Some(ms(60_100)));
    }

    #[test]
    fn unmount_disarms_and_discards_state() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        unit.advance(ms(200), &mut rng, 0);
        unit.unmount();
        assert!(!unit.is_mounted());
        assert!(!unit.is_armed());
        assert_eq!(unit.advance(ms(5_000), &mut rng, 0), 0);
    }

    #[test]
    fn remount_starts_from_fresh_state() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        unit.advance(ms(300), &mut rng, 0);
        unit.unmount();
        unit.mount(ms(1_000), &mut rng);
        assert!(unit.state().unwrap().stamps.is_empty());
        assert_eq!(unit.ticks(), 0);
        assert_eq!(unit.next_due(), Some(ms(1_100)));
    }

    #[test]
    fn mount_twice_keeps_state() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        unit.advance(ms(100), &mut rng, 0);
        unit.mount(ms(100), &mut rng);
        assert_eq!(unit.state().unwrap().stamps.len(), 1);
    }

    #[test]
    fn paused_state_disarms_until_synced() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        unit.state_mut().unwrap().running = false;
        unit.sync(ms(40));
        assert!(!unit.is_armed());
        assert_eq!(unit.advance(ms(5_000), &mut rng, 0), 0);

        unit.state_mut().unwrap().running = true;
        unit.sync(ms(5_000));
        assert_eq!(unit.next_due(), Some(ms(5_100)));
        assert_eq!(unit.advance(ms(5_100), &mut rng, 0), 1);
    }

    #[test]
    fn pause_without_sync_is_caught_on_next_due() {
        let mut unit: Unit<Probe> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        unit.state_mut().unwrap().running = false;
        assert_eq!(unit.advance(ms(1_000), &mut rng, 0), 0);
        assert!(!unit.is_armed());
    }

    #[test]
    fn uptime_counts_seconds() {
        let mut unit: Unit<Uptime> = Unit::new();
        let mut rng = SequenceSource::default();
        unit.mount(ms(0), &mut rng);
        unit.advance(ms(2_999), &mut rng, 0);
        assert_eq!(unit.state().unwrap().seconds, 2);
        unit.advance(ms(3_000), &mut rng, 0);
        assert_eq!(unit.state().unwrap().seconds, 3);
    }
}
