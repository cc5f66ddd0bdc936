//! Time sources and time formatting for the host shell.

use std::cell::Cell;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::DateTime;

/// Monotonic elapsed time plus wall-clock time.
///
/// Units schedule against [`elapsed`](Clock::elapsed); wall time only labels
/// gate events and the header clock.
pub trait Clock {
    /// Monotonic time since the clock was created.
    fn elapsed(&self) -> Duration;
    /// Milliseconds since the Unix epoch.
    fn wall_millis(&self) -> u64;
}

/// Real time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn wall_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Virtual time that only moves when [`advance`](ManualClock::advance) is
/// called. Wall time moves in lockstep with elapsed time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Cell<Duration>,
    wall_start_ms: u64,
}

impl ManualClock {
    pub fn new(wall_start_ms: u64) -> Self {
        Self {
            elapsed: Cell::new(Duration::ZERO),
            wall_start_ms,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }

    fn wall_millis(&self) -> u64 {
        self.wall_start_ms + self.elapsed.get().as_millis() as u64
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_wall(ms: u64) -> String {
    format_utc(ms, "%Y-%m-%d %H:%M:%S").unwrap_or_else(|| "---------- --:--:--".into())
}

/// `HH:MM:SS.mmm` in UTC.
pub fn format_time_of_day(ms: u64) -> String {
    format_utc(ms, "%H:%M:%S%.3f").unwrap_or_else(|| "--:--:--.---".into())
}

/// `HH:MM:SS`; hours keep counting past 99.
pub fn format_uptime(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

fn format_utc(ms: u64, fmt: &str) -> Option<String> {
    let ms = i64::try_from(ms).ok()?;
    DateTime::from_timestamp_millis(ms).map(|t| t.format(fmt).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-09 14:07:05.042 UTC
    const SAMPLE_MS: u64 = 1_709_993_225_042;

    #[test]
    fn wall_format_is_date_and_time() {
        assert_eq!(format_wall(SAMPLE_MS), "2024-03-09 14:07:05");
        assert_eq!(format_wall(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn out_of_range_wall_time_keeps_width() {
        let fallback = format_wall(u64::MAX);
        assert_eq!(fallback, "---------- --:--:--");
        assert_eq!(fallback.len(), format_wall(SAMPLE_MS).len());
        assert_eq!(format_time_of_day(u64::MAX).len(), format_time_of_day(SAMPLE_MS).len());
    }

    #[test]
    fn time_of_day_keeps_milliseconds() {
        assert_eq!(format_time_of_day(SAMPLE_MS), "14:07:05.042");
        assert_eq!(format_time_of_day(999), "00:00:00.999");
    }

    #[test]
    fn uptime_pads_each_field() {
        assert_eq!(format_uptime(0), "00:00:00");
        assert_eq!(format_uptime(61), "00:01:01");
        assert_eq!(format_uptime(3 * 3600 + 25 * 60 + 9), "03:25:09");
        assert_eq!(format_uptime(100 * 3600), "100:00:00");
    }

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.wall_millis(), 1_000);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
        assert_eq!(clock.wall_millis(), 1_250);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
        assert!(clock.wall_millis() > SAMPLE_MS);
    }
}
