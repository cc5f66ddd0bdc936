//! `qdash stream`: real-time JSON snapshots on stdout.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{info, warn};
use qdash_core::{Clock, Dashboard, DashboardConfig, SystemClock};

/// Granularity of the poll loop; smaller than every unit period.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn run(config: DashboardConfig, interval: Duration, duration: Option<Duration>) {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("could not install Ctrl+C handler: {e}");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match stream(&config, interval, duration, &running, &mut out) {
        Ok(count) => info!("streamed {count} snapshot(s)"),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Poll a live dashboard and write one snapshot line per `interval` until
/// `duration` elapses or `running` is cleared. Returns the number of lines
/// written.
pub fn stream(
    config: &DashboardConfig,
    interval: Duration,
    duration: Option<Duration>,
    running: &AtomicBool,
    out: &mut impl Write,
) -> io::Result<u64> {
    let clock = SystemClock::new();
    let mut dashboard = Dashboard::new(config);
    dashboard.mount(&clock);

    let interval = interval.max(POLL_INTERVAL);
    let mut next_emit = interval;
    let mut written = 0u64;

    while running.load(Ordering::SeqCst) {
        let now = clock.elapsed();
        if let Some(limit) = duration
            && now >= limit
        {
            break;
        }

        dashboard.poll(&clock);

        if now >= next_emit {
            if let Some(snapshot) = dashboard.snapshot(&clock) {
                let line = snapshot.to_json_line().map_err(io::Error::other)?;
                writeln!(out, "{line}")?;
                out.flush()?;
                written += 1;
            }
            next_emit += interval;
            if next_emit <= now {
                next_emit = now + interval;
            }
        }

        std::thread::sleep(POLL_INTERVAL);
    }

    dashboard.unmount();
    Ok(written)
}
