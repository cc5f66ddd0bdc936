//! `qdash snapshot`: deterministic virtual-time capture.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use qdash_core::{Dashboard, DashboardConfig, DashboardSnapshot, ManualClock};

pub fn run(config: DashboardConfig, elapsed: Duration, output: Option<&Path>) {
    let wall_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let result = capture(&config, elapsed, wall_start).and_then(|snap| match output {
        Some(path) => {
            let mut file = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut file, &snap).map_err(io::Error::other)?;
            file.flush()?;
            println!("Snapshot saved to {}", path.display());
            Ok(())
        }
        None => {
            let json = snap.to_json_pretty().map_err(io::Error::other)?;
            println!("{json}");
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Mount a dashboard on a virtual clock starting at `wall_start_ms`, run it
/// for `elapsed` and capture it.
pub fn capture(
    config: &DashboardConfig,
    elapsed: Duration,
    wall_start_ms: u64,
) -> io::Result<DashboardSnapshot> {
    let clock = ManualClock::new(wall_start_ms);
    let mut dashboard = Dashboard::new(config);
    dashboard.mount(&clock);
    dashboard.run_for(&clock, elapsed);
    dashboard
        .snapshot(&clock)
        .ok_or_else(|| io::Error::other("dashboard is not mounted"))
}
