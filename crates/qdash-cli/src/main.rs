//! CLI for qdash, a live terminal dashboard of a simulated quantum processor.

mod commands;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use commands::parse_duration;

#[derive(Parser)]
#[command(name = "qdash")]
#[command(about = "qdash: simulated quantum processor telemetry in your terminal")]
#[command(version = qdash_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive dashboard (TUI)
    Monitor {
        /// Seed for a reproducible session (default: OS entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Redraw interval in milliseconds
        #[arg(long, default_value = "50")]
        frame_ms: u64,

        /// Start with the gate feed paused
        #[arg(long)]
        paused: bool,

        /// Directory that `s` writes snapshot files into
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
    },

    /// Stream JSON snapshots to stdout in real time, one per line
    Stream {
        /// Seed for a reproducible session (default: OS entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Time between snapshots (e.g. "500ms", "2s")
        #[arg(long, default_value = "1s", value_parser = parse_duration)]
        interval: Duration,

        /// Stop after this long (e.g. "30s", "5m"); default: until Ctrl+C
        #[arg(long, value_parser = parse_duration)]
        duration: Option<Duration>,

        /// Start with the gate feed paused
        #[arg(long)]
        paused: bool,
    },

    /// Run a session on virtual time and print one pretty JSON snapshot
    Snapshot {
        /// Seed for a reproducible session (default: OS entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated time to run before capturing (e.g. "5s", "2m")
        #[arg(long, default_value = "5s", value_parser = parse_duration)]
        elapsed: Duration,

        /// Start with the gate feed paused
        #[arg(long)]
        paused: bool,

        /// Write to this path instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor {
            seed,
            frame_ms,
            paused,
            export_dir,
        } => commands::monitor::run(
            commands::dashboard_config(seed, paused),
            Duration::from_millis(frame_ms),
            export_dir,
        ),
        Commands::Stream {
            seed,
            interval,
            duration,
            paused,
        } => commands::stream::run(commands::dashboard_config(seed, paused), interval, duration),
        Commands::Snapshot {
            seed,
            elapsed,
            paused,
            output,
        } => commands::snapshot::run(
            commands::dashboard_config(seed, paused),
            elapsed,
            output.as_deref(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn monitor_defaults() {
        let cli = Cli::try_parse_from(["qdash", "monitor"]).unwrap();
        match cli.command {
            Commands::Monitor {
                seed,
                frame_ms,
                paused,
                export_dir,
            } => {
                assert_eq!(seed, None);
                assert_eq!(frame_ms, 50);
                assert!(!paused);
                assert_eq!(export_dir, PathBuf::from("."));
            }
            _ => panic!("expected monitor"),
        }
    }

    #[test]
    fn stream_parses_durations() {
        let cli = Cli::try_parse_from([
            "qdash",
            "stream",
            "--interval",
            "250ms",
            "--duration",
            "2m",
            "--seed",
            "9",
        ])
        .unwrap();
        match cli.command {
            Commands::Stream {
                seed,
                interval,
                duration,
                ..
            } => {
                assert_eq!(seed, Some(9));
                assert_eq!(interval, Duration::from_millis(250));
                assert_eq!(duration, Some(Duration::from_secs(120)));
            }
            _ => panic!("expected stream"),
        }
    }

    #[test]
    fn snapshot_rejects_bad_duration() {
        assert!(Cli::try_parse_from(["qdash", "snapshot", "--elapsed", "soon"]).is_err());
    }
}
