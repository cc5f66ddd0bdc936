use std::path::PathBuf;
use std::time::Duration;

use qdash_core::DashboardConfig;

pub fn run(config: DashboardConfig, frame: Duration, export_dir: PathBuf) {
    let mut app = crate::tui::app::App::new(&config, frame).with_export_dir(export_dir);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
