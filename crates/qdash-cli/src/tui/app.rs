//! TUI application state and event loop.
//!
//! The dashboard is mounted when the app is built and unmounted when `run`
//! returns. Every frame polls the dashboard against the clock, so unit
//! timers fire from the same loop that reads keys and draws.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::panic::{self, PanicHookInfo};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::prelude::*;

use qdash_core::{Clock, Dashboard, DashboardConfig, SystemClock, TickReport};

/// Fastest redraw interval reachable with `+`.
pub const MIN_FRAME: Duration = Duration::from_millis(16);
/// Slowest redraw interval reachable with `-`.
pub const MAX_FRAME: Duration = Duration::from_millis(1000);

type PanicHook = Arc<dyn Fn(&PanicHookInfo<'_>) + Send + Sync>;

/// Chain a hook that restores the terminal before the current hook prints
/// the panic. Returns the hook that was current, for [`restore_panic_hook`].
fn install_terminal_panic_hook() -> PanicHook {
    let original: PanicHook = Arc::from(panic::take_hook());
    let chained = original.clone();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
        chained(info);
    }));
    original
}

fn restore_panic_hook(original: PanicHook) {
    let _ = panic::take_hook();
    panic::set_hook(Box::new(move |info| original(info)));
}

pub struct App<C: Clock = SystemClock> {
    dashboard: Dashboard,
    clock: C,
    frame_rate: Duration,
    running: bool,
    export_dir: PathBuf,
    last_export: Option<PathBuf>,
    export_error: Option<String>,
}

impl App<SystemClock> {
    pub fn new(config: &DashboardConfig, frame: Duration) -> Self {
        Self::with_clock(config, frame, SystemClock::new())
    }
}

impl<C: Clock> App<C> {
    /// Build the app and mount its dashboard against `clock`.
    pub fn with_clock(config: &DashboardConfig, frame: Duration, clock: C) -> Self {
        let mut dashboard = Dashboard::new(config);
        dashboard.mount(&clock);
        Self {
            dashboard,
            clock,
            frame_rate: frame.clamp(MIN_FRAME, MAX_FRAME),
            running: true,
            export_dir: PathBuf::from("."),
            last_export: None,
            export_error: None,
        }
    }

    /// Directory that `s` exports land in (default: working directory).
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let original_hook = install_terminal_panic_hook();

        let result = self.run_loop(&mut terminal);

        restore_panic_hook(original_hook);
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        self.dashboard.unmount();

        if let Some(path) = &self.last_export {
            println!("Last snapshot saved to {}", path.display());
        }

        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        while self.is_running() {
            self.tick();
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(self.frame_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    /// Fire every unit tick that has come due.
    pub fn tick(&mut self) -> TickReport {
        self.dashboard.poll(&self.clock)
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                self.dashboard.toggle_gate_feed(&self.clock);
            }
            KeyCode::Char('s') => self.export_snapshot(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => {
                self.frame_rate = (self.frame_rate / 2).max(MIN_FRAME);
            }
            KeyCode::Char('-') | KeyCode::Char('[') => {
                self.frame_rate = (self.frame_rate * 2).min(MAX_FRAME);
            }
            _ => {}
        }
    }

    fn export_snapshot(&mut self) {
        let epoch = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = self.export_dir.join(format!("qdash-snapshot-{epoch}.json"));

        match self.write_snapshot(&path) {
            Ok(()) => {
                info!("snapshot exported to {}", path.display());
                self.export_error = None;
                self.last_export = Some(path);
            }
            Err(e) => {
                warn!("snapshot export failed: {e}");
                self.export_error = Some(e.to_string());
            }
        }
    }

    fn write_snapshot(&self, path: &Path) -> io::Result<()> {
        let snapshot = self
            .dashboard
            .snapshot(&self.clock)
            .ok_or_else(|| io::Error::other("dashboard is not mounted"))?;
        let mut file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut file, &snapshot).map_err(io::Error::other)?;
        file.flush()
    }

    // -- Accessors for UI --

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_rate(&self) -> Duration {
        self.frame_rate
    }

    /// Whether the gate feed is emitting.
    pub fn gates_running(&self) -> bool {
        self.dashboard.gates().is_some_and(|g| g.is_running())
    }

    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }

    pub fn export_error(&self) -> Option<&str> {
        self.export_error.as_deref()
    }
}
