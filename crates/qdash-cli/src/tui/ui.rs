//! TUI rendering.
//!
//! ┌ OBARO LABS  QUANTUM DASHBOARD v1.0 ─────────── 2024-03-09 14:07:05 ┐
//! │ ● QUANTUM PROCESSOR ONLINE  FIDELITY 99.2%  QUBITS 8  UPTIME ...   │
//! ├──────────────────────────────── SOURCE ...  PORTFOLIO ... ─────────┤
//! ├──────────────────────────────────┬─────────────────────────────────┤
//! │  QUBIT STATES                    │  COHERENCE DECAY                │
//! │  ◯ ◯ ◯ ◯                         │  ⣀⡠⠔⠊⠉⠉⠒⠤⣀                      │
//! │  ◯ ◯ ◯ ◯                         │                                 │
//! ├──────────────────────────────────┼─────────────────────────────────┤
//! │  GATE SEQUENCE  ● RUNNING        │  PROBABILITY DISTRIBUTION       │
//! │  q0 ──[H]────────                │  ▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀               │
//! │  OPERATION LOG                   │  MAX  MIN  ENTROPY  PURITY      │
//! ├──────────────────────────────────┴─────────────────────────────────┤
//! │  q quit   p pause gates   s snapshot   +/- frame rate              │
//! └────────────────────────────────────────────────────────────────────┘

use ratatui::{
    prelude::*,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Points},
        *,
    },
};

use qdash_core::dashboard::{
    LAB_NAME, NOMINAL_FIDELITY, PORTFOLIO_URL, PROCESSOR_STATUS, QUBITS, SOURCE_URL, TEMPERATURE,
    TITLE,
};
use qdash_core::gates::RECENT_LINES;
use qdash_core::grid::GRID_SIZE;
use qdash_core::qubit::QUBIT_COUNT;
use qdash_core::{
    Clock, CoherenceBand, GateEvent, GateName, GridStats, Metric, ProbabilityGrid, basis_label,
    cell_color,
};

use super::app::App;

const BLUE: Color = Color::Rgb(37, 99, 235);
const CYAN: Color = Color::Rgb(6, 182, 212);
const RED: Color = Color::Rgb(239, 68, 68);
const GREEN: Color = Color::Rgb(16, 185, 129);
const PURPLE: Color = Color::Rgb(139, 92, 246);

/// Characters per gate slot on a circuit lane.
const SLOT_WIDTH: usize = 6;
const QUBITS_PER_ROW: usize = 4;
const CIRCLE_RADIUS: f64 = 0.7;

pub fn draw<C: Clock>(f: &mut Frame, app: &App<C>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title + status
            Constraint::Min(20),   // panels
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_panels(f, rows[1], app);
    draw_keys(f, rows[2], app);
}

fn draw_title<C: Clock>(f: &mut Frame, area: Rect, app: &App<C>) {
    let dashboard = app.dashboard();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title(Line::from(vec![
            Span::styled(format!(" {LAB_NAME} "), Style::default().bold().fg(CYAN)),
            Span::styled(format!(" {TITLE} "), Style::default().bold()),
        ]))
        .title_top(
            Line::from(Span::styled(
                format!(" {} ", dashboard.wall_label(app.clock())),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
        )
        .title_bottom(
            Line::from(vec![
                Span::styled(" SOURCE ", Style::default().fg(Color::DarkGray)),
                Span::styled(SOURCE_URL, Style::default().fg(BLUE)),
                Span::styled("  PORTFOLIO ", Style::default().fg(Color::DarkGray)),
                Span::styled(PORTFOLIO_URL, Style::default().fg(BLUE)),
                Span::raw(" "),
            ])
            .right_aligned(),
        );

    let label = Style::default().fg(Color::DarkGray);
    let status = Line::from(vec![
        Span::styled(" ● ", Style::default().fg(GREEN)),
        Span::styled(PROCESSOR_STATUS, Style::default().fg(GREEN)),
        Span::styled("   FIDELITY ", label),
        Span::raw(NOMINAL_FIDELITY),
        Span::styled("   QUBITS ", label),
        Span::raw(QUBITS.to_string()),
        Span::styled("   TEMP ", label),
        Span::raw(TEMPERATURE),
        Span::styled("   UPTIME ", label),
        Span::styled(dashboard.uptime_label(), Style::default().fg(CYAN)),
    ]);

    f.render_widget(Paragraph::new(status).block(block), area);
}

fn draw_panels<C: Clock>(f: &mut Frame, area: Rect, app: &App<C>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    draw_qubits(f, top[0], app);
    draw_coherence(f, top[1], app);
    draw_gates(f, bottom[0], app);
    draw_heatmap(f, bottom[1], app);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().bold().fg(BLUE),
        ))
}

// ---------------------------------------------------------------------------
// Qubits
// ---------------------------------------------------------------------------

fn band_color(band: CoherenceBand) -> Color {
    match band {
        CoherenceBand::High => GREEN,
        CoherenceBand::Medium => Color::Yellow,
        CoherenceBand::Low => RED,
    }
}

/// Canvas centre of qubit `i`: two rows of four.
fn qubit_center(i: usize) -> (f64, f64) {
    let col = (i % QUBITS_PER_ROW) as f64;
    let row = (i / QUBITS_PER_ROW) as f64;
    (col * 2.0 + 1.0, 3.0 - row * 2.0)
}

fn draw_qubits<C: Clock>(f: &mut Frame, area: Rect, app: &App<C>) {
    let Some(register) = app.dashboard().qubits() else {
        f.render_widget(panel("QUBIT STATES"), area);
        return;
    };

    let block = panel("QUBIT STATES").title_top(
        Line::from(Span::styled(
            format!(" mean {:.0}% ", register.mean_coherence() * 100.0),
            Style::default().fg(Color::DarkGray),
        ))
        .right_aligned(),
    );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let records = register.records();
    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, (QUBITS_PER_ROW * 2) as f64])
        .y_bounds([0.0, (QUBIT_COUNT / QUBITS_PER_ROW * 2) as f64])
        .paint(|ctx| {
            for (i, q) in records.iter().enumerate() {
                let (cx, cy) = qubit_center(i);
                let (bx, by) = q.bloch_point();
                let (mx, my) = (cx + bx * CIRCLE_RADIUS, cy + by * CIRCLE_RADIUS);
                ctx.draw(&Circle {
                    x: cx,
                    y: cy,
                    radius: CIRCLE_RADIUS,
                    color: band_color(q.band()),
                });
                ctx.draw(&CanvasLine {
                    x1: cx,
                    y1: cy,
                    x2: mx,
                    y2: my,
                    color: BLUE,
                });
                ctx.draw(&Points {
                    coords: &[(mx, my)],
                    color: CYAN,
                });
            }
            ctx.layer();
            for (i, q) in records.iter().enumerate() {
                let (cx, cy) = qubit_center(i);
                ctx.print(
                    cx - 0.6,
                    cy + CIRCLE_RADIUS + 0.15,
                    Span::styled(
                        format!("Q{i} {}", q.coherence_label()),
                        Style::default().fg(band_color(q.band())),
                    ),
                );
            }
        });
    f.render_widget(canvas, parts[0]);

    let preview = Line::from(vec![
        Span::styled("|ψ⟩ = ", Style::default().fg(BLUE)),
        Span::styled(
            register.state_vector_preview(),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(preview), parts[1]);
}

// ---------------------------------------------------------------------------
// Coherence
// ---------------------------------------------------------------------------

fn metric_color(metric: Metric) -> Color {
    match metric {
        Metric::Coherence => BLUE,
        Metric::Fidelity => CYAN,
        Metric::ErrorRate => RED,
    }
}

fn draw_coherence<C: Clock>(f: &mut Frame, area: Rect, app: &App<C>) {
    let Some(series) = app.dashboard().coherence() else {
        f.render_widget(panel("COHERENCE DECAY"), area);
        return;
    };

    let columns: Vec<(Metric, Vec<(f64, f64)>)> = Metric::ALL
        .iter()
        .map(|&m| (m, series.series(m)))
        .collect();

    let datasets: Vec<Dataset> = columns
        .iter()
        .map(|(m, data)| {
            Dataset::default()
                .name(m.label())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(metric_color(*m)))
                .data(data)
        })
        .collect();

    let first = columns[0].1.first().map_or(0.0, |p| p.0);
    let last = columns[0].1.last().map_or(1.0, |p| p.0).max(first + 1.0);

    let mut block = panel("COHERENCE DECAY");
    if let Some(r) = series.readout() {
        let coherence_color = if r.coherence_healthy { GREEN } else { RED };
        let label = Style::default().fg(Color::DarkGray);
        block = block.title_bottom(Line::from(vec![
            Span::styled(" COH ", label),
            Span::styled(r.coherence, Style::default().fg(coherence_color)),
            Span::styled("  FID ", label),
            Span::styled(r.fidelity, Style::default().fg(CYAN)),
            Span::styled("  ERR ", label),
            Span::styled(r.error_rate, Style::default().fg(RED)),
            Span::raw(" "),
        ]));
    }

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([first, last])
                .labels(vec![
                    Line::from(format!("{first:.0}")),
                    Line::from(format!("{last:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, 1.0])
                .labels(vec![Line::from("0.0"), Line::from("0.5"), Line::from("1.0")]),
        );

    f.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

fn gate_color(gate: GateName) -> Color {
    match gate {
        GateName::Cnot => PURPLE,
        GateName::H => BLUE,
        _ => Color::White,
    }
}

/// One slot of circuit lane `lane` for `event`.
pub(crate) fn lane_cell(event: &GateEvent, lane: u8) -> Span<'static> {
    if event.target == lane {
        let boxed = format!("[{}]", event.gate.label());
        return Span::styled(
            format!("{boxed:─^SLOT_WIDTH$}"),
            Style::default().fg(gate_color(event.gate)),
        );
    }
    if let Some(control) = event.control {
        let purple = Style::default().fg(PURPLE);
        if control == lane {
            return Span::styled("──●───", purple);
        }
        let (lo, hi) = (control.min(event.target), control.max(event.target));
        if lane > lo && lane < hi {
            return Span::styled("──│───", purple);
        }
    }
    Span::styled("─".repeat(SLOT_WIDTH), Style::default().fg(Color::DarkGray))
}

/// Circuit lanes, newest gate on the right.
pub(crate) fn circuit_lines(events: &[&GateEvent], width: u16) -> Vec<Line<'static>> {
    let prefix = 4;
    let slots = (width as usize).saturating_sub(prefix) / SLOT_WIDTH;
    let shown = &events[events.len().saturating_sub(slots)..];
    let idle = slots - shown.len();
    let wire = Style::default().fg(Color::DarkGray);

    (0..QUBIT_COUNT as u8)
        .map(|lane| {
            let mut spans = vec![
                Span::styled(format!("q{lane} "), Style::default().fg(Color::DarkGray)),
                Span::styled("─".repeat(idle * SLOT_WIDTH), wire),
            ];
            spans.extend(shown.iter().map(|e| lane_cell(e, lane)));
            Line::from(spans)
        })
        .collect()
}

fn draw_gates<C: Clock>(f: &mut Frame, area: Rect, app: &App<C>) {
    let Some(feed) = app.dashboard().gates() else {
        f.render_widget(panel("GATE SEQUENCE"), area);
        return;
    };

    let state = if feed.is_running() {
        Span::styled(" ● RUNNING ", Style::default().bold().fg(GREEN))
    } else {
        Span::styled(" ❚❚ PAUSED ", Style::default().bold().fg(RED))
    };
    let block = panel("GATE SEQUENCE").title_top(Line::from(state).right_aligned());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(QUBIT_COUNT as u16),
            Constraint::Min(2),
        ])
        .split(inner);

    let events: Vec<&GateEvent> = feed.log().iter().collect();
    f.render_widget(
        Paragraph::new(circuit_lines(&events, parts[0].width)),
        parts[0],
    );

    let mut log = vec![Line::from(Span::styled(
        "OPERATION LOG",
        Style::default().fg(Color::DarkGray),
    ))];
    log.extend(feed.recent(RECENT_LINES).map(|e| {
        let line = e.log_line();
        let (time, rest) = line.split_once(' ').unwrap_or(("", line.as_str()));
        Line::from(vec![
            Span::styled(time.to_string(), Style::default().fg(Color::DarkGray)),
            Span::raw(" "),
            Span::styled(rest.to_string(), Style::default().fg(Color::White)),
        ])
    }));
    f.render_widget(Paragraph::new(log), parts[1]);
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

fn rgb(p: f64) -> Color {
    let (r, g, b) = cell_color(p).over_black();
    Color::Rgb(r, g, b)
}

/// Two grid rows per terminal line: upper half-block in the first row's
/// colour over the second row's colour.
pub(crate) fn heatmap_lines(grid: &ProbabilityGrid) -> Vec<Line<'static>> {
    grid.rows()
        .chunks(2)
        .map(|pair| {
            let spans = (0..GRID_SIZE).map(|col| {
                let top = pair[0][col];
                let bottom = pair.get(1).map_or(0.0, |row| row[col]);
                Span::styled("▀▀", Style::default().fg(rgb(top)).bg(rgb(bottom)))
            });
            Line::from(spans.collect::<Vec<_>>())
        })
        .collect()
}

fn draw_heatmap<C: Clock>(f: &mut Frame, area: Rect, app: &App<C>) {
    let Some(grid) = app.dashboard().grid() else {
        f.render_widget(panel("PROBABILITY DISTRIBUTION"), area);
        return;
    };

    let block = panel("PROBABILITY DISTRIBUTION").title_top(
        Line::from(vec![
            Span::styled("▀▀", Style::default().fg(rgb(0.0))),
            Span::styled("▀▀", Style::default().fg(rgb(1.0))),
            Span::styled(" 0 → 1 ", Style::default().fg(Color::DarkGray)),
        ])
        .right_aligned(),
    );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((GRID_SIZE / 2) as u16),
            Constraint::Length(1),
            Constraint::Min(2),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(heatmap_lines(grid)), parts[0]);

    let axis = format!(
        "{}{:>width$}",
        basis_label(0),
        basis_label(GRID_SIZE - 1),
        width = GRID_SIZE * 2 - 6
    );
    f.render_widget(
        Paragraph::new(axis).style(Style::default().fg(Color::DarkGray)),
        parts[1],
    );

    let stats = grid.stats();
    let label = Style::default().fg(Color::DarkGray);
    let text = vec![
        Line::from(vec![
            Span::styled("MAX PROB ", label),
            Span::styled(GridStats::percent(stats.max), Style::default().fg(CYAN)),
            Span::styled("   MIN PROB ", label),
            Span::styled(GridStats::percent(stats.min), Style::default().fg(BLUE)),
        ]),
        Line::from(vec![
            Span::styled("ENTROPY ", label),
            Span::raw(format!("{:.3}", stats.entropy)),
            Span::styled("   PURITY ", label),
            Span::styled(format!("{:.4}", stats.purity), Style::default().fg(GREEN)),
        ]),
    ];
    f.render_widget(Paragraph::new(text), parts[2]);
}

// ---------------------------------------------------------------------------
// Key bar
// ---------------------------------------------------------------------------

fn draw_keys<C: Clock>(f: &mut Frame, area: Rect, app: &App<C>) {
    let pause = if app.gates_running() {
        "pause gates"
    } else {
        "resume gates"
    };
    let mut spans = vec![Span::raw(format!(
        " q: quit   p/space: {pause}   s: snapshot   +/-: frame {}ms",
        app.frame_rate().as_millis()
    ))];
    if let Some(err) = app.export_error() {
        spans.push(Span::styled(
            format!("   export failed: {err}"),
            Style::default().fg(RED),
        ));
    } else if let Some(path) = app.last_export() {
        spans.push(Span::styled(
            format!("   saved {}", path.display()),
            Style::default().fg(GREEN),
        ));
    }

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}
