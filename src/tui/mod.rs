//! Ratatui-based terminal UI.
//!
//! Rate cards across the top, the dated history chart with an inflation and
//! statistics panel below, and a status footer. Spread changes re-derive the
//! snapshot from cached series on the UI thread; range changes and refreshes
//! reload in the background.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{self, LoadOutput};
use crate::app::sequence::LoadSequencer;
use crate::data::SeriesProvider;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::domain::DashboardConfig;
use crate::error::AppError;
use crate::report::{Trend, fmt_annual, fmt_signed};
use crate::snapshot::{DashboardSnapshot, InflationReading, Reading};

mod plotters_chart;
mod worker;

use plotters_chart::RatesPlottersChart;
use worker::{LoadRequest, LoadResponse, spawn_load};

/// Start the TUI.
pub fn run(config: DashboardConfig, provider: Arc<dyn SeriesProvider>, today: NaiveDate) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, provider, today);
    app.start_load()?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: DashboardConfig,
    provider: Arc<dyn SeriesProvider>,
    today: NaiveDate,
    sequencer: LoadSequencer,
    tx: Sender<LoadResponse>,
    rx: Receiver<LoadResponse>,
    loaded: Option<LoadOutput>,
    status: String,
}

impl App {
    fn new(config: DashboardConfig, provider: Arc<dyn SeriesProvider>, today: NaiveDate) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            config,
            provider,
            today,
            sequencer: LoadSequencer::new(),
            tx,
            rx,
            loaded: None,
            status: String::new(),
        }
    }

    fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.loaded.as_ref().map(|l| &l.snapshot)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            while let Ok(response) = self.rx.try_recv() {
                self.apply_response(response);
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Right => self.set_spread(self.config.spread.step_up()),
            KeyCode::Left => self.set_spread(self.config.spread.step_down()),
            KeyCode::Up => {
                self.config.range = self.config.range.next();
                self.start_load()?;
            }
            KeyCode::Down => {
                self.config.range = self.config.range.prev();
                self.start_load()?;
            }
            KeyCode::Char('r') => self.start_load()?,
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        Ok(false)
    }

    fn start_load(&mut self) -> Result<(), AppError> {
        let request = LoadRequest {
            sequence: self.sequencer.issue(),
            range: self.config.range,
            spread: self.config.spread,
            today: self.today,
            ma_window: self.config.ma_window,
        };
        self.status = format!("Loading {} from {}...", request.range.label(), self.provider.name());
        spawn_load(Arc::clone(&self.provider), request, self.tx.clone())
    }

    fn apply_response(&mut self, response: LoadResponse) {
        if !self.sequencer.accept(response.sequence) {
            TracingSink.emit(DiagnosticEvent::LoadSuperseded {
                sequence: response.sequence,
                latest: self.sequencer.latest_issued(),
            });
            return;
        }

        match response.result {
            Ok(mut output) => {
                // The spread may have moved while the load was in flight.
                if output.snapshot.spread != self.config.spread {
                    match pipeline::recompute(&output.bundle, self.config.spread, self.config.ma_window, &TracingSink) {
                        Ok(snapshot) => output.snapshot = snapshot,
                        Err(err) => {
                            self.status = format!("Load failed: {err}");
                            return;
                        }
                    }
                }
                self.status = format!(
                    "Loaded {} ({} observations, as of {})",
                    response.range.label(),
                    output.snapshot.history.dates.len(),
                    output.snapshot.as_of
                );
                self.loaded = Some(output);
            }
            Err(err) => {
                tracing::warn!(error = %err, "load failed");
                self.status = format!("Load failed: {err}");
            }
        }
    }

    fn set_spread(&mut self, spread: crate::domain::Spread) {
        self.config.spread = spread;
        let Some(loaded) = &mut self.loaded else {
            self.status = format!("spread: {spread}");
            return;
        };

        match pipeline::recompute(&loaded.bundle, spread, self.config.ma_window, &TracingSink) {
            Ok(snapshot) => {
                loaded.snapshot = snapshot;
                self.status = format!("spread: {spread}");
            }
            Err(err) => self.status = format!("Recompute failed: {err}"),
        }
    }

    fn export(&mut self) {
        let Some(snapshot) = self.snapshot() else {
            self.status = "Nothing to export yet.".to_string();
            return;
        };
        let path = export_path(snapshot);
        self.status = match crate::io::write_history_csv(&path, snapshot) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "history exported");
                format!("Exported {}", path.display())
            }
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_cards(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let as_of = self
            .snapshot()
            .map(|s| s.as_of.to_string())
            .unwrap_or_else(|| "-".to_string());
        let loading = if self.sequencer.in_flight() { " | loading..." } else { "" };

        let line = Line::from(vec![
            Span::styled("rates", Style::default().fg(Color::Cyan)),
            Span::raw(" - mortgage rates from the 10-year yield"),
            Span::styled(
                format!(
                    " | range: {} | spread: {} | as of: {as_of} | source: {}{loading}",
                    self.config.range.label(),
                    self.config.spread,
                    self.provider.name()
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_cards(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 5); 5])
            .split(area);

        let Some(s) = self.snapshot() else {
            for (i, title) in ["10Y Treasury", "Est. 30Y", "Est. 15Y", "Actual 30Y", "Actual 15Y"]
                .into_iter()
                .enumerate()
            {
                render_card(frame, chunks[i], title, vec![Line::from("-")]);
            }
            return;
        };

        render_card(frame, chunks[0], "10Y Treasury", reading_lines(Some(&s.treasury)));
        render_card(
            frame,
            chunks[1],
            "Est. 30Y",
            vec![Line::from(Span::styled(
                format!("{:.2}%", s.estimated.rate_30y),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))],
        );
        render_card(
            frame,
            chunks[2],
            "Est. 15Y",
            vec![Line::from(Span::styled(
                format!("{:.2}%", s.estimated.rate_15y),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ))],
        );
        render_card(frame, chunks[3], "Actual 30Y", reading_lines(s.actual_30y.as_ref()));
        render_card(frame, chunks[4], "Actual 15Y", reading_lines(s.actual_15y.as_ref()));
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(36)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_side_panel(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("10Y (cyan) | est. 30Y (yellow) | est. 15Y (magenta) | actual 30Y (dots)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(snapshot) = self.snapshot() else {
            let msg = Paragraph::new("Waiting for data...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let data = chart_series(snapshot);
        let widget = RatesPlottersChart {
            treasury: &data.treasury,
            estimated_30y: &data.estimated_30y,
            estimated_15y: &data.estimated_15y,
            actual_30y: &data.actual_30y,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_pct,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_side_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(area);

        let gray = Style::default().fg(Color::Gray);

        let inflation_lines = match self.snapshot().and_then(|s| s.inflation.as_ref()) {
            Some(block) => {
                let mut lines = inflation_lines("CPI", &block.cpi);
                lines.extend(inflation_lines("Core PCE", &block.core_pce));
                lines
            }
            None => vec![Line::from(Span::styled("unavailable", gray))],
        };
        let p = Paragraph::new(Text::from(inflation_lines))
            .block(Block::default().title("Inflation").borders(Borders::ALL));
        frame.render_widget(p, chunks[0]);

        let stats_lines = match self.snapshot() {
            Some(s) => {
                let st = &s.statistics;
                let ma = st
                    .moving_average
                    .last()
                    .map(|o| format!("{:.2}", o.value))
                    .unwrap_or_else(|| "n/a".to_string());
                vec![
                    Line::from(format!("range: {:.2} .. {:.2}", st.range.min, st.range.max)),
                    Line::from(format!("position: {:.0}%", st.range_position * 100.0)),
                    Line::from(format!("volatility: {:.3}", st.volatility)),
                    Line::from(format!("change: {}%", fmt_signed(st.period_change * 100.0))),
                    Line::from(format!("{}-obs MA: {ma}", st.moving_average_window)),
                ]
            }
            None => vec![Line::from(Span::styled("-", gray))],
        };
        let p = Paragraph::new(Text::from(stats_lines))
            .block(Block::default().title("10Y statistics").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "←/→ spread  ↑/↓ range  r refresh  e export csv  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn render_card(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let p = Paragraph::new(Text::from(lines)).block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn reading_lines(reading: Option<&Reading>) -> Vec<Line<'static>> {
    let Some(r) = reading else {
        return vec![Line::from(Span::styled("n/a", Style::default().fg(Color::Gray)))];
    };
    let trend = Trend::of(r.delta);
    let color = match trend {
        Trend::Up => Color::Red,
        Trend::Down => Color::Green,
        Trend::Flat => Color::Gray,
    };
    vec![
        Line::from(Span::styled(
            format!("{:.2}%", r.current),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} {}", fmt_signed(r.delta), trend.arrow()),
            Style::default().fg(color),
        )),
        Line::from(Span::styled(r.date.to_string(), Style::default().fg(Color::Gray))),
    ]
}

fn inflation_lines(name: &str, inflation: &InflationReading) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(format!("{name:<9}"), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{:.3} ({})", inflation.reading.current, fmt_signed(inflation.reading.delta))),
        ]),
        Line::from(Span::styled(
            format!(
                "  annual {}  monthly {:.3}%",
                fmt_annual(inflation.annual_rate),
                inflation.monthly_rate
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("  {}", inflation.reading.date),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn export_path(snapshot: &DashboardSnapshot) -> PathBuf {
    PathBuf::from(format!(
        "rates-{}-{}.csv",
        snapshot.range.label().to_lowercase(),
        snapshot.as_of
    ))
}

/// Series and bounds for the history chart.
struct ChartData {
    treasury: Vec<(f64, f64)>,
    estimated_30y: Vec<(f64, f64)>,
    estimated_15y: Vec<(f64, f64)>,
    actual_30y: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn chart_series(snapshot: &DashboardSnapshot) -> ChartData {
    let history = &snapshot.history;
    let xs: Vec<f64> = history.dates.iter().map(|d| day_number(*d)).collect();
    let pair = |values: &[f64]| -> Vec<(f64, f64)> { xs.iter().copied().zip(values.iter().copied()).collect() };

    let treasury = pair(&history.treasury_10y);
    let estimated_30y = pair(&history.estimated_30y);
    let estimated_15y = pair(&history.estimated_15y);
    let actual_30y: Vec<(f64, f64)> = history
        .actual_30y
        .as_ref()
        .map(|a| a.present_points().into_iter().map(|(d, v)| (day_number(d), v)).collect())
        .unwrap_or_default();

    let (x0, mut x1) = match (xs.first(), xs.last()) {
        (Some(&a), Some(&b)) => (a, b),
        _ => (0.0, 1.0),
    };
    if x1 <= x0 {
        x1 = x0 + 1.0;
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in treasury.iter().chain(&estimated_30y).chain(&estimated_15y).chain(&actual_30y) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 10.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    ChartData {
        treasury,
        estimated_30y,
        estimated_15y,
        actual_30y,
        x_bounds: [x0, x1],
        y_bounds: [y_min - pad, y_max + pad],
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%y-%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_pct(v: f64) -> String {
    format!("{v:.2}")
}
