//! Ratatui-based terminal dashboard.
//!
//! The sidebar mirrors the dashboard controls (country and mineral
//! multi-selects, chart-type radio, scatter axis pickers). Every change re-runs
//! the selection pipeline against the same in-memory dataset and redraws the
//! chart pane; the raw data table can be toggled below the charts.

use std::io;
use std::time::Duration;

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
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
};
use tracing::{debug, info};

use crate::app::pipeline::{RunOutput, run_selection};
use crate::data::Dataset;
use crate::domain::{ChartType, Country, DashboardConfig, FilterSelection, Mineral};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{PlotFrame, SpecPlottersChart, plot_frames};

/// Charts shown at once; more are paged.
const CHARTS_PER_PAGE: usize = 3;
/// Data rows visible in the table pane.
const TABLE_ROWS: usize = 10;

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::internal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::internal(format!("Failed to enter alternate screen: {e}")));
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

/// Sidebar section with keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Countries,
    Minerals,
    Chart,
    ScatterX,
    ScatterY,
}

struct App {
    config: DashboardConfig,
    dataset: Dataset,
    selection: FilterSelection,
    run: RunOutput,
    focus: Focus,
    country_cursor: usize,
    mineral_cursor: usize,
    page: usize,
    show_table: bool,
    table_offset: usize,
    status: String,
}

impl App {
    fn new(config: DashboardConfig) -> Self {
        let dataset = Dataset::synthesize(&config);
        let selection = FilterSelection::default();
        let run = run_selection(&dataset, &selection);
        Self {
            config,
            dataset,
            selection,
            run,
            focus: Focus::Countries,
            country_cursor: 0,
            mineral_cursor: 0,
            page: 0,
            show_table: false,
            table_offset: 0,
            status: "Space toggles, Tab switches section.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::internal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::internal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::internal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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
        info!("dashboard closed");
        Ok(())
    }

    /// Apply one key press. Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.focus = self.next_focus(1),
            KeyCode::BackTab => self.focus = self.next_focus(-1),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Left => self.cycle_value(-1),
            KeyCode::Right => self.cycle_value(1),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::PageDown | KeyCode::Char('n') => {
                if (self.page + 1) * CHARTS_PER_PAGE < self.run.charts.len() {
                    self.page += 1;
                }
            }
            KeyCode::PageUp | KeyCode::Char('p') => self.page = self.page.saturating_sub(1),
            KeyCode::Char('t') => {
                self.show_table = !self.show_table;
                self.status = if self.show_table { "Raw data shown." } else { "Raw data hidden." }.to_string();
            }
            KeyCode::Char('j') => {
                if self.table_offset + TABLE_ROWS < self.run.rows.len() {
                    self.table_offset += 1;
                }
            }
            KeyCode::Char('k') => self.table_offset = self.table_offset.saturating_sub(1),
            KeyCode::Char('r') => {
                self.config.seed = self.config.seed.wrapping_add(1);
                self.dataset = Dataset::synthesize(&self.config);
                self.refresh();
                self.status = format!("Reseeded dataset (seed {}).", self.config.seed);
            }
            _ => {}
        }
        false
    }

    /// Sidebar sections reachable with Tab; the axis pickers only exist for scatter.
    fn sections(&self) -> Vec<Focus> {
        let mut out = vec![Focus::Countries, Focus::Minerals, Focus::Chart];
        if self.selection.chart == ChartType::Scatter {
            out.extend([Focus::ScatterX, Focus::ScatterY]);
        }
        out
    }

    fn next_focus(&self, delta: isize) -> Focus {
        let sections = self.sections();
        let cur = sections.iter().position(|&f| f == self.focus).unwrap_or(0) as isize;
        let n = sections.len() as isize;
        sections[(cur + delta).rem_euclid(n) as usize]
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Countries => self.country_cursor = step(self.country_cursor, delta, Country::ALL.len()),
            Focus::Minerals => self.mineral_cursor = step(self.mineral_cursor, delta, Mineral::ALL.len()),
            Focus::Chart | Focus::ScatterX | Focus::ScatterY => self.cycle_value(delta),
        }
    }

    fn cycle_value(&mut self, delta: isize) {
        match self.focus {
            Focus::Chart => {
                let cur = ChartType::ALL
                    .iter()
                    .position(|&c| c == self.selection.chart)
                    .unwrap_or(0);
                self.selection.chart = ChartType::ALL[step(cur, delta, ChartType::ALL.len())];
                self.status = format!("Chart: {}", self.selection.chart.display_name());
            }
            Focus::ScatterX => {
                let x = self.selection.scatter.x;
                self.selection.scatter.x = if delta >= 0 { x.next() } else { x.prev() };
            }
            Focus::ScatterY => {
                let y = self.selection.scatter.y;
                self.selection.scatter.y = if delta >= 0 { y.next() } else { y.prev() };
            }
            Focus::Countries | Focus::Minerals => return,
        }
        self.refresh();
    }

    fn toggle_current(&mut self) {
        match self.focus {
            Focus::Countries => {
                let c = Country::ALL[self.country_cursor];
                self.selection.toggle_country(c);
                self.status = format!("{} {}", if self.selection.has_country(c) { "+" } else { "-" }, c.display_name());
            }
            Focus::Minerals => {
                let m = Mineral::ALL[self.mineral_cursor];
                self.selection.toggle_mineral(m);
                self.status = format!("{} {}", if self.selection.has_mineral(m) { "+" } else { "-" }, m.display_name());
            }
            Focus::Chart | Focus::ScatterX | Focus::ScatterY => {
                self.cycle_value(1);
                return;
            }
        }
        self.refresh();
    }

    /// Full re-run of filter + chart selection for the current controls.
    fn refresh(&mut self) {
        self.run = run_selection(&self.dataset, &self.selection);
        self.page = 0;
        self.table_offset = 0;
        if !self.sections().contains(&self.focus) {
            self.focus = Focus::Chart;
        }
        debug!(rows = self.run.rows.len(), charts = self.run.charts.len(), "refreshed selection");
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("mdash", Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled(
                format!(
                    "seed {} | {} months | chart: {} | rows: {} | charts: {}",
                    self.dataset.seed(),
                    self.dataset.dates().len(),
                    self.selection.chart.display_name(),
                    self.run.rows.len(),
                    self.run.charts.len(),
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(0)])
            .split(area);
        self.draw_sidebar(frame, cols[0]);

        if self.show_table {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(TABLE_ROWS as u16 + 3)])
                .split(cols[1]);
            self.draw_charts(frame, rows[0]);
            self.draw_table(frame, rows[1]);
        } else {
            self.draw_charts(frame, cols[1]);
        }
    }

    fn draw_sidebar(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        let heading = |label: &'static str, focus: Focus| {
            let style = if self.focus == focus {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(label, style))
        };
        let item = |text: String, cursor: bool| {
            let style = if cursor {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text, style))
        };

        lines.push(heading("Countries", Focus::Countries));
        for (i, c) in Country::ALL.iter().enumerate() {
            let mark = if self.selection.has_country(*c) { "[x]" } else { "[ ]" };
            let cursor = self.focus == Focus::Countries && i == self.country_cursor;
            lines.push(item(format!(" {mark} {}", c.display_name()), cursor));
        }
        lines.push(Line::raw(""));

        lines.push(heading("Minerals", Focus::Minerals));
        for (i, m) in Mineral::ALL.iter().enumerate() {
            let mark = if self.selection.has_mineral(*m) { "[x]" } else { "[ ]" };
            let cursor = self.focus == Focus::Minerals && i == self.mineral_cursor;
            lines.push(item(format!(" {mark} {}", m.display_name()), cursor));
        }
        lines.push(Line::raw(""));

        lines.push(heading("Chart", Focus::Chart));
        for c in ChartType::ALL {
            let mark = if self.selection.chart == c { "(o)" } else { "( )" };
            let cursor = self.focus == Focus::Chart && self.selection.chart == c;
            lines.push(item(format!(" {mark} {}", c.display_name()), cursor));
        }

        if self.selection.chart == ChartType::Scatter {
            lines.push(Line::raw(""));
            lines.push(heading("Scatter X", Focus::ScatterX));
            lines.push(item(
                format!(" < {} >", self.selection.scatter.x.display_name()),
                self.focus == Focus::ScatterX,
            ));
            lines.push(heading("Scatter Y", Focus::ScatterY));
            lines.push(item(
                format!(" < {} >", self.selection.scatter.y.display_name()),
                self.focus == Focus::ScatterY,
            ));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().title("Controls").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let charts = &self.run.charts;
        if charts.is_empty() {
            let msg = Paragraph::new("No charts: no selected country/mineral pair has data.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().title("Charts").borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        }

        let start = (self.page * CHARTS_PER_PAGE).min(charts.len().saturating_sub(1));
        let visible = &charts[start..(start + CHARTS_PER_PAGE).min(charts.len())];
        let constraints: Vec<Constraint> = visible
            .iter()
            .map(|_| Constraint::Ratio(1, visible.len() as u32))
            .collect();
        let slots = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let pages = charts.len().div_ceil(CHARTS_PER_PAGE);
        for (i, (spec, slot)) in visible.iter().zip(slots.iter()).enumerate() {
            let mut title = spec.title.clone();
            if pages > 1 && i == 0 {
                title = format!("{title}  [page {}/{pages}]", self.page + 1);
            }
            let block = Block::default().title(title).borders(Borders::ALL);
            let inner = block.inner(*slot);
            frame.render_widget(block, *slot);
            frame.render_widget(Clear, inner);
            draw_frames(frame, inner, &plot_frames(spec));
        }
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let header = Row::new(["Country", "Mineral", "Date", "Price", "Reserves", "Demand"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self
            .run
            .rows
            .iter()
            .skip(self.table_offset)
            .take(TABLE_ROWS)
            .map(|o| {
                Row::new([
                    o.country.display_name().to_string(),
                    o.mineral.display_name().to_string(),
                    o.date.format("%Y-%m").to_string(),
                    format!("{:.2}", o.price),
                    format!("{:.2}", o.reserves),
                    format!("{:.2}", o.demand),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(13),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
        ];
        let title = format!(
            "Raw data ({} rows, {}-{})",
            self.run.rows.len(),
            (self.table_offset + 1).min(self.run.rows.len()),
            (self.table_offset + TABLE_ROWS).min(self.run.rows.len())
        );
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab section  ↑/↓ move  Space toggle  ←/→ change  n/p page  t table  j/k scroll  r reseed  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Lay out facet panels side by side, each with a one-line legend below.
fn draw_frames(frame: &mut ratatui::Frame<'_>, area: Rect, frames: &[PlotFrame]) {
    if frames.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = frames
        .iter()
        .map(|_| Constraint::Ratio(1, frames.len() as u32))
        .collect();
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (pf, panel) in frames.iter().zip(panels.iter()) {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(*panel);
        frame.render_widget(SpecPlottersChart { frame: pf }, parts[0]);

        let mut spans = Vec::new();
        if let Some(facet) = &pf.facet {
            spans.push(Span::styled(format!("{facet}: "), Style::default().add_modifier(Modifier::BOLD)));
        }
        for s in &pf.series {
            let (r, g, b) = s.color;
            spans.push(Span::styled(
                format!("{} ", s.style.legend_glyph()),
                Style::default().fg(Color::Rgb(r, g, b)),
            ));
            spans.push(Span::raw(format!("{}  ", s.label)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), parts[1]);
    }
}

/// Move `cur` by `delta` within `0..len`, wrapping.
fn step(cur: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cur as isize + delta).rem_euclid(len as isize) as usize
}
