//! Plotters-powered chart widget for Ratatui.
//!
//! The widget is data-driven: [`plot_frames`] turns a `ChartSpec` into one or
//! more `PlotFrame`s (one per facet) with all series, styles and bounds
//! resolved, and `render()` only draws. That keeps the mapping testable
//! without a terminal.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{Axis, ChartSpec, Side};
use crate::domain::{ChartType, Country, Mineral};

/// High-contrast palette for terminal readability.
pub const PALETTE: [(u8, u8, u8); 6] = [
    (0, 255, 255),  // cyan
    (255, 200, 0),  // amber
    (0, 255, 0),    // green
    (255, 80, 80),  // red
    (200, 120, 255), // violet
    (255, 255, 255), // white
];

pub fn palette_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Width of one month's bar group, in days.
const BAR_GROUP_DAYS: f64 = 24.0;

/// How one series is stroked. Lines and markers are picked per mineral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    Solid,
    Dotted,
    Dashed,
    DashDot,
    Points(Marker),
    /// `slot` of `slots` bars sharing one date.
    Bars { slot: usize, slots: usize },
}

/// Line style per mineral, in `Mineral::ALL` order.
const LINE_STYLES: [SeriesStyle; 4] = [
    SeriesStyle::Solid,
    SeriesStyle::Dotted,
    SeriesStyle::Dashed,
    SeriesStyle::DashDot,
];

const DOTTED: &[bool] = &[true, false];
const DASHED: &[bool] = &[true, true, true, false, false];
const DASH_DOT: &[bool] = &[true, true, true, false, true, false];

impl SeriesStyle {
    /// On/off sample pattern for broken lines.
    fn dash_pattern(self) -> Option<&'static [bool]> {
        match self {
            SeriesStyle::Dotted => Some(DOTTED),
            SeriesStyle::Dashed => Some(DASHED),
            SeriesStyle::DashDot => Some(DASH_DOT),
            SeriesStyle::Solid | SeriesStyle::Points(_) | SeriesStyle::Bars { .. } => None,
        }
    }

    /// Legend swatch matching how the series is drawn.
    pub fn legend_glyph(self) -> &'static str {
        match self {
            SeriesStyle::Solid => "───",
            SeriesStyle::Dotted => "···",
            SeriesStyle::Dashed => "╌╌╌",
            SeriesStyle::DashDot => "─·─",
            SeriesStyle::Points(m) => m.glyph(),
            SeriesStyle::Bars { .. } => "■",
        }
    }
}

/// Scatter marker shape, drawn as a small pixel pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Cross,
    Diagonal,
    Square,
    Dash,
}

/// Marker per mineral, in `Mineral::ALL` order.
const MARKERS: [Marker; 4] = [Marker::Cross, Marker::Diagonal, Marker::Square, Marker::Dash];

impl Marker {
    /// Pixel offsets in marker units; `(0, 0)` is the point itself.
    pub fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            Marker::Cross => &[(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)],
            Marker::Diagonal => &[(0, 0), (-1, -1), (1, 1), (-1, 1), (1, -1)],
            Marker::Square => &[(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)],
            Marker::Dash => &[(-1, 0), (0, 0), (1, 0)],
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Marker::Cross => "+",
            Marker::Diagonal => "×",
            Marker::Square => "□",
            Marker::Dash => "─",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub color: (u8, u8, u8),
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
    /// Per point: drawn as a larger marker (scatter size channel).
    pub emphasized: Vec<bool>,
}

/// One drawable panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFrame {
    /// Facet label for faceted charts.
    pub facet: Option<String>,
    pub series: Vec<PlotSeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_axis: Axis,
    pub y_label: String,
    /// Series were rescaled to 0..1 against their own axes.
    pub normalized: bool,
}

impl PlotFrame {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Resolve a chart spec into drawable frames (several for faceted bars).
pub fn plot_frames(spec: &ChartSpec) -> Vec<PlotFrame> {
    match spec.kind {
        ChartType::Bar => {
            let facets = spec.facets();
            if facets.is_empty() {
                return vec![frame_for(spec, None)];
            }
            facets.into_iter().map(|m| frame_for(spec, Some(m))).collect()
        }
        ChartType::Line | ChartType::Scatter | ChartType::MultiAxis => vec![frame_for(spec, None)],
    }
}

fn frame_for(spec: &ChartSpec, facet: Option<Mineral>) -> PlotFrame {
    let members: Vec<(usize, &crate::chart::Series)> = spec
        .series
        .iter()
        .enumerate()
        .filter(|(_, s)| facet.is_none() || s.mineral == facet)
        .collect();
    let normalized = spec.kind == ChartType::MultiAxis;
    let ranges: Vec<(f64, f64)> = (0..spec.y_axes.len())
        .map(|i| spec.y_bounds(i).map(|(lo, hi)| widen(lo, hi)).unwrap_or((0.0, 1.0)))
        .collect();

    let bar_slots = members.len().max(1);
    let mut series = Vec::with_capacity(members.len());
    for (slot, &(idx, s)) in members.iter().enumerate() {
        let color = match (spec.kind, s.country) {
            (ChartType::MultiAxis, _) | (_, None) => palette_color(idx),
            (_, Some(c)) => palette_color(country_index(c)),
        };
        let mineral_slot = s.mineral.map(mineral_index).unwrap_or(0);
        let style = match spec.kind {
            ChartType::Line => LINE_STYLES[mineral_slot % LINE_STYLES.len()],
            ChartType::MultiAxis => SeriesStyle::Solid,
            ChartType::Scatter => SeriesStyle::Points(MARKERS[mineral_slot % MARKERS.len()]),
            ChartType::Bar => SeriesStyle::Bars {
                slot,
                slots: bar_slots,
            },
        };

        let (lo, hi) = ranges.get(s.y_axis).copied().unwrap_or((0.0, 1.0));
        let points: Vec<(f64, f64)> = s
            .points
            .iter()
            .map(|p| {
                let y = if normalized { (p.y - lo) / (hi - lo) } else { p.y };
                (p.x.as_f64(), y)
            })
            .collect();

        let label = if normalized {
            let side = spec
                .y_axes
                .get(s.y_axis)
                .map_or("left", |a| side_name(a.side, a.offset));
            format!("{} {:.0}..{:.0} ({side})", s.name, lo, hi)
        } else {
            s.name.clone()
        };

        series.push(PlotSeries {
            label,
            color,
            style,
            emphasized: vec![false; points.len()],
            points,
        });
    }

    if spec.kind == ChartType::Scatter {
        emphasize_large(spec, &mut series);
    }

    let (mut x_bounds, mut y_bounds) = frame_bounds(&series);
    if spec.kind == ChartType::Bar {
        x_bounds = [x_bounds[0] - BAR_GROUP_DAYS, x_bounds[1] + BAR_GROUP_DAYS];
        y_bounds[0] = y_bounds[0].min(0.0);
    }
    if normalized {
        y_bounds = [0.0, 1.0];
    }
    let y_bounds = pad(y_bounds, 0.05);

    PlotFrame {
        facet: facet.map(|m| m.display_name().to_string()),
        series,
        x_bounds,
        y_bounds,
        x_axis: spec.x_axis.clone(),
        y_label: if normalized {
            "scaled per axis".to_string()
        } else {
            spec.y_axes.first().map(|a| a.title.clone()).unwrap_or_default()
        },
        normalized,
    }
}

/// Mark points whose size is at or above the chart's median size.
fn emphasize_large(spec: &ChartSpec, series: &mut [PlotSeries]) {
    let mut sizes: Vec<f64> = spec
        .series
        .iter()
        .flat_map(|s| s.points.iter().filter_map(|p| p.size))
        .collect();
    if sizes.is_empty() {
        return;
    }
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = sizes[sizes.len() / 2];

    for (out, s) in series.iter_mut().zip(spec.series.iter()) {
        out.emphasized = s
            .points
            .iter()
            .map(|p| p.size.is_some_and(|v| v >= median))
            .collect();
    }
}

fn country_index(c: Country) -> usize {
    Country::ALL.iter().position(|&x| x == c).unwrap_or(0)
}

fn mineral_index(m: Mineral) -> usize {
    Mineral::ALL.iter().position(|&x| x == m).unwrap_or(0)
}

fn side_name(side: Side, offset: u8) -> &'static str {
    match (side, offset) {
        (Side::Left, 0) => "left",
        (Side::Left, _) => "left 2",
        (Side::Right, 0) => "right",
        (Side::Right, _) => "right 2",
        (Side::Bottom, _) => "bottom",
    }
}

fn frame_bounds(series: &[PlotSeries]) -> ([f64; 2], [f64; 2]) {
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in series.iter().flat_map(|s| s.points.iter()) {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    let (x0, x1) = widen(x0, x1);
    let (y0, y1) = widen(y0, y1);
    ([x0, x1], [y0, y1])
}

fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) }
}

fn pad(bounds: [f64; 2], frac: f64) -> [f64; 2] {
    let p = ((bounds[1] - bounds[0]).abs() * frac).max(1e-12);
    [bounds[0] - p, bounds[1] + p]
}

/// Pixels for a broken polyline: `steps` samples per segment, kept where
/// `pattern` (cycled across the whole line) is on.
pub fn patterned_points(points: &[(f64, f64)], steps: usize, pattern: &[bool]) -> Vec<(f64, f64)> {
    let steps = steps.max(2);
    let mut out = Vec::new();
    let mut k = 0usize;
    for w in points.windows(2) {
        let ((xa, ya), (xb, yb)) = (w[0], w[1]);
        for i in 0..steps {
            if pattern.is_empty() || pattern[k % pattern.len()] {
                let u = i as f64 / steps as f64;
                out.push((xa + u * (xb - xa), ya + u * (yb - ya)));
            }
            k += 1;
        }
    }
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}

/// Bar rectangle corners for one point of a `Bars` series.
pub fn bar_rect(x: f64, y: f64, slot: usize, slots: usize) -> [(f64, f64); 2] {
    let slots = slots.max(1);
    let w = BAR_GROUP_DAYS / slots as f64;
    let left = x - BAR_GROUP_DAYS / 2.0 + slot as f64 * w;
    [(left, 0.0), (left + w * 0.8, y)]
}

/// Render-only widget for one frame.
pub struct SpecPlottersChart<'a> {
    pub frame: &'a PlotFrame,
}

impl<'a> Widget for SpecPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.frame.is_empty() {
            buf.set_string(
                area.x + 1,
                area.y + area.height / 2,
                "No data for the current selection.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let frame = self.frame;
        let [x0, x1] = frame.x_bounds;
        let [y0, y1] = frame.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // Half a braille cell in data units: one marker unit.
        let dx = (x1 - x0) / (area.width as f64 * 2.0);
        let dy = (y1 - y0) / (area.height as f64 * 4.0);
        let dotted_steps = (area.width as usize / frame.series.first().map_or(1, |s| s.points.len().max(1))).max(2);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            let fmt_x = |v: &f64| frame.x_axis.format_tick(*v);
            let fmt_y = |v: &f64| {
                if frame.normalized {
                    format!("{:.0}%", v * 100.0)
                } else {
                    format!("{v:.0}")
                }
            };
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(frame.x_axis.title.as_str())
                .y_desc(frame.y_label.as_str())
                .x_labels(4)
                .y_labels(4)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&fmt_y)
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for s in &frame.series {
                let (r, g, b) = s.color;
                let color = RGBColor(r, g, b);
                match s.style {
                    SeriesStyle::Solid => {
                        chart.draw_series(LineSeries::new(s.points.iter().copied(), &color))?;
                    }
                    SeriesStyle::Dotted | SeriesStyle::Dashed | SeriesStyle::DashDot => {
                        let pattern = s.style.dash_pattern().unwrap_or(&[]);
                        chart.draw_series(
                            patterned_points(&s.points, dotted_steps, pattern)
                                .into_iter()
                                .map(|p| Pixel::new(p, color)),
                        )?;
                    }
                    SeriesStyle::Points(marker) => {
                        // Pixel patterns: the ratatui backend maps circle radii badly.
                        chart.draw_series(
                            s.points
                                .iter()
                                .zip(s.emphasized.iter())
                                .flat_map(|(&(x, y), &big)| {
                                    let scale = if big { 2.0 } else { 1.0 };
                                    marker.offsets().iter().map(move |&(ox, oy)| {
                                        (x + f64::from(ox) * dx * scale, y + f64::from(oy) * dy * scale)
                                    })
                                })
                                .map(|p| Pixel::new(p, color)),
                        )?;
                    }
                    SeriesStyle::Bars { slot, slots } => {
                        chart.draw_series(
                            s.points
                                .iter()
                                .map(|&(x, y)| Rectangle::new(bar_rect(x, y, slot, slots), color.filled())),
                        )?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
