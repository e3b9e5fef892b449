//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal or a pipe
//! - deterministic output (helpful for golden tests)
//!
//! Each series gets a glyph from `GLYPHS`; line-like charts connect points
//! with `.`. Multi-axis series are scaled to their own axis range.

use crate::chart::{ChartSpec, Side};
use crate::domain::{ChartType, Mineral};

const GLYPHS: [char; 10] = ['*', 'o', '+', 'x', '#', '@', '%', '&', '=', '~'];

fn glyph(index: usize) -> char {
    GLYPHS[index % GLYPHS.len()]
}

/// Render one chart spec. Each panel is a header line, `height` grid rows and
/// one legend line per series (or a single "(no data)" line). Faceted charts
/// get one panel per facet, separated by blank lines.
pub fn render_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let facets = spec.facets();
    if facets.is_empty() {
        return render_panel(spec, width, height);
    }
    facets
        .into_iter()
        .map(|m| render_panel(&facet_panel(spec, m), width, height))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The series of one facet, titled after it.
fn facet_panel(spec: &ChartSpec, mineral: Mineral) -> ChartSpec {
    let mut panel = spec.clone();
    panel.title = format!("{} [{}]", spec.title, mineral.display_name());
    panel.series.retain(|s| s.mineral == Some(mineral));
    panel
}

fn render_panel(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let mut grid = vec![vec![' '; width]; height];

    let mut out = String::new();
    let Some((x_min, x_max)) = spec.x_bounds().map(|(lo, hi)| widen(lo, hi)) else {
        out.push_str(&format!("{}: no data\n", spec.title));
        for row in grid {
            out.push_str(&row.into_iter().collect::<String>());
            out.push('\n');
        }
        out.push_str("  (no data)\n");
        return out;
    };

    let ranges = axis_ranges(spec);
    // Bars of one date never spill into the next date's column.
    let max_shift = column_spacing(spec, x_min, x_max, width).saturating_sub(1);

    for (idx, series) in spec.series.iter().enumerate() {
        let (y_min, y_max) = ranges.get(series.y_axis).copied().unwrap_or((0.0, 1.0));
        let cells: Vec<(usize, usize)> = series
            .points
            .iter()
            .map(|p| {
                (
                    map_x(p.x.as_f64(), x_min, x_max, width),
                    map_y(p.y, y_min, y_max, height),
                )
            })
            .collect();

        match spec.kind {
            ChartType::Line | ChartType::MultiAxis => {
                for w in cells.windows(2) {
                    draw_line(&mut grid, w[0].0, w[0].1, w[1].0, w[1].1, '.');
                }
                for &(x, y) in &cells {
                    grid[y][x] = glyph(idx);
                }
            }
            ChartType::Bar => {
                let base = map_y(0.0, y_min, y_max, height);
                for &(x, y) in &cells {
                    let x = (x + idx.min(max_shift)).min(width - 1);
                    for row in grid.iter_mut().take(base + 1).skip(y) {
                        row[x] = glyph(idx);
                    }
                }
            }
            ChartType::Scatter => {
                for &(x, y) in &cells {
                    grid[y][x] = glyph(idx);
                }
            }
        }
    }

    out.push_str(&format!(
        "{}: x=[{}, {}] | {}\n",
        spec.title,
        spec.x_axis.format_tick(x_min),
        spec.x_axis.format_tick(x_max),
        y_description(spec, &ranges)
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (idx, series) in spec.series.iter().enumerate() {
        out.push_str(&format!("  {} {}", glyph(idx), series.name));
        if spec.y_axes.len() > 1 {
            if let Some(axis) = spec.y_axes.get(series.y_axis) {
                out.push_str(&format!(" ({})", side_label(axis.side, axis.offset)));
            }
        }
        out.push('\n');
    }
    out
}

/// Render every chart, separated by blank lines.
pub fn render_charts(charts: &[ChartSpec], width: usize, height: usize) -> String {
    charts
        .iter()
        .map(|c| render_chart(c, width, height))
        .collect::<Vec<_>>()
        .join("\n")
}

fn side_label(side: Side, offset: u8) -> String {
    let name = match side {
        Side::Left => "left",
        Side::Right => "right",
        Side::Bottom => "bottom",
    };
    if offset == 0 {
        name.to_string()
    } else {
        format!("{name}+{offset}")
    }
}

fn y_description(spec: &ChartSpec, ranges: &[(f64, f64)]) -> String {
    if spec.y_axes.len() <= 1 {
        let (lo, hi) = ranges.first().copied().unwrap_or((0.0, 1.0));
        return format!("y=[{lo:.2}, {hi:.2}]");
    }
    spec.y_axes
        .iter()
        .zip(ranges.iter())
        .map(|(axis, (lo, hi))| format!("{}=[{lo:.2}, {hi:.2}]", axis.title))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Smallest gap between distinct x columns; `width` when there is only one.
fn column_spacing(spec: &ChartSpec, x_min: f64, x_max: f64, width: usize) -> usize {
    let mut cols: Vec<usize> = spec
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| map_x(p.x.as_f64(), x_min, x_max, width)))
        .collect();
    cols.sort_unstable();
    cols.dedup();
    cols.windows(2).map(|w| w[1] - w[0]).min().unwrap_or(width)
}

/// Padded value range per y axis. Bars always include the zero baseline.
fn axis_ranges(spec: &ChartSpec) -> Vec<(f64, f64)> {
    (0..spec.y_axes.len())
        .map(|axis| {
            let Some((mut lo, hi)) = spec.y_bounds(axis) else {
                return (0.0, 1.0);
            };
            if spec.kind == ChartType::Bar {
                lo = lo.min(0.0);
            }
            let (lo, hi) = widen(lo, hi);
            pad_range(lo, hi, 0.05)
        })
        .collect()
}

/// Give a degenerate range some width so mapping never divides by zero.
fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, Encoding, Field, Point, Series, XValue, build_charts};
    use crate::domain::{Country, FilterSelection};
    use chrono::NaiveDate;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, 1).unwrap()
    }

    fn price_line(values: &[(u32, f64)]) -> ChartSpec {
        ChartSpec {
            kind: ChartType::Line,
            title: "Price over time".to_string(),
            x_axis: Axis::bottom(Field::Date, "Date"),
            y_axes: vec![Axis::left(Field::Price, "Price")],
            encoding: Encoding::new(Field::Date, Field::Price),
            series: vec![Series {
                name: "Chile / Copper".to_string(),
                country: Some(Country::Chile),
                mineral: Some(Mineral::Copper),
                y_axis: 0,
                points: values
                    .iter()
                    .map(|&(m, y)| Point {
                        x: XValue::Date(month(m)),
                        y,
                        size: None,
                        hover_date: None,
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let spec = price_line(&[(1, 10.0), (2, 20.0), (3, 30.0)]);
        let txt = render_chart(&spec, 10, 5);
        let expected = concat!(
            "Price over time: x=[2020-01, 2020-03] | y=[9.00, 31.00]\n",
            "        .*\n",
            "      ..  \n",
            "    .*    \n",
            "  ..      \n",
            "*.        \n",
            "  * Chile / Copper\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_chart_keeps_fixed_size() {
        let spec = price_line(&[]);
        let txt = render_chart(&spec, 12, 6);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 1 + 6 + 1);
        assert_eq!(lines[0], "Price over time: no data");
        assert!(lines[1..7].iter().all(|l| l.len() == 12 && l.trim().is_empty()));
    }

    #[test]
    fn single_point_does_not_panic() {
        let spec = price_line(&[(5, 42.0)]);
        let txt = render_chart(&spec, 10, 5);
        assert_eq!(txt.lines().count(), 7);
        assert!(txt.contains('*'));
    }

    #[test]
    fn multi_axis_legend_names_sides() {
        let dates = crate::data::month_range(month(1), 6);
        let rows = crate::data::synthesize(42, &[Country::Chile], &[Mineral::Copper], &dates);
        let sel = FilterSelection::default().with_chart(ChartType::MultiAxis);
        let charts = build_charts(&rows, &sel);
        let txt = render_chart(&charts[0], 40, 10);
        assert!(txt.contains("  * Price (left)\n"));
        assert!(txt.contains("  o Reserves (left+1)\n"));
        assert!(txt.contains("  + Demand (right)\n"));
        assert!(txt.lines().next().unwrap().contains("Reserves=["));
    }

    #[test]
    fn bars_reach_the_baseline() {
        let mut spec = price_line(&[(1, 10.0), (2, 20.0)]);
        spec.kind = ChartType::Bar;
        let txt = render_chart(&spec, 10, 5);
        let grid: Vec<&str> = txt.lines().skip(1).take(5).collect();
        // Last row sits on (or just above) zero and every bar touches it.
        assert_eq!(grid[4].chars().filter(|&c| c == '*').count(), 2);
    }

    #[test]
    fn bar_offsets_stay_within_date_spacing() {
        let mut spec = price_line(&[(1, 10.0), (2, 12.0), (3, 14.0), (4, 16.0), (5, 18.0)]);
        spec.kind = ChartType::Bar;
        for name in ["Brazil / Copper", "Canada / Copper"] {
            let mut extra = spec.series[0].clone();
            extra.name = name.to_string();
            spec.series.push(extra);
        }
        // Dates land on columns 0, 2, 4, 7, 9 of a 10-wide grid.
        let txt = render_chart(&spec, 10, 5);
        let bottom: Vec<char> = txt.lines().nth(5).unwrap().chars().collect();
        for col in [0, 2, 4, 7] {
            assert_eq!(bottom[col], '*', "column {col}");
        }
    }

    #[test]
    fn faceted_bars_render_one_panel_per_mineral() {
        let dates = crate::data::month_range(month(1), 3);
        let rows = crate::data::synthesize(
            42,
            &[Country::Chile, Country::Brazil],
            &[Mineral::Copper, Mineral::Gold],
            &dates,
        );
        let sel = FilterSelection::default().with_chart(ChartType::Bar);
        let charts = build_charts(&rows, &sel);
        let txt = render_chart(&charts[0], 30, 6);
        assert!(txt.starts_with("Price by country [Copper]: "));
        assert!(txt.contains("\n\nPrice by country [Gold]: "));
        assert_eq!(txt.matches("  * Chile / Copper\n").count(), 1);
        assert_eq!(txt.matches("  o Brazil / Gold\n").count(), 1);
    }

    #[test]
    fn render_charts_joins_with_blank_lines() {
        let a = price_line(&[(1, 1.0), (2, 2.0)]);
        let txt = render_charts(&[a.clone(), a], 10, 5);
        assert_eq!(txt.matches("Price over time").count(), 2);
        assert!(txt.contains("\n\nPrice over time"));
    }
}
