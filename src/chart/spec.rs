//! Renderer-agnostic chart descriptions.
//!
//! A `ChartSpec` says *what* to draw (series, axes, field bindings); the TUI,
//! the ASCII renderer, or any JSON consumer decides *how*.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{ChartType, Country, Metric, Mineral};

/// A column of the observation table that a visual channel can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Date,
    Country,
    Mineral,
    Price,
    Reserves,
    Demand,
}

impl From<Metric> for Field {
    fn from(value: Metric) -> Self {
        match value {
            Metric::Price => Field::Price,
            Metric::Reserves => Field::Reserves,
            Metric::Demand => Field::Demand,
        }
    }
}

/// Visual channel bindings.
///
/// Multi-axis charts bind several y fields; there `y` is the first one and
/// `ChartSpec::y_axes` (with `Series::y_axis`) is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub x: Field,
    pub y: Field,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_dash: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hover: Vec<Field>,
}

impl Encoding {
    pub fn new(x: Field, y: Field) -> Self {
        Self {
            x,
            y,
            color: None,
            line_dash: None,
            size: None,
            symbol: None,
            facet: None,
            hover: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Bottom,
}

/// One axis. `offset` counts outward from the plot area on the same side, so
/// two left axes sit at offsets 0 and 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    pub field: Field,
    pub side: Side,
    pub offset: u8,
}

impl Axis {
    pub fn new(field: Field, title: impl Into<String>, side: Side, offset: u8) -> Self {
        Self {
            title: title.into(),
            field,
            side,
            offset,
        }
    }

    pub fn bottom(field: Field, title: impl Into<String>) -> Self {
        Self::new(field, title, Side::Bottom, 0)
    }

    pub fn left(field: Field, title: impl Into<String>) -> Self {
        Self::new(field, title, Side::Left, 0)
    }

    /// Tick label for a numeric position on this axis.
    pub fn format_tick(&self, v: f64) -> String {
        match self.field {
            Field::Date => NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
                .map(|d| d.format("%Y-%m").to_string())
                .unwrap_or_else(|| format!("{v:.0}")),
            _ => format!("{v:.2}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Date(NaiveDate),
    Number(f64),
}

impl XValue {
    /// Numeric position on the x axis (dates map to days since the CE epoch).
    pub fn as_f64(self) -> f64 {
        match self {
            XValue::Date(d) => d.num_days_from_ce() as f64,
            XValue::Number(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: XValue,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Shown on hover only; never positions the point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mineral: Option<Mineral>,
    /// Index into `ChartSpec::y_axes`.
    pub y_axis: usize,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartType,
    pub title: String,
    pub x_axis: Axis,
    pub y_axes: Vec<Axis>,
    pub encoding: Encoding,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Min/max x position over every series, `None` when there are no points.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.x.as_f64())))
    }

    /// Min/max y value of the series plotted against axis `axis`.
    pub fn y_bounds(&self, axis: usize) -> Option<(f64, f64)> {
        bounds(
            self.series
                .iter()
                .filter(|s| s.y_axis == axis)
                .flat_map(|s| s.points.iter().map(|p| p.y)),
        )
    }

    /// Distinct facet values (minerals) in series order; empty when unfaceted.
    pub fn facets(&self) -> Vec<Mineral> {
        if self.encoding.facet != Some(Field::Mineral) {
            return Vec::new();
        }
        let mut out = Vec::new();
        for m in self.series.iter().filter_map(|s| s.mineral) {
            if !out.contains(&m) {
                out.push(m);
            }
        }
        out
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
}
