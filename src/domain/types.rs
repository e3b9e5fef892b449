//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - passed through the synthesize -> filter -> chart pipeline by value
//! - selected from CLI flags (`clap::ValueEnum`)
//! - exported to JSON alongside chart specs

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Producing country.
///
/// Declaration order is the display order in selectors; the first variant is
/// the default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Country {
    Chile,
    Australia,
    #[serde(rename = "South Africa")]
    SouthAfrica,
    Brazil,
    Canada,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::Chile,
        Country::Australia,
        Country::SouthAfrica,
        Country::Brazil,
        Country::Canada,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Country::Chile => "Chile",
            Country::Australia => "Australia",
            Country::SouthAfrica => "South Africa",
            Country::Brazil => "Brazil",
            Country::Canada => "Canada",
        }
    }
}

/// Traded mineral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Mineral {
    Copper,
    #[serde(rename = "Iron Ore")]
    IronOre,
    Gold,
    Lithium,
}

impl Mineral {
    pub const ALL: [Mineral; 4] = [Mineral::Copper, Mineral::IronOre, Mineral::Gold, Mineral::Lithium];

    pub fn display_name(self) -> &'static str {
        match self {
            Mineral::Copper => "Copper",
            Mineral::IronOre => "Iron Ore",
            Mineral::Gold => "Gold",
            Mineral::Lithium => "Lithium",
        }
    }
}

/// One of the three synthesized measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Metric {
    Price,
    Reserves,
    Demand,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Price, Metric::Reserves, Metric::Demand];

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Price => "Price",
            Metric::Reserves => "Reserves",
            Metric::Demand => "Demand",
        }
    }

    /// Cycle forward through `ALL` (used by the dashboard selectors).
    pub fn next(self) -> Self {
        match self {
            Metric::Price => Metric::Reserves,
            Metric::Reserves => Metric::Demand,
            Metric::Demand => Metric::Price,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Metric::Price => Metric::Demand,
            Metric::Reserves => Metric::Price,
            Metric::Demand => Metric::Reserves,
        }
    }
}

/// Which family of charts to build from the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Scatter,
    #[value(name = "multi-axis")]
    #[serde(rename = "multi-axis")]
    MultiAxis,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [ChartType::Line, ChartType::Bar, ChartType::Scatter, ChartType::MultiAxis];

    pub fn display_name(self) -> &'static str {
        match self {
            ChartType::Line => "Line",
            ChartType::Bar => "Bar",
            ChartType::Scatter => "Scatter",
            ChartType::MultiAxis => "Multi-axis",
        }
    }
}

/// One synthesized data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: Country,
    pub mineral: Mineral,
    pub date: NaiveDate,
    pub price: f64,
    pub reserves: f64,
    pub demand: f64,
}

impl Observation {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Price => self.price,
            Metric::Reserves => self.reserves,
            Metric::Demand => self.demand,
        }
    }
}

/// Metrics mapped to the scatter chart axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterAxes {
    pub x: Metric,
    pub y: Metric,
}

impl Default for ScatterAxes {
    fn default() -> Self {
        Self {
            x: Metric::Price,
            y: Metric::Reserves,
        }
    }
}

/// The current state of the sidebar controls.
///
/// Country and mineral lists keep the order the user picked them in (the
/// multi-axis charts iterate them in that order) and never hold duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    countries: Vec<Country>,
    minerals: Vec<Mineral>,
    pub chart: ChartType,
    pub scatter: ScatterAxes,
}

impl FilterSelection {
    pub fn new(countries: impl IntoIterator<Item = Country>, minerals: impl IntoIterator<Item = Mineral>) -> Self {
        Self {
            countries: dedup(countries),
            minerals: dedup(minerals),
            chart: ChartType::default(),
            scatter: ScatterAxes::default(),
        }
    }

    pub fn with_chart(mut self, chart: ChartType) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_scatter(mut self, x: Metric, y: Metric) -> Self {
        self.scatter = ScatterAxes { x, y };
        self
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn minerals(&self) -> &[Mineral] {
        &self.minerals
    }

    pub fn has_country(&self, country: Country) -> bool {
        self.countries.contains(&country)
    }

    pub fn has_mineral(&self, mineral: Mineral) -> bool {
        self.minerals.contains(&mineral)
    }

    /// Add the country if absent, remove it otherwise.
    pub fn toggle_country(&mut self, country: Country) {
        toggle(&mut self.countries, country);
    }

    pub fn toggle_mineral(&mut self, mineral: Mineral) {
        toggle(&mut self.minerals, mineral);
    }

    pub fn matches(&self, obs: &Observation) -> bool {
        self.has_country(obs.country) && self.has_mineral(obs.mineral)
    }
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self::new([Country::ALL[0]], [Mineral::ALL[0]])
    }
}

fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|x| *x == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}

/// Settings for building the in-memory dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub seed: u64,
    /// First month of the horizon (normalized to the first day of the month).
    pub start: NaiveDate,
    /// Number of monthly periods.
    pub months: u32,
    pub countries: Vec<Country>,
    pub minerals: Vec<Mineral>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            months: 24,
            countries: Country::ALL.to_vec(),
            minerals: Mineral::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection_picks_first_entries() {
        let sel = FilterSelection::default();
        assert_eq!(sel.countries(), &[Country::Chile]);
        assert_eq!(sel.minerals(), &[Mineral::Copper]);
        assert_eq!(sel.chart, ChartType::Line);
        assert_eq!(sel.scatter, ScatterAxes { x: Metric::Price, y: Metric::Reserves });
    }

    #[test]
    fn selection_dedups_and_keeps_order() {
        let sel = FilterSelection::new(
            [Country::Brazil, Country::Chile, Country::Brazil],
            [Mineral::Gold, Mineral::Gold],
        );
        assert_eq!(sel.countries(), &[Country::Brazil, Country::Chile]);
        assert_eq!(sel.minerals(), &[Mineral::Gold]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = FilterSelection::default();
        sel.toggle_country(Country::Canada);
        assert_eq!(sel.countries(), &[Country::Chile, Country::Canada]);
        sel.toggle_country(Country::Chile);
        assert_eq!(sel.countries(), &[Country::Canada]);
        sel.toggle_mineral(Mineral::Copper);
        assert!(sel.minerals().is_empty());
    }

    #[test]
    fn metric_cycle_round_trips() {
        for m in Metric::ALL {
            assert_eq!(m.next().prev(), m);
        }
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&(Country::SouthAfrica, Mineral::IronOre, ChartType::MultiAxis)).unwrap();
        assert_eq!(json, r#"["South Africa","Iron Ore","multi-axis"]"#);
    }
}
