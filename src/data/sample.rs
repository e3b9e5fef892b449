//! Seeded synthesis of the commodity observation table.
//!
//! Every (country, mineral) pair gets its own base level and monthly slope per
//! metric; each month then adds Gaussian noise scaled to the base:
//!
//! `value(i) = base + slope * i + N(0, NOISE_REL * base)`
//!
//! Values are rounded to cents and clamped at zero.

use chrono::{Datelike, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use tracing::{debug, info};

use crate::domain::{Country, DashboardConfig, Metric, Mineral, Observation};

/// Noise standard deviation relative to the base level.
const NOISE_REL: f64 = 0.05;

/// Uniform draw ranges for one metric (half-open).
#[derive(Debug, Clone, Copy)]
struct MetricBounds {
    base: (f64, f64),
    slope: (f64, f64),
}

fn bounds(metric: Metric) -> MetricBounds {
    match metric {
        Metric::Price => MetricBounds {
            base: (50.0, 200.0),
            slope: (-1.5, 1.5),
        },
        Metric::Reserves => MetricBounds {
            base: (1000.0, 5000.0),
            slope: (-25.0, 25.0),
        },
        Metric::Demand => MetricBounds {
            base: (200.0, 1000.0),
            slope: (-5.0, 15.0),
        },
    }
}

/// Base level + linear trend for one metric of one (country, mineral) pair.
#[derive(Debug, Clone, Copy)]
struct Trend {
    base: f64,
    slope: f64,
}

impl Trend {
    fn sample(&self, rng: &mut StdRng, index: usize) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        let raw = self.base + self.slope * index as f64 + z * NOISE_REL * self.base;
        let v = round_cents(raw);
        if v > 0.0 { v } else { 0.0 }
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// The in-memory table every dashboard interaction reads from.
///
/// Built once from an explicit seed; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    seed: u64,
    countries: Vec<Country>,
    minerals: Vec<Mineral>,
    dates: Vec<NaiveDate>,
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn synthesize(config: &DashboardConfig) -> Self {
        let dates = month_range(config.start, config.months);
        let observations = synthesize(config.seed, &config.countries, &config.minerals, &dates);
        info!(
            seed = config.seed,
            countries = config.countries.len(),
            minerals = config.minerals.len(),
            months = dates.len(),
            rows = observations.len(),
            "synthesized dataset"
        );
        Self {
            seed: config.seed,
            countries: config.countries.clone(),
            minerals: config.minerals.clone(),
            dates,
            observations,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn minerals(&self) -> &[Mineral] {
        &self.minerals
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }
}

/// Consecutive month starts beginning at `start`'s month.
///
/// Stops early (rather than failing) if the calendar runs out.
pub fn month_range(start: NaiveDate, months: u32) -> Vec<NaiveDate> {
    let first = start.with_day(1).unwrap_or(start);
    (0..months)
        .map_while(|i| first.checked_add_months(Months::new(i)))
        .collect()
}

/// Generate one observation per (country, mineral, date), country-major.
///
/// Draw order per pair is fixed (three bases, three slopes, then per date the
/// price, reserves, demand noise) so a seed reproduces the table exactly.
pub fn synthesize(seed: u64, countries: &[Country], minerals: &[Mineral], dates: &[NaiveDate]) -> Vec<Observation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(countries.len() * minerals.len() * dates.len());

    for &country in countries {
        for &mineral in minerals {
            let bases = Metric::ALL.map(|m| {
                let (lo, hi) = bounds(m).base;
                rng.gen_range(lo..hi)
            });
            let slopes = Metric::ALL.map(|m| {
                let (lo, hi) = bounds(m).slope;
                rng.gen_range(lo..hi)
            });
            let [price, reserves, demand] = [0, 1, 2].map(|k| Trend {
                base: bases[k],
                slope: slopes[k],
            });
            debug!(
                country = country.display_name(),
                mineral = mineral.display_name(),
                price_base = price.base,
                reserves_base = reserves.base,
                demand_base = demand.base,
                "pair trend"
            );

            for (i, &date) in dates.iter().enumerate() {
                out.push(Observation {
                    country,
                    mineral,
                    date,
                    price: price.sample(&mut rng, i),
                    reserves: reserves.sample(&mut rng, i),
                    demand: demand.sample(&mut rng, i),
                });
            }
        }
    }

    out
}
