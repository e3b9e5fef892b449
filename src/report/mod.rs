//! Reporting utilities: per-metric summaries and the raw data table.

use crate::domain::{Metric, Observation};

pub mod format;

pub use format::*;

/// Min / mean / max of one metric over a set of rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub metric: Metric,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// Summaries for every metric, or `None` when there are no rows.
pub fn summarize(rows: &[Observation]) -> Option<Vec<MetricSummary>> {
    if rows.is_empty() {
        return None;
    }

    let n = rows.len() as f64;
    let out = Metric::ALL
        .iter()
        .map(|&metric| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            let mut sum = 0.0;
            for o in rows {
                let v = o.value(metric);
                min = min.min(v);
                max = max.max(v);
                sum += v;
            }
            MetricSummary {
                metric,
                min,
                mean: sum / n,
                max,
            }
        })
        .collect();
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Country, Mineral};
    use chrono::NaiveDate;

    fn obs(price: f64, reserves: f64, demand: f64) -> Observation {
        Observation {
            country: Country::Chile,
            mineral: Mineral::Copper,
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            price,
            reserves,
            demand,
        }
    }

    #[test]
    fn summarize_computes_min_mean_max() {
        let rows = [obs(10.0, 1000.0, 300.0), obs(30.0, 3000.0, 100.0)];
        let s = summarize(&rows).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], MetricSummary { metric: Metric::Price, min: 10.0, mean: 20.0, max: 30.0 });
        assert_eq!(s[2].min, 100.0);
        assert_eq!(s[2].max, 300.0);
    }

    #[test]
    fn summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }
}
