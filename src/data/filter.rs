//! Narrow the observation table to the current sidebar selection.

use tracing::debug;

use crate::domain::{FilterSelection, Observation};

/// Rows whose country and mineral are both selected, in input order.
///
/// An empty country or mineral set yields an empty result.
pub fn filter_observations(observations: &[Observation], selection: &FilterSelection) -> Vec<Observation> {
    let out: Vec<Observation> = observations
        .iter()
        .filter(|o| selection.matches(o))
        .cloned()
        .collect();
    debug!(rows_in = observations.len(), rows_out = out.len(), "filtered observations");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{month_range, synthesize};
    use crate::domain::{Country, Mineral};
    use chrono::NaiveDate;

    fn table() -> Vec<Observation> {
        let dates = month_range(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 6);
        synthesize(42, &Country::ALL, &Mineral::ALL, &dates)
    }

    #[test]
    fn keeps_only_selected_pairs() {
        let rows = table();
        let sel = FilterSelection::new([Country::Chile, Country::Canada], [Mineral::Gold]);
        let out = filter_observations(&rows, &sel);
        assert_eq!(out.len(), 2 * 6);
        assert!(out
            .iter()
            .all(|o| (o.country == Country::Chile || o.country == Country::Canada) && o.mineral == Mineral::Gold));
    }

    #[test]
    fn empty_sets_give_empty_result() {
        let rows = table();
        assert!(filter_observations(&rows, &FilterSelection::new([], [])).is_empty());
        assert!(filter_observations(&rows, &FilterSelection::new([Country::Chile], [])).is_empty());
        assert!(filter_observations(&rows, &FilterSelection::new([], [Mineral::Copper])).is_empty());
    }

    #[test]
    fn is_idempotent_and_order_preserving() {
        let rows = table();
        let sel = FilterSelection::new([Country::Brazil, Country::Australia], [Mineral::Lithium, Mineral::Copper]);
        let once = filter_observations(&rows, &sel);
        let twice = filter_observations(&once, &sel);
        assert_eq!(once, twice);

        // Selection order does not reorder rows: they follow the table.
        let positions: Vec<usize> = once
            .iter()
            .map(|o| rows.iter().position(|r| r == o).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
