//! Map filtered observations to chart specs for the selected chart type.

use crate::domain::{ChartType, Country, FilterSelection, Metric, Mineral, Observation, ScatterAxes};

use super::spec::{Axis, ChartSpec, Encoding, Field, Point, Series, Side, XValue};

/// Build the charts for `selection.chart` from already-filtered rows.
///
/// Line and bar always yield one chart per metric, scatter exactly one, and
/// multi-axis one per non-empty selected (country, mineral) pair.
pub fn build_charts(rows: &[Observation], selection: &FilterSelection) -> Vec<ChartSpec> {
    match selection.chart {
        ChartType::Line => Metric::ALL.iter().map(|&m| line_chart(rows, m)).collect(),
        ChartType::Bar => Metric::ALL.iter().map(|&m| bar_chart(rows, m)).collect(),
        ChartType::Scatter => vec![scatter_chart(rows, selection.scatter)],
        ChartType::MultiAxis => multi_axis_charts(rows, selection),
    }
}

/// (country, mineral) groups in order of first appearance.
fn group_pairs(rows: &[Observation]) -> Vec<((Country, Mineral), Vec<&Observation>)> {
    let mut groups: Vec<((Country, Mineral), Vec<&Observation>)> = Vec::new();
    for o in rows {
        let key = (o.country, o.mineral);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(o),
            None => groups.push((key, vec![o])),
        }
    }
    groups
}

fn pair_name(country: Country, mineral: Mineral) -> String {
    format!("{} / {}", country.display_name(), mineral.display_name())
}

fn dated_series(country: Country, mineral: Mineral, members: &[&Observation], metric: Metric, y_axis: usize) -> Series {
    Series {
        name: pair_name(country, mineral),
        country: Some(country),
        mineral: Some(mineral),
        y_axis,
        points: members
            .iter()
            .map(|o| Point {
                x: XValue::Date(o.date),
                y: o.value(metric),
                size: None,
                hover_date: None,
            })
            .collect(),
    }
}

fn line_chart(rows: &[Observation], metric: Metric) -> ChartSpec {
    let mut encoding = Encoding::new(Field::Date, metric.into());
    encoding.color = Some(Field::Country);
    encoding.line_dash = Some(Field::Mineral);

    ChartSpec {
        kind: ChartType::Line,
        title: format!("{} over time", metric.display_name()),
        x_axis: Axis::bottom(Field::Date, "Date"),
        y_axes: vec![Axis::left(metric.into(), metric.display_name())],
        encoding,
        series: group_pairs(rows)
            .into_iter()
            .map(|((c, m), members)| dated_series(c, m, &members, metric, 0))
            .collect(),
    }
}

fn bar_chart(rows: &[Observation], metric: Metric) -> ChartSpec {
    let mut encoding = Encoding::new(Field::Date, metric.into());
    encoding.color = Some(Field::Country);
    encoding.facet = Some(Field::Mineral);

    ChartSpec {
        kind: ChartType::Bar,
        title: format!("{} by country", metric.display_name()),
        x_axis: Axis::bottom(Field::Date, "Date"),
        y_axes: vec![Axis::left(metric.into(), metric.display_name())],
        encoding,
        series: group_pairs(rows)
            .into_iter()
            .map(|((c, m), members)| dated_series(c, m, &members, metric, 0))
            .collect(),
    }
}

fn scatter_chart(rows: &[Observation], axes: ScatterAxes) -> ChartSpec {
    let mut encoding = Encoding::new(axes.x.into(), axes.y.into());
    encoding.color = Some(Field::Country);
    encoding.size = Some(Field::Demand);
    encoding.symbol = Some(Field::Mineral);
    encoding.hover = vec![Field::Date];

    let series = group_pairs(rows)
        .into_iter()
        .map(|((country, mineral), members)| Series {
            name: pair_name(country, mineral),
            country: Some(country),
            mineral: Some(mineral),
            y_axis: 0,
            points: members
                .iter()
                .map(|o| Point {
                    x: XValue::Number(o.value(axes.x)),
                    y: o.value(axes.y),
                    size: Some(o.demand),
                    hover_date: Some(o.date),
                })
                .collect(),
        })
        .collect();

    ChartSpec {
        kind: ChartType::Scatter,
        title: format!("{} vs {}", axes.x.display_name(), axes.y.display_name()),
        x_axis: Axis::bottom(axes.x.into(), axes.x.display_name()),
        y_axes: vec![Axis::left(axes.y.into(), axes.y.display_name())],
        encoding,
        series,
    }
}

fn multi_axis_charts(rows: &[Observation], selection: &FilterSelection) -> Vec<ChartSpec> {
    let mut out = Vec::new();
    for &country in selection.countries() {
        for &mineral in selection.minerals() {
            let members: Vec<&Observation> = rows
                .iter()
                .filter(|o| o.country == country && o.mineral == mineral)
                .collect();
            if members.is_empty() {
                continue;
            }
            out.push(multi_axis_chart(country, mineral, &members));
        }
    }
    out
}

fn multi_axis_chart(country: Country, mineral: Mineral, members: &[&Observation]) -> ChartSpec {
    // Price on the inner left axis, reserves one step further out, demand right.
    let y_axes = vec![
        Axis::new(Field::Price, "Price", Side::Left, 0),
        Axis::new(Field::Reserves, "Reserves", Side::Left, 1),
        Axis::new(Field::Demand, "Demand", Side::Right, 0),
    ];
    // `y` only names the innermost binding; each series' axis comes from `y_axes`.
    let encoding = Encoding::new(Field::Date, y_axes[0].field);
    let series = Metric::ALL
        .iter()
        .enumerate()
        .map(|(axis, &metric)| {
            let mut s = dated_series(country, mineral, members, metric, axis);
            s.name = metric.display_name().to_string();
            s
        })
        .collect();

    ChartSpec {
        kind: ChartType::MultiAxis,
        title: format!(
            "{} in {}: Price vs Reserves vs Demand",
            mineral.display_name(),
            country.display_name()
        ),
        x_axis: Axis::bottom(Field::Date, "Date"),
        y_axes,
        encoding,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{filter_observations, month_range, synthesize};
    use chrono::NaiveDate;

    fn metric_named(name: &str) -> Metric {
        Metric::ALL
            .into_iter()
            .find(|m| m.display_name() == name)
            .unwrap()
    }

    fn rows_for(countries: &[Country], minerals: &[Mineral], months: u32) -> Vec<Observation> {
        let dates = month_range(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), months);
        synthesize(42, countries, minerals, &dates)
    }

    #[test]
    fn fixed_counts_for_line_bar_scatter_even_when_empty() {
        let rows = rows_for(&Country::ALL, &Mineral::ALL, 6);
        for chart in [ChartType::Line, ChartType::Bar, ChartType::Scatter] {
            let expected = if chart == ChartType::Scatter { 1 } else { 3 };
            let sel = FilterSelection::default().with_chart(chart);
            assert_eq!(build_charts(&rows, &sel).len(), expected, "{chart:?}");

            let empty = build_charts(&[], &sel);
            assert_eq!(empty.len(), expected, "{chart:?} empty");
            assert!(empty.iter().all(ChartSpec::is_empty));
        }
    }

    #[test]
    fn line_charts_have_one_series_per_pair() {
        let rows = rows_for(&[Country::Chile, Country::Brazil], &[Mineral::Copper, Mineral::Gold], 5);
        let charts = build_charts(&rows, &FilterSelection::default());
        let titles: Vec<_> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Price over time", "Reserves over time", "Demand over time"]);
        for c in &charts {
            assert_eq!(c.series.len(), 4);
            assert_eq!(c.point_count(), 20);
            assert_eq!(c.encoding.color, Some(Field::Country));
            assert_eq!(c.encoding.line_dash, Some(Field::Mineral));
        }
        assert_eq!(charts[1].series[0].points[0].y, rows[0].reserves);
    }

    #[test]
    fn bar_charts_facet_by_mineral() {
        let rows = rows_for(&[Country::Chile, Country::Canada], &[Mineral::Lithium, Mineral::Gold], 3);
        let sel = FilterSelection::default().with_chart(ChartType::Bar);
        let charts = build_charts(&rows, &sel);
        assert!(charts.iter().all(|c| c.kind == ChartType::Bar));
        assert_eq!(charts[0].facets(), vec![Mineral::Lithium, Mineral::Gold]);
        assert_eq!(charts[0].encoding.color, Some(Field::Country));
    }

    #[test]
    fn scatter_uses_selected_axes_and_demand_size() {
        let rows = rows_for(&[Country::Australia], &[Mineral::IronOre], 4);
        let sel = FilterSelection::default()
            .with_chart(ChartType::Scatter)
            .with_scatter(Metric::Demand, Metric::Price);
        let charts = build_charts(&rows, &sel);
        let chart = &charts[0];
        assert_eq!(chart.title, "Demand vs Price");
        assert_eq!(chart.encoding.x, Field::Demand);
        assert_eq!(chart.encoding.hover, vec![Field::Date]);
        let p = chart.series[0].points[2];
        assert_eq!(p.x, XValue::Number(rows[2].demand));
        assert_eq!(p.y, rows[2].price);
        assert_eq!(p.size, Some(rows[2].demand));
        assert_eq!(p.hover_date, Some(rows[2].date));
    }

    #[test]
    fn default_scatter_is_price_vs_reserves() {
        let rows = rows_for(&[Country::Chile], &[Mineral::Copper], 2);
        let sel = FilterSelection::default().with_chart(ChartType::Scatter);
        let chart = &build_charts(&rows, &sel)[0];
        assert_eq!((chart.encoding.x, chart.encoding.y), (Field::Price, Field::Reserves));
    }

    #[test]
    fn multi_axis_counts_non_empty_pairs() {
        // Dataset lacks Canada entirely, so Canada pairs are empty.
        let rows = rows_for(&[Country::Chile, Country::Brazil], &Mineral::ALL, 3);
        let sel = FilterSelection::new(
            [Country::Chile, Country::Canada, Country::Brazil],
            [Mineral::Gold, Mineral::Copper],
        )
        .with_chart(ChartType::MultiAxis);
        let filtered = filter_observations(&rows, &sel);
        let charts = build_charts(&filtered, &sel);
        assert_eq!(charts.len(), 4);
        assert_eq!(charts[0].title, "Gold in Chile: Price vs Reserves vs Demand");
        assert_eq!(charts[3].title, "Copper in Brazil: Price vs Reserves vs Demand");
        assert!(build_charts(&[], &sel).is_empty());
    }

    #[test]
    fn multi_axis_has_three_independent_axes() {
        let rows = rows_for(&[Country::Chile], &[Mineral::Copper], 6);
        let sel = FilterSelection::default().with_chart(ChartType::MultiAxis);
        let chart = &build_charts(&rows, &sel)[0];
        let placement: Vec<_> = chart.y_axes.iter().map(|a| (a.field, a.side, a.offset)).collect();
        assert_eq!(
            placement,
            [
                (Field::Price, Side::Left, 0),
                (Field::Reserves, Side::Left, 1),
                (Field::Demand, Side::Right, 0),
            ]
        );
        let axes: Vec<_> = chart.series.iter().map(|s| (s.name.as_str(), s.y_axis)).collect();
        assert_eq!(axes, [("Price", 0), ("Reserves", 1), ("Demand", 2)]);
        assert_eq!(chart.encoding.y, chart.y_axes[0].field);
        for s in &chart.series {
            assert_eq!(Field::from(metric_named(&s.name)), chart.y_axes[s.y_axis].field);
        }
        let reserves_max = rows.iter().map(|o| o.reserves).fold(f64::MIN, f64::max);
        assert_eq!(chart.y_bounds(1).map(|b| b.1), Some(reserves_max));
    }
}
