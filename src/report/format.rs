//! Formatted terminal output: the raw data table and run summaries.
//!
//! We keep formatting code in one place so the pipeline stays free of
//! presentation details and output changes stay localized.

use crate::chart::ChartSpec;
use crate::data::Dataset;
use crate::domain::{FilterSelection, Observation};

use super::summarize;

const HEADERS: [&str; 6] = ["Country", "Mineral", "Date", "Price", "Reserves", "Demand"];

/// Render rows as an aligned text table followed by a row-count footer.
///
/// Text columns are left-aligned, numeric columns right-aligned with two
/// decimals.
pub fn format_table(rows: &[Observation]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|o| {
            [
                o.country.display_name().to_string(),
                o.mineral.display_name().to_string(),
                o.date.format("%Y-%m-%d").to_string(),
                format!("{:.2}", o.price),
                format!("{:.2}", o.reserves),
                format!("{:.2}", o.demand),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(&HEADERS.map(String::from), &widths));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &cells {
        out.push_str(&format_row(row, &widths));
    }
    let noun = if rows.len() == 1 { "row" } else { "rows" };
    out.push_str(&format!("({} {noun})\n", rows.len()));
    out
}

fn format_row(row: &[String; 6], widths: &[usize; 6]) -> String {
    let parts: Vec<String> = row
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (cell, &w))| if i < 3 { format!("{cell:<w$}") } else { format!("{cell:>w$}") })
        .collect();
    let mut line = parts.join("  ").trim_end().to_string();
    line.push('\n');
    line
}

/// Per-metric min/mean/max lines for the filtered rows.
pub fn format_summary(rows: &[Observation]) -> String {
    let Some(summaries) = summarize(rows) else {
        return "No rows match the current selection.\n".to_string();
    };
    let mut out = String::new();
    for s in summaries {
        out.push_str(&format!(
            "{:<9} min={:.2} mean={:.2} max={:.2}\n",
            s.metric.display_name(),
            s.min,
            s.mean,
            s.max
        ));
    }
    out
}

/// Header printed by `mdash render` before the charts.
pub fn format_run_summary(dataset: &Dataset, selection: &FilterSelection, rows: &[Observation], charts: &[ChartSpec]) -> String {
    let names = |items: Vec<&str>| if items.is_empty() { "(none)".to_string() } else { items.join(", ") };

    let mut out = String::new();
    out.push_str("=== mdash - Mineral Dashboard ===\n");
    out.push_str(&format!(
        "Dataset: seed={} | {} countries x {} minerals x {} months | rows={}\n",
        dataset.seed(),
        dataset.countries().len(),
        dataset.minerals().len(),
        dataset.dates().len(),
        dataset.observations().len()
    ));
    out.push_str(&format!(
        "Countries: {}\n",
        names(selection.countries().iter().map(|c| c.display_name()).collect())
    ));
    out.push_str(&format!(
        "Minerals: {}\n",
        names(selection.minerals().iter().map(|m| m.display_name()).collect())
    ));
    out.push_str(&format!(
        "Chart: {} | matched rows={} | charts={}\n",
        selection.chart.display_name(),
        rows.len(),
        charts.len()
    ));
    out.push('\n');
    out.push_str(&format_summary(rows));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Country, Mineral};
    use chrono::NaiveDate;

    fn row(country: Country, mineral: Mineral, price: f64) -> Observation {
        Observation {
            country,
            mineral,
            date: NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
            price,
            reserves: 1234.5,
            demand: 400.0,
        }
    }

    #[test]
    fn table_aligns_columns() {
        let rows = [
            row(Country::Chile, Mineral::Copper, 99.5),
            row(Country::SouthAfrica, Mineral::IronOre, 120.25),
        ];
        let txt = format_table(&rows);
        let expected = concat!(
            "Country       Mineral   Date         Price  Reserves  Demand\n",
            "------------  --------  ----------  ------  --------  ------\n",
            "Chile         Copper    2020-02-01   99.50   1234.50  400.00\n",
            "South Africa  Iron Ore  2020-02-01  120.25   1234.50  400.00\n",
            "(2 rows)\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_table_keeps_header() {
        let txt = format_table(&[]);
        assert_eq!(txt.lines().count(), 3);
        assert!(txt.starts_with("Country  Mineral  Date"));
        assert!(txt.ends_with("(0 rows)\n"));
    }

    #[test]
    fn single_row_footer_is_singular() {
        let txt = format_table(&[row(Country::Canada, Mineral::Lithium, 55.0)]);
        assert!(txt.ends_with("\n(1 row)\n"));
    }

    #[test]
    fn summary_handles_empty_rows() {
        assert_eq!(format_summary(&[]), "No rows match the current selection.\n");
        let txt = format_summary(&[row(Country::Chile, Mineral::Gold, 10.0)]);
        assert!(txt.starts_with("Price     min=10.00 mean=10.00 max=10.00\n"));
    }
}
