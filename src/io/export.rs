//! Export filtered rows to CSV and chart specs to JSON.
//!
//! The CSV is meant for spreadsheets; the JSON lets any other renderer (web,
//! desktop) draw the same charts the terminal shows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::chart::ChartSpec;
use crate::domain::Observation;
use crate::error::AppError;

pub const CSV_HEADER: &str = "country,mineral,date,price,reserves,demand";

/// Write rows as CSV to any writer.
pub fn write_observations_csv<W: Write>(mut out: W, rows: &[Observation]) -> std::io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for o in rows {
        writeln!(
            out,
            "{},{},{},{:.2},{:.2},{:.2}",
            o.country.display_name(),
            o.mineral.display_name(),
            o.date,
            o.price,
            o.reserves,
            o.demand,
        )?;
    }
    out.flush()
}

/// Write rows to a CSV file.
pub fn export_observations_csv(path: &Path, rows: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_observations_csv(BufWriter::new(file), rows)
        .map_err(|e| AppError::usage(format!("Failed to write export CSV '{}': {e}", path.display())))?;
    info!(path = %path.display(), rows = rows.len(), "wrote observations CSV");
    Ok(())
}

/// Write chart specs to a pretty-printed JSON file (a top-level array).
pub fn export_charts_json(path: &Path, charts: &[ChartSpec]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), charts)
        .map_err(|e| AppError::internal(format!("Failed to write chart JSON: {e}")))?;
    info!(path = %path.display(), charts = charts.len(), "wrote chart JSON");
    Ok(())
}

/// Read chart specs back from a JSON file written by [`export_charts_json`].
pub fn read_charts_json(path: &Path) -> Result<Vec<ChartSpec>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| AppError::usage(format!("Invalid chart JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_charts;
    use crate::data::{month_range, synthesize};
    use crate::domain::{ChartType, Country, FilterSelection, Mineral};
    use chrono::NaiveDate;

    fn rows() -> Vec<Observation> {
        let dates = month_range(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 3);
        synthesize(42, &[Country::SouthAfrica], &[Mineral::Gold], &dates)
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let rows = rows();
        let mut buf = Vec::new();
        write_observations_csv(&mut buf, &rows).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("South Africa,Gold,2020-01-01,"));
        assert!(lines[3].starts_with("South Africa,Gold,2020-03-01,"));
    }

    #[test]
    fn csv_of_empty_rows_is_header_only() {
        let mut buf = Vec::new();
        write_observations_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn chart_json_reads_back() {
        let rows = rows();
        let sel = FilterSelection::new([Country::SouthAfrica], [Mineral::Gold]).with_chart(ChartType::MultiAxis);
        let charts = build_charts(&rows, &sel);

        let path = std::env::temp_dir().join(format!("mdash_charts_{}.json", std::process::id()));
        export_charts_json(&path, &charts).unwrap();
        let back = read_charts_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.len(), 1);
        assert_eq!(back[0].title, charts[0].title);
        assert_eq!(back[0].point_count(), 9);
    }

    #[test]
    fn missing_json_is_usage_error() {
        let err = read_charts_json(Path::new("/nonexistent/mdash/charts.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
