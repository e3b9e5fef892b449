//! Command-line parsing for the mineral dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline: each args struct converts into a plain config value in `app`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{ChartType, Country, Metric, Mineral};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mdash", version, about = "Mineral commodity dashboard over a synthetic dataset")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write logs to this file (the only log sink for `tui`).
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(DatasetArgs),
    /// Print the selected charts as ASCII plots.
    Render(RenderArgs),
    /// Write the selected charts as JSON and/or the filtered rows as CSV.
    Export(ExportArgs),
    /// Plot a previously exported chart JSON file.
    Plot(PlotArgs),
}

/// Options that shape the synthesized dataset.
#[derive(Debug, Args, Clone)]
pub struct DatasetArgs {
    /// Random seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First month of the horizon (YYYY-MM-DD; the day is ignored).
    #[arg(long, default_value = "2020-01-01")]
    pub start: NaiveDate,

    /// Number of monthly periods.
    #[arg(long, default_value_t = 24)]
    pub months: u32,
}

/// The sidebar controls, as flags.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    /// Country to include (repeatable). Defaults to the first country.
    #[arg(short = 'c', long = "country", value_enum)]
    pub countries: Vec<Country>,

    /// Mineral to include (repeatable). Defaults to the first mineral.
    #[arg(short = 'm', long = "mineral", value_enum)]
    pub minerals: Vec<Mineral>,

    /// Chart type.
    #[arg(long, value_enum, default_value_t = ChartType::Line)]
    pub chart: ChartType,

    /// Scatter x-axis metric.
    #[arg(long, value_enum, default_value_t = Metric::Price)]
    pub x: Metric,

    /// Scatter y-axis metric.
    #[arg(long, value_enum, default_value_t = Metric::Reserves)]
    pub y: Metric,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Also print the raw data table of the filtered rows.
    #[arg(long)]
    pub table: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Write chart specs to this JSON file.
    #[arg(long, value_name = "JSON")]
    pub json: Option<PathBuf>,

    /// Write filtered rows to this CSV file.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,
}

/// Options for plotting a saved chart file.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Chart JSON file produced by `mdash export --json`.
    #[arg(long, value_name = "JSON")]
    pub charts: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_flags_parse() {
        let cli = Cli::parse_from([
            "mdash", "render", "-c", "chile", "-c", "south-africa", "-m", "iron-ore", "--chart", "multi-axis", "--seed",
            "7", "--table",
        ]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.selection.countries, vec![Country::Chile, Country::SouthAfrica]);
        assert_eq!(args.selection.minerals, vec![Mineral::IronOre]);
        assert_eq!(args.selection.chart, ChartType::MultiAxis);
        assert_eq!(args.dataset.seed, 7);
        assert!(args.table);
    }

    #[test]
    fn dataset_defaults() {
        let cli = Cli::parse_from(["mdash", "tui"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.seed, 42);
        assert_eq!(args.months, 24);
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::parse_from(["mdash", "render", "-vv", "--x", "demand"]);
        assert_eq!(cli.verbose, 2);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.selection.x, Metric::Demand);
        assert_eq!(args.selection.y, Metric::Reserves);
    }

    #[test]
    fn bad_start_date_is_rejected() {
        assert!(Cli::try_parse_from(["mdash", "tui", "--start", "2020-13-01"]).is_err());
    }
}
