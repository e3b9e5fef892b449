//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - synthesizes the dataset
//! - dispatches to the TUI, the ASCII renderer, or the exporters

use clap::Parser;
use tracing::info;

use crate::cli::{Command, DatasetArgs, ExportArgs, PlotArgs, RenderArgs, SelectionArgs};
use crate::data::Dataset;
use crate::domain::{Country, DashboardConfig, FilterSelection, Mineral};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mdash` and `mdash --seed 7` to behave like `mdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let is_tui = matches!(cli.command, Command::Tui(_));
    crate::logging::init(cli.verbose, cli.log_file.as_deref(), !is_tui)?;

    match cli.command {
        Command::Tui(args) => crate::tui::run(dashboard_config_from_args(&args)),
        Command::Render(args) => handle_render(args),
        Command::Export(args) => handle_export(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let dataset = Dataset::synthesize(&dashboard_config_from_args(&args.dataset));
    let selection = selection_from_args(&args.selection);
    let run = pipeline::run_selection(&dataset, &selection);

    println!(
        "{}",
        crate::report::format_run_summary(&dataset, &selection, &run.rows, &run.charts)
    );
    if run.charts.is_empty() {
        println!("No charts: no selected (country, mineral) pair has data.");
    } else {
        println!("{}", crate::plot::render_charts(&run.charts, args.width, args.height));
    }
    if args.table {
        println!("{}", crate::report::format_table(&run.rows));
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.json.is_none() && args.csv.is_none() {
        return Err(AppError::usage("Nothing to export: pass --json <PATH> and/or --csv <PATH>."));
    }

    let dataset = Dataset::synthesize(&dashboard_config_from_args(&args.dataset));
    let selection = selection_from_args(&args.selection);
    let run = pipeline::run_selection(&dataset, &selection);

    if let Some(path) = &args.json {
        crate::io::export_charts_json(path, &run.charts)?;
        println!("Wrote {} chart(s) to {}", run.charts.len(), path.display());
    }
    if let Some(path) = &args.csv {
        crate::io::export_observations_csv(path, &run.rows)?;
        println!("Wrote {} row(s) to {}", run.rows.len(), path.display());
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let charts = crate::io::read_charts_json(&args.charts)?;
    info!(path = %args.charts.display(), charts = charts.len(), "loaded chart JSON");
    println!("{}", crate::plot::render_charts(&charts, args.width, args.height));
    Ok(())
}

pub fn dashboard_config_from_args(args: &DatasetArgs) -> DashboardConfig {
    DashboardConfig {
        seed: args.seed,
        start: args.start,
        months: args.months,
        ..DashboardConfig::default()
    }
}

/// Build the selection, falling back to the first country/mineral when a
/// flag was not given.
pub fn selection_from_args(args: &SelectionArgs) -> FilterSelection {
    let countries = if args.countries.is_empty() {
        vec![Country::ALL[0]]
    } else {
        args.countries.clone()
    };
    let minerals = if args.minerals.is_empty() {
        vec![Mineral::ALL[0]]
    } else {
        args.minerals.clone()
    };
    FilterSelection::new(countries, minerals)
        .with_chart(args.chart)
        .with_scatter(args.x, args.y)
}

/// Rewrite argv so `mdash` defaults to `mdash tui`.
///
/// Rules:
/// - `mdash`                        -> `mdash tui`
/// - `mdash --seed 7 ...`           -> `mdash tui --seed 7 ...`
/// - `mdash --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "render" | "export" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
