//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - runs the search / fits
//! - prints reports and plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, FitArgs, GridSizeArgs, PlotArgs, SampleArgs, TableArgs, TuiArgs};
use crate::domain::{FitConfig, SamplePlan};
use crate::error::AppError;
use crate::models::GridSizeRule;

pub mod pipeline;

/// Entry point for the `gridfit` binary.
pub fn run() -> Result<(), AppError> {
    crate::telemetry::init_tracing();

    // Bare `gridfit` behaves like `gridfit table`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Table(args) => handle_table(args),
        Command::Sample(args) => handle_sample(args),
        Command::Fit(args) => handle_fit(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
        Command::GridSize(args) => handle_grid_size(args),
    }
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let table = crate::search::cost_table(args.n);
    tracing::debug!(n = args.n, rows = table.rows().len(), "built cost table");

    let max_rows = (!args.all_rows).then_some(crate::report::DEFAULT_MAX_ROWS);
    println!("{}", crate::report::format_cost_table(&table, max_rows));
    print!("{}", crate::report::format_comparison(&table));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let plan = SamplePlan::from_ranges(&args.plan.ranges);
    let points = pipeline::run_sample(&plan);

    print!("{}", crate::report::format_sample_summary(&points, &plan));

    if let Some(path) = &args.export {
        crate::io::write_dataset_csv(path, &points)?;
    }
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.selection, &run.points, &run.plan)
    );
    println!(
        "{}",
        crate::report::format_live_comparison(&run.selection, args.compare_n)
    );

    if config.plot {
        let kind = config.overlay.unwrap_or(run.selection.best.formula.kind);
        let overlay = run.selection.get(kind).map(|f| &f.formula);
        if overlay.is_none() {
            tracing::warn!(model = kind.display_name(), "overlay model was not fitted");
        }
        let plot = crate::plot::render_ascii_plot(
            &run.points,
            overlay,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_dataset {
        crate::io::write_dataset_csv(path, &run.points)?;
    }
    if let Some(path) = &config.export_fits {
        let record = crate::io::fits_file(&run.selection, &run.plan, &config.log_bounds);
        crate::io::write_fits_json(path, &record)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let fits = crate::io::read_fits_json(&args.fits)?;

    // Regenerate the dataset from the plan recorded in the file.
    let points = pipeline::run_sample(&fits.plan);
    let kind = args.overlay.unwrap_or(fits.best);
    let Some(overlay) = fits.fits.iter().find(|f| f.formula.kind == kind) else {
        return Err(AppError::invalid(format!(
            "Fits JSON '{}' has no {} formula.",
            args.fits.display(),
            kind.display_name()
        )));
    };

    let plot =
        crate::plot::render_ascii_plot(&points, Some(&overlay.formula), args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = FitConfig {
        plan: SamplePlan::from_ranges(&args.plan.ranges),
        log_bounds: args.log.bounds(),
        ..FitConfig::default()
    };
    let run = pipeline::run_fit(&config)?;
    crate::tui::run(run, args.n)
}

fn handle_grid_size(args: GridSizeArgs) -> Result<(), AppError> {
    let rule = match &args.fits {
        Some(path) => {
            let fits = crate::io::read_fits_json(path)?;
            fits.fits
                .iter()
                .find_map(|f| GridSizeRule::from_formula(&f.formula))
                .ok_or_else(|| {
                    AppError::invalid(format!("Fits JSON '{}' has no log formula.", path.display()))
                })?
        }
        None => GridSizeRule::default(),
    };

    print!("{}", crate::report::format_grid_sizes(&args.counts, &rule));
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        plan: SamplePlan::from_ranges(&args.plan.ranges),
        log_bounds: args.log.bounds(),
        overlay: args.overlay,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_dataset: args.export_dataset.clone(),
        export_fits: args.export_fits.clone(),
    }
}

/// Rewrite argv so `gridfit` defaults to `gridfit table`.
///
/// Rules:
/// - `gridfit`                      -> `gridfit table`
/// - `gridfit -n 500 ...`           -> `gridfit table -n 500 ...`
/// - `gridfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("table".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // If the first token is a flag, treat it as "table flags".
    if arg1.starts_with('-') {
        argv.insert(1, "table".to_string());
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_table() {
        assert_eq!(rewrite_args(args(&["gridfit"])), args(&["gridfit", "table"]));
    }

    #[test]
    fn leading_flag_goes_to_table() {
        assert_eq!(
            rewrite_args(args(&["gridfit", "-n", "500"])),
            args(&["gridfit", "table", "-n", "500"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        assert_eq!(rewrite_args(args(&["gridfit", "fit"])), args(&["gridfit", "fit"]));
        assert_eq!(rewrite_args(args(&["gridfit", "--help"])), args(&["gridfit", "--help"]));
    }

    #[test]
    fn fit_config_mirrors_flags() {
        let cli =
            crate::cli::Cli::try_parse_from(["gridfit", "fit", "--no-plot", "--log-a-max", "5"])
                .unwrap();
        let Command::Fit(fit_args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&fit_args);
        assert!(!config.plot);
        assert_eq!(config.log_bounds.a_max, 5.0);
        assert_eq!(config.plan, SamplePlan::default());
    }
}
