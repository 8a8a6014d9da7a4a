//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads overrides (TOML, environment, CLI flags)
//! - runs single, batch or sweep diagnoses
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{BatchArgs, Cli, Command, DiagnoseArgs, PlotArgs, SweepArgs};
use crate::config::OverrideConfig;
use crate::data::{SweepConfig, run_sweep};
use crate::domain::{ModelParameters, ProxyCase, ProxyVector, Thresholds};
use crate::error::AppError;
use crate::plot::{StatePoint, render_state_space};

pub mod pipeline;

/// Entry point for the `shang` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut overrides = OverrideConfig::load_with_dotenv(cli.config.as_deref())?;
    overrides.apply_cli(&cli.params, &cli.thresholds);
    let (params, thresholds) =
        pipeline::resolve_settings(overrides.param_overrides(), overrides.threshold_overrides())?;

    match cli.command {
        Command::Diagnose(args) => handle_diagnose(args, &params, &thresholds),
        Command::Batch(args) => handle_batch(args, &params, &thresholds),
        Command::Sweep(args) => handle_sweep(args, &params, &thresholds),
        Command::Defaults => {
            println!(
                "{}",
                crate::report::format_defaults(&ModelParameters::DEFAULT, &Thresholds::DEFAULT)
            );
            Ok(())
        }
    }
}

/// Install the stderr log subscriber. `SHANG_LOG` wins over the CLI flags.
fn init_tracing(quiet: bool, verbose: bool) -> Result<(), AppError> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SHANG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::new(2, format!("Failed to initialize logging: {e}")))
}

fn handle_diagnose(args: DiagnoseArgs, params: &ModelParameters, thresholds: &Thresholds) -> Result<(), AppError> {
    let case = case_from_values(&args.values, args.name)?;
    let report = pipeline::diagnose_with(&case.proxies, params, thresholds);
    if args.strict {
        report.ensure_finite()?;
    }

    println!("{}", crate::report::format_proxies(&case.proxies));
    println!("{}", crate::report::format_report(&report, &case.name));
    if args.factors {
        println!("{}", crate::report::format_key_factors(&case.proxies));
    }
    print_plot(&args.plot, &[StatePoint::from_report(case.name.as_str(), &report)], thresholds);

    if let Some(path) = &args.json {
        let file = crate::io::ReportFile::new(case.name, report);
        crate::io::write_report_json(path, &file)?;
        info!(path = %path.display(), "wrote report JSON");
    }
    Ok(())
}

fn handle_batch(args: BatchArgs, params: &ModelParameters, thresholds: &Thresholds) -> Result<(), AppError> {
    let ingested = crate::io::load_cases(&args.csv)?;
    println!(
        "Read {} row(s) from {}: {} usable, {} skipped.",
        ingested.rows_read,
        args.csv.display(),
        ingested.cases.len(),
        ingested.row_errors.len()
    );
    for e in &ingested.row_errors {
        println!(
            "  line {} ({}): {}",
            e.line,
            e.case.as_deref().unwrap_or("?"),
            e.message
        );
    }

    let outcomes = pipeline::diagnose_batch(&ingested.cases, params, thresholds);
    if args.strict {
        for o in &outcomes {
            o.report
                .ensure_finite()
                .map_err(|e| AppError::new(e.exit_code(), format!("Case '{}': {e}", o.case)))?;
        }
    }

    println!();
    println!("{}", crate::report::format_batch_table(&outcomes));
    let points: Vec<StatePoint> = outcomes
        .iter()
        .map(|o| StatePoint::from_report(o.case.as_str(), &o.report))
        .collect();
    print_plot(&args.plot, &points, thresholds);

    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &outcomes)?;
        info!(path = %path.display(), cases = outcomes.len(), "wrote batch results");
    }
    Ok(())
}

fn handle_sweep(args: SweepArgs, params: &ModelParameters, thresholds: &Thresholds) -> Result<(), AppError> {
    let case = case_from_values(&args.values, None)?;
    let config = SweepConfig {
        samples: args.samples,
        rel_sigma: args.sigma,
        seed: args.seed,
    };
    let summary = run_sweep(&case.proxies, params, thresholds, &config)?;
    if summary.flip_rate > 0.5 {
        warn!(case = %case.name, flip_rate = summary.flip_rate, "status is unstable under perturbation");
    }

    println!("Case: {}", case.name);
    println!("{}", crate::report::format_sweep_summary(&summary));
    Ok(())
}

/// No values means the built-in reference case.
fn case_from_values(values: &[f64], name: Option<String>) -> Result<ProxyCase, AppError> {
    if values.is_empty() {
        let mut case = ProxyCase::reference();
        if let Some(name) = name {
            case.name = name;
        }
        return Ok(case);
    }
    Ok(ProxyCase {
        name: name.unwrap_or_else(|| "input".to_string()),
        proxies: ProxyVector::from_slice(values)?,
    })
}

fn print_plot(args: &PlotArgs, points: &[StatePoint], thresholds: &Thresholds) {
    if args.plot {
        println!("{}", render_state_space(points, thresholds, args.width, args.height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_use_the_reference_case() {
        let case = case_from_values(&[], None).unwrap();
        assert_eq!(case, ProxyCase::reference());

        let renamed = case_from_values(&[], Some("SG".to_string())).unwrap();
        assert_eq!(renamed.name, "SG");
        assert_eq!(renamed.proxies, ProxyCase::reference().proxies);
    }

    #[test]
    fn values_must_have_the_right_shape() {
        let err = case_from_values(&[0.1; 14], None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Expected 15 proxy values, got 14.");

        let ok = case_from_values(&[0.1; 15], None).unwrap();
        assert_eq!(ok.name, "input");
    }
}
