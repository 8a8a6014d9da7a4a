//! Command-line parsing for the transition diagnostic.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the model code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "shang", version, about = "Economic transition state diagnostic")]
pub struct Cli {
    /// TOML file with `[params]` and `[thresholds]` override tables.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override one model parameter (repeatable), e.g. `--param omega=5`.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value, global = true)]
    pub params: Vec<(String, f64)>,

    /// Override one threshold (repeatable), e.g. `--threshold TP_forward=0.6`.
    #[arg(long = "threshold", value_name = "KEY=VALUE", value_parser = parse_key_value, global = true)]
    pub thresholds: Vec<(String, f64)>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Diagnose one proxy vector and print the report.
    Diagnose(DiagnoseArgs),
    /// Diagnose every row of a CSV file.
    Batch(BatchArgs),
    /// Perturb one proxy vector and report how stable its status is.
    Sweep(SweepArgs),
    /// Print default parameters, thresholds and the proxy order.
    Defaults,
}

/// Plot size options shared by commands that can draw the state space.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Render the (phi+, phi-) state-space plot.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 64)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct DiagnoseArgs {
    /// The 15 proxy values in contract order. The reference case is used when omitted.
    #[arg(value_name = "VALUES", allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Case name used in the report.
    #[arg(long)]
    pub name: Option<String>,

    /// Write the report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Fail (exit 4) when any core result is non-finite.
    #[arg(long)]
    pub strict: bool,

    /// Also print key-factor hints for the inputs.
    #[arg(long)]
    pub factors: bool,

    #[command(flatten)]
    pub plot: PlotArgs,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Input CSV with one proxy vector per row.
    #[arg(long)]
    pub csv: PathBuf,

    /// Export per-case results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Fail (exit 4) when any case has non-finite core results.
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub plot: PlotArgs,
}

#[derive(Debug, Args, Clone)]
pub struct SweepArgs {
    /// The 15 proxy values in contract order. The reference case is used when omitted.
    #[arg(value_name = "VALUES", allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Number of perturbed samples.
    #[arg(long, default_value_t = 500)]
    pub samples: usize,

    /// Relative noise level (standard deviation of the multiplicative shock).
    #[arg(long, default_value_t = 0.05)]
    pub sigma: f64,

    /// Random seed for the perturbations.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Parse `KEY=VALUE`. Key names are checked later, against the schema.
pub fn parse_key_value(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in `{s}`"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid number `{}` for `{key}`", value.trim()))?;
    Ok((key.to_string(), value))
}
