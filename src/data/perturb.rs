//! Sensitivity sweep: how stable is a diagnosis under small proxy noise?
//!
//! A case that sits near a threshold can flip state under measurement error.
//! We draw perturbed copies of a base vector, multiplying every proxy by
//! `1 + ε` with `ε ~ Normal(0, rel_sigma)`, diagnose each copy and summarize
//! how often the status differs from the unperturbed baseline.
//!
//! Samples are drawn sequentially from a seeded `StdRng` and only the
//! evaluation runs in parallel, so a fixed seed always gives the same summary.

use std::collections::BTreeMap;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;
use tracing::info;

use crate::app::pipeline::diagnose_with;
use crate::domain::{ModelParameters, PROXY_COUNT, ProxyVector, SystemStatus, Thresholds};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    pub samples: usize,
    /// Standard deviation of the relative noise applied to each proxy.
    pub rel_sigma: f64,
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            samples: 500,
            rel_sigma: 0.05,
            seed: 42,
        }
    }
}

/// Min / mean / max of one indicator across the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl Spread {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut n = 0usize;
        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            n += 1;
        }
        if n == 0 {
            return Self {
                min: f64::NAN,
                mean: f64::NAN,
                max: f64::NAN,
            };
        }
        // Rounding in the running sum can push the mean just outside [min, max].
        let mean = sum / n as f64;
        let mean = if min <= max { mean.clamp(min, max) } else { mean };
        Self { min, mean, max }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub samples: usize,
    pub rel_sigma: f64,
    pub seed: u64,
    pub baseline: SystemStatus,
    pub status_counts: BTreeMap<SystemStatus, usize>,
    /// Share of samples whose status differs from the baseline.
    pub flip_rate: f64,
    pub phi_plus: Spread,
    pub phi_minus: Spread,
    pub tp: Spread,
}

/// Draw `config.samples` perturbed copies of `base`.
pub fn perturb_proxies(base: &ProxyVector, config: &SweepConfig) -> Result<Vec<ProxyVector>, AppError> {
    if config.samples == 0 {
        return Err(AppError::new(2, "Sweep sample count must be > 0."));
    }
    if !(config.rel_sigma.is_finite() && config.rel_sigma >= 0.0) {
        return Err(AppError::new(2, "Sweep noise level must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.rel_sigma)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let base = base.to_array();
    let mut out = Vec::with_capacity(config.samples);
    for _ in 0..config.samples {
        let mut values = [0.0; PROXY_COUNT];
        for (slot, &b) in values.iter_mut().zip(&base) {
            *slot = b * (1.0 + normal.sample(&mut rng));
        }
        out.push(ProxyVector::from_array(values));
    }
    Ok(out)
}

/// Perturb `base`, diagnose every sample and summarize the outcome.
pub fn run_sweep(
    base: &ProxyVector,
    params: &ModelParameters,
    thresholds: &Thresholds,
    config: &SweepConfig,
) -> Result<SweepSummary, AppError> {
    let baseline = diagnose_with(base, params, thresholds).diagnosis.status;
    let samples = perturb_proxies(base, config)?;

    let results: Vec<(SystemStatus, f64, f64, f64)> = samples
        .par_iter()
        .map(|p| {
            let report = diagnose_with(p, params, thresholds);
            (
                report.diagnosis.status,
                report.core_results.phi_plus,
                report.core_results.phi_minus,
                report.core_results.tp,
            )
        })
        .collect();

    let mut status_counts: BTreeMap<SystemStatus, usize> = BTreeMap::new();
    for (status, ..) in &results {
        *status_counts.entry(*status).or_default() += 1;
    }
    let flipped = results.iter().filter(|(s, ..)| *s != baseline).count();
    let flip_rate = flipped as f64 / results.len() as f64;

    info!(
        samples = results.len(),
        %baseline,
        flip_rate,
        "sensitivity sweep complete"
    );

    Ok(SweepSummary {
        samples: results.len(),
        rel_sigma: config.rel_sigma,
        seed: config.seed,
        baseline,
        status_counts,
        flip_rate,
        phi_plus: Spread::from_values(results.iter().map(|r| r.1)),
        phi_minus: Spread::from_values(results.iter().map(|r| r.2)),
        tp: Spread::from_values(results.iter().map(|r| r.3)),
    })
}
