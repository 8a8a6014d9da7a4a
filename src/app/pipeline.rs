//! Shared "diagnosis pipeline" logic used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! proxies -> intermediate variables -> core equations -> classification
//!
//! Each call is pure: no state survives between calls, so batches can run in
//! parallel without coordination.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::domain::{
    DiagnosticReport, ModelParameters, OverrideMap, OverrideTable, ProxyCase, ProxyVector, Thresholds,
};
use crate::error::DiagnosticError;
use crate::models::{compute, map_proxies};

/// Result of diagnosing one named case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub case: String,
    pub report: DiagnosticReport,
}

/// Merge caller overrides over the defaults, validating every key.
pub fn resolve_settings(
    custom_params: Option<&OverrideMap>,
    custom_thresholds: Option<&OverrideMap>,
) -> Result<(ModelParameters, Thresholds), DiagnosticError> {
    let params = match custom_params {
        Some(overrides) => ModelParameters::DEFAULT.with_overrides(overrides)?,
        None => ModelParameters::DEFAULT,
    };
    let thresholds = match custom_thresholds {
        Some(overrides) => Thresholds::DEFAULT.with_overrides(overrides)?,
        None => Thresholds::DEFAULT,
    };

    if thresholds.phi_minus_safe > thresholds.phi_minus_danger {
        warn!(
            safe = thresholds.phi_minus_safe,
            danger = thresholds.phi_minus_danger,
            "phi_minus safe limit is above the danger level"
        );
    }

    Ok((params, thresholds))
}

/// Diagnose one proxy vector, merging optional overrides over the defaults.
///
/// Override errors are the only failure. Non-finite values produced by
/// degenerate divisors (`G`, `zeta_plus`, `zeta_minus` equal to zero) are
/// carried into the report; check [`DiagnosticReport::ensure_finite`] if you
/// need finite results.
pub fn diagnose(
    proxies: &ProxyVector,
    custom_params: Option<&OverrideMap>,
    custom_thresholds: Option<&OverrideMap>,
) -> Result<DiagnosticReport, DiagnosticError> {
    let (params, thresholds) = resolve_settings(custom_params, custom_thresholds)?;
    Ok(diagnose_with(proxies, &params, &thresholds))
}

/// Like [`diagnose`], but starts from an unchecked slice and rejects anything
/// other than 15 values before mapping.
pub fn diagnose_values(
    values: &[f64],
    custom_params: Option<&OverrideMap>,
    custom_thresholds: Option<&OverrideMap>,
) -> Result<DiagnosticReport, DiagnosticError> {
    let proxies = ProxyVector::from_slice(values)?;
    diagnose(&proxies, custom_params, custom_thresholds)
}

/// Run mapper -> engine -> classifier with already-resolved settings.
pub fn diagnose_with(
    proxies: &ProxyVector,
    params: &ModelParameters,
    thresholds: &Thresholds,
) -> DiagnosticReport {
    let intermediate_variables = map_proxies(proxies);
    let core_results = compute(&intermediate_variables, params);
    let diagnosis = classify(
        core_results.phi_plus,
        core_results.phi_minus,
        core_results.tp,
        thresholds,
    );

    let report = DiagnosticReport {
        input_proxies: *proxies,
        intermediate_variables,
        core_results,
        diagnosis,
        model_parameters_used: *params,
        thresholds_used: *thresholds,
    };

    let non_finite = report.core_results.non_finite_fields();
    if !non_finite.is_empty() {
        warn!(
            fields = ?non_finite,
            zero_divisors = ?report.degenerate_divisors(),
            "diagnosis produced non-finite core results"
        );
    }
    debug!(
        status = %report.diagnosis.status,
        phi_plus = report.core_results.phi_plus,
        phi_minus = report.core_results.phi_minus,
        tp = report.core_results.tp,
        "diagnosis complete"
    );

    report
}

/// Diagnose many cases in parallel. Output order matches input order.
pub fn diagnose_batch(
    cases: &[ProxyCase],
    params: &ModelParameters,
    thresholds: &Thresholds,
) -> Vec<CaseOutcome> {
    cases
        .par_iter()
        .map(|c| CaseOutcome {
            case: c.name.clone(),
            report: diagnose_with(&c.proxies, params, thresholds),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SystemStatus;

    fn overrides(pairs: &[(&str, f64)]) -> OverrideMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn reference_case_end_to_end() {
        let case = ProxyCase::reference();
        let report = diagnose(&case.proxies, None, None).unwrap();
        assert_eq!(report.input_proxies, case.proxies);
        assert_eq!(report.model_parameters_used, ModelParameters::DEFAULT);
        assert_eq!(report.thresholds_used, Thresholds::DEFAULT);
        assert_eq!(report.diagnosis.status, SystemStatus::DeepPositiveTransition);
        assert!(report.diagnosis.warnings.is_empty());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let case = ProxyCase::reference();
        let params = overrides(&[("omega", 5.0)]);
        let a = diagnose(&case.proxies, Some(&params), None).unwrap();
        let b = diagnose(&case.proxies, Some(&params), None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.core_results.tp.to_bits(), b.core_results.tp.to_bits());
    }

    #[test]
    fn shape_is_checked_before_mapping() {
        let err = diagnose_values(&[0.1; 3], None, None).unwrap_err();
        assert_eq!(err, DiagnosticError::Shape { expected: 15, actual: 3 });
    }

    #[test]
    fn unknown_threshold_key_is_rejected() {
        let err = diagnose(
            &ProxyCase::reference().proxies,
            None,
            Some(&overrides(&[("tp_forwrd", 0.1)])),
        )
        .unwrap_err();
        assert!(matches!(err, DiagnosticError::UnknownOverride { table: "threshold", .. }));
    }

    #[test]
    fn threshold_override_changes_classification() {
        let report = diagnose(
            &ProxyCase::reference().proxies,
            None,
            Some(&overrides(&[("TP_forward", 10.0)])),
        )
        .unwrap();
        assert_eq!(report.thresholds_used.tp_forward, 10.0);
        assert_eq!(report.diagnosis.status, SystemStatus::FragilePositiveTransition);
        assert!(!report.diagnosis.thresholds_met.tp_forward_ok);
    }

    #[test]
    fn degenerate_divisor_flows_into_report() {
        let report = diagnose(
            &ProxyCase::reference().proxies,
            Some(&overrides(&[("zeta_minus", 0.0)])),
            None,
        )
        .unwrap();
        assert_eq!(report.degenerate_divisors(), vec!["zeta_minus"]);
        // T⁻ > 0 so the raw value is +inf and clips to the ceiling.
        assert_eq!(report.core_results.phi_minus, 0.6);
        assert!(report.ensure_finite().is_ok());
    }

    #[test]
    fn zero_energy_density_fails_finiteness_check() {
        let mut proxies = ProxyCase::reference().proxies;
        proxies.gdp_growth = 0.0;
        proxies.electricity_access = 0.0;
        let report = diagnose(&proxies, None, None).unwrap();
        assert_eq!(report.degenerate_divisors(), vec!["G"]);
        assert_eq!(
            report.ensure_finite().unwrap_err(),
            DiagnosticError::NumericDegeneracy { fields: vec!["d_sigma_minus"] }
        );
    }

    #[test]
    fn batch_preserves_order() {
        let mut cases = Vec::new();
        for i in 0..32 {
            let mut c = ProxyCase::reference();
            c.name = format!("case-{i}");
            c.proxies.gdp_growth = i as f64 * 0.01;
            cases.push(c);
        }
        let out = diagnose_batch(&cases, &ModelParameters::DEFAULT, &Thresholds::DEFAULT);
        assert_eq!(out.len(), cases.len());
        for (outcome, case) in out.iter().zip(&cases) {
            assert_eq!(outcome.case, case.name);
            assert_eq!(outcome.report.input_proxies, case.proxies);
        }
    }
}
