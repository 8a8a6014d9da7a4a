//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the model code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::CaseOutcome;
use crate::data::SweepSummary;
use crate::domain::{
    DiagnosticReport, ModelParameters, PROXY_DESCRIPTIONS, PROXY_NAMES, ProxyVector, SystemStatus, Thresholds,
};

const RULE: &str = "============================================================";

/// Format the full report for one diagnosis.
pub fn format_report(report: &DiagnosticReport, case_name: &str) -> String {
    let core = &report.core_results;
    let diag = &report.diagnosis;
    let t = &report.thresholds_used;
    let met = &diag.thresholds_met;

    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Transition diagnosis - {case_name}\n"));
    out.push_str(RULE);
    out.push('\n');

    out.push_str("Core indicators:\n");
    out.push_str(&format!(
        "  phi+ (positive connectivity): {:.3} | threshold >= {:.2} | {}\n",
        core.phi_plus,
        t.phi_plus_critical,
        mark(met.phi_plus_ok, "met", "not met"),
    ));
    out.push_str(&format!(
        "  phi- (negative connectivity): {:.3} | safe <= {:.2}      | {}\n",
        core.phi_minus,
        t.phi_minus_safe,
        mark(met.phi_minus_safe, "safe", "exceeded"),
    ));
    out.push_str(&format!(
        "  TP   (transition potential) : {:.3} | target >= {:.2}    | {}\n",
        core.tp,
        t.tp_forward,
        mark(met.tp_forward_ok, "sufficient", "insufficient"),
    ));

    out.push_str(&format!(
        "\nSystem status: {} (risk: {})\n",
        diag.label,
        diag.risk_level.as_str().to_uppercase()
    ));
    out.push_str(&format!("  {}\n", diag.status.interpretation()));

    if !diag.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &diag.warnings {
            out.push_str(&format!("  * {w}\n"));
        }
    }

    out.push_str("\nDerived indicators:\n");
    out.push_str(&format!("  T+ (positive transport): {:.3}\n", core.t_plus));
    out.push_str(&format!("  T- (negative transport): {:.3}\n", core.t_minus));
    out.push_str(&format!("  eta (fairness efficiency): {:.3}\n", core.eta));
    out.push_str(&format!(
        "  d_sigma+ / d_sigma- trend: {} / {}\n",
        fmt_trend(core.d_sigma_plus),
        fmt_trend(core.d_sigma_minus)
    ));

    let non_finite = core.non_finite_fields();
    if !non_finite.is_empty() {
        out.push_str(&format!(
            "\nNumeric degeneracy: non-finite {} (zero divisors: {})\n",
            non_finite.join(", "),
            fmt_list(&report.degenerate_divisors()),
        ));
    }

    out.push_str(RULE);
    out.push('\n');
    out
}

/// Format the proxy inputs as a numbered table.
pub fn format_proxies(proxies: &ProxyVector) -> String {
    let mut out = String::from("Proxy inputs:\n");
    for (i, (desc, value)) in PROXY_DESCRIPTIONS.iter().zip(proxies.to_array()).enumerate() {
        out.push_str(&format!("  {:>2}. {desc:<42} : {value:>7.3}\n", i + 1));
    }
    out
}

/// Key-factor hints drawn directly from the raw proxies.
pub fn format_key_factors(proxies: &ProxyVector) -> String {
    let mut hints = Vec::new();
    if proxies.gini > 0.4 {
        hints.push(format!(
            "Income inequality (Gini {:.2}) is high and suppresses system efficiency (eta).",
            proxies.gini
        ));
    }
    if proxies.youth_unemployment > 0.15 {
        hints.push(format!(
            "Youth unemployment ({:.1}%) is a main source of the negative factor (sigma-).",
            proxies.youth_unemployment * 100.0
        ));
    }
    if proxies.polarization > 0.45 {
        hints.push(format!(
            "Polarization ({:.2}) is high and dampens cooperation (sigma+).",
            proxies.polarization
        ));
    }
    if proxies.npl_ratio < 0.03 {
        hints.push(format!(
            "Low NPL ratio ({:.1}%) supports positive credit (K+).",
            proxies.npl_ratio * 100.0
        ));
    }

    let mut out = String::from("Key factors:\n");
    if hints.is_empty() {
        out.push_str("  (none flagged)\n");
    }
    for h in hints {
        out.push_str(&format!("  - {h}\n"));
    }
    out
}

/// Format a compact one-row-per-case table for batch runs.
pub fn format_batch_table(outcomes: &[CaseOutcome]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<24} {:>8} {:>8} {:>10} {:<28} {:<8}",
            "case", "phi+", "phi-", "TP", "status", "risk"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<8} {:-<8} {:-<10} {:-<28} {:-<8}", "", "", "", "", "", "").trim_end());
    out.push('\n');

    for o in outcomes {
        let core = &o.report.core_results;
        let diag = &o.report.diagnosis;
        out.push_str(
            format!(
                "{:<24} {:>8.3} {:>8.3} {:>10.3} {:<28} {:<8}",
                truncate(&o.case, 24),
                core.phi_plus,
                core.phi_minus,
                core.tp,
                diag.status.as_str(),
                diag.risk_level.as_str(),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format the outcome of a sensitivity sweep.
pub fn format_sweep_summary(summary: &SweepSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Sensitivity sweep: n={} | noise={:.1}% | seed={}\n",
        summary.samples,
        summary.rel_sigma * 100.0,
        summary.seed
    ));
    out.push_str(&format!("Baseline status: {}\n", summary.baseline.as_str()));
    out.push_str(&format!("Flip rate: {:.1}%\n", summary.flip_rate * 100.0));

    out.push_str("\nStatus distribution:\n");
    for status in SystemStatus::ALL {
        let n = summary.status_counts.get(&status).copied().unwrap_or(0);
        let share = n as f64 / summary.samples.max(1) as f64 * 100.0;
        out.push_str(&format!("  {:<28} {n:>6} ({share:>5.1}%)\n", status.as_str()));
    }

    out.push_str("\nIndicator spread (min / mean / max):\n");
    for (name, s) in [("phi+", summary.phi_plus), ("phi-", summary.phi_minus), ("TP", summary.tp)] {
        out.push_str(&format!("  {name:<5} {:>9.3} {:>9.3} {:>9.3}\n", s.min, s.mean, s.max));
    }
    out
}

/// Format the default coefficient and threshold tables.
pub fn format_defaults(params: &ModelParameters, thresholds: &Thresholds) -> String {
    let mut out = String::from("Model parameters:\n");
    for (name, value) in params.entries() {
        out.push_str(&format!("  {name:<18} {value}\n"));
    }
    out.push_str("\nThresholds:\n");
    for (name, value) in thresholds.entries() {
        out.push_str(&format!("  {name:<18} {value}\n"));
    }
    out.push_str("\nProxy order:\n");
    for (i, name) in PROXY_NAMES.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {name}\n", i + 1));
    }
    out
}

fn mark(ok: bool, yes: &str, no: &str) -> String {
    if ok { format!("[ok] {yes}") } else { format!("[!!] {no}") }
}

fn fmt_trend(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let arrow = if v > 0.0 {
        "rising"
    } else if v < 0.0 {
        "falling"
    } else {
        "flat"
    };
    format!("{v:+.3} ({arrow})")
}

fn fmt_list(items: &[&str]) -> String {
    if items.is_empty() { "none".to_string() } else { items.join(", ") }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
