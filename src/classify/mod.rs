//! Threshold classification of `(ϕ⁺, ϕ⁻, TP)` into a system state.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. `ϕ⁺ ≥ θ_pc ∧ ϕ⁻ ≤ θ_ms ∧ TP ≥ θ_tf` → deep positive transition
//! 2. `ϕ⁺ ≥ θ_pc ∧ ϕ⁻ ≤ θ_md ∧ TP ≥ θ_tc` → fragile positive transition
//! 3. `ϕ⁻ > θ_md ∧ TP < θ_tc`             → negative transition warning
//! 4. otherwise                           → threshold hovering
//!
//! Warnings and threshold flags are computed independently of the status.

use crate::domain::{Diagnosis, SystemStatus, ThresholdFlags, Thresholds};

/// Classify one set of core indicators.
pub fn classify(phi_plus: f64, phi_minus: f64, tp: f64, thresholds: &Thresholds) -> Diagnosis {
    let status = select_status(phi_plus, phi_minus, tp, thresholds);

    Diagnosis {
        status,
        label: status.label().to_string(),
        risk_level: status.risk_level(),
        warnings: collect_warnings(phi_minus, tp, thresholds),
        thresholds_met: ThresholdFlags {
            phi_plus_ok: phi_plus >= thresholds.phi_plus_critical,
            phi_minus_safe: phi_minus <= thresholds.phi_minus_safe,
            tp_forward_ok: tp >= thresholds.tp_forward,
        },
    }
}

fn select_status(phi_plus: f64, phi_minus: f64, tp: f64, t: &Thresholds) -> SystemStatus {
    let positive_connected = phi_plus >= t.phi_plus_critical;

    if positive_connected && phi_minus <= t.phi_minus_safe && tp >= t.tp_forward {
        SystemStatus::DeepPositiveTransition
    } else if positive_connected && phi_minus <= t.phi_minus_danger && tp >= t.tp_collapse {
        SystemStatus::FragilePositiveTransition
    } else if phi_minus > t.phi_minus_danger && tp < t.tp_collapse {
        SystemStatus::NegativeTransitionWarning
    } else {
        SystemStatus::ThresholdHovering
    }
}

fn collect_warnings(phi_minus: f64, tp: f64, t: &Thresholds) -> Vec<String> {
    let mut warnings = Vec::new();
    if phi_minus > t.phi_minus_safe {
        warnings.push(format!(
            "Negative network connectivity (phi_minus={phi_minus:.3}) exceeds the safe limit ({:.2}).",
            t.phi_minus_safe
        ));
    }
    if tp < t.tp_forward {
        warnings.push(format!(
            "Transition potential (TP={tp:.3}) is below the forward threshold ({:.2}).",
            t.tp_forward
        ));
    }
    warnings
}
