//! Calibrated model coefficients and classification thresholds.
//!
//! Defaults are immutable `const` records. Callers never mutate them; overrides
//! produce a new record via [`OverrideTable::with_overrides`], which validates
//! every key against the fixed schema instead of blindly merging maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DiagnosticError;

/// Caller-supplied `name -> value` overrides.
pub type OverrideMap = BTreeMap<String, f64>;

/// A fixed schema of named real coefficients that supports validated overrides.
pub trait OverrideTable: Copy {
    /// Table name used in error messages.
    const TABLE: &'static str;

    /// Wire name of the coefficient `key` refers to (ASCII case-insensitive,
    /// aliases resolved), or `None` if the key is not part of the schema.
    fn canonical_key(key: &str) -> Option<&'static str>;

    /// Mutable access to the coefficient with wire name `name`.
    fn slot_mut(&mut self, name: &str) -> Option<&mut f64>;

    /// Return a copy with every key in `overrides` replaced.
    ///
    /// Absent keys keep their current value. Unknown keys, non-finite values
    /// and two spellings of the same coefficient are rejected; nothing is
    /// applied on error.
    fn with_overrides(&self, overrides: &OverrideMap) -> Result<Self, DiagnosticError> {
        let mut out = *self;
        let mut seen: BTreeMap<&'static str, &str> = BTreeMap::new();
        for (key, &value) in overrides {
            let unknown = || DiagnosticError::UnknownOverride {
                table: Self::TABLE,
                key: key.clone(),
            };
            let name = Self::canonical_key(key).ok_or_else(unknown)?;
            if let Some(first) = seen.insert(name, key) {
                return Err(DiagnosticError::ConflictingOverride {
                    table: Self::TABLE,
                    first: first.to_string(),
                    second: key.clone(),
                });
            }
            if !value.is_finite() {
                return Err(DiagnosticError::InvalidOverride {
                    table: Self::TABLE,
                    key: key.clone(),
                    value,
                });
            }
            *out.slot_mut(name).ok_or_else(unknown)? = value;
        }
        Ok(out)
    }
}

/// Coefficients of the seven core equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Minimum survival threshold δ.
    pub delta: f64,
    /// Social risk-aversion baseline R.
    #[serde(rename = "R")]
    pub r: f64,
    /// Prosperity-excess threshold R⁺.
    #[serde(rename = "R_plus")]
    pub r_plus: f64,
    pub alpha: f64,
    pub rho: f64,
    pub mu: f64,
    pub kappa: f64,
    pub chi: f64,
    pub beta_plus: f64,
    pub beta_minus: f64,
    pub tau: f64,
    pub iota: f64,
    pub zeta_plus: f64,
    pub zeta_minus: f64,
    /// Intertemporal discount rate λ.
    #[serde(rename = "lambda_")]
    pub lambda: f64,
    /// Destructive amplification of negative activity ω.
    pub omega: f64,
}

impl ModelParameters {
    pub const DEFAULT: Self = Self {
        delta: 1.0,
        r: 2.0,
        r_plus: 2.2,
        alpha: 0.1,
        rho: 0.2,
        mu: 0.05,
        kappa: 0.05,
        chi: 0.1,
        beta_plus: 0.1,
        beta_minus: 0.08,
        tau: 0.15,
        iota: 0.2,
        zeta_plus: 0.05,
        zeta_minus: 0.07,
        lambda: 0.1,
        omega: 4.1,
    };

    pub fn entries(&self) -> [(&'static str, f64); 16] {
        [
            ("delta", self.delta),
            ("R", self.r),
            ("R_plus", self.r_plus),
            ("alpha", self.alpha),
            ("rho", self.rho),
            ("mu", self.mu),
            ("kappa", self.kappa),
            ("chi", self.chi),
            ("beta_plus", self.beta_plus),
            ("beta_minus", self.beta_minus),
            ("tau", self.tau),
            ("iota", self.iota),
            ("zeta_plus", self.zeta_plus),
            ("zeta_minus", self.zeta_minus),
            ("lambda_", self.lambda),
            ("omega", self.omega),
        ]
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl OverrideTable for ModelParameters {
    const TABLE: &'static str = "model parameter";

    fn canonical_key(key: &str) -> Option<&'static str> {
        let name = match key.to_ascii_lowercase().as_str() {
            "delta" => "delta",
            "r" => "R",
            "r_plus" => "R_plus",
            "alpha" => "alpha",
            "rho" => "rho",
            "mu" => "mu",
            "kappa" => "kappa",
            "chi" => "chi",
            "beta_plus" => "beta_plus",
            "beta_minus" => "beta_minus",
            "tau" => "tau",
            "iota" => "iota",
            "zeta_plus" => "zeta_plus",
            "zeta_minus" => "zeta_minus",
            "lambda_" | "lambda" => "lambda_",
            "omega" => "omega",
            _ => return None,
        };
        Some(name)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut f64> {
        let slot = match name {
            "delta" => &mut self.delta,
            "R" => &mut self.r,
            "R_plus" => &mut self.r_plus,
            "alpha" => &mut self.alpha,
            "rho" => &mut self.rho,
            "mu" => &mut self.mu,
            "kappa" => &mut self.kappa,
            "chi" => &mut self.chi,
            "beta_plus" => &mut self.beta_plus,
            "beta_minus" => &mut self.beta_minus,
            "tau" => &mut self.tau,
            "iota" => &mut self.iota,
            "zeta_plus" => &mut self.zeta_plus,
            "zeta_minus" => &mut self.zeta_minus,
            "lambda_" => &mut self.lambda,
            "omega" => &mut self.omega,
            _ => return None,
        };
        Some(slot)
    }
}

/// Classification cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// θ⁺: positive-transition connectivity.
    pub phi_plus_critical: f64,
    /// Upper safe limit for negative connectivity.
    pub phi_minus_safe: f64,
    /// Danger level for negative connectivity.
    pub phi_minus_danger: f64,
    /// Transition potential needed for a forward transition.
    #[serde(rename = "TP_forward")]
    pub tp_forward: f64,
    /// Transition potential below which collapse is signalled.
    #[serde(rename = "TP_collapse")]
    pub tp_collapse: f64,
}

impl Thresholds {
    pub const DEFAULT: Self = Self {
        phi_plus_critical: 0.33,
        phi_minus_safe: 0.10,
        phi_minus_danger: 0.18,
        tp_forward: 0.52,
        tp_collapse: 0.15,
    };

    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("phi_plus_critical", self.phi_plus_critical),
            ("phi_minus_safe", self.phi_minus_safe),
            ("phi_minus_danger", self.phi_minus_danger),
            ("TP_forward", self.tp_forward),
            ("TP_collapse", self.tp_collapse),
        ]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl OverrideTable for Thresholds {
    const TABLE: &'static str = "threshold";

    fn canonical_key(key: &str) -> Option<&'static str> {
        let name = match key.to_ascii_lowercase().as_str() {
            "phi_plus_critical" => "phi_plus_critical",
            "phi_minus_safe" => "phi_minus_safe",
            "phi_minus_danger" => "phi_minus_danger",
            "tp_forward" => "TP_forward",
            "tp_collapse" => "TP_collapse",
            _ => return None,
        };
        Some(name)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut f64> {
        let slot = match name {
            "phi_plus_critical" => &mut self.phi_plus_critical,
            "phi_minus_safe" => &mut self.phi_minus_safe,
            "phi_minus_danger" => &mut self.phi_minus_danger,
            "TP_forward" => &mut self.tp_forward,
            "TP_collapse" => &mut self.tp_collapse,
            _ => return None,
        };
        Some(slot)
    }
}
