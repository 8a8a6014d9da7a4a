//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the mapper, engine and classifier as plain values
//! - exported to JSON/CSV
//! - handed to a formatting or plotting layer unchanged
//!
//! Field names on the wire use the model's symbol names (`P`, `K_plus`, `TP`, ...).

use serde::{Deserialize, Serialize};

use crate::domain::params::{ModelParameters, Thresholds};
use crate::error::DiagnosticError;

/// Number of proxy indicators in a `ProxyVector`.
pub const PROXY_COUNT: usize = 15;

/// Canonical proxy names, in contract order.
pub const PROXY_NAMES: [&str; PROXY_COUNT] = [
    "gdp_growth",
    "non_cash_ratio",
    "npl_ratio",
    "shadow_economy",
    "gini",
    "polarization",
    "net_migration",
    "digital_coverage",
    "electricity_access",
    "internet_penetration",
    "fintech_growth",
    "youth_unemployment",
    "debt_service_ratio",
    "crypto_estimate",
    "toxicity_index",
];

/// Human-readable descriptions matching `PROXY_NAMES`.
pub const PROXY_DESCRIPTIONS: [&str; PROXY_COUNT] = [
    "GDP per capita growth",
    "Non-cash payment transactions / total",
    "NPL ratio (bank non-performing loans)",
    "Shadow economy (% of GDP)",
    "Gini coefficient",
    "Polarization index (0-1)",
    "Net migration rate (per 1,000)",
    "Digital infrastructure coverage",
    "Electricity access rate",
    "Internet penetration",
    "Mobile money / fintech transaction growth",
    "Youth unemployment rate",
    "Government debt service / revenue ratio",
    "Crypto & dark-pool transaction estimate",
    "Social media toxicity / hate-speech index",
];

/// The 15 observable proxy indicators.
///
/// Order is part of the contract: `from_slice`/`from_array` read values
/// positionally and never validate names. `fintech_growth` is carried for
/// completeness but not used by the current equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProxyVector {
    #[serde(with = "crate::domain::nonfinite")]
    pub gdp_growth: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub non_cash_ratio: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub npl_ratio: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub shadow_economy: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub gini: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub polarization: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub net_migration: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub digital_coverage: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub electricity_access: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub internet_penetration: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub fintech_growth: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub youth_unemployment: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub debt_service_ratio: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub crypto_estimate: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub toxicity_index: f64,
}

impl ProxyVector {
    pub fn from_array(values: [f64; PROXY_COUNT]) -> Self {
        let [
            gdp_growth,
            non_cash_ratio,
            npl_ratio,
            shadow_economy,
            gini,
            polarization,
            net_migration,
            digital_coverage,
            electricity_access,
            internet_penetration,
            fintech_growth,
            youth_unemployment,
            debt_service_ratio,
            crypto_estimate,
            toxicity_index,
        ] = values;

        Self {
            gdp_growth,
            non_cash_ratio,
            npl_ratio,
            shadow_economy,
            gini,
            polarization,
            net_migration,
            digital_coverage,
            electricity_access,
            internet_penetration,
            fintech_growth,
            youth_unemployment,
            debt_service_ratio,
            crypto_estimate,
            toxicity_index,
        }
    }

    /// Build from an arbitrary-length slice, rejecting anything but 15 values.
    pub fn from_slice(values: &[f64]) -> Result<Self, DiagnosticError> {
        let array: [f64; PROXY_COUNT] =
            values.try_into().map_err(|_| DiagnosticError::Shape {
                expected: PROXY_COUNT,
                actual: values.len(),
            })?;
        Ok(Self::from_array(array))
    }

    pub fn to_array(&self) -> [f64; PROXY_COUNT] {
        [
            self.gdp_growth,
            self.non_cash_ratio,
            self.npl_ratio,
            self.shadow_economy,
            self.gini,
            self.polarization,
            self.net_migration,
            self.digital_coverage,
            self.electricity_access,
            self.internet_penetration,
            self.fintech_growth,
            self.youth_unemployment,
            self.debt_service_ratio,
            self.crypto_estimate,
            self.toxicity_index,
        ]
    }
}

/// A named proxy vector (one row of a batch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyCase {
    pub name: String,
    pub proxies: ProxyVector,
}

impl ProxyCase {
    /// Built-in worked example: Singapore, 2024.
    pub fn reference() -> Self {
        Self {
            name: "Singapore 2024".to_string(),
            proxies: ProxyVector::from_array([
                0.044, 0.92, 0.012, 0.10, 0.41, 0.40, 1.5, 0.95, 1.00, 0.96, 0.25, 0.091, 0.069,
                0.05, 0.35,
            ]),
        }
    }
}

/// Bounded intermediate state variables derived from the proxies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntermediateVariables {
    /// Generalized energy (economic + digital level).
    #[serde(rename = "P", with = "crate::domain::nonfinite")]
    pub p: f64,
    /// Positive credit encoding.
    #[serde(rename = "K_plus", with = "crate::domain::nonfinite")]
    pub k_plus: f64,
    /// Negative credit encoding.
    #[serde(rename = "K_minus", with = "crate::domain::nonfinite")]
    pub k_minus: f64,
    /// Positive behavioral factor.
    #[serde(with = "crate::domain::nonfinite")]
    pub sigma_plus: f64,
    /// Negative behavioral factor.
    #[serde(with = "crate::domain::nonfinite")]
    pub sigma_minus: f64,
    /// Civilizational attraction.
    #[serde(rename = "A", with = "crate::domain::nonfinite")]
    pub a: f64,
    /// Social division (polarization, unclamped).
    #[serde(rename = "D", with = "crate::domain::nonfinite")]
    pub d: f64,
    /// Penalty strength.
    #[serde(rename = "Lambda", with = "crate::domain::nonfinite")]
    pub lambda: f64,
    /// Narrative suppression (unclamped).
    #[serde(rename = "Psi", with = "crate::domain::nonfinite")]
    pub psi: f64,
    /// Energy density (unclamped, may be <= 0).
    #[serde(rename = "G", with = "crate::domain::nonfinite")]
    pub g: f64,
    /// Psychological recovery.
    #[serde(rename = "H", with = "crate::domain::nonfinite")]
    pub h: f64,
    /// Pass-through Gini coefficient, used for the efficiency factor.
    #[serde(with = "crate::domain::nonfinite")]
    pub gini: f64,
}

/// Outputs of the seven core equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreResults {
    #[serde(rename = "T_plus", with = "crate::domain::nonfinite")]
    pub t_plus: f64,
    #[serde(rename = "T_minus", with = "crate::domain::nonfinite")]
    pub t_minus: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub d_sigma_plus: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub d_sigma_minus: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub phi_plus: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub phi_minus: f64,
    #[serde(rename = "TP", with = "crate::domain::nonfinite")]
    pub tp: f64,
    #[serde(with = "crate::domain::nonfinite")]
    pub eta: f64,
}

impl CoreResults {
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("T_plus", self.t_plus),
            ("T_minus", self.t_minus),
            ("d_sigma_plus", self.d_sigma_plus),
            ("d_sigma_minus", self.d_sigma_minus),
            ("phi_plus", self.phi_plus),
            ("phi_minus", self.phi_minus),
            ("TP", self.tp),
            ("eta", self.eta),
        ]
    }

    /// Names of outputs that are NaN or infinite.
    pub fn non_finite_fields(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Qualitative system state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    DeepPositiveTransition,
    FragilePositiveTransition,
    NegativeTransitionWarning,
    ThresholdHovering,
}

impl SystemStatus {
    pub const ALL: [SystemStatus; 4] = [
        SystemStatus::DeepPositiveTransition,
        SystemStatus::FragilePositiveTransition,
        SystemStatus::NegativeTransitionWarning,
        SystemStatus::ThresholdHovering,
    ];

    /// Stable machine tag.
    pub fn as_str(self) -> &'static str {
        match self {
            SystemStatus::DeepPositiveTransition => "deep_positive_transition",
            SystemStatus::FragilePositiveTransition => "fragile_positive_transition",
            SystemStatus::NegativeTransitionWarning => "negative_transition_warning",
            SystemStatus::ThresholdHovering => "threshold_hovering",
        }
    }

    /// Human-readable label for terminal output.
    pub fn label(self) -> &'static str {
        match self {
            SystemStatus::DeepPositiveTransition => "Deep positive transition",
            SystemStatus::FragilePositiveTransition => "Fragile positive transition / stagnation",
            SystemStatus::NegativeTransitionWarning => "Negative transition warning",
            SystemStatus::ThresholdHovering => "Threshold hovering",
        }
    }

    pub fn risk_level(self) -> RiskLevel {
        match self {
            SystemStatus::DeepPositiveTransition => RiskLevel::Low,
            SystemStatus::FragilePositiveTransition => RiskLevel::Medium,
            SystemStatus::NegativeTransitionWarning => RiskLevel::High,
            SystemStatus::ThresholdHovering => RiskLevel::Variable,
        }
    }

    /// Single-character marker for plots.
    pub fn marker(self) -> char {
        match self {
            SystemStatus::DeepPositiveTransition => 'D',
            SystemStatus::FragilePositiveTransition => 'F',
            SystemStatus::NegativeTransitionWarning => 'N',
            SystemStatus::ThresholdHovering => 'H',
        }
    }

    /// One-line reading of the state.
    pub fn interpretation(self) -> &'static str {
        match self {
            SystemStatus::DeepPositiveTransition => {
                "The cooperative network is healthy and on a positive trajectory."
            }
            SystemStatus::FragilePositiveTransition => {
                "Positive potential exists but the foundation is weak; watch the risk points."
            }
            SystemStatus::NegativeTransitionWarning => {
                "The negative network is highly connected; collapse risk calls for intervention."
            }
            SystemStatus::ThresholdHovering => {
                "The system sits near a critical point; small changes may flip its direction."
            }
        }
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Variable,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Variable => "variable",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three threshold comparisons, recorded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdFlags {
    pub phi_plus_ok: bool,
    pub phi_minus_safe: bool,
    #[serde(rename = "TP_forward_ok")]
    pub tp_forward_ok: bool,
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub status: SystemStatus,
    pub label: String,
    pub risk_level: RiskLevel,
    pub warnings: Vec<String>,
    pub thresholds_met: ThresholdFlags,
}

/// Full audit trail of one diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub input_proxies: ProxyVector,
    pub intermediate_variables: IntermediateVariables,
    pub core_results: CoreResults,
    pub diagnosis: Diagnosis,
    pub model_parameters_used: ModelParameters,
    pub thresholds_used: Thresholds,
}

impl DiagnosticReport {
    /// Divisors of the core equations that are exactly zero.
    pub fn degenerate_divisors(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.intermediate_variables.g == 0.0 {
            out.push("G");
        }
        if self.model_parameters_used.zeta_plus == 0.0 {
            out.push("zeta_plus");
        }
        if self.model_parameters_used.zeta_minus == 0.0 {
            out.push("zeta_minus");
        }
        out
    }

    /// Fail if any core result is NaN or infinite.
    pub fn ensure_finite(&self) -> Result<(), DiagnosticError> {
        let fields = self.core_results.non_finite_fields();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(DiagnosticError::NumericDegeneracy { fields })
        }
    }
}
