//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the proxy input vector and named cases (`ProxyVector`, `ProxyCase`)
//! - calibrated coefficients and thresholds (`ModelParameters`, `Thresholds`)
//! - pipeline outputs (`IntermediateVariables`, `CoreResults`, `Diagnosis`,
//!   `DiagnosticReport`)
//! - JSON encoding for non-finite floats (`nonfinite`)

pub mod nonfinite;
pub mod params;
pub mod types;

pub use params::*;
pub use types::*;
