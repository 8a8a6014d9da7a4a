//! Reporting utilities: human-readable summaries of diagnoses.

pub mod format;

pub use format::*;
