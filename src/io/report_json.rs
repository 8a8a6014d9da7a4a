//! Write diagnostic report JSON files.
//!
//! Report JSON is the portable audit trail of one diagnosis: the inputs, every
//! intermediate and core value, the classification, and the exact parameters
//! and thresholds that produced it.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DiagnosticReport;
use crate::error::AppError;

/// On-disk envelope around a `DiagnosticReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub case: String,
    pub report: DiagnosticReport,
}

impl ReportFile {
    pub fn new(case: impl Into<String>, report: DiagnosticReport) -> Self {
        Self {
            tool: format!("shang {}", env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
            case: case.into(),
            report,
        }
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, file: &ReportFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}
