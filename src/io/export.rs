//! Export batch results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! plotting scripts: one row per case, core indicators first.

use std::io::Write;
use std::path::Path;

use crate::app::pipeline::CaseOutcome;
use crate::error::AppError;

const HEADER: [&str; 10] = [
    "case",
    "phi_plus",
    "phi_minus",
    "TP",
    "T_plus",
    "T_minus",
    "eta",
    "status",
    "risk_level",
    "warnings",
];

/// Write per-case results to a CSV file.
pub fn write_results_csv(path: &Path, outcomes: &[CaseOutcome]) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, outcomes)
}

/// Write per-case results as CSV to any writer.
pub fn write_results<W: Write>(out: W, outcomes: &[CaseOutcome]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    writer
        .write_record(HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for o in outcomes {
        let core = &o.report.core_results;
        let diag = &o.report.diagnosis;
        writer
            .write_record([
                o.case.clone(),
                format!("{:.6}", core.phi_plus),
                format!("{:.6}", core.phi_minus),
                format!("{:.6}", core.tp),
                format!("{:.6}", core.t_plus),
                format!("{:.6}", core.t_minus),
                format!("{:.6}", core.eta),
                diag.status.as_str().to_string(),
                diag.risk_level.as_str().to_string(),
                diag.warnings.join(" | "),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::diagnose_batch;
    use crate::domain::{ModelParameters, ProxyCase, Thresholds};

    #[test]
    fn writes_header_and_one_row_per_case() {
        let mut case = ProxyCase::reference();
        case.name = "Singapore, 2024".to_string();
        let outcomes = diagnose_batch(&[case], &ModelParameters::DEFAULT, &Thresholds::DEFAULT);

        let mut buf = Vec::new();
        write_results(&mut buf, &outcomes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "case,phi_plus,phi_minus,TP,T_plus,T_minus,eta,status,risk_level,warnings");
        assert!(lines[1].starts_with("\"Singapore, 2024\",0.800000,0.090207,6.290000,"));
        assert!(lines[1].ends_with(",deep_positive_transition,low,"));
    }
}
