//! CSV in, diagnoses, CSV out.

use std::io::Write;

use pretty_assertions::assert_eq;
use shang_diag::app::pipeline::diagnose_batch;
use shang_diag::domain::{ModelParameters, PROXY_NAMES, SystemStatus, Thresholds};
use shang_diag::io::{load_cases, write_results_csv};

const SINGAPORE: &str = "0.044,0.92,0.012,0.10,0.41,0.40,1.5,0.95,1.00,0.96,0.25,0.091,0.069,0.05,0.35";
const STALLED: &str = "0.0,0.5,0.05,0.3,0.45,0.5,1.0,0.0,0.7,0.0,0.0,0.1,0.2,0.1,0.6";

#[test]
fn batch_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("cases.csv");
    let output = dir.path().join("results.csv");

    let mut f = std::fs::File::create(&input).expect("create");
    writeln!(f, "name,{}", PROXY_NAMES.join(",")).expect("header");
    writeln!(f, "Singapore,{SINGAPORE}").expect("row");
    writeln!(f, "Stalled,{STALLED}").expect("row");
    writeln!(f, "Broken,{}", "x,".repeat(14) + "x").expect("row");
    drop(f);

    let ingested = load_cases(&input).expect("ingest");
    assert_eq!(ingested.rows_read, 3);
    assert_eq!(ingested.row_errors.len(), 1);
    assert_eq!(ingested.row_errors[0].line, 4);

    let outcomes = diagnose_batch(&ingested.cases, &ModelParameters::DEFAULT, &Thresholds::DEFAULT);
    let names: Vec<&str> = outcomes.iter().map(|o| o.case.as_str()).collect();
    assert_eq!(names, vec!["Singapore", "Stalled"]);
    assert_eq!(outcomes[0].report.diagnosis.status, SystemStatus::DeepPositiveTransition);
    // No growth and no digital coverage: energy sits below the survival floor.
    assert_eq!(outcomes[1].report.core_results.t_plus, 0.0);
    assert_eq!(outcomes[1].report.diagnosis.status, SystemStatus::ThresholdHovering);

    write_results_csv(&output, &outcomes).expect("export");
    let text = std::fs::read_to_string(&output).expect("read back");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "case,phi_plus,phi_minus,TP,T_plus,T_minus,eta,status,risk_level,warnings"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("Stalled,0.050000,0.020000,0.000000,"));
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_cases(&dir.path().join("nope.csv")).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
