//! CSV ingest of proxy cases.
//!
//! This module turns a batch CSV into a clean set of named `ProxyVector`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Order-independent columns**: proxies are matched by header name, then
//!   placed into the fixed contract order
//! - **Separation of concerns**: no model logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{PROXY_COUNT, PROXY_NAMES, ProxyCase, ProxyVector};
use crate::error::AppError;

/// Columns accepted as the case name, in priority order.
const NAME_COLUMNS: [&str; 3] = ["case", "name", "id"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub case: Option<String>,
    pub message: String,
}

/// Ingest output: parsed cases + row errors.
#[derive(Debug, Clone)]
pub struct IngestedCases {
    pub cases: Vec<ProxyCase>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load proxy cases from a CSV file.
pub fn load_cases(path: &Path) -> Result<IngestedCases, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_cases(file)
}

/// Parse proxy cases from any CSV reader.
pub fn read_cases<R: Read>(input: R) -> Result<IngestedCases, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let proxy_columns = resolve_proxy_columns(&header_map)?;
    let name_column = NAME_COLUMNS.iter().find_map(|c| header_map.get(*c).copied());

    let mut cases = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    case: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let name = name_column
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row-{line}"));

        match parse_proxies(&record, &proxy_columns) {
            Ok(proxies) => cases.push(ProxyCase { name, proxies }),
            Err(message) => {
                warn!(line, case = %name, %message, "skipping CSV row");
                row_errors.push(RowError {
                    line,
                    case: Some(name),
                    message,
                });
            }
        }
    }

    if cases.is_empty() {
        return Err(AppError::new(3, "No valid proxy rows found in CSV."));
    }

    debug!(rows_read, rows_used = cases.len(), "ingested proxy cases");

    Ok(IngestedCases {
        cases,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_proxy_columns(header_map: &HashMap<String, usize>) -> Result<[usize; PROXY_COUNT], AppError> {
    let missing: Vec<&str> = PROXY_NAMES
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("Missing required proxy column(s): {}", missing.join(", ")),
        ));
    }

    let mut columns = [0usize; PROXY_COUNT];
    for (slot, name) in columns.iter_mut().zip(PROXY_NAMES) {
        *slot = header_map[name];
    }
    Ok(columns)
}

fn parse_proxies(record: &StringRecord, columns: &[usize; PROXY_COUNT]) -> Result<ProxyVector, String> {
    let mut values = [0.0; PROXY_COUNT];
    for ((slot, &col), name) in values.iter_mut().zip(columns).zip(PROXY_NAMES) {
        let raw = record
            .get(col)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("Missing value for `{name}`."))?;
        let v = raw
            .parse::<f64>()
            .map_err(|_| format!("Invalid number '{raw}' for `{name}`."))?;
        if !v.is_finite() {
            return Err(format!("Non-finite value for `{name}`."));
        }
        *slot = v;
    }
    Ok(ProxyVector::from_array(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        format!("case,{}", PROXY_NAMES.join(","))
    }

    const SINGAPORE: &str =
        "0.044,0.92,0.012,0.10,0.41,0.40,1.5,0.95,1.00,0.96,0.25,0.091,0.069,0.05,0.35";

    #[test]
    fn reads_named_cases() {
        let csv = format!("{}\nSingapore,{SINGAPORE}\n", header());
        let ingested = read_cases(csv.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 1);
        assert_eq!(ingested.cases.len(), 1);
        assert_eq!(ingested.cases[0].name, "Singapore");
        assert_eq!(ingested.cases[0].proxies, ProxyCase::reference().proxies);
    }

    #[test]
    fn columns_are_matched_by_name() {
        // Reverse the column order and uppercase the headers.
        let mut names: Vec<String> = PROXY_NAMES.iter().map(|n| n.to_uppercase()).collect();
        names.reverse();
        let mut values: Vec<&str> = SINGAPORE.split(',').collect();
        values.reverse();
        let csv = format!("\u{feff}{}\n{}\n", names.join(","), values.join(","));

        let ingested = read_cases(csv.as_bytes()).unwrap();
        assert_eq!(ingested.cases[0].proxies, ProxyCase::reference().proxies);
        assert_eq!(ingested.cases[0].name, "row-2");
    }

    #[test]
    fn bad_rows_are_reported_and_skipped() {
        let csv = format!(
            "{}\nGood,{SINGAPORE}\nBad,abc,{}\nShort,0.1\n",
            header(),
            vec!["0.1"; 14].join(",")
        );
        let ingested = read_cases(csv.as_bytes()).unwrap();
        assert_eq!(ingested.rows_read, 3);
        assert_eq!(ingested.cases.len(), 1);
        assert_eq!(ingested.row_errors.len(), 2);
        assert_eq!(ingested.row_errors[0].line, 3);
        assert_eq!(ingested.row_errors[0].case.as_deref(), Some("Bad"));
        assert_eq!(ingested.row_errors[0].message, "Invalid number 'abc' for `gdp_growth`.");
        assert_eq!(ingested.row_errors[1].message, "Missing value for `non_cash_ratio`.");
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let names: Vec<&str> = PROXY_NAMES.iter().copied().filter(|n| *n != "gini").collect();
        let csv = format!("{}\n", names.join(","));
        let err = read_cases(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Missing required proxy column(s): gini");
    }

    #[test]
    fn no_usable_rows_is_an_error() {
        let csv = format!("{}\nOnly,x,{}\n", header(), vec!["0.1"; 14].join(","));
        assert_eq!(read_cases(csv.as_bytes()).unwrap_err().exit_code(), 3);
    }
}
