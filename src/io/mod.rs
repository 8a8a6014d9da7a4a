//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - batch result exports (CSV) (`export`)
//! - report JSON writing (`report_json`)

pub mod export;
pub mod ingest;
pub mod report_json;

pub use export::*;
pub use ingest::*;
pub use report_json::*;

