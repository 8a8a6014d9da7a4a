//! `shang-diag` library crate.
//!
//! The binary (`shang`) is a thin wrapper around this library so that:
//!
//! - the diagnostic core is testable without spawning processes
//! - batch tools and notebooks can call `app::pipeline::diagnose` directly
//!
//! Pipeline: proxies -> intermediate variables (`models::proxy`) -> core
//! equations (`models::equations`) -> rule-based state (`classify`).

pub mod app;
pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
