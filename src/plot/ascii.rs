//! ASCII state-space plot for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks of where cases sit relative to the thresholds
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - `phi_plus_critical`: `|` column
//! - `phi_minus_safe`: `-` row, `phi_minus_danger`: `=` row, crossings `+`
//! - cases: one marker per status (`D`, `F`, `N`, `H`), listed by name below
//!   the legend in input order

use crate::domain::{DiagnosticReport, SystemStatus, Thresholds};

/// Horizontal axis (phi_plus) range.
pub const X_RANGE: (f64, f64) = (0.0, 0.8);
/// Vertical axis (phi_minus) range.
pub const Y_RANGE: (f64, f64) = (0.0, 0.6);

/// One case placed in the (phi_plus, phi_minus) plane.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePoint {
    pub name: String,
    pub phi_plus: f64,
    pub phi_minus: f64,
    pub status: SystemStatus,
}

impl StatePoint {
    pub fn from_report(name: impl Into<String>, report: &DiagnosticReport) -> Self {
        Self {
            name: name.into(),
            phi_plus: report.core_results.phi_plus,
            phi_minus: report.core_results.phi_minus,
            status: report.diagnosis.status,
        }
    }
}

/// Render the state-space scatter. Later points overwrite earlier ones that
/// land on the same cell; non-finite points are skipped and counted.
pub fn render_state_space(points: &[StatePoint], thresholds: &Thresholds, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (x_min, x_max) = X_RANGE;
    let (y_min, y_max) = Y_RANGE;

    let mut grid = vec![vec![' '; width]; height];

    // Threshold lines first so markers overlay them.
    let safe_row = map_y(thresholds.phi_minus_safe, y_min, y_max, height);
    let danger_row = map_y(thresholds.phi_minus_danger, y_min, y_max, height);
    let critical_col = map_x(thresholds.phi_plus_critical, x_min, x_max, width);
    if let Some(row) = safe_row {
        grid[row].fill('-');
    }
    if let Some(row) = danger_row {
        grid[row].fill('=');
    }
    if let Some(col) = critical_col {
        for row in grid.iter_mut() {
            row[col] = if row[col] == ' ' { '|' } else { '+' };
        }
    }

    let mut skipped = 0usize;
    for p in points {
        match (
            map_x(p.phi_plus, x_min, x_max, width),
            map_y(p.phi_minus, y_min, y_max, height),
        ) {
            (Some(x), Some(y)) => grid[y][x] = p.status.marker(),
            _ => skipped += 1,
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "State space: phi+=[{x_min:.2}, {x_max:.2}] (x) | phi-=[{y_min:.2}, {y_max:.2}] (y)\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&format!(
        "Legend: D deep, F fragile, N negative, H hovering | `|` phi+ >= {:.2}, `-` phi- safe {:.2}, `=` phi- danger {:.2}\n",
        thresholds.phi_plus_critical, thresholds.phi_minus_safe, thresholds.phi_minus_danger
    ));
    if skipped > 0 {
        out.push_str(&format!("({skipped} non-finite point(s) not shown)\n"));
    }
    if !points.is_empty() {
        out.push_str("Cases:\n");
        for (i, p) in points.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {} {} (phi+ {:.3}, phi- {:.3})\n",
                i + 1,
                p.status.marker(),
                p.name,
                p.phi_plus,
                p.phi_minus
            ));
        }
    }
    out
}

/// Column for `x`, clamped to the grid. `None` for non-finite input.
fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> Option<usize> {
    if !x.is_finite() {
        return None;
    }
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    Some((u * (width as f64 - 1.0)).round() as usize)
}

/// Row for `y` (row 0 is the top), clamped to the grid.
fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> Option<usize> {
    if !y.is_finite() {
        return None;
    }
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    Some((height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize)
}
