//! Single-point helpers shared by the core equations.
//!
//! The connectivity equations have the linear growth/decay form
//!
//! ```text
//! dφ/dt = growth − ζ·φ
//! ```
//!
//! We do not integrate them. Setting `dφ/dt = 0` gives the equilibrium
//! `φ* = growth / ζ`, which is only meaningful as a quasi-steady-state
//! approximation: it assumes the average transport equals the transport at the
//! current evaluation point.

/// Equilibrium of `dφ/dt = growth − dissipation·φ`.
///
/// Division follows IEEE-754: `dissipation == 0` yields ±infinity (or NaN when
/// `growth` is also zero). Callers must check finiteness.
pub fn quasi_steady_state(growth: f64, dissipation: f64) -> f64 {
    growth / dissipation
}

/// Intertemporal discount `exp(−rate · horizon)`.
pub fn discount(rate: f64, horizon: f64) -> f64 {
    (-rate * horizon).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_state_zeroes_the_derivative() {
        let growth = 0.12;
        let zeta = 0.05;
        let phi = quasi_steady_state(growth, zeta);
        assert!((growth - zeta * phi).abs() < 1e-15);
    }

    #[test]
    fn zero_dissipation_is_not_finite() {
        assert_eq!(quasi_steady_state(0.1, 0.0), f64::INFINITY);
        assert!(quasi_steady_state(0.0, 0.0).is_nan());
    }

    #[test]
    fn discount_at_unit_horizon() {
        assert!((discount(0.1, 1.0) - (-0.1f64).exp()).abs() < 1e-15);
        assert_eq!(discount(0.0, 1.0), 1.0);
    }
}
