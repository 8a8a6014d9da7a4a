//! The seven core equations, evaluated at a single point.
//!
//! Order matters: each step reads only the inputs and earlier outputs.
//!
//! 1. `T⁺ = σ⁺ · max(P − δ, 0) · K⁺ · exp(−λΔt)`
//! 2. `T⁻ = σ⁻ · max(P − R⁺, 0) · K⁻ · exp(−λΔt)`
//! 3. `dσ⁺ = α · max(R − P, 0) + ρH − μσ⁻`
//! 4. `dσ⁻ = κ · max(P − R⁺, 0) − ΛΨσ⁻ − χ/G`
//! 5. `ϕ⁺ = clip(β⁺ · T⁺ · (1 + τA) / ζ⁺, 0.05, 0.8)`
//! 6. `ϕ⁻ = clip(β⁻ · T⁻ · (1 + ιD) / ζ⁻, 0.02, 0.6)`
//! 7. `TP = 10·T⁺ · (1 − gini) − ω · 10·T⁻`
//!
//! Equations 3 and 4 are trend indicators only; nothing is integrated forward.
//! Equations 5 and 6 are quasi-steady-state solutions (see
//! [`crate::math::quasi_steady_state`]), not numerical integration.
//!
//! No guards: `G == 0`, `ζ⁺ == 0` or `ζ⁻ == 0` produce IEEE-754 infinities/NaN
//! that flow into the results.

use crate::domain::{CoreResults, IntermediateVariables, ModelParameters};
use crate::math::{Bounds, discount, positive_part, quasi_steady_state};

/// `Δt` in the transport discount. One evaluation point, not a time step.
pub const DISCOUNT_HORIZON: f64 = 1.0;

/// Scale turning a transport rate into accumulated system activity (CCA).
pub const ACTIVITY_SCALE: f64 = 10.0;

pub const PHI_PLUS_BOUNDS: Bounds = Bounds::new(0.05, 0.8);
pub const PHI_MINUS_BOUNDS: Bounds = Bounds::new(0.02, 0.6);

/// Evaluate the core equations.
pub fn compute(v: &IntermediateVariables, pm: &ModelParameters) -> CoreResults {
    let t_plus = transport(v.sigma_plus, v.p - pm.delta, v.k_plus, pm.lambda);
    let t_minus = transport(v.sigma_minus, v.p - pm.r_plus, v.k_minus, pm.lambda);

    let d_sigma_plus = pm.alpha * positive_part(pm.r - v.p) + pm.rho * v.h - pm.mu * v.sigma_minus;
    let d_sigma_minus = pm.kappa * positive_part(v.p - pm.r_plus)
        - v.lambda * v.psi * v.sigma_minus
        - pm.chi / v.g;

    let phi_plus = connectivity(pm.beta_plus, t_plus, 1.0 + pm.tau * v.a, pm.zeta_plus, PHI_PLUS_BOUNDS);
    let phi_minus = connectivity(pm.beta_minus, t_minus, 1.0 + pm.iota * v.d, pm.zeta_minus, PHI_MINUS_BOUNDS);

    let eta = 1.0 - v.gini;
    let tp = transition_potential(t_plus * ACTIVITY_SCALE, eta, pm.omega, t_minus * ACTIVITY_SCALE);

    CoreResults {
        t_plus,
        t_minus,
        d_sigma_plus,
        d_sigma_minus,
        phi_plus,
        phi_minus,
        tp,
        eta,
    }
}

/// Discounted transport of surplus energy: `σ · max(surplus, 0) · K · exp(−λΔt)`.
pub fn transport(sigma: f64, surplus: f64, credit: f64, lambda: f64) -> f64 {
    sigma * positive_part(surplus) * credit * discount(lambda, DISCOUNT_HORIZON)
}

/// Clipped quasi-steady-state connectivity: `clip(β · T · amplifier / ζ)`.
pub fn connectivity(beta: f64, transport: f64, amplifier: f64, zeta: f64, bounds: Bounds) -> f64 {
    bounds.clip(quasi_steady_state(beta * transport * amplifier, zeta))
}

/// `TP = CCA⁺ · η − ω · CCA⁻`.
pub fn transition_potential(cca_plus: f64, eta: f64, omega: f64, cca_minus: f64) -> f64 {
    cca_plus * eta - omega * cca_minus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProxyCase, ProxyVector};
    use crate::models::map_proxies;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn reference_core(params: &ModelParameters) -> CoreResults {
        compute(&map_proxies(&ProxyCase::reference().proxies), params)
    }

    #[test]
    fn reference_case_core_results() {
        let r = reference_core(&ModelParameters::DEFAULT);
        assert!(close(r.t_plus, 1.573974287188882, 1e-12));
        assert!(close(r.t_minus, 0.07308409557196778, 1e-12));
        assert!(close(r.d_sigma_plus, 0.113135, 1e-12));
        assert!(close(r.d_sigma_minus, -0.25814328421052635, 1e-12));
        // Raw ϕ⁺ ≈ 3.39 clips to the ceiling.
        assert_eq!(r.phi_plus, 0.8);
        assert!(close(r.phi_minus, 0.09020665510597166, 1e-12));
        assert!(close(r.eta, 0.59, 1e-12));
        assert!(close(r.tp, 6.290000375963727, 1e-9));
    }

    #[test]
    fn energy_below_survival_floors_phi_plus() {
        let mut x = ProxyCase::reference().proxies;
        x.gdp_growth = 0.0;
        x.digital_coverage = 0.0;
        x.internet_penetration = 0.0;
        let r = compute(&map_proxies(&x), &ModelParameters::DEFAULT);
        assert_eq!(r.t_plus, 0.0);
        assert_eq!(r.t_minus, 0.0);
        assert_eq!(r.phi_plus, PHI_PLUS_BOUNDS.lo);
        assert_eq!(r.phi_minus, PHI_MINUS_BOUNDS.lo);
        assert_eq!(r.tp, 0.0);
    }

    #[test]
    fn omega_only_moves_tp() {
        let base = reference_core(&ModelParameters::DEFAULT);
        let heavy = reference_core(&ModelParameters {
            omega: 5.0,
            ..ModelParameters::DEFAULT
        });
        assert_eq!(heavy.phi_plus, base.phi_plus);
        assert_eq!(heavy.phi_minus, base.phi_minus);
        assert_eq!(heavy.t_plus, base.t_plus);
        assert!(close(heavy.tp, 5.6322435158160165, 1e-9));
    }

    #[test]
    fn zero_energy_density_propagates_infinity() {
        let mut x = ProxyCase::reference().proxies;
        x.gdp_growth = 0.0;
        x.electricity_access = 0.0;
        let v = map_proxies(&x);
        assert_eq!(v.g, 0.0);
        let r = compute(&v, &ModelParameters::DEFAULT);
        assert_eq!(r.d_sigma_minus, f64::NEG_INFINITY);
        assert!(r.phi_plus.is_finite());
    }

    #[test]
    fn zero_dissipation_propagates() {
        let params = ModelParameters {
            zeta_plus: 0.0,
            ..ModelParameters::DEFAULT
        };
        // Positive growth over zero dissipation clips from +inf to the ceiling.
        assert_eq!(reference_core(&params).phi_plus, PHI_PLUS_BOUNDS.hi);

        // Zero growth over zero dissipation is 0/0.
        let mut x = ProxyCase::reference().proxies;
        x.gdp_growth = 0.0;
        x.digital_coverage = 0.0;
        x.internet_penetration = 0.0;
        let r = compute(&map_proxies(&x), &params);
        assert!(r.phi_plus.is_nan());
    }

    #[test]
    fn connectivity_stays_in_bounds_for_finite_inputs() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2_000 {
            let values: [f64; 15] = std::array::from_fn(|_| rng.gen_range(-2.0..3.0));
            let r = compute(&map_proxies(&ProxyVector::from_array(values)), &ModelParameters::DEFAULT);
            assert!(PHI_PLUS_BOUNDS.contains(r.phi_plus), "phi_plus={}", r.phi_plus);
            assert!(PHI_MINUS_BOUNDS.contains(r.phi_minus), "phi_minus={}", r.phi_minus);
        }
    }
}
