//! Proxy mapping: 15 raw measurements -> bounded intermediate variables.
//!
//! Every rule is a fixed affine transform, optionally clipped into a calibrated
//! range. The function is total over any 15 real values; division hazards in
//! later stages (`G == 0`) belong to the equation engine.

use crate::domain::{IntermediateVariables, ProxyVector};
use crate::math::Bounds;

pub const K_PLUS_BOUNDS: Bounds = Bounds::new(0.1, 0.95);
pub const K_MINUS_BOUNDS: Bounds = Bounds::new(0.05, 0.8);
pub const SIGMA_PLUS_BOUNDS: Bounds = Bounds::new(0.1, 0.9);
pub const SIGMA_MINUS_BOUNDS: Bounds = Bounds::new(0.05, 0.8);
pub const ATTRACTION_BOUNDS: Bounds = Bounds::new(0.1, 0.9);
pub const PENALTY_BOUNDS: Bounds = Bounds::new(0.5, 3.0);
pub const RECOVERY_BOUNDS: Bounds = Bounds::new(0.2, 1.0);

/// Map raw proxies to the model's intermediate state variables.
pub fn map_proxies(x: &ProxyVector) -> IntermediateVariables {
    // Generalized energy, scaled up to the model's unit range.
    let p = (x.gdp_growth * 0.4 + x.digital_coverage * 0.3 + x.internet_penetration * 0.3) * 10.0;

    // NPL weighs heavily on positive credit.
    let k_plus = K_PLUS_BOUNDS.clip(x.non_cash_ratio * (1.0 - x.npl_ratio * 5.0));
    let k_minus = K_MINUS_BOUNDS.clip(0.3 * x.shadow_economy + 0.7 * x.crypto_estimate);

    let sigma_plus = SIGMA_PLUS_BOUNDS.clip(
        0.7 - x.polarization * 0.5 + x.net_migration * 0.01 - x.toxicity_index * 0.3,
    );
    let sigma_minus = SIGMA_MINUS_BOUNDS.clip(
        0.1 + x.youth_unemployment * 0.6 + x.debt_service_ratio * 0.3 + x.polarization * 0.4,
    );

    let a = ATTRACTION_BOUNDS.clip(
        0.3 + x.net_migration * 0.05 + x.digital_coverage * 0.2 - x.toxicity_index * 0.15,
    );
    let d = x.polarization;
    let lambda = PENALTY_BOUNDS.clip(1.5 - x.shadow_economy - x.npl_ratio * 10.0);
    let psi = 1.0 - x.toxicity_index;
    let g = (x.gdp_growth * 10.0) * 0.7 + x.electricity_access * 0.3;
    let h = RECOVERY_BOUNDS.clip(0.8 - x.youth_unemployment * 0.5 - x.toxicity_index * 0.3);

    IntermediateVariables {
        p,
        k_plus,
        k_minus,
        sigma_plus,
        sigma_minus,
        a,
        d,
        lambda,
        psi,
        g,
        h,
        gini: x.gini,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProxyCase;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn reference_case_mapping() {
        let v = map_proxies(&ProxyCase::reference().proxies);
        assert!(close(v.p, 5.906));
        assert!(close(v.k_plus, 0.8648));
        assert!(close(v.k_minus, 0.065));
        assert!(close(v.sigma_plus, 0.41));
        assert!(close(v.sigma_minus, 0.3353));
        assert!(close(v.a, 0.5125));
        assert!(close(v.d, 0.40));
        assert!(close(v.lambda, 1.28));
        assert!(close(v.psi, 0.65));
        assert!(close(v.g, 0.608));
        assert!(close(v.h, 0.6495));
        assert_eq!(v.gini, 0.41);
    }

    #[test]
    fn pass_through_values_are_not_clipped() {
        let mut x = ProxyCase::reference().proxies;
        x.polarization = 1.7;
        x.toxicity_index = 1.4;
        x.gdp_growth = -0.5;
        x.electricity_access = 0.2;
        let v = map_proxies(&x);
        assert_eq!(v.d, 1.7);
        assert!(close(v.psi, -0.4));
        assert!(v.g < 0.0);
    }

    #[test]
    fn clamped_variables_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let values: [f64; 15] = std::array::from_fn(|_| rng.gen_range(-5.0..5.0));
            let v = map_proxies(&ProxyVector::from_array(values));
            assert!(K_PLUS_BOUNDS.contains(v.k_plus));
            assert!(K_MINUS_BOUNDS.contains(v.k_minus));
            assert!(SIGMA_PLUS_BOUNDS.contains(v.sigma_plus));
            assert!(SIGMA_MINUS_BOUNDS.contains(v.sigma_minus));
            assert!(ATTRACTION_BOUNDS.contains(v.a));
            assert!(PENALTY_BOUNDS.contains(v.lambda));
            assert!(RECOVERY_BOUNDS.contains(v.h));
        }
    }
}
