//! Closed-interval clamping for intermediate variables and connectivities.
//!
//! Out-of-range values are pulled back into the calibrated range silently.
//!
//! NaN is propagated rather than clamped (unlike `f64::max`/`f64::min`, which
//! would quietly replace it with a bound).

/// A closed interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lo: f64,
    pub hi: f64,
}

impl Bounds {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// `min(max(x, lo), hi)`, keeping NaN as NaN.
    pub fn clip(self, x: f64) -> f64 {
        x.clamp(self.lo, self.hi)
    }

    pub fn contains(self, x: f64) -> bool {
        x >= self.lo && x <= self.hi
    }
}

/// `max(x, 0)`, keeping NaN as NaN.
pub fn positive_part(x: f64) -> f64 {
    if x.is_nan() { x } else { x.max(0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_pulls_values_into_range() {
        let b = Bounds::new(0.1, 0.95);
        assert_eq!(b.clip(-3.0), 0.1);
        assert_eq!(b.clip(0.5), 0.5);
        assert_eq!(b.clip(7.0), 0.95);
        assert_eq!(b.clip(f64::INFINITY), 0.95);
        assert!(b.clip(f64::NAN).is_nan());
    }

    #[test]
    fn positive_part_floors_at_zero() {
        assert_eq!(positive_part(-1.5), 0.0);
        assert_eq!(positive_part(2.5), 2.5);
        assert!(positive_part(f64::NAN).is_nan());
    }
}
