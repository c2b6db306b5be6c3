//! Closed forms for the weekly benefit sums.
//!
//! Both forms compute `Σ_{w=0}^{n-1} b(w)` for a per-week relative benefit `b`:
//!
//! - geometric: `b(w) = f^w`, giving `(1 - f^n) / (1 - f)`
//! - linear: `b(w) = max(0, 1 - w/z)`, an arithmetic series cut off at `w >= z`
//!
//! Numerical notes:
//! - For `f` close to 1, `1 - f^n` and `1 - f` both cancel catastrophically.
//!   We evaluate the ratio as `expm1(n ln f) / expm1(ln f)` instead.

/// Threshold below which `1 - f` is treated as zero (no decay).
const NO_DECAY_EPS: f64 = 1e-12;

/// `Σ_{w=0}^{n-1} f^w` for `f` in `[0, 1]`.
pub fn geometric_sum(f: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    if f <= 0.0 {
        // 0^0 = 1, every later term is 0.
        return 1.0;
    }
    let ln_f = f.ln();
    if ln_f.abs() < NO_DECAY_EPS {
        return n as f64;
    }
    (n as f64 * ln_f).exp_m1() / ln_f.exp_m1()
}

/// `Σ_{w=0}^{n-1} max(0, 1 - w/z)` for `z > 0`.
///
/// Only weeks with `w < z` contribute, so the sum runs over
/// `k = min(n, ceil(z))` terms: `k - k(k-1) / (2z)`.
pub fn linear_sum(weeks_to_zero: f64, n: usize) -> f64 {
    if n == 0 || !(weeks_to_zero > 0.0) {
        return 0.0;
    }
    let k = (n as f64).min(weeks_to_zero.ceil());
    k - k * (k - 1.0) / (2.0 * weeks_to_zero)
}

/// Truncate a horizon in (possibly fractional) weeks to whole weeks.
///
/// The rule is `floor`: a partial final week contributes nothing. Returns
/// `None` for negative or non-finite input.
pub fn whole_weeks(horizon_weeks: f64) -> Option<usize> {
    if !(horizon_weeks.is_finite() && horizon_weeks >= 0.0) {
        return None;
    }
    Some(horizon_weeks.floor() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn geometric_terms(f: f64, n: usize) -> f64 {
        (0..n).map(|w| f.powi(w as i32)).sum()
    }

    fn linear_terms(z: f64, n: usize) -> f64 {
        (0..n).map(|w| (1.0 - w as f64 / z).max(0.0)).sum()
    }

    #[test]
    fn geometric_half_life_year() {
        let f = 0.5_f64.powf(1.0 / 52.0);
        let closed = geometric_sum(f, 52);
        let direct = geometric_terms(f, 52);
        assert!(((closed - direct) / direct).abs() < 1e-9, "{closed} vs {direct}");
    }

    #[test]
    fn geometric_edge_cases() {
        assert_eq!(geometric_sum(0.9, 0), 0.0);
        assert_eq!(geometric_sum(0.0, 10), 1.0);
        assert_eq!(geometric_sum(1.0, 10), 10.0);
    }

    #[test]
    fn linear_triangle_over_year() {
        // Weeks 0..51 of a 52-week triangle: 52 - 51/2.
        assert!((linear_sum(52.0, 52) - 26.5).abs() < 1e-12);
    }

    #[test]
    fn linear_cut_off_before_horizon() {
        let z = 26.0;
        assert!((linear_sum(z, 52) - linear_terms(z, 52)).abs() < 1e-12);
        assert!((linear_sum(z, 52) - 13.5).abs() < 1e-12);
    }

    #[test]
    fn linear_fractional_weeks_to_zero_counts_last_partial_week() {
        // 7 months = 30.33 weeks, so week 30 still carries a little benefit.
        let z = 7.0 / 12.0 * 52.0;
        assert!((linear_sum(z, 52) - linear_terms(z, 52)).abs() < 1e-12);
    }

    #[test]
    fn linear_non_positive_is_zero() {
        assert_eq!(linear_sum(0.0, 52), 0.0);
        assert_eq!(linear_sum(-3.0, 52), 0.0);
        assert_eq!(linear_sum(f64::NAN, 52), 0.0);
    }

    #[test]
    fn whole_weeks_floors() {
        assert_eq!(whole_weeks(52.0), Some(52));
        assert_eq!(whole_weeks(51.99), Some(51));
        assert_eq!(whole_weeks(0.0), Some(0));
        assert_eq!(whole_weeks(-1.0), None);
        assert_eq!(whole_weeks(f64::INFINITY), None);
    }

    proptest! {
        #[test]
        fn geometric_matches_terms(r in 0.001f64..0.999, n in 0usize..300) {
            let f = (1.0 - r).powf(1.0 / 52.0);
            let closed = geometric_sum(f, n);
            let direct = geometric_terms(f, n);
            prop_assert!((closed - direct).abs() <= 1e-9 * direct.max(1.0));
        }

        #[test]
        fn linear_matches_terms(months in 0.1f64..60.0, n in 0usize..300) {
            let z = months / 12.0 * 52.0;
            let closed = linear_sum(z, n);
            let direct = linear_terms(z, n);
            prop_assert!((closed - direct).abs() <= 1e-9 * direct.max(1.0));
        }
    }
}
