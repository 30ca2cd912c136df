//! Pearson correlation with a two-sided significance test.
//!
//! The p-value uses the Student t distribution with `n - 2` degrees of
//! freedom, evaluated through the regularized incomplete beta function:
//! `p = I_{1 - r^2}(df / 2, 1 / 2)`.

use crate::error::{IscError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pearson correlation coefficient and its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Correlation {
    /// Correlation coefficient in `[-1, 1]` (NaN for zero-variance input).
    pub r: f64,
    /// Two-sided p-value under the null hypothesis `r = 0`.
    ///
    /// With two samples there are no degrees of freedom left and the line
    /// through the points always fits, so `p` is 1. NaN when `r` is NaN.
    pub p: f64,
}

/// Pearson correlation between two equal-length series.
///
/// # Errors
///
/// Returns an error if the lengths differ or fewer than two samples are given.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    if x.len() != y.len() {
        return Err(IscError::length_mismatch("correlation", x.len(), y.len()));
    }
    if x.len() < 2 {
        return Err(IscError::series_too_short(2, x.len()));
    }

    // Shift by the first sample so that a constant series centers to exactly 0.0
    let (x0, y0) = (x[0], y[0]);
    let mx = x.iter().map(|&a| a - x0).sum::<f64>() / x.len() as f64;
    let my = y.iter().map(|&b| b - y0).sum::<f64>() / y.len() as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = (a - x0) - mx;
        let dy = (b - y0) - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    // clamp keeps NaN, and absorbs round-off just past +-1
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    let df = (x.len() - 2) as f64;

    Ok(Correlation {
        r,
        p: two_sided_p(r, df),
    })
}

fn two_sided_p(r: f64, df: f64) -> f64 {
    if r.is_nan() {
        return f64::NAN;
    }
    if df <= 0.0 {
        return 1.0;
    }
    regularized_incomplete_beta(df / 2.0, 0.5, 1.0 - r * r)
}

/// Regularized incomplete beta function `I_x(a, b)`.
#[must_use]
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Modified Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 300;
    const EPS: f64 = 3e-16;
    const TINY: f64 = 1e-300;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Natural log of the gamma function (Lanczos approximation, g = 7).
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ln_gamma_known_values() {
        assert_relative_eq!(ln_gamma(1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(ln_gamma(5.0), 24f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_incomplete_beta_closed_forms() {
        for &x in &[0.1, 0.35, 0.5, 0.8, 0.97] {
            // I_x(a, 1) = x^a
            assert_relative_eq!(
                regularized_incomplete_beta(2.5, 1.0, x),
                x.powf(2.5),
                epsilon = 1e-10
            );
            // I_x(1, b) = 1 - (1 - x)^b
            assert_relative_eq!(
                regularized_incomplete_beta(1.0, 3.0, x),
                1.0 - (1.0 - x).powi(3),
                epsilon = 1e-10
            );
        }
        assert_eq!(regularized_incomplete_beta(2.0, 2.0, 0.0), 0.0);
        assert_eq!(regularized_incomplete_beta(2.0, 2.0, 1.0), 1.0);
    }

    #[test]
    fn test_pearson_perfect_linear() {
        let x: Vec<f64> = (0..20).map(|i| f64::from(i) * 0.7 - 3.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 5.0).collect();
        let c = pearson(&x, &y).unwrap();
        assert_relative_eq!(c.r, 1.0, epsilon = 1e-12);
        assert!(c.p < 1e-12);

        let neg: Vec<f64> = x.iter().map(|v| -v).collect();
        let c = pearson(&x, &neg).unwrap();
        assert_relative_eq!(c.r, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_p_value_one_degree_of_freedom() {
        // df = 1: p = (2 / pi) * asin(sqrt(1 - r^2)); r = 0.5 gives 2/3.
        let p = two_sided_p(0.5, 1.0);
        assert_relative_eq!(p, 2.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_p_value_reference() {
        // r = 0.5 with n = 10 (df = 8): t = 1.633, two-sided p = 0.1411
        let p = two_sided_p(0.5, 8.0);
        assert_relative_eq!(p, 0.1411, epsilon = 5e-4);
    }

    #[test]
    fn test_pearson_constant_series_is_nan() {
        let x = vec![1.0; 8];
        let y: Vec<f64> = (0..8).map(f64::from).collect();
        let c = pearson(&x, &y).unwrap();
        assert!(c.r.is_nan());
        assert!(c.p.is_nan());
    }

    #[test]
    fn test_pearson_constant_inexact_mean_is_nan() {
        let y: Vec<f64> = (0..10).map(f64::from).collect();
        for v in [0.1, 12.3, 88.7, 1.0 / 3.0] {
            let c = pearson(&vec![v; 10], &y).unwrap();
            assert!(c.r.is_nan(), "r of constant {v} is {}", c.r);
            assert!(c.p.is_nan());
        }
    }

    #[test]
    fn test_pearson_two_samples() {
        let c = pearson(&[1.0, 2.0], &[3.0, 1.0]).unwrap();
        assert_relative_eq!(c.r, -1.0, epsilon = 1e-12);
        assert_eq!(c.p, 1.0);

        let c = pearson(&[1.0, 1.0], &[3.0, 1.0]).unwrap();
        assert!(c.r.is_nan());
        assert!(c.p.is_nan());
    }

    #[test]
    fn test_pearson_errors() {
        assert!(matches!(
            pearson(&[1.0, 2.0], &[1.0]),
            Err(IscError::LengthMismatch { .. })
        ));
        assert!(matches!(
            pearson(&[1.0], &[1.0]),
            Err(IscError::SeriesTooShort { .. })
        ));
    }
}
