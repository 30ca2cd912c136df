//! Shape quantification of the intersegmental covariation loop.
//!
//! Thigh, shank and foot sagittal elevation angles are stacked as three
//! variables (one row per sample) and decomposed into principal components.
//! The eigenvalues `l1 >= l2 >= l3` describe how the loop fills space:
//!
//! | Id | Value | Meaning |
//! |----|-------|---------|
//! | `LI` | `100 * l1 / (l1 + l2 + l3)` | linearity index |
//! | `PI` | `100 * (l1 + l2) / (l1 + l2 + l3)` | planarity index |
//! | `PVPC2` | `100 * l2 / (l1 + l2 + l3)` | loop width |
//! | `Eccent` | `sqrt(1 - l2^2 / l1^2)` | ellipse eccentricity |
//! | `Pearson` | `r`, `p` of foot vs shank | linear coupling |
//! | `U` | `(u1, u2, u3)` | principal basis |
//! | `u3` | `u3` | plane normal |
//! | `u3t` | `u3[0]` | thigh direction cosine of the normal |
//!
//! `u3` is oriented so that its foot component is non-negative. Zero total
//! variance yields NaN indices, which are returned as is.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::config::IscConfig;
use crate::error::{IscError, Result};
use crate::math::linalg::{compute_pca, PrincipalComponents};
use crate::math::stats::{pearson, Correlation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape metric selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeMetric {
    /// `LI`
    Linearity,
    /// `PI`
    Planarity,
    /// `PVPC2`
    LoopWidth,
    /// `Eccent`
    Eccentricity,
    /// `Pearson`
    Pearson,
    /// `U`
    Basis,
    /// `u3`
    PlaneNormal,
    /// `u3t`
    PlaneNormalThigh,
}

impl ShapeMetric {
    /// Every metric, in table order.
    pub const ALL: [Self; 8] = [
        Self::Linearity,
        Self::Planarity,
        Self::LoopWidth,
        Self::Eccentricity,
        Self::Pearson,
        Self::Basis,
        Self::PlaneNormal,
        Self::PlaneNormalThigh,
    ];

    /// Identifier string used in analysis scripts.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Linearity => "LI",
            Self::Planarity => "PI",
            Self::LoopWidth => "PVPC2",
            Self::Eccentricity => "Eccent",
            Self::Pearson => "Pearson",
            Self::Basis => "U",
            Self::PlaneNormal => "u3",
            Self::PlaneNormalThigh => "u3t",
        }
    }
}

impl fmt::Display for ShapeMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ShapeMetric {
    type Err = IscError;

    // Case matters: "U" and "u3" are different metrics.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| IscError::UnknownMetric(s.to_string()))
    }
}

/// Value of a shape metric. The variant depends on the metric.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShapeValue {
    /// `LI`, `PI`, `PVPC2`, `Eccent`, `u3t`.
    Scalar(f64),
    /// `Pearson`.
    Correlation(Correlation),
    /// `u3`.
    Vector([f64; 3]),
    /// `U` as `[u1, u2, u3]`.
    Basis([[f64; 3]; 3]),
}

impl ShapeValue {
    /// Scalar payload, if any.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Correlation payload, if any.
    #[must_use]
    pub const fn as_correlation(&self) -> Option<Correlation> {
        match self {
            Self::Correlation(c) => Some(*c),
            _ => None,
        }
    }

    /// Vector payload, if any.
    #[must_use]
    pub const fn as_vector(&self) -> Option<[f64; 3]> {
        match self {
            Self::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// Basis payload, if any.
    #[must_use]
    pub const fn as_basis(&self) -> Option<[[f64; 3]; 3]> {
        match self {
            Self::Basis(b) => Some(*b),
            _ => None,
        }
    }
}

/// `100 * l1 / sum`.
#[must_use]
pub fn linearity_index(eigenvalues: &[f64; 3]) -> f64 {
    100.0 * eigenvalues[0] / eigenvalues.iter().sum::<f64>()
}

/// `100 * (l1 + l2) / sum`.
#[must_use]
pub fn planarity_index(eigenvalues: &[f64; 3]) -> f64 {
    100.0 * (eigenvalues[0] + eigenvalues[1]) / eigenvalues.iter().sum::<f64>()
}

/// `100 * l2 / sum`.
#[must_use]
pub fn loop_width(eigenvalues: &[f64; 3]) -> f64 {
    100.0 * eigenvalues[1] / eigenvalues.iter().sum::<f64>()
}

/// `sqrt(1 - l2^2 / l1^2)`.
#[must_use]
pub fn eccentricity(eigenvalues: &[f64; 3]) -> f64 {
    let ratio = eigenvalues[1] / eigenvalues[0];
    (1.0 - ratio * ratio).sqrt()
}

/// Every shape metric from a single decomposition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeDescriptor {
    /// Eigenvalues, largest first.
    pub eigenvalues: [f64; 3],
    /// Principal directions `[u1, u2, u3]`, `u3` sign-corrected.
    pub basis: [[f64; 3]; 3],
    /// Linearity index (%).
    pub li: f64,
    /// Planarity index (%).
    pub pi: f64,
    /// Loop width (%).
    pub pvpc2: f64,
    /// Ellipse eccentricity.
    pub eccentricity: f64,
    /// Foot vs shank correlation.
    pub correlation: Correlation,
}

impl ShapeDescriptor {
    fn from_parts(pca: &PrincipalComponents, correlation: Correlation) -> Self {
        let ev = &pca.eigenvalues;
        Self {
            eigenvalues: *ev,
            basis: [pca.axis(0), pca.axis(1), pca.axis(2)],
            li: linearity_index(ev),
            pi: planarity_index(ev),
            pvpc2: loop_width(ev),
            eccentricity: eccentricity(ev),
            correlation,
        }
    }

    /// Plane normal.
    #[must_use]
    pub const fn u3(&self) -> [f64; 3] {
        self.basis[2]
    }

    /// Thigh component of the plane normal.
    #[must_use]
    pub const fn u3t(&self) -> f64 {
        self.basis[2][0]
    }

    /// Look up one metric.
    #[must_use]
    pub const fn metric(&self, metric: ShapeMetric) -> ShapeValue {
        match metric {
            ShapeMetric::Linearity => ShapeValue::Scalar(self.li),
            ShapeMetric::Planarity => ShapeValue::Scalar(self.pi),
            ShapeMetric::LoopWidth => ShapeValue::Scalar(self.pvpc2),
            ShapeMetric::Eccentricity => ShapeValue::Scalar(self.eccentricity),
            ShapeMetric::Pearson => ShapeValue::Correlation(self.correlation),
            ShapeMetric::Basis => ShapeValue::Basis(self.basis),
            ShapeMetric::PlaneNormal => ShapeValue::Vector(self.u3()),
            ShapeMetric::PlaneNormalThigh => ShapeValue::Scalar(self.u3t()),
        }
    }
}

/// Sign-corrected principal components of the three elevation series.
///
/// # Errors
///
/// Returns an error if the series lengths differ or fewer than two samples
/// are given.
pub fn principal_components(
    thigh: &[f64],
    shank: &[f64],
    foot: &[f64],
    config: &IscConfig,
) -> Result<PrincipalComponents> {
    let samples = stack(thigh, shank, foot)?;
    let mut pca = compute_pca(&samples, config.covariance)?;
    pca.orient_plane_normal();

    let total = pca.total_variance();
    if total <= config.degenerate_variance_eps {
        warn!(total_variance = total, "degenerate elevation data, shape indices are undefined");
    }
    Ok(pca)
}

/// Compute one shape metric with the default configuration.
///
/// # Errors
///
/// Returns an error if the series lengths differ or fewer than two samples
/// are given.
///
/// # Example
///
/// ```
/// use gait_coordination::{quantify_shape, ShapeMetric};
///
/// let thigh: Vec<f64> = (0..50).map(|i| (i as f64 * 0.12).sin() * 20.0).collect();
/// let shank: Vec<f64> = (0..50).map(|i| (i as f64 * 0.12 + 0.8).sin() * 30.0).collect();
/// let foot: Vec<f64> = (0..50).map(|i| (i as f64 * 0.12 + 1.6).sin() * 25.0).collect();
///
/// let pi = quantify_shape(&thigh, &shank, &foot, ShapeMetric::Planarity)?;
/// let li = quantify_shape(&thigh, &shank, &foot, ShapeMetric::Linearity)?;
/// assert!(pi.as_scalar().unwrap() >= li.as_scalar().unwrap());
/// # Ok::<(), gait_coordination::IscError>(())
/// ```
pub fn quantify_shape(
    thigh: &[f64],
    shank: &[f64],
    foot: &[f64],
    metric: ShapeMetric,
) -> Result<ShapeValue> {
    quantify_shape_with_config(thigh, shank, foot, metric, &IscConfig::default())
}

/// Compute one shape metric.
///
/// `Pearson` correlates foot against shank directly and skips the
/// decomposition.
///
/// # Errors
///
/// Returns an error if the series lengths differ or fewer than two samples
/// are given.
pub fn quantify_shape_with_config(
    thigh: &[f64],
    shank: &[f64],
    foot: &[f64],
    metric: ShapeMetric,
    config: &IscConfig,
) -> Result<ShapeValue> {
    debug!(metric = %metric, samples = thigh.len(), "quantifying shape");

    let pca = || principal_components(thigh, shank, foot, config);
    let value = match metric {
        ShapeMetric::Linearity => ShapeValue::Scalar(linearity_index(&pca()?.eigenvalues)),
        ShapeMetric::Planarity => ShapeValue::Scalar(planarity_index(&pca()?.eigenvalues)),
        ShapeMetric::LoopWidth => ShapeValue::Scalar(loop_width(&pca()?.eigenvalues)),
        ShapeMetric::Eccentricity => ShapeValue::Scalar(eccentricity(&pca()?.eigenvalues)),
        ShapeMetric::Pearson => {
            check_lengths(thigh, shank, foot)?;
            ShapeValue::Correlation(pearson(foot, shank)?)
        }
        ShapeMetric::Basis => {
            let pca = pca()?;
            ShapeValue::Basis([pca.axis(0), pca.axis(1), pca.axis(2)])
        }
        ShapeMetric::PlaneNormal => ShapeValue::Vector(pca()?.axis(2)),
        ShapeMetric::PlaneNormalThigh => ShapeValue::Scalar(pca()?.axis(2)[0]),
    };
    Ok(value)
}

/// Compute one shape metric from its string identifier.
///
/// # Errors
///
/// Returns [`IscError::UnknownMetric`] for an unrecognized identifier, and
/// the errors of [`quantify_shape`] otherwise.
pub fn quantify_shape_by_id(
    thigh: &[f64],
    shank: &[f64],
    foot: &[f64],
    metric_id: &str,
) -> Result<ShapeValue> {
    let metric: ShapeMetric = metric_id.parse()?;
    quantify_shape(thigh, shank, foot, metric)
}

/// Compute every shape metric at once.
///
/// # Errors
///
/// Returns an error if the series lengths differ or fewer than two samples
/// are given.
pub fn describe_shape(
    thigh: &[f64],
    shank: &[f64],
    foot: &[f64],
    config: &IscConfig,
) -> Result<ShapeDescriptor> {
    let pca = principal_components(thigh, shank, foot, config)?;
    let correlation = pearson(foot, shank)?;
    Ok(ShapeDescriptor::from_parts(&pca, correlation))
}

fn check_lengths(thigh: &[f64], shank: &[f64], foot: &[f64]) -> Result<()> {
    let n = thigh.len();
    if shank.len() != n {
        return Err(IscError::length_mismatch("shank", n, shank.len()));
    }
    if foot.len() != n {
        return Err(IscError::length_mismatch("foot", n, foot.len()));
    }
    Ok(())
}

fn stack(thigh: &[f64], shank: &[f64], foot: &[f64]) -> Result<Vec<[f64; 3]>> {
    check_lengths(thigh, shank, foot)?;
    Ok(thigh
        .iter()
        .zip(shank)
        .zip(foot)
        .map(|((&t, &s), &f)| [t, s, f])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Elevation-like loop: three phase-shifted sinusoids plus a small
    /// out-of-plane harmonic.
    fn loop_series(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let t = |i: usize| 2.0 * PI * i as f64 / n as f64;
        let thigh = (0..n).map(|i| 20.0 * t(i).cos() + 5.0).collect();
        let shank = (0..n).map(|i| 30.0 * (t(i) - 0.6).cos() - 10.0).collect();
        let foot = (0..n)
            .map(|i| 35.0 * (t(i) - 1.1).cos() + 2.0 * (3.0 * t(i)).sin() - 20.0)
            .collect();
        (thigh, shank, foot)
    }

    #[test]
    fn test_metric_ids_round_trip() {
        for m in ShapeMetric::ALL {
            assert_eq!(m.id().parse::<ShapeMetric>().unwrap(), m);
        }
        assert!(matches!("pi".parse::<ShapeMetric>(), Err(IscError::UnknownMetric(_))));
        assert!(matches!("U3".parse::<ShapeMetric>(), Err(IscError::UnknownMetric(_))));
    }

    #[test]
    fn test_index_relations() {
        let (t, s, f) = loop_series(101);
        let d = describe_shape(&t, &s, &f, &IscConfig::default()).unwrap();
        assert!(d.pi >= d.li);
        assert!(d.pi >= d.pvpc2);
        assert_relative_eq!(d.pi, d.li + d.pvpc2, epsilon = 1e-9);
        assert!(d.pi > 90.0 && d.pi <= 100.0);
        assert!((0.0..=1.0).contains(&d.eccentricity));
    }

    #[test]
    fn test_quantify_matches_descriptor() {
        let (t, s, f) = loop_series(64);
        let d = describe_shape(&t, &s, &f, &IscConfig::default()).unwrap();
        for m in ShapeMetric::ALL {
            let v = quantify_shape(&t, &s, &f, m).unwrap();
            match (v, d.metric(m)) {
                (ShapeValue::Scalar(a), ShapeValue::Scalar(b)) => {
                    assert_relative_eq!(a, b, epsilon = 1e-12);
                }
                (ShapeValue::Correlation(a), ShapeValue::Correlation(b)) => {
                    assert_relative_eq!(a.r, b.r, epsilon = 1e-12);
                }
                (ShapeValue::Vector(a), ShapeValue::Vector(b)) => {
                    for k in 0..3 {
                        assert_relative_eq!(a[k], b[k], epsilon = 1e-12);
                    }
                }
                (ShapeValue::Basis(a), ShapeValue::Basis(b)) => {
                    for k in 0..3 {
                        for j in 0..3 {
                            assert_relative_eq!(a[k][j], b[k][j], epsilon = 1e-12);
                        }
                    }
                }
                (a, b) => panic!("variant mismatch for {m}: {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn test_u3_foot_component_non_negative() {
        let (t, s, f) = loop_series(80);
        let negated: Vec<f64> = f.iter().map(|v| -v).collect();
        for foot in [&f, &negated] {
            let u3 = quantify_shape(&t, &s, foot, ShapeMetric::PlaneNormal)
                .unwrap()
                .as_vector()
                .unwrap();
            assert!(u3[2] >= 0.0);
            let u3t = quantify_shape(&t, &s, foot, ShapeMetric::PlaneNormalThigh)
                .unwrap()
                .as_scalar()
                .unwrap();
            assert_eq!(u3t, u3[0]);
        }
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let (t, s, f) = loop_series(90);
        let basis = quantify_shape_by_id(&t, &s, &f, "U").unwrap().as_basis().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let dot: f64 = (0..3).map(|k| basis[i][k] * basis[j][k]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(dot, expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_pearson_linear_coupling() {
        let shank: Vec<f64> = (0..30).map(|i| f64::from(i).sin() * 12.0).collect();
        let foot: Vec<f64> = shank.iter().map(|v| 2.0 * v).collect();
        let thigh = vec![0.0; 30];
        let c = quantify_shape(&thigh, &shank, &foot, ShapeMetric::Pearson)
            .unwrap()
            .as_correlation()
            .unwrap();
        assert_relative_eq!(c.r, 1.0, epsilon = 1e-10);
        assert!(c.p < 1e-10);
    }

    #[test]
    fn test_perfectly_linear_loop() {
        let base: Vec<f64> = (0..40).map(|i| f64::from(i) - 20.0).collect();
        let shank: Vec<f64> = base.iter().map(|v| 2.0 * v).collect();
        let foot: Vec<f64> = base.iter().map(|v| -0.5 * v).collect();
        let li = quantify_shape(&base, &shank, &foot, ShapeMetric::Linearity)
            .unwrap()
            .as_scalar()
            .unwrap();
        assert_relative_eq!(li, 100.0, epsilon = 1e-9);
        let ecc = quantify_shape(&base, &shank, &foot, ShapeMetric::Eccentricity)
            .unwrap()
            .as_scalar()
            .unwrap();
        assert_relative_eq!(ecc, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_input_is_nan() {
        let zeros = vec![0.0; 10];
        for m in [
            ShapeMetric::Linearity,
            ShapeMetric::Planarity,
            ShapeMetric::LoopWidth,
            ShapeMetric::Eccentricity,
        ] {
            let v = quantify_shape(&zeros, &zeros, &zeros, m).unwrap();
            assert!(v.as_scalar().unwrap().is_nan(), "{m} should be NaN");
        }
    }

    #[test]
    fn test_constant_non_zero_input_is_nan() {
        for v in [0.1, 12.3, 88.7, 1.0 / 3.0, -7.1] {
            let thigh = vec![v; 10];
            let shank = vec![0.7 * v; 10];
            let foot = vec![1.9 * v; 10];

            let d = describe_shape(&thigh, &shank, &foot, &IscConfig::default()).unwrap();
            assert_eq!(d.eigenvalues, [0.0; 3], "value {v}");
            for m in [
                ShapeMetric::Linearity,
                ShapeMetric::Planarity,
                ShapeMetric::LoopWidth,
                ShapeMetric::Eccentricity,
            ] {
                let value = quantify_shape(&thigh, &shank, &foot, m).unwrap();
                assert!(value.as_scalar().unwrap().is_nan(), "{m} of constant {v}");
            }

            let c = quantify_shape(&thigh, &shank, &foot, ShapeMetric::Pearson)
                .unwrap()
                .as_correlation()
                .unwrap();
            assert!(c.r.is_nan(), "r of constant {v}");
        }
    }

    #[test]
    fn test_errors() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0];
        assert!(matches!(
            quantify_shape(&a, &b, &a, ShapeMetric::Planarity),
            Err(IscError::LengthMismatch { series: "shank", .. })
        ));
        assert!(matches!(
            quantify_shape(&a, &a, &b, ShapeMetric::Pearson),
            Err(IscError::LengthMismatch { series: "foot", .. })
        ));
        assert!(matches!(
            quantify_shape_by_id(&a, &a, &a, "Planarity"),
            Err(IscError::UnknownMetric(_))
        ));
    }
}
