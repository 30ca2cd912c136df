//! Principal component decomposition of three co-sampled variables.
//!
//! The shape quantifier treats the thigh, shank and foot elevation angles as
//! three variables over a shared sample index. This module centers them,
//! builds the 3x3 covariance matrix and eigendecomposes it with nalgebra.

use crate::config::CovarianceNormalization;
use crate::error::{IscError, Result};
use nalgebra::{Matrix3, SymmetricEigen, Vector3};

/// Minimum number of samples for a covariance estimate.
pub const MIN_SAMPLES: usize = 2;

/// Result of PCA on three variables.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalComponents {
    /// Eigenvalues sorted in descending order.
    pub eigenvalues: [f64; 3],

    /// Eigenvectors as columns, sorted by corresponding eigenvalue.
    /// `eigenvectors[row][i]` is the `row` coordinate of the i-th component.
    pub eigenvectors: [[f64; 3]; 3],

    /// Column means removed before decomposition.
    pub mean: [f64; 3],
}

impl PrincipalComponents {
    /// Get the i-th principal axis as a 3D vector.
    #[must_use]
    pub fn axis(&self, i: usize) -> [f64; 3] {
        debug_assert!(i < 3);
        [
            self.eigenvectors[0][i],
            self.eigenvectors[1][i],
            self.eigenvectors[2][i],
        ]
    }

    /// Sum of the three eigenvalues.
    #[must_use]
    pub fn total_variance(&self) -> f64 {
        self.eigenvalues.iter().sum()
    }

    /// Compute determinant of eigenvector matrix.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        Matrix3::from_fn(|r, c| self.eigenvectors[r][c]).determinant()
    }

    /// Flip the third axis so that its last coordinate is non-negative.
    ///
    /// Eigenvectors are only defined up to sign; pinning the plane normal
    /// this way makes `u3` comparable across trials.
    pub fn orient_plane_normal(&mut self) {
        if self.eigenvectors[2][2] < 0.0 {
            for row in &mut self.eigenvectors {
                row[2] = -row[2];
            }
        }
    }

    /// Project samples onto the principal axes (scores).
    ///
    /// Samples are centered with the stored mean first, so projecting the
    /// decomposed data yields the covariation loop in its own frame.
    #[must_use]
    pub fn scores(&self, samples: &[[f64; 3]]) -> Vec<[f64; 3]> {
        samples
            .iter()
            .map(|s| {
                let c = [
                    s[0] - self.mean[0],
                    s[1] - self.mean[1],
                    s[2] - self.mean[2],
                ];
                let e = &self.eigenvectors;
                [
                    e[0][0] * c[0] + e[1][0] * c[1] + e[2][0] * c[2],
                    e[0][1] * c[0] + e[1][1] * c[1] + e[2][1] * c[2],
                    e[0][2] * c[0] + e[1][2] * c[1] + e[2][2] * c[2],
                ]
            })
            .collect()
    }
}

/// Column means of three-variable samples.
#[must_use]
pub fn column_means(samples: &[[f64; 3]]) -> [f64; 3] {
    let n = samples.len() as f64;
    let mut mean = [0.0; 3];
    for s in samples {
        mean[0] += s[0];
        mean[1] += s[1];
        mean[2] += s[2];
    }
    [mean[0] / n, mean[1] / n, mean[2] / n]
}

/// Compute PCA of three-variable samples.
///
/// Eigenvalues are returned largest first; tiny negative round-off is clamped
/// to zero. Non-finite data skips the solver and yields NaN eigenpairs.
///
/// # Errors
///
/// Returns an error if fewer than [`MIN_SAMPLES`] samples are given.
pub fn compute_pca(
    samples: &[[f64; 3]],
    normalization: CovarianceNormalization,
) -> Result<PrincipalComponents> {
    if samples.len() < MIN_SAMPLES {
        return Err(IscError::series_too_short(MIN_SAMPLES, samples.len()));
    }

    // Shift by the first sample so that identical samples center to exactly 0.0
    let origin = samples[0];
    let shifted: Vec<[f64; 3]> = samples
        .iter()
        .map(|s| [s[0] - origin[0], s[1] - origin[1], s[2] - origin[2]])
        .collect();
    let shifted_mean = column_means(&shifted);
    let mean = [
        origin[0] + shifted_mean[0],
        origin[1] + shifted_mean[1],
        origin[2] + shifted_mean[2],
    ];
    let denom = normalization.denominator(samples.len());

    let mut cov = Matrix3::<f64>::zeros();
    for s in &shifted {
        let c = Vector3::new(
            s[0] - shifted_mean[0],
            s[1] - shifted_mean[1],
            s[2] - shifted_mean[2],
        );
        cov += c * c.transpose();
    }
    cov /= denom;

    if cov.iter().any(|v| !v.is_finite()) {
        return Ok(PrincipalComponents {
            eigenvalues: [f64::NAN; 3],
            eigenvectors: [[f64::NAN; 3]; 3],
            mean,
        });
    }

    let eigen = SymmetricEigen::new(cov);

    // Collect eigenvalue-eigenvector pairs and sort descending
    let mut pairs: Vec<(f64, Vector3<f64>)> = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, eigen.eigenvectors.column(i).into_owned()))
        .collect();

    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let clamp = |v: f64| if v < 0.0 { 0.0 } else { v };
    let eigenvalues = [clamp(pairs[0].0), clamp(pairs[1].0), clamp(pairs[2].0)];

    let eigenvectors = [
        [pairs[0].1[0], pairs[1].1[0], pairs[2].1[0]],
        [pairs[0].1[1], pairs[1].1[1], pairs[2].1[1]],
        [pairs[0].1[2], pairs[1].1[2], pairs[2].1[2]],
    ];

    Ok(PrincipalComponents {
        eigenvalues,
        eigenvectors,
        mean,
    })
}

/// Dot product of two 3D vectors.
#[must_use]
#[inline]
pub fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
