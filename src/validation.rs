//! Rotation health checks for reconstructed orientation series.
//!
//! Orientations built by [`joint_to_orientation`](crate::joint_to_orientation)
//! are proper rotations by construction. Matrices imported from elsewhere
//! (for example through
//! [`orientations_from_row_major`](crate::orientations_from_row_major)) may
//! not be, and elevation angles from a sheared or reflected frame are
//! meaningless. These diagnostics make that visible.

use nalgebra::Matrix3;

use crate::kinematics::{Segment, SegmentOrientations};
use crate::math::rotation::Orientation;

/// Orthonormality and determinant summary of an orientation series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationDiagnostics {
    /// Number of matrices inspected.
    pub samples: usize,

    /// Largest Frobenius norm of `R * R^T - I`.
    pub max_orthonormality_error: f64,

    /// Smallest determinant seen.
    pub min_determinant: f64,

    /// Largest determinant seen.
    pub max_determinant: f64,
}

impl RotationDiagnostics {
    /// Inspect every matrix in `series`.
    ///
    /// Returns `None` for an empty series.
    #[must_use]
    pub fn of_series(series: &[Orientation]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let identity = Matrix3::<f64>::identity();
        let mut max_err = 0.0f64;
        let mut min_det = f64::INFINITY;
        let mut max_det = f64::NEG_INFINITY;

        for r in series {
            let err = (r * r.transpose() - identity).norm();
            // NaN must win, so avoid f64::max here
            if err.is_nan() || err > max_err {
                max_err = err;
            }
            let det = r.determinant();
            min_det = min_det.min(det);
            max_det = max_det.max(det);
        }

        Some(Self {
            samples: series.len(),
            max_orthonormality_error: max_err,
            min_determinant: min_det,
            max_determinant: max_det,
        })
    }

    /// True if every matrix is orthonormal with determinant +1 within `tol`.
    #[must_use]
    pub fn is_proper(&self, tol: f64) -> bool {
        self.max_orthonormality_error <= tol
            && (self.min_determinant - 1.0).abs() <= tol
            && (self.max_determinant - 1.0).abs() <= tol
    }
}

/// Diagnostics for thigh, shank and foot, in that order.
#[must_use]
pub fn diagnose_segments(segments: &SegmentOrientations) -> [Option<RotationDiagnostics>; 3] {
    Segment::ALL.map(|s| RotationDiagnostics::of_series(segments.segment(s)))
}
