//! Segment orientations to planar elevation angles.
//!
//! The second column of a segment orientation is the segment's long axis in
//! lab coordinates. Its projection on the sagittal (X forward, Y up) plane
//! gives `alpha`, and on the frontal (Z lateral, Y up) plane gives `beta`.
//! Both are zero for a vertical segment.

use nalgebra::Matrix3;
use tracing::debug;

use crate::error::{IscError, Result};
use crate::math::rotation::Orientation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Elevation angle series of one segment, in degrees.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElevationSeries {
    /// Sagittal-plane elevation.
    pub alpha: Vec<f64>,
    /// Frontal-plane elevation.
    pub beta: Vec<f64>,
}

impl ElevationSeries {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alpha.len()
    }

    /// True if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }
}

/// Sagittal and frontal elevation (degrees) of a single orientation.
#[must_use]
pub fn elevation_of(orientation: &Orientation) -> (f64, f64) {
    let axis = orientation.column(1);
    let alpha = (-axis[0]).atan2(axis[1]).to_degrees();
    let beta = axis[2].atan2(axis[1]).to_degrees();
    (alpha, beta)
}

/// Elevation angle series of one segment.
///
/// # Example
///
/// ```
/// use gait_coordination::orientation_to_elevation;
/// use nalgebra::Matrix3;
///
/// let elev = orientation_to_elevation(&[Matrix3::identity()]);
/// assert_eq!(elev.alpha, vec![0.0]);
/// assert_eq!(elev.beta, vec![0.0]);
/// ```
#[must_use]
pub fn orientation_to_elevation(orientations: &[Orientation]) -> ElevationSeries {
    debug!(samples = orientations.len(), "projecting elevation angles");
    let (alpha, beta) = orientations.iter().map(elevation_of).unzip();
    ElevationSeries { alpha, beta }
}

/// Parse a flat row-major buffer of 3x3 matrices.
///
/// # Errors
///
/// Returns [`IscError::MalformedMatrix`] if the buffer length is not a
/// multiple of 9.
pub fn orientations_from_row_major(flat: &[f64]) -> Result<Vec<Orientation>> {
    if flat.len() % 9 != 0 {
        return Err(IscError::MalformedMatrix { len: flat.len() });
    }
    Ok(flat.chunks_exact(9).map(Matrix3::from_row_slice).collect())
}

/// Elevation angles from a flat row-major matrix buffer.
///
/// # Errors
///
/// Returns [`IscError::MalformedMatrix`] if the buffer length is not a
/// multiple of 9.
pub fn elevation_from_row_major(flat: &[f64]) -> Result<ElevationSeries> {
    let orientations = orientations_from_row_major(flat)?;
    Ok(orientation_to_elevation(&orientations))
}
