//! Elementary rotations and intrinsic Euler composition.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::convention::{Axis, EulerSequence};

/// Global orientation of one segment at one sample.
pub type Orientation = Matrix3<f64>;

/// Rotation by `angle_rad` about a single frame axis.
#[must_use]
pub fn axis_rotation(axis: Axis, angle_rad: f64) -> Rotation3<f64> {
    let unit = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&unit, angle_rad)
}

/// Compose three intrinsic rotations given in degrees.
///
/// Each successive rotation is about an axis of the already rotated frame, so
/// the product is `R(a0) * R(a1) * R(a2)`.
#[must_use]
pub fn intrinsic_euler(sequence: EulerSequence, angles_deg: [f64; 3]) -> Rotation3<f64> {
    sequence
        .axes
        .iter()
        .zip(angles_deg)
        .fold(Rotation3::identity(), |acc, (&axis, deg)| {
            acc * axis_rotation(axis, deg.to_radians())
        })
}
