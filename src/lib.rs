//! Gait Coordination Library
//!
//! Intersegmental coordination (ISC) metrics for gait analysis.
//!
//! Lower-limb joint angles (pelvis, hip, knee, ankle) are turned into global
//! thigh, shank and foot orientations, projected to planar elevation angles,
//! and the shape of the resulting three-segment loop is quantified with a
//! principal component decomposition (the "planar covariation" of
//! Borghese et al. 1996).
//!
//! # Pipeline
//!
//! | Stage | Function | Output |
//! |-------|----------|--------|
//! | 1 | [`joint_to_orientation`] | thigh/shank/foot rotation matrices |
//! | 2 | [`orientation_to_elevation`] | sagittal `alpha` and frontal `beta` (deg) |
//! | 3 | [`quantify_shape`] | `LI`, `PI`, `PVPC2`, `Eccent`, `Pearson`, `U`, `u3`, `u3t` |
//!
//! [`analyze_gait_cycle`] runs all three and keeps the intermediates.
//!
//! # Quick Start
//!
//! ```
//! use gait_coordination::{
//!     joint_to_orientation, orientation_to_elevation, quantify_shape, ShapeMetric, Side,
//! };
//!
//! let n = 101;
//! let phase = |i: usize| 2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64;
//! let pelvis: Vec<[f64; 3]> = vec![[12.0, 0.0, 0.0]; n];
//! let hip: Vec<[f64; 3]> = (0..n).map(|i| [20.0 * phase(i).cos() + 10.0, 3.0, 0.0]).collect();
//! let knee: Vec<[f64; 3]> = (0..n)
//!     .map(|i| [30.0 - 28.0 * (phase(i) - 0.6).cos(), 0.0, 0.0])
//!     .collect();
//! let ankle: Vec<[f64; 3]> = (0..n).map(|i| [8.0 * (phase(i) - 1.3).sin(), 0.0, 2.0]).collect();
//!
//! let segs = joint_to_orientation(&pelvis, &hip, &knee, &ankle, Side::Left)?;
//! let thigh = orientation_to_elevation(&segs.thigh);
//! let shank = orientation_to_elevation(&segs.shank);
//! let foot = orientation_to_elevation(&segs.foot);
//!
//! let pi = quantify_shape(&thigh.alpha, &shank.alpha, &foot.alpha, ShapeMetric::Planarity)?;
//! assert!(pi.as_scalar().unwrap() > 90.0);
//! # Ok::<(), gait_coordination::IscError>(())
//! ```
//!
//! # Degenerate data
//!
//! Constant elevation series have zero total variance. The ratio metrics are
//! then NaN and are returned as such; nothing is substituted.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]

pub mod config;
pub mod convention;
pub mod elevation;
pub mod error;
pub mod kinematics;
pub mod math;
pub mod pipeline;
pub mod shape;
pub mod validation;

// Re-exports for convenient access
pub use config::{CovarianceNormalization, IscConfig};
pub use convention::{AnatomicalConvention, Axis, EulerSequence, Joint, JointConvention, Side};
pub use elevation::{
    elevation_from_row_major, elevation_of, orientation_to_elevation, orientations_from_row_major,
    ElevationSeries,
};
pub use error::{IscError, Result};
pub use kinematics::{
    joint_to_orientation, joint_to_orientation_with_config, AngleTriple, JointAngleSeries, Segment,
    SegmentOrientations,
};
pub use math::{Correlation, Orientation, PrincipalComponents};
pub use pipeline::{analyze_gait_cycle, CoordinationAnalysis, SegmentElevations};
pub use shape::{
    describe_shape, principal_components, quantify_shape, quantify_shape_by_id,
    quantify_shape_with_config, ShapeDescriptor, ShapeMetric, ShapeValue,
};
pub use validation::{diagnose_segments, RotationDiagnostics};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_neutral_pipeline_runs() {
        let angles = JointAngleSeries::neutral(10);
        let analysis = analyze_gait_cycle(&angles, Side::Left, &IscConfig::default()).unwrap();
        let diag = diagnose_segments(&analysis.orientations);
        for d in diag {
            assert!(d.unwrap().is_proper(1e-12));
        }
    }
}
