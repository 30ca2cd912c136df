//! End-to-end coordination analysis of one gait cycle.
//!
//! Runs the three stages in order and keeps every intermediate result:
//!
//! 1. joint angles to thigh/shank/foot orientations
//! 2. orientations to sagittal and frontal elevation angles
//! 3. shape of the sagittal loop (and, for reference, the frontal loop)

use tracing::{debug, warn};

use crate::config::IscConfig;
use crate::convention::Side;
use crate::elevation::{orientation_to_elevation, ElevationSeries};
use crate::error::Result;
use crate::kinematics::{JointAngleSeries, Segment, SegmentOrientations};
use crate::shape::{describe_shape, ShapeDescriptor};
use crate::validation::diagnose_segments;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Elevation angle series of thigh, shank and foot.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentElevations {
    pub thigh: ElevationSeries,
    pub shank: ElevationSeries,
    pub foot: ElevationSeries,
}

impl SegmentElevations {
    /// Project every segment of `orientations`.
    #[must_use]
    pub fn from_orientations(orientations: &SegmentOrientations) -> Self {
        Self {
            thigh: orientation_to_elevation(&orientations.thigh),
            shank: orientation_to_elevation(&orientations.shank),
            foot: orientation_to_elevation(&orientations.foot),
        }
    }

    /// Elevation series of one segment.
    #[must_use]
    pub const fn segment(&self, segment: Segment) -> &ElevationSeries {
        match segment {
            Segment::Thigh => &self.thigh,
            Segment::Shank => &self.shank,
            Segment::Foot => &self.foot,
        }
    }
}

/// All products of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinationAnalysis {
    /// Side the joint angles were interpreted for.
    pub side: Side,
    /// Stage 1 output.
    pub orientations: SegmentOrientations,
    /// Stage 2 output.
    pub elevations: SegmentElevations,
    /// Shape of the sagittal (alpha) loop.
    pub sagittal: ShapeDescriptor,
    /// Shape of the frontal (beta) loop.
    pub frontal: ShapeDescriptor,
}

/// Analyze one gait cycle.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the joint series differ
/// in length, or fewer than two samples are given.
///
/// # Example
///
/// ```
/// use gait_coordination::{analyze_gait_cycle, IscConfig, JointAngleSeries, Side};
///
/// let n = 51;
/// let phase = |i: usize| 2.0 * std::f64::consts::PI * i as f64 / n as f64;
/// let angles = JointAngleSeries::new(
///     vec![[10.0, 0.0, 0.0]; n],
///     (0..n).map(|i| [25.0 * phase(i).cos() + 10.0, 0.0, 0.0]).collect(),
///     (0..n).map(|i| [30.0 - 30.0 * (phase(i) - 0.5).cos(), 0.0, 0.0]).collect(),
///     (0..n).map(|i| [10.0 * (phase(i) - 1.2).sin(), 0.0, 0.0]).collect(),
/// )?;
///
/// let analysis = analyze_gait_cycle(&angles, Side::Right, &IscConfig::default())?;
/// assert!(analysis.sagittal.pi >= analysis.sagittal.li);
/// # Ok::<(), gait_coordination::IscError>(())
/// ```
pub fn analyze_gait_cycle(
    angles: &JointAngleSeries,
    side: Side,
    config: &IscConfig,
) -> Result<CoordinationAnalysis> {
    debug!(samples = angles.len(), side = %side, "analyzing gait cycle");

    let orientations = angles.orientations(side, config)?;
    for (segment, diag) in Segment::ALL.iter().zip(diagnose_segments(&orientations)) {
        if let Some(diag) = diag.filter(|d| !d.is_proper(config.rotation_tolerance)) {
            warn!(
                segment = segment.name(),
                error = diag.max_orthonormality_error,
                "orientation series drifted from a proper rotation"
            );
        }
    }
    let elevations = SegmentElevations::from_orientations(&orientations);

    let sagittal = describe_shape(
        &elevations.thigh.alpha,
        &elevations.shank.alpha,
        &elevations.foot.alpha,
        config,
    )?;
    let frontal = describe_shape(
        &elevations.thigh.beta,
        &elevations.shank.beta,
        &elevations.foot.beta,
        config,
    )?;

    debug!(pi = sagittal.pi, li = sagittal.li, u3t = sagittal.u3t(), "sagittal loop");

    Ok(CoordinationAnalysis {
        side,
        orientations,
        elevations,
        sagittal,
        frontal,
    })
}
