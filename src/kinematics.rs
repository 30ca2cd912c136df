//! Joint angles to global segment orientations.
//!
//! Each joint's raw clinical angles pass through the [`AnatomicalConvention`]
//! table and become a local rotation built by intrinsic Euler composition.
//! Segment orientations then follow the kinematic chain sample by sample:
//!
//! ```text
//! thigh = pelvis * hip
//! shank = thigh  * knee
//! foot  = shank  * ankle
//! ```
//!
//! [`AnatomicalConvention`]: crate::convention::AnatomicalConvention

use nalgebra::Rotation3;
use tracing::debug;

use crate::config::IscConfig;
use crate::convention::{Joint, JointConvention, Side};
use crate::error::{IscError, Result};
use crate::math::rotation::{intrinsic_euler, Orientation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One joint angle sample in degrees, in the joint's Euler component order.
pub type AngleTriple = [f64; 3];

/// Lower-limb segments whose orientations are reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Segment {
    Thigh,
    Shank,
    Foot,
}

impl Segment {
    /// All segments, proximal to distal.
    pub const ALL: [Self; 3] = [Self::Thigh, Self::Shank, Self::Foot];

    /// Lowercase segment name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Thigh => "thigh",
            Self::Shank => "shank",
            Self::Foot => "foot",
        }
    }
}

/// Joint angle series for one gait cycle, aligned by sample index.
#[derive(Debug, Clone, PartialEq)]
pub struct JointAngleSeries {
    pub pelvis: Vec<AngleTriple>,
    pub hip: Vec<AngleTriple>,
    pub knee: Vec<AngleTriple>,
    pub ankle: Vec<AngleTriple>,
}

impl JointAngleSeries {
    /// Build a validated series set.
    ///
    /// # Errors
    ///
    /// Returns an error if the series are empty or their lengths differ.
    pub fn new(
        pelvis: Vec<AngleTriple>,
        hip: Vec<AngleTriple>,
        knee: Vec<AngleTriple>,
        ankle: Vec<AngleTriple>,
    ) -> Result<Self> {
        validate_lengths(&pelvis, &hip, &knee, &ankle)?;
        Ok(Self {
            pelvis,
            hip,
            knee,
            ankle,
        })
    }

    /// All joints at zero for `n` samples.
    #[must_use]
    pub fn neutral(n: usize) -> Self {
        Self {
            pelvis: vec![[0.0; 3]; n],
            hip: vec![[0.0; 3]; n],
            knee: vec![[0.0; 3]; n],
            ankle: vec![[0.0; 3]; n],
        }
    }

    /// Number of samples (taken from the pelvis series).
    #[must_use]
    pub fn len(&self) -> usize {
        self.pelvis.len()
    }

    /// True if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pelvis.is_empty()
    }

    /// Series for one joint.
    #[must_use]
    pub fn joint(&self, joint: Joint) -> &[AngleTriple] {
        match joint {
            Joint::Pelvis => &self.pelvis,
            Joint::Hip => &self.hip,
            Joint::Knee => &self.knee,
            Joint::Ankle => &self.ankle,
        }
    }

    /// Reconstruct segment orientations for `side`.
    ///
    /// # Errors
    ///
    /// See [`joint_to_orientation_with_config`].
    pub fn orientations(&self, side: Side, config: &IscConfig) -> Result<SegmentOrientations> {
        joint_to_orientation_with_config(
            &self.pelvis,
            &self.hip,
            &self.knee,
            &self.ankle,
            side,
            config,
        )
    }
}

/// Global orientation series of thigh, shank and foot.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOrientations {
    pub thigh: Vec<Orientation>,
    pub shank: Vec<Orientation>,
    pub foot: Vec<Orientation>,
}

impl SegmentOrientations {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.thigh.len()
    }

    /// True if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thigh.is_empty()
    }

    /// Orientation series of one segment.
    #[must_use]
    pub fn segment(&self, segment: Segment) -> &[Orientation] {
        match segment {
            Segment::Thigh => &self.thigh,
            Segment::Shank => &self.shank,
            Segment::Foot => &self.foot,
        }
    }
}

/// Reconstruct thigh, shank and foot orientations with the default
/// Plug-in-Gait convention.
///
/// # Errors
///
/// Returns an error if the four series are empty or differ in length.
///
/// # Example
///
/// ```
/// use gait_coordination::{joint_to_orientation, Side};
///
/// let zeros = vec![[0.0; 3]; 5];
/// let segs = joint_to_orientation(&zeros, &zeros, &zeros, &zeros, Side::Left)?;
/// assert_eq!(segs.len(), 5);
/// # Ok::<(), gait_coordination::IscError>(())
/// ```
pub fn joint_to_orientation(
    pelvis: &[AngleTriple],
    hip: &[AngleTriple],
    knee: &[AngleTriple],
    ankle: &[AngleTriple],
    side: Side,
) -> Result<SegmentOrientations> {
    joint_to_orientation_with_config(pelvis, hip, knee, ankle, side, &IscConfig::default())
}

/// Reconstruct segment orientations using the convention in `config`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, or the four series are
/// empty or differ in length.
pub fn joint_to_orientation_with_config(
    pelvis: &[AngleTriple],
    hip: &[AngleTriple],
    knee: &[AngleTriple],
    ankle: &[AngleTriple],
    side: Side,
    config: &IscConfig,
) -> Result<SegmentOrientations> {
    validate_lengths(pelvis, hip, knee, ankle)?;
    config.validate()?;

    let conv = &config.convention;
    let n = pelvis.len();
    debug!(samples = n, side = %side, "composing segment orientations");

    let mut thigh = Vec::with_capacity(n);
    let mut shank = Vec::with_capacity(n);
    let mut foot = Vec::with_capacity(n);

    for i in 0..n {
        let r_thigh = local_rotation(&conv.pelvis, pelvis[i], side)
            * local_rotation(&conv.hip, hip[i], side);
        let r_shank = r_thigh * local_rotation(&conv.knee, knee[i], side);
        let r_foot = r_shank * local_rotation(&conv.ankle, ankle[i], side);

        thigh.push(r_thigh.into_inner());
        shank.push(r_shank.into_inner());
        foot.push(r_foot.into_inner());
    }

    Ok(SegmentOrientations { thigh, shank, foot })
}

/// Local rotation of one joint sample after signs and offsets.
#[must_use]
pub fn local_rotation(conv: &JointConvention, raw: AngleTriple, side: Side) -> Rotation3<f64> {
    intrinsic_euler(conv.sequence, conv.apply(raw, side))
}

fn validate_lengths(
    pelvis: &[AngleTriple],
    hip: &[AngleTriple],
    knee: &[AngleTriple],
    ankle: &[AngleTriple],
) -> Result<()> {
    let n = pelvis.len();
    if n == 0 {
        return Err(IscError::series_too_short(1, 0));
    }
    for (name, len) in [("hip", hip.len()), ("knee", knee.len()), ("ankle", ankle.len())] {
        if len != n {
            return Err(IscError::length_mismatch(name, n, len));
        }
    }
    Ok(())
}
