//! Anatomical sign and offset conventions.
//!
//! Clinical joint angles (flexion, adduction, rotation, ...) are reported
//! with side-dependent signs because the body is mirror symmetric. Before a
//! joint's local rotation is built, each raw angle component is multiplied by
//! a per-side sign and shifted by a fixed offset. This module holds that table
//! as data so it can be audited and swapped without touching the rotation
//! builder.
//!
//! # Default table (Plug-in-Gait style)
//!
//! | Joint | Sequence | Left signs | Right signs | Offset (deg) |
//! |-------|----------|------------|-------------|--------------|
//! | Pelvis | Z, X, Y | `[-, +, +]` | `[-, -, +]` | `[0, 0, 0]` |
//! | Hip | Z, X, Y | `[+, -, -]` | `[+, +, +]` | `[0, 0, 0]` |
//! | Knee | Z, X, Y | `[-, -, -]` | `[-, +, +]` | `[0, 0, 0]` |
//! | Ankle | Z, Y, X | `[+, -, -]` | `[+, +, -]` | `[90, 0, 0]` |
//!
//! Lab frame: X forward, Y up, Z lateral. Z carries flexion and dorsiflexion,
//! X carries ad/abduction and inversion, Y carries axial rotation.

use std::fmt;
use std::str::FromStr;

use crate::error::IscError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Body side of the analyzed limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Left limb.
    Left,
    /// Right limb.
    Right,
}

impl Side {
    /// Short label used in gait reports (`"L"` or `"R"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = IscError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            _ => Err(IscError::UnknownSide(s.to_string())),
        }
    }
}

/// Joints of the lower-limb kinematic chain, proximal to distal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Joint {
    Pelvis,
    Hip,
    Knee,
    Ankle,
}

impl Joint {
    /// All joints in chain order.
    pub const ALL: [Self; 4] = [Self::Pelvis, Self::Hip, Self::Knee, Self::Ankle];

    /// Lowercase joint name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pelvis => "pelvis",
            Self::Hip => "hip",
            Self::Knee => "knee",
            Self::Ankle => "ankle",
        }
    }
}

/// Elementary rotation axis in a segment frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Order of the three intrinsic elementary rotations.
///
/// Component `i` of a joint's angle triple is applied about `axes[i]`, and the
/// local rotation is `R(axes[0]) * R(axes[1]) * R(axes[2])`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerSequence {
    pub axes: [Axis; 3],
}

impl EulerSequence {
    /// Flexion, then ad/abduction, then internal rotation.
    pub const FLEX_ADD_ROT: Self = Self {
        axes: [Axis::Z, Axis::X, Axis::Y],
    };

    /// Dorsiflexion, then rotation, then inversion (ankle).
    pub const DORSI_ROT_INV: Self = Self {
        axes: [Axis::Z, Axis::Y, Axis::X],
    };
}

/// Sign, offset and rotation order for one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointConvention {
    /// Sign multipliers for a left limb.
    pub left: [f64; 3],
    /// Sign multipliers for a right limb.
    pub right: [f64; 3],
    /// Constant offsets (degrees) added after the sign is applied.
    pub offset_deg: [f64; 3],
    /// Intrinsic rotation order.
    pub sequence: EulerSequence,
}

impl JointConvention {
    /// Sign multipliers for `side`.
    #[must_use]
    pub const fn signs(&self, side: Side) -> [f64; 3] {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Map a raw clinical angle triple to the signed, offset triple (degrees)
    /// that feeds the rotation builder.
    #[must_use]
    pub fn apply(&self, raw: [f64; 3], side: Side) -> [f64; 3] {
        let signs = self.signs(side);
        [
            signs[0] * raw[0] + self.offset_deg[0],
            signs[1] * raw[1] + self.offset_deg[1],
            signs[2] * raw[2] + self.offset_deg[2],
        ]
    }
}

/// Complete convention table for the four joints.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnatomicalConvention {
    pub pelvis: JointConvention,
    pub hip: JointConvention,
    pub knee: JointConvention,
    pub ankle: JointConvention,
}

/// Neutral-position correction on the ankle dorsiflexion component.
pub const ANKLE_NEUTRAL_OFFSET_DEG: f64 = 90.0;

impl Default for AnatomicalConvention {
    fn default() -> Self {
        Self::plug_in_gait()
    }
}

impl AnatomicalConvention {
    /// Vicon Plug-in-Gait style table.
    #[must_use]
    pub const fn plug_in_gait() -> Self {
        Self {
            pelvis: JointConvention {
                left: [-1.0, 1.0, 1.0],
                right: [-1.0, -1.0, 1.0],
                offset_deg: [0.0; 3],
                sequence: EulerSequence::FLEX_ADD_ROT,
            },
            hip: JointConvention {
                left: [1.0, -1.0, -1.0],
                right: [1.0, 1.0, 1.0],
                offset_deg: [0.0; 3],
                sequence: EulerSequence::FLEX_ADD_ROT,
            },
            knee: JointConvention {
                left: [-1.0, -1.0, -1.0],
                right: [-1.0, 1.0, 1.0],
                offset_deg: [0.0; 3],
                sequence: EulerSequence::FLEX_ADD_ROT,
            },
            ankle: JointConvention {
                left: [1.0, -1.0, -1.0],
                right: [1.0, 1.0, -1.0],
                offset_deg: [ANKLE_NEUTRAL_OFFSET_DEG, 0.0, 0.0],
                sequence: EulerSequence::DORSI_ROT_INV,
            },
        }
    }

    /// Convention for one joint.
    #[must_use]
    pub const fn joint(&self, joint: Joint) -> &JointConvention {
        match joint {
            Joint::Pelvis => &self.pelvis,
            Joint::Hip => &self.hip,
            Joint::Knee => &self.knee,
            Joint::Ankle => &self.ankle,
        }
    }

    /// Replace the ankle dorsiflexion offset.
    #[must_use]
    pub fn with_ankle_offset(mut self, offset_deg: f64) -> Self {
        self.ankle.offset_deg[0] = offset_deg;
        self
    }

    /// Check that every sign is exactly +1 or -1 and every offset is finite.
    pub fn validate(&self) -> crate::error::Result<()> {
        for joint in Joint::ALL {
            let conv = self.joint(joint);
            let signs_ok = conv
                .left
                .iter()
                .chain(conv.right.iter())
                .all(|&s| s == 1.0 || s == -1.0);
            if !signs_ok {
                return Err(IscError::invalid_config(format!(
                    "{} signs must be +1 or -1",
                    joint.name()
                )));
            }
            if !conv.offset_deg.iter().all(|o| o.is_finite()) {
                return Err(IscError::invalid_config(format!(
                    "{} offsets must be finite",
                    joint.name()
                )));
            }
        }
        Ok(())
    }
}
