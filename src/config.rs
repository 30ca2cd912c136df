//! Configuration for coordination analysis.
//!
//! [`IscConfig`] centralizes the few tunables of the pipeline: the anatomical
//! convention table, the covariance normalization used by the shape
//! quantifier, and numerical tolerances.
//!
//! # Example
//!
//! ```
//! use gait_coordination::IscConfig;
//!
//! let config = IscConfig::default();
//! assert!(config.validate().is_ok());
//!
//! let raw = IscConfig::without_ankle_offset();
//! assert_eq!(raw.convention.ankle.offset_deg[0], 0.0);
//! ```

use crate::convention::AnatomicalConvention;
use crate::error::{IscError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for coordination analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IscConfig {
    /// Sign/offset/order table applied to raw joint angles.
    pub convention: AnatomicalConvention,

    /// Denominator of the elevation-angle covariance matrix.
    /// Index ratios (LI, PI, PVPC2, eccentricity) do not depend on it.
    pub covariance: CovarianceNormalization,

    /// Total variance at or below this value is reported as degenerate in
    /// the log. The NaN metrics are still returned unchanged.
    pub degenerate_variance_eps: f64,

    /// Tolerance for orthonormality and determinant checks.
    pub rotation_tolerance: f64,
}

/// Covariance normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CovarianceNormalization {
    /// Divide by `n - 1` (unbiased sample covariance).
    #[default]
    Sample,
    /// Divide by `n`.
    Population,
}

impl CovarianceNormalization {
    /// Denominator for `n` samples.
    #[must_use]
    pub fn denominator(self, n: usize) -> f64 {
        match self {
            Self::Sample => n.saturating_sub(1) as f64,
            Self::Population => n as f64,
        }
    }
}

impl Default for IscConfig {
    fn default() -> Self {
        Self {
            convention: AnatomicalConvention::plug_in_gait(),
            covariance: CovarianceNormalization::Sample,
            degenerate_variance_eps: 1e-12,
            rotation_tolerance: 1e-9,
        }
    }
}

impl IscConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the convention table is malformed or a tolerance is
    /// not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        self.convention.validate()?;
        if !(self.degenerate_variance_eps >= 0.0 && self.degenerate_variance_eps.is_finite()) {
            return Err(IscError::invalid_config(
                "degenerate_variance_eps must be non-negative and finite",
            ));
        }
        if !(self.rotation_tolerance > 0.0 && self.rotation_tolerance.is_finite()) {
            return Err(IscError::invalid_config(
                "rotation_tolerance must be positive and finite",
            ));
        }
        Ok(())
    }

    /// Plug-in-Gait convention with the +90 degree ankle correction.
    #[must_use]
    pub fn plug_in_gait() -> Self {
        Self::default()
    }

    /// Plug-in-Gait signs without the ankle neutral-position correction.
    ///
    /// Useful when the ankle angles were already exported relative to a
    /// perpendicular foot.
    #[must_use]
    pub fn without_ankle_offset() -> Self {
        Self::default().with_ankle_offset(0.0)
    }

    /// Set the ankle dorsiflexion offset (degrees).
    #[must_use]
    pub fn with_ankle_offset(mut self, offset_deg: f64) -> Self {
        self.convention = self.convention.with_ankle_offset(offset_deg);
        self
    }

    /// Set the convention table.
    #[must_use]
    pub const fn with_convention(mut self, convention: AnatomicalConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Set the covariance normalization.
    #[must_use]
    pub const fn with_covariance(mut self, covariance: CovarianceNormalization) -> Self {
        self.covariance = covariance;
        self
    }

    /// Set the rotation check tolerance.
    #[must_use]
    pub const fn with_rotation_tolerance(mut self, tolerance: f64) -> Self {
        self.rotation_tolerance = tolerance;
        self
    }
}
