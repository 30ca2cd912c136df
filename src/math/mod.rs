//! Mathematical utilities for coordination analysis.
//!
//! This module provides:
//! - [`rotation`]: elementary axis rotations and intrinsic Euler composition
//! - [`linalg`]: three-variable PCA with sign correction
//! - [`stats`]: Pearson correlation and its significance

pub mod linalg;
pub mod rotation;
pub mod stats;

pub use linalg::{compute_pca, PrincipalComponents};
pub use rotation::{axis_rotation, intrinsic_euler, Orientation};
pub use stats::{pearson, Correlation};
