//! Normalized landmark points.

use serde::{Deserialize, Serialize};

/// A single detector landmark in normalized camera-frame coordinates.
///
/// `(0.0, 0.0)` is the top-left of the frame and `(1.0, 1.0)` the
/// bottom-right. `z` is relative depth and may be absent for 2D detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    /// Create a 2D landmark (`z = 0`).
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Create a 3D landmark.
    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
