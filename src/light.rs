//! Point lights.

use glam::Vec3A;
use crate::material::Color;

/// An omnidirectional light with no falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Light position in world coordinates
    pub position: Vec3A,
    /// Emitted RGB intensity (non-negative)
    pub intensity: Color,
}

impl PointLight {
    /// Create a light at `position` emitting `intensity`.
    pub fn new(position: Vec3A, intensity: Color) -> Self {
        Self { position, intensity }
    }
}
