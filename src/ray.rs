//! Ray representation for 3D ray tracing.
//!
//! A ray is defined as r(t) = origin + t * direction, a half-line used for
//! primary, shadow and reflection queries against the scene.

use glam::Vec3A;

/// Ray in 3D space defined by origin and direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,

    /// Direction vector of the ray.
    ///
    /// Not required to be normalized. Hit distances are expressed in units of
    /// this vector's length, so shadow rays normalize it to compare against
    /// the distance to a light.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray with origin and direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self { origin, direction }
    }

    /// Compute a point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }

    /// True when the direction cannot define a half-line: zero length, NaN or infinite.
    ///
    /// Such a ray makes the quadratic's leading coefficient zero or non-finite.
    pub fn is_degenerate(&self) -> bool {
        !self.direction.is_finite() || self.direction.length_squared() == 0.0
    }
}
