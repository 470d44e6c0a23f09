//! Ray-object intersection.
//!
//! Defines the `Hittable` trait for geometric primitives and `HitInfo` for the
//! nearest intersection found by a query.

use glam::Vec3A;
use crate::ray::Ray;
use crate::interval::Interval;
use crate::material::Material;

/// Nearest ray-object intersection.
///
/// Contains the hit distance, position, unit surface normal and a copy of the
/// surface material needed for shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Distance along the ray, in units of the ray direction's length
    pub t: f32,
    /// Point where the ray intersects the object
    pub position: Vec3A,
    /// Outward surface normal at the intersection point (unit vector)
    pub normal: Vec3A,
    /// Material of the object at the hit point
    pub material: Material,
}

/// Trait for objects that can be intersected by rays.
///
/// Implementors must be thread-safe (Sync + Send) so a scene can be shared
/// across the render workers.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection strictly inside `ray_t`.
    ///
    /// Returns the hit only if it lies within the interval.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitInfo>;
}
