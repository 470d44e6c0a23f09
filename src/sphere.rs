//! Sphere primitive for ray tracing.
//!
//! Implements ray-sphere intersection with the analytic quadratic formula.

use glam::Vec3A;
use crate::ray::Ray;
use crate::hittable::{Hittable, HitInfo};
use crate::interval::Interval;
use crate::material::Material;

/// Sphere primitive defined by center, radius, and material.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Radius of the sphere (always non-negative).
    ///
    /// Negative radius values are clamped to 0.0 in the constructor.
    pub radius: f32,

    /// Blinn-Phong material of the surface.
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Negative radius values are clamped to 0.0.
    pub fn new(center: Vec3A, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitInfo> {
        let oc = r.origin - self.center;

        let a = r.direction.dot(r.direction);
        let b = 2.0 * oc.dot(r.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let t1 = (-b - sqrtd) / (2.0 * a);
        let t2 = (-b + sqrtd) / (2.0 * a);

        // Near root when it is in front of the origin, otherwise the exit
        // point. An origin inside the sphere therefore hits the far wall.
        let t = if t1 > 0.0 { t1 } else { t2 };
        if !ray_t.surrounds(t) {
            return None;
        }

        let position = r.at(t);
        Some(HitInfo {
            t,
            position,
            normal: (position - self.center).normalize(),
            material: self.material,
        })
    }
}
