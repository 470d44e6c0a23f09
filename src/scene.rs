//! Immutable scene: spheres, lights and the environment.
//!
//! A scene is built once per render and shared by reference between all
//! workers. It has no mutation API, so the sphere and light counts are fixed
//! from construction on.

use log::debug;

use crate::environment::{Environment, SkyGradient};
use crate::hittable::{HitInfo, Hittable};
use crate::interval::Interval;
use crate::light::PointLight;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Everything a ray can interact with.
pub struct Scene {
    spheres: Vec<Sphere>,
    lights: Vec<PointLight>,
    environment: Box<dyn Environment>,
}

impl Scene {
    /// Freeze a set of spheres, lights and an environment into a scene.
    pub fn new(spheres: Vec<Sphere>, lights: Vec<PointLight>, environment: Box<dyn Environment>) -> Self {
        debug!("Scene built with {} spheres and {} lights", spheres.len(), lights.len());
        Self {
            spheres,
            lights,
            environment,
        }
    }

    /// Spheres in intersection order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Lights in shading order.
    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Background radiance source.
    pub fn environment(&self) -> &dyn Environment {
        self.environment.as_ref()
    }
}

impl Default for Scene {
    /// An empty scene under the default sky.
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Box::new(SkyGradient::default()))
    }
}

impl Hittable for Scene {
    /// Nearest hit over all spheres by linear scan.
    ///
    /// Each accepted hit shrinks the interval, and acceptance is strict, so on
    /// an exact tie the sphere listed first wins. Degenerate rays never hit.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitInfo> {
        if r.is_degenerate() {
            return None;
        }

        let mut closest: Option<HitInfo> = None;
        let mut closest_so_far = ray_t.max;

        for sphere in &self.spheres {
            if let Some(hit) = sphere.hit(r, ray_t.closer_than(closest_so_far)) {
                closest_so_far = hit.t;
                closest = Some(hit);
            }
        }

        closest
    }
}
