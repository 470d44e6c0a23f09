//! Whitted-style evaluator: nearest hit, shadowed Blinn-Phong, mirror bounces.
//!
//! `trace` is a pure function of (scene, settings, ray). Reflection is an
//! explicit loop capped by [`MAX_BOUNCES`], so worst-case cost is bounded by
//! the bounce cap times the sphere and light counts.

use glam::{Vec3A, Vec4};
use log::warn;

use crate::hittable::{HitInfo, Hittable};
use crate::interval::Interval;
use crate::material::{has_energy, reflect, Color, Material};
use crate::ray::Ray;
use crate::scene::Scene;

/// Hard cap on reflection bounces, whatever the configured limit.
pub const MAX_BOUNCES: u32 = 64;

/// Offset along the normal applied to shadow and reflection ray origins.
pub const BIAS: f32 = 1e-4;

/// Per-render evaluator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSettings {
    bounce_limit: u32,
}

impl TraceSettings {
    /// Settings with the given reflection bounce limit, capped at [`MAX_BOUNCES`].
    pub fn new(bounce_limit: u32) -> Self {
        if bounce_limit > MAX_BOUNCES {
            warn!("Bounce limit {} exceeds the cap, using {}", bounce_limit, MAX_BOUNCES);
        }
        Self {
            bounce_limit: bounce_limit.min(MAX_BOUNCES),
        }
    }

    /// Effective bounce limit.
    pub fn bounce_limit(&self) -> u32 {
        self.bounce_limit
    }
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self::new(4)
    }
}

/// State of the reflection loop.
///
/// `Bouncing` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceState {
    /// Still following reflection rays
    Bouncing,
    /// Attenuation has no energy left
    Absorbed,
    /// The last ray left the scene and picked up the environment
    Escaped,
    /// The bounce limit was reached
    LimitReached,
}

/// Full result of evaluating one primary ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trace {
    /// RGB radiance (unclamped) and alpha: 1 on a primary hit, 0 on background
    pub color: Vec4,
    /// Terminal state of the reflection loop
    pub state: BounceState,
    /// Reflection rays that hit a surface
    pub bounces: u32,
}

/// Direct illumination at a surface point from every scene light.
///
/// A light is skipped when a shadow ray toward it hits something closer than
/// the light itself. No ambient term is added and the result is not clamped.
pub fn shade(scene: &Scene, material: &Material, position: Vec3A, normal: Vec3A, view_dir: Vec3A) -> Color {
    let origin = position + normal * BIAS;
    let mut color = Color::ZERO;

    for light in scene.lights() {
        let to_light = light.position - origin;
        let distance = to_light.length();
        let shadow = Ray::new(origin, to_light.normalize_or_zero());

        if let Some(occluder) = scene.hit(&shadow, Interval::FORWARD) {
            if occluder.t < distance {
                continue;
            }
        }

        let light_dir = (light.position - position).normalize_or_zero();
        color += material.blinn_phong(normal, light_dir, view_dir, light.intensity);
    }

    color
}

/// Color of one primary ray as RGBA.
pub fn trace(scene: &Scene, settings: &TraceSettings, ray: &Ray) -> Vec4 {
    trace_path(scene, settings, ray).color
}

/// Evaluate one primary ray, also reporting how the reflection loop ended.
///
/// `ray.direction` must be non-zero and finite. Debug builds assert this;
/// release builds return transparent black for such a ray.
pub fn trace_path(scene: &Scene, settings: &TraceSettings, ray: &Ray) -> Trace {
    debug_assert!(!ray.is_degenerate(), "degenerate ray direction {:?}", ray.direction);
    if ray.is_degenerate() {
        return Trace {
            color: Vec4::ZERO,
            state: BounceState::Escaped,
            bounces: 0,
        };
    }

    let Some(hit) = scene.hit(ray, Interval::FORWARD) else {
        return Trace {
            color: scene.environment().sample(ray.direction).extend(0.0),
            state: BounceState::Escaped,
            bounces: 0,
        };
    };

    let view_dir = -ray.direction.normalize();
    let mut color = shade(scene, &hit.material, hit.position, hit.normal, view_dir);

    let mut attenuation = hit.material.specular;
    let mut current: HitInfo = hit;
    let mut incoming = ray.direction;
    let mut bounces = 0;
    let mut state = BounceState::Bouncing;

    while state == BounceState::Bouncing {
        state = if bounces >= settings.bounce_limit {
            BounceState::LimitReached
        } else if !has_energy(attenuation) {
            BounceState::Absorbed
        } else {
            let reflected = Ray::new(
                current.position + current.normal * BIAS,
                reflect(incoming, current.normal),
            );
            match scene.hit(&reflected, Interval::FORWARD) {
                Some(next) => {
                    let view_dir = -reflected.direction.normalize();
                    color += attenuation * shade(scene, &next.material, next.position, next.normal, view_dir);
                    attenuation *= next.material.specular;
                    current = next;
                    incoming = reflected.direction;
                    bounces += 1;
                    BounceState::Bouncing
                }
                None => {
                    color += attenuation * scene.environment().sample(reflected.direction);
                    BounceState::Escaped
                }
            }
        };
    }

    Trace {
        color: color.extend(1.0),
        state,
        bounces,
    }
}
