//! Blinn-Phong surface material.
//!
//! Each sphere carries a diffuse and a specular coefficient plus a specular
//! exponent. The specular coefficient doubles as the mirror reflectance used
//! to attenuate reflection bounces.

use glam::Vec3A;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Blinn-Phong material parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse coefficient `k_d` (per channel, non-negative).
    pub diffuse: Color,
    /// Specular coefficient `k_s` (per channel, non-negative).
    pub specular: Color,
    /// Specular exponent `n`; larger values give tighter highlights.
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            shininess: 0.0,
        }
    }
}

impl Material {
    /// Create a material from its coefficients.
    pub fn new(diffuse: Color, specular: Color, shininess: f32) -> Self {
        Self {
            diffuse,
            specular,
            shininess,
        }
    }

    /// A perfect mirror: no diffuse response, full specular reflectance.
    pub fn mirror(shininess: f32) -> Self {
        Self::new(Color::ZERO, Color::ONE, shininess)
    }

    /// Blinn-Phong response of this surface to one unoccluded light.
    ///
    /// All direction arguments are unit vectors: `light_dir` points toward the
    /// light, `view_dir` back toward the viewer. Back-facing terms clamp to zero.
    pub fn blinn_phong(&self, normal: Vec3A, light_dir: Vec3A, view_dir: Vec3A, intensity: Color) -> Color {
        let half = (light_dir + view_dir).normalize_or_zero();
        let diffuse = self.diffuse * intensity * normal.dot(light_dir).max(0.0);
        let specular = self.specular * intensity * normal.dot(half).max(0.0).powf(self.shininess);
        diffuse + specular
    }

    /// True when the material still reflects some energy.
    pub fn reflects(&self) -> bool {
        has_energy(self.specular)
    }
}

/// True when any channel of a non-negative reflectance is above zero.
pub fn has_energy(reflectance: Color) -> bool {
    reflectance.element_sum() > 0.0
}

/// Reflect a vector off a surface using the law of reflection.
pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reflect_mirrors_about_the_normal() {
        let n = Vec3A::Y;
        let v = Vec3A::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, n), Vec3A::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn diffuse_follows_cosine_law() {
        let m = Material::new(Color::new(1.0, 0.5, 0.0), Color::ZERO, 10.0);
        let light = Vec3A::new(0.0, 1.0, 1.0).normalize();
        let c = m.blinn_phong(Vec3A::Z, light, Vec3A::Z, Color::ONE);
        let cos = light.z;
        assert!(c.abs_diff_eq(Color::new(cos, 0.5 * cos, 0.0), 1e-6));
    }

    #[test]
    fn specular_peaks_along_half_vector() {
        let m = Material::new(Color::ZERO, Color::ONE, 50.0);
        // Light and view both along the normal: half vector equals normal.
        let c = m.blinn_phong(Vec3A::Z, Vec3A::Z, Vec3A::Z, Color::splat(2.0));
        assert!(c.abs_diff_eq(Color::splat(2.0), 1e-6));
    }

    #[test]
    fn light_behind_surface_contributes_nothing() {
        let m = Material::new(Color::ONE, Color::ONE, 1.0);
        let c = m.blinn_phong(Vec3A::Z, -Vec3A::Z, -Vec3A::Z, Color::ONE);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn reflects_only_with_specular_energy() {
        assert!(Material::mirror(1.0).reflects());
        assert!(!Material::new(Color::ONE, Color::ZERO, 1.0).reflects());
        assert!(has_energy(Color::new(0.0, 0.0, 0.1)));
        assert!(!has_energy(Color::ZERO));
    }
}
