//! Direction-indexed background radiance.
//!
//! An environment answers "what color arrives along this direction" for rays
//! that leave the scene, both primary rays and escaped reflection rays.

use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec3A;
use image::{ImageBuffer, Rgb};
use log::debug;

use crate::material::Color;

/// HDR image face used by [`CubeMap`].
pub type Face = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// Background color source indexed by ray direction.
///
/// Shared read-only by all render workers, hence `Send + Sync`.
pub trait Environment: Send + Sync {
    /// Radiance arriving along `dir`. `dir` need not be normalized.
    fn sample(&self, dir: Vec3A) -> Color;
}

/// The same color in every direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform(pub Color);

impl Environment for Uniform {
    fn sample(&self, _dir: Vec3A) -> Color {
        self.0
    }
}

/// Vertical blend from `bottom` (straight down) to `top` (straight up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    /// Color seen looking straight down
    pub bottom: Color,
    /// Color seen looking straight up
    pub top: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            bottom: Color::new(1.0, 1.0, 1.0),
            top: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Environment for SkyGradient {
    fn sample(&self, dir: Vec3A) -> Color {
        let unit_direction = dir.normalize_or_zero();
        // y = -1 gives a = 0, y = 1 gives a = 1
        let a = 0.5 * (unit_direction.y + 1.0);
        (1.0 - a) * self.bottom + a * self.top
    }
}

/// Six-face cube map in +X, -X, +Y, -Y, +Z, -Z order.
///
/// Faces follow the OpenGL cube-map orientation and are sampled with
/// nearest-texel filtering.
pub struct CubeMap {
    faces: [Face; 6],
    size: u32,
}

impl CubeMap {
    /// Build a cube map from six square faces of equal size.
    pub fn new(faces: [Face; 6]) -> Result<Self> {
        let size = faces[0].width();
        if size == 0 {
            bail!("cube map faces must not be empty");
        }
        for (index, face) in faces.iter().enumerate() {
            if face.width() != size || face.height() != size {
                bail!(
                    "cube map face {} is {}x{}, expected {}x{}",
                    index,
                    face.width(),
                    face.height(),
                    size,
                    size
                );
            }
        }
        Ok(Self { faces, size })
    }

    /// Load six face images from disk, in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn load<P: AsRef<Path>>(paths: &[P; 6]) -> Result<Self> {
        let mut faces = Vec::with_capacity(6);
        for path in paths {
            let path = path.as_ref();
            debug!("Loading cube map face {}", path.display());
            let face = image::open(path)
                .with_context(|| format!("failed to open cube map face {}", path.display()))?
                .into_rgb32f();
            faces.push(face);
        }
        let faces: [Face; 6] = faces
            .try_into()
            .map_err(|_| anyhow::anyhow!("cube map needs exactly six faces"))?;
        Self::new(faces)
    }

    /// Face index and (u, v) in [0, 1] for a direction.
    fn face_coords(dir: Vec3A) -> (usize, f32, f32) {
        let abs = dir.abs();
        let (face, sc, tc, ma) = if abs.x >= abs.y && abs.x >= abs.z {
            if dir.x >= 0.0 {
                (0, -dir.z, -dir.y, abs.x)
            } else {
                (1, dir.z, -dir.y, abs.x)
            }
        } else if abs.y >= abs.z {
            if dir.y >= 0.0 {
                (2, dir.x, dir.z, abs.y)
            } else {
                (3, dir.x, -dir.z, abs.y)
            }
        } else if dir.z >= 0.0 {
            (4, dir.x, -dir.y, abs.z)
        } else {
            (5, -dir.x, -dir.y, abs.z)
        };
        (face, 0.5 * (sc / ma + 1.0), 0.5 * (tc / ma + 1.0))
    }
}

impl Environment for CubeMap {
    fn sample(&self, dir: Vec3A) -> Color {
        if dir.length_squared() == 0.0 || !dir.is_finite() {
            return Color::ZERO;
        }
        let (face, u, v) = Self::face_coords(dir);
        let last = self.size - 1;
        let x = ((u * self.size as f32) as u32).min(last);
        let y = ((v * self.size as f32) as u32).min(last);
        let texel = self.faces[face].get_pixel(x, y);
        Color::new(texel[0], texel[1], texel[2])
    }
}
