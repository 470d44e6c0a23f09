//! Pinhole camera and the parallel image renderer.

use glam::{Vec3A, Vec4};
use image::{ImageBuffer, Rgba};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::random;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::tracer::{trace, TraceSettings};

/// Linear HDR RGBA image produced by [`Camera::render`].
pub type RenderImage = ImageBuffer<Rgba<f32>, Vec<f32>>;

/// Pinhole camera generating one primary ray per pixel sample.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Rays per pixel; more than one jitters rays inside the pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Point camera is looking from (camera position)
    pub lookfrom: Vec3A,
    /// Point camera is looking at (look target)
    pub lookat: Vec3A,
    /// Camera-relative "up" direction vector
    pub vup: Vec3A,

    /// World position of the top-left pixel center (pixel 0,0)
    pixel00_loc: Vec3A,
    /// Offset vector from pixel to pixel horizontally (right direction)
    pixel_delta_u: Vec3A,
    /// Offset vector from pixel to pixel vertically (down direction)
    pixel_delta_v: Vec3A,
    /// Scale for a sum of pixel samples (1.0 / samples_per_pixel)
    pixel_samples_scale: f32,
    initialized: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Creates a new camera with default settings.
    ///
    /// Default: 100x100 image, one sample per pixel, 45° FOV, looking from
    /// (0, 0, 5) at the origin.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            image_height: 100,
            samples_per_pixel: 1,
            vfov: 45.0,
            lookfrom: Vec3A::new(0.0, 0.0, 5.0),
            lookat: Vec3A::ZERO,
            vup: Vec3A::Y,
            pixel00_loc: Vec3A::ZERO,
            pixel_delta_u: Vec3A::ZERO,
            pixel_delta_v: Vec3A::ZERO,
            pixel_samples_scale: 1.0,
            initialized: false,
        }
    }

    /// Renders the scene, evaluating every pixel independently.
    ///
    /// Rows are distributed over the rayon pool and each worker writes only
    /// its own row. Samples are averaged, alpha included, so edge pixels get
    /// fractional coverage.
    pub fn render(&mut self, scene: &Scene, settings: &TraceSettings) -> RenderImage {
        self.initialize();

        let mut image: RenderImage = ImageBuffer::new(self.image_width, self.image_height);
        let row_len = self.image_width as usize * 4;
        if row_len == 0 {
            return image;
        }

        info!(
            "Rendering {}x{} at {} spp, {} bounces, on {} threads",
            self.image_width,
            self.image_height,
            self.samples_per_pixel,
            settings.bounce_limit(),
            rayon::current_num_threads()
        );
        let generation_start = std::time::Instant::now();
        let pb = ProgressBar::new(self.image_height as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            pb.set_style(style);
        }

        let camera = &*self;
        image.par_chunks_mut(row_len).enumerate().for_each(|(j, row)| {
            for (i, pixel) in row.chunks_exact_mut(4).enumerate() {
                let mut pixel_color = Vec4::ZERO;
                for _sample in 0..camera.samples_per_pixel {
                    let r = camera.get_ray(i as u32, j as u32);
                    pixel_color += trace(scene, settings, &r);
                }
                (pixel_color * camera.pixel_samples_scale).write_to_slice(pixel);
            }
            pb.inc(1);
        });

        pb.finish_and_clear();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        image
    }

    /// Compute the viewport from the public settings.
    ///
    /// Called by `render`; call it explicitly before `get_ray` otherwise.
    /// Later changes to the public fields are not picked up.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        self.image_height = self.image_height.max(1);
        self.samples_per_pixel = self.samples_per_pixel.max(1);
        self.pixel_samples_scale = 1.0 / self.samples_per_pixel as f32;

        // The viewport sits one unit in front of the camera.
        let theta = self.vfov.to_radians();
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        let w = (self.lookfrom - self.lookat).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        self.pixel_delta_u = viewport_u / self.image_width.max(1) as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        let viewport_upper_left = self.lookfrom - w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        debug!("Camera at {} looking at {}, vfov {}", self.lookfrom, self.lookat, self.vfov);
        self.initialized = true;
    }

    /// Primary ray through pixel (i, j).
    ///
    /// With one sample per pixel the ray goes through the pixel center,
    /// otherwise through a random point inside the pixel.
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let (dx, dy) = if self.samples_per_pixel > 1 {
            let offset = random::random_in_pixel();
            (offset.x, offset.y)
        } else {
            (0.0, 0.0)
        };
        let pixel_sample = self.pixel00_loc
            + ((i as f32 + dx) * self.pixel_delta_u)
            + ((j as f32 + dy) * self.pixel_delta_v);

        Ray::new(self.lookfrom, pixel_sample - self.lookfrom)
    }
}
