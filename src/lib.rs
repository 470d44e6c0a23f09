//! phongtrace sphere ray tracer
//!
//! Evaluates one color per primary ray against a small, fixed set of spheres:
//! nearest-hit search, shadowed Blinn-Phong lighting and a bounded chain of
//! mirror reflections, falling back to an environment lookup on a miss.
//! Around that evaluator sit a pinhole camera with a row-parallel renderer,
//! a JSON scene loader and PNG/EXR/TEV output.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod ray;
pub mod interval;
pub mod material;
pub mod hittable;
pub mod sphere;
pub mod light;
pub mod environment;
pub mod scene;
pub mod tracer;
pub mod camera;
pub mod random;
pub mod config;
pub mod output;
