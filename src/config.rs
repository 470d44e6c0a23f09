//! JSON scene description.
//!
//! A scene file names its materials once and refers to them from spheres by
//! name. Parsing produces plain data (`SceneData`); [`SceneData::build`]
//! validates it and freezes it into a [`Scene`] plus the camera and bounce
//! settings it asks for.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glam::Vec3A;
use log::{debug, info};
use serde::Deserialize;

use crate::camera::Camera;
use crate::environment::{CubeMap, Environment, SkyGradient, Uniform};
use crate::light::PointLight;
use crate::material::{Color, Material};
use crate::scene::Scene;
use crate::sphere::Sphere;
use crate::tracer::TraceSettings;

fn default_bounce_limit() -> u32 {
    4
}

/// Pinhole camera placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraData {
    /// Camera position
    pub lookfrom: [f32; 3],
    /// Point at the image center
    pub lookat: [f32; 3],
    /// Up direction, +Y by default
    #[serde(default = "CameraData::default_vup")]
    pub vup: [f32; 3],
    /// Vertical field of view in degrees, 45 by default
    #[serde(default = "CameraData::default_vfov")]
    pub vfov: f32,
}

impl CameraData {
    fn default_vup() -> [f32; 3] {
        [0.0, 1.0, 0.0]
    }

    fn default_vfov() -> f32 {
        45.0
    }
}

/// Background source, selected by its `type` field.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum EnvironmentData {
    Uniform { color: [f32; 3] },
    SkyGradient { bottom: [f32; 3], top: [f32; 3] },
    /// Face images in +X, -X, +Y, -Y, +Z, -Z order
    CubeMap { faces: [PathBuf; 6] },
}

impl Default for EnvironmentData {
    fn default() -> Self {
        let sky = SkyGradient::default();
        EnvironmentData::SkyGradient {
            bottom: sky.bottom.to_array(),
            top: sky.top.to_array(),
        }
    }
}

/// Named Blinn-Phong material. Specular and shininess default to zero.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialData {
    pub diffuse: [f32; 3],
    #[serde(default)]
    pub specular: [f32; 3],
    #[serde(default)]
    pub shininess: f32,
}

/// Sphere referring to a material by name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereData {
    pub center: [f32; 3],
    pub radius: f32,
    pub material: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightData {
    pub position: [f32; 3],
    pub intensity: [f32; 3],
}

/// Parsed, not yet validated scene file.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneData {
    #[serde(default)]
    pub camera: Option<CameraData>,
    #[serde(default = "default_bounce_limit")]
    pub bounce_limit: u32,
    #[serde(default)]
    pub environment: EnvironmentData,
    #[serde(default)]
    pub materials: HashMap<String, MaterialData>,
    pub spheres: Vec<SphereData>,
    #[serde(default)]
    pub lights: Vec<LightData>,
}

/// Everything needed to render a scene file.
pub struct LoadedScene {
    /// Spheres, lights and environment
    pub scene: Scene,
    /// Camera placement; image size and sampling come from the caller
    pub camera: Camera,
    /// Evaluator settings from the file's bounce limit
    pub settings: TraceSettings,
}

/// Read and build a scene file. Relative cube map paths resolve against the file's directory.
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<LoadedScene> {
    let path = path.as_ref();
    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene file {}", path.display()))?;
    let data: SceneData = serde_json::from_str(&input)
        .with_context(|| format!("failed to parse scene file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let loaded = data
        .build(base_dir)
        .with_context(|| format!("invalid scene file {}", path.display()))?;
    info!(
        "Loaded {} with {} spheres and {} lights",
        path.display(),
        loaded.scene.spheres().len(),
        loaded.scene.lights().len()
    );
    Ok(loaded)
}

fn vec3(v: [f32; 3]) -> Vec3A {
    Vec3A::from_array(v)
}

fn non_negative(what: &str, c: [f32; 3]) -> Result<Color> {
    if c.iter().any(|x| !x.is_finite() || *x < 0.0) {
        bail!("{} must be finite and non-negative, got {:?}", what, c);
    }
    Ok(vec3(c))
}

fn finite(what: &str, v: [f32; 3]) -> Result<Vec3A> {
    if v.iter().any(|x| !x.is_finite()) {
        bail!("{} must be finite, got {:?}", what, v);
    }
    Ok(vec3(v))
}

impl MaterialData {
    fn build(&self, name: &str) -> Result<Material> {
        if !self.shininess.is_finite() || self.shininess < 0.0 {
            bail!("material '{}' has invalid shininess {}", name, self.shininess);
        }
        Ok(Material::new(
            non_negative(&format!("material '{}' diffuse", name), self.diffuse)?,
            non_negative(&format!("material '{}' specular", name), self.specular)?,
            self.shininess,
        ))
    }
}

impl EnvironmentData {
    fn build(&self, base_dir: &Path) -> Result<Box<dyn Environment>> {
        let environment: Box<dyn Environment> = match self {
            EnvironmentData::Uniform { color } => Box::new(Uniform(non_negative("environment color", *color)?)),
            EnvironmentData::SkyGradient { bottom, top } => Box::new(SkyGradient {
                bottom: non_negative("sky bottom", *bottom)?,
                top: non_negative("sky top", *top)?,
            }),
            EnvironmentData::CubeMap { faces } => {
                let faces = faces.clone().map(|face| base_dir.join(face));
                Box::new(CubeMap::load(&faces)?)
            }
        };
        Ok(environment)
    }
}

impl CameraData {
    fn build(&self) -> Result<Camera> {
        let mut camera = Camera::new();
        camera.lookfrom = finite("camera lookfrom", self.lookfrom)?;
        camera.lookat = finite("camera lookat", self.lookat)?;
        camera.vup = finite("camera vup", self.vup)?;
        if camera.lookfrom == camera.lookat {
            bail!("camera lookfrom and lookat coincide");
        }
        if camera.vup.cross(camera.lookfrom - camera.lookat).length_squared() == 0.0 {
            bail!("camera vup {} is zero or parallel to the view direction", camera.vup);
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            bail!("camera vfov must be in (0, 180) degrees, got {}", self.vfov);
        }
        camera.vfov = self.vfov;
        Ok(camera)
    }
}

impl SceneData {
    /// Validate and freeze the description.
    pub fn build(&self, base_dir: &Path) -> Result<LoadedScene> {
        let mut materials = HashMap::with_capacity(self.materials.len());
        for (name, data) in &self.materials {
            materials.insert(name.as_str(), data.build(name)?);
        }

        let mut spheres = Vec::with_capacity(self.spheres.len());
        for (index, data) in self.spheres.iter().enumerate() {
            let Some(material) = materials.get(data.material.as_str()) else {
                bail!("sphere {} uses unknown material '{}'", index, data.material);
            };
            if !data.radius.is_finite() || data.radius < 0.0 {
                bail!("sphere {} has invalid radius {}", index, data.radius);
            }
            let center = finite(&format!("sphere {} center", index), data.center)?;
            spheres.push(Sphere::new(center, data.radius, *material));
        }

        let lights = self
            .lights
            .iter()
            .enumerate()
            .map(|(index, data)| {
                Ok(PointLight::new(
                    finite(&format!("light {} position", index), data.position)?,
                    non_negative(&format!("light {} intensity", index), data.intensity)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let camera = match &self.camera {
            Some(data) => data.build()?,
            None => Camera::new(),
        };
        debug!("Scene file asks for {} bounces", self.bounce_limit);

        Ok(LoadedScene {
            scene: Scene::new(spheres, lights, self.environment.build(base_dir)?),
            camera,
            settings: TraceSettings::new(self.bounce_limit),
        })
    }
}

/// Built-in scene rendered when no scene file is given.
///
/// A mirror sphere between two colored spheres on a large ground sphere,
/// lit by a white key light and a dimmer blue fill.
pub fn demo_scene() -> LoadedScene {
    let ground = Material::new(Color::splat(0.5), Color::splat(0.1), 10.0);
    let mirror = Material::new(Color::splat(0.05), Color::splat(0.9), 200.0);
    let red = Material::new(Color::new(0.8, 0.1, 0.1), Color::splat(0.3), 50.0);
    let gold = Material::new(Color::new(0.6, 0.45, 0.1), Color::new(0.5, 0.4, 0.1), 80.0);

    let spheres = vec![
        Sphere::new(Vec3A::new(0.0, -1001.0, 0.0), 1000.0, ground),
        Sphere::new(Vec3A::new(0.0, 0.0, 0.0), 1.0, mirror),
        Sphere::new(Vec3A::new(-2.2, -0.3, 0.6), 0.7, red),
        Sphere::new(Vec3A::new(2.2, -0.3, 0.6), 0.7, gold),
    ];
    let lights = vec![
        PointLight::new(Vec3A::new(4.0, 6.0, 6.0), Color::splat(0.9)),
        PointLight::new(Vec3A::new(-6.0, 3.0, 2.0), Color::new(0.2, 0.25, 0.4)),
    ];

    let mut camera = Camera::new();
    camera.lookfrom = Vec3A::new(0.0, 1.2, 7.0);
    camera.lookat = Vec3A::new(0.0, -0.2, 0.0);
    camera.vfov = 40.0;

    LoadedScene {
        scene: Scene::new(spheres, lights, Box::new(SkyGradient::default())),
        camera,
        settings: TraceSettings::default(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hittable::Hittable;
    use crate::interval::Interval;
    use crate::ray::Ray;

    const MINIMAL: &str = r#"{
        "materials": { "red": { "diffuse": [1, 0, 0] } },
        "spheres": [ { "center": [0, 0, 0], "radius": 1, "material": "red" } ]
    }"#;

    fn parse(json: &str) -> SceneData {
        serde_json::from_str(json).expect("valid json")
    }

    #[test]
    fn minimal_scene_uses_defaults() {
        let loaded = parse(MINIMAL).build(Path::new(".")).expect("valid scene");
        assert_eq!(loaded.settings.bounce_limit(), 4);
        assert_eq!(loaded.scene.spheres().len(), 1);
        assert!(loaded.scene.lights().is_empty());
        assert_eq!(loaded.scene.spheres()[0].material.specular, Color::ZERO);
        assert_eq!(loaded.camera.lookfrom, Vec3A::new(0.0, 0.0, 5.0));
        let sky = loaded.scene.environment().sample(Vec3A::Y);
        assert!(sky.abs_diff_eq(SkyGradient::default().top, 1e-6));
    }

    #[test]
    fn full_scene_builds_every_section() {
        let json = r#"{
            "camera": { "lookfrom": [0, 1, 8], "lookat": [0, 0, 0], "vfov": 30 },
            "bounce_limit": 2,
            "environment": { "type": "Uniform", "color": [0.1, 0.2, 0.3] },
            "materials": {
                "mirror": { "diffuse": [0, 0, 0], "specular": [1, 1, 1], "shininess": 100 },
                "red": { "diffuse": [1, 0, 0], "specular": [0.2, 0.2, 0.2], "shininess": 10 }
            },
            "spheres": [
                { "center": [0, 0, 0], "radius": 1, "material": "mirror" },
                { "center": [2, 0, 0], "radius": 0.5, "material": "red" }
            ],
            "lights": [ { "position": [0, 5, 0], "intensity": [1, 1, 1] } ]
        }"#;
        let loaded = parse(json).build(Path::new(".")).expect("valid scene");
        assert_eq!(loaded.settings.bounce_limit(), 2);
        assert_eq!(loaded.camera.vfov, 30.0);
        assert_eq!(loaded.camera.vup, Vec3A::Y);
        assert_eq!(loaded.scene.spheres()[0].material, Material::mirror(100.0));
        assert_eq!(loaded.scene.spheres()[1].radius, 0.5);
        assert_eq!(loaded.scene.lights()[0].position, Vec3A::new(0.0, 5.0, 0.0));
        assert_eq!(loaded.scene.environment().sample(Vec3A::X), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn sphere_order_is_preserved() {
        let json = r#"{
            "materials": { "a": { "diffuse": [1, 0, 0] }, "b": { "diffuse": [0, 1, 0] } },
            "spheres": [
                { "center": [0, 0, -4], "radius": 1, "material": "a" },
                { "center": [0, 0, -4], "radius": 1, "material": "b" }
            ]
        }"#;
        let loaded = parse(json).build(Path::new(".")).expect("valid scene");
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        let hit = loaded.scene.hit(&r, Interval::FORWARD).expect("hit");
        assert_eq!(hit.material.diffuse, Color::X);
    }

    #[test]
    fn unknown_material_is_an_error() {
        let json = r#"{ "spheres": [ { "center": [0, 0, 0], "radius": 1, "material": "nope" } ] }"#;
        let err = parse(json).build(Path::new(".")).err().expect("must fail");
        assert!(err.to_string().contains("unknown material 'nope'"));
    }

    #[test]
    fn negative_values_are_rejected() {
        let negative_radius = r#"{
            "materials": { "m": { "diffuse": [1, 1, 1] } },
            "spheres": [ { "center": [0, 0, 0], "radius": -1, "material": "m" } ]
        }"#;
        assert!(parse(negative_radius).build(Path::new(".")).is_err());

        let negative_diffuse = r#"{
            "materials": { "m": { "diffuse": [1, -1, 1] } },
            "spheres": []
        }"#;
        assert!(parse(negative_diffuse).build(Path::new(".")).is_err());

        let negative_light = r#"{
            "spheres": [],
            "lights": [ { "position": [0, 0, 0], "intensity": [-1, 0, 0] } ]
        }"#;
        assert!(parse(negative_light).build(Path::new(".")).is_err());
    }

    #[test]
    fn bad_camera_is_rejected() {
        let json = r#"{ "camera": { "lookfrom": [1, 1, 1], "lookat": [1, 1, 1] }, "spheres": [] }"#;
        assert!(parse(json).build(Path::new(".")).is_err());
        let json = r#"{ "camera": { "lookfrom": [0, 0, 1], "lookat": [0, 0, 0], "vfov": 180 }, "spheres": [] }"#;
        assert!(parse(json).build(Path::new(".")).is_err());
        // Looking straight down with the default +Y up vector.
        let json = r#"{ "camera": { "lookfrom": [0, 5, 0], "lookat": [0, 0, 0] }, "spheres": [] }"#;
        let err = parse(json).build(Path::new(".")).err().expect("must fail");
        assert!(err.to_string().contains("vup"));
        let json = r#"{ "camera": { "lookfrom": [0, 0, 1], "lookat": [0, 0, 0], "vup": [0, 0, 0] }, "spheres": [] }"#;
        assert!(parse(json).build(Path::new(".")).is_err());
        let json = r#"{ "camera": { "lookfrom": [0, 5, 0], "lookat": [0, 0, 0], "vup": [0, 0, -1] }, "spheres": [] }"#;
        assert!(parse(json).build(Path::new(".")).is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{ "spheres": [], "bounces": 3 }"#;
        assert!(serde_json::from_str::<SceneData>(json).is_err());
    }

    #[test]
    fn bounce_limit_is_capped() {
        let json = r#"{ "spheres": [], "bounce_limit": 100000 }"#;
        let loaded = parse(json).build(Path::new(".")).expect("valid scene");
        assert_eq!(loaded.settings.bounce_limit(), crate::tracer::MAX_BOUNCES);
    }

    #[test]
    fn load_scene_reads_from_disk() {
        let path = std::env::temp_dir().join(format!("phongtrace-config-{}.json", std::process::id()));
        fs::write(&path, MINIMAL).expect("write temp scene");
        let loaded = load_scene(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded.expect("loads").scene.spheres().len(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_scene("/definitely/not/here.json").err().expect("must fail");
        assert!(format!("{:#}", err).contains("/definitely/not/here.json"));
    }

    #[test]
    fn cube_map_faces_resolve_relative_to_scene_file() {
        let dir = std::env::temp_dir().join(format!("phongtrace-cube-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let names = ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"];
        for (index, name) in names.iter().enumerate() {
            let level = (index as u8 + 1) * 40;
            image::RgbImage::from_pixel(2, 2, image::Rgb([level, 0, 0]))
                .save(dir.join(name))
                .expect("write face");
        }
        let json = r#"{
            "environment": { "type": "CubeMap", "faces": ["px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png"] },
            "spheres": []
        }"#;
        let scene_path = dir.join("scene.json");
        fs::write(&scene_path, json).expect("write scene");

        let loaded = load_scene(&scene_path);
        let _ = fs::remove_dir_all(&dir);
        let loaded = loaded.expect("cube map scene loads");
        let plus_z = loaded.scene.environment().sample(Vec3A::Z);
        assert!((plus_z.x - 200.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn demo_scene_is_lit_and_reflective() {
        let demo = demo_scene();
        assert_eq!(demo.scene.spheres().len(), 4);
        assert_eq!(demo.scene.lights().len(), 2);
        assert!(demo.scene.spheres().iter().any(|s| s.material.reflects()));
    }
}
