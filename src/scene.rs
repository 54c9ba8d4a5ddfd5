//! Scene composer: lights, the three fields and the camera

use rand::Rng;

use crate::camera::CameraController;
use crate::config::BackdropConfig;
use crate::fields::{FrameInput, ShapeSwarm, SphereCloud, SpiralField};
use crate::input::InputState;
use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { color: Vec3, intensity: f32 },
    Directional { position: Vec3, color: Vec3, intensity: f32 },
    Point { position: Vec3, color: Vec3, intensity: f32, range: f32 },
}

/// Additive point-sprite material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMaterial {
    pub color: Vec3,
    pub size: f32,
    pub opacity: f32,
}

/// Translucent lit wireframe material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireMaterial {
    pub color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub opacity: f32,
}

pub struct Scene {
    pub lights: Vec<Light>,
    pub camera: CameraController,
    pub sphere_cloud: SphereCloud,
    pub spiral: SpiralField,
    pub swarm: ShapeSwarm,
    pub cloud_material: PointMaterial,
    pub spiral_material: PointMaterial,
    pub shape_material: WireMaterial,
}

impl Scene {
    pub fn new<R: Rng>(config: &BackdropConfig, rng: &mut R) -> Result<Self, String> {
        config.validate()?;

        let cloud_material = PointMaterial {
            color: parse_color(&config.sphere_cloud.color)?,
            size: config.sphere_cloud.point_size,
            opacity: config.sphere_cloud.opacity,
        };
        let spiral_material = PointMaterial {
            color: parse_color(&config.spiral.color)?,
            size: config.spiral.point_size,
            opacity: config.spiral.opacity,
        };
        let shape_material = WireMaterial {
            color: parse_color(&config.swarm.color)?,
            emissive: parse_color(&config.swarm.emissive)?,
            emissive_intensity: config.swarm.emissive_intensity,
            opacity: config.swarm.opacity,
        };

        Ok(Self {
            lights: default_lights(),
            camera: CameraController::new(&config.camera),
            sphere_cloud: SphereCloud::new(&config.sphere_cloud, rng),
            spiral: SpiralField::new(&config.spiral, rng),
            swarm: ShapeSwarm::new(&config.swarm, rng),
            cloud_material,
            spiral_material,
            shape_material,
        })
    }

    /// Advance every component by one tick. All updates finish before returning,
    /// so the renderer never sees a half-updated frame.
    pub fn tick(&mut self, time: f32, input: &InputState) -> FrameInput {
        self.camera.update(input.pointer_x, input.pointer_y, input.scroll_y);

        let (mouse_world_x, mouse_world_y) =
            self.camera
                .project_pointer(input.pointer_x, input.pointer_y, input.viewport.aspect());

        let frame = FrameInput {
            time,
            pointer_x: input.pointer_x,
            pointer_y: input.pointer_y,
            scroll_y: input.scroll_y,
            mouse_world_x,
            mouse_world_y,
        };

        self.sphere_cloud.update(&frame);
        self.spiral.update(&frame);
        self.swarm.update(&frame);

        frame
    }
}

fn parse_color(hex: &str) -> Result<Vec3, String> {
    Vec3::from_hex(hex).ok_or_else(|| format!("Invalid color '{}'", hex))
}

fn hex(value: &str) -> Vec3 {
    Vec3::from_hex(value).unwrap_or(Vec3::ONE)
}

/// Ambient fill, two opposed directional lights and three colored point lights
pub fn default_lights() -> Vec<Light> {
    vec![
        Light::Ambient { color: Vec3::ONE, intensity: 0.4 },
        Light::Directional {
            position: Vec3::new(5.0, 5.0, 5.0),
            color: hex("#a855f7"),
            intensity: 0.8,
        },
        Light::Directional {
            position: Vec3::new(-5.0, -5.0, -5.0),
            color: hex("#ec4899"),
            intensity: 0.5,
        },
        Light::Point {
            position: Vec3::ZERO,
            color: hex("#8b5cf6"),
            intensity: 1.5,
            range: 8.0,
        },
        Light::Point {
            position: Vec3::new(3.0, 3.0, 3.0),
            color: hex("#ec4899"),
            intensity: 1.0,
            range: 6.0,
        },
        Light::Point {
            position: Vec3::new(-3.0, -3.0, -3.0),
            color: hex("#a855f7"),
            intensity: 1.0,
            range: 6.0,
        },
    ]
}
