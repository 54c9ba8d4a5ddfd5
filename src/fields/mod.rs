//! The three animated collections composited into the backdrop
//!
//! Each field owns its seed data and is advanced by `update(&FrameInput)`.
//! The sphere cloud recomputes every point from its fixed origin, the spiral
//! moves as one rigid body, and the swarm integrates its meshes in place.

pub mod sphere_cloud;
pub mod spiral;
pub mod swarm;

pub use sphere_cloud::SphereCloud;
pub use spiral::SpiralField;
pub use swarm::{GeometryKind, ShapeInstance, ShapeSwarm};

use crate::math::{Mat4, Vec3};

/// Rigid-body pose of a whole field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::compose(self.position, self.rotation, self.scale)
    }
}

/// Read-only view of the inputs for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Seconds since the render surface started
    pub time: f32,
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub scroll_y: f32,
    /// Pointer projected onto the world plane through the origin
    pub mouse_world_x: f32,
    pub mouse_world_y: f32,
}

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
