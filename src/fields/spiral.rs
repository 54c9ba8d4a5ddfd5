//! Multi-armed spiral galaxy moved as a single rigid body

use std::f32::consts::TAU;

use rand::Rng;

use super::{FrameInput, Transform};
use crate::config::SpiralConfig;
use crate::math::Vec3;

pub struct SpiralField {
    /// Flat xyz buffer, written once at construction
    points: Vec<f32>,
    branches: usize,
    transform: Transform,
}

impl SpiralField {
    pub fn new<R: Rng>(config: &SpiralConfig, rng: &mut R) -> Self {
        let mut points = Vec::with_capacity(config.count * 3);

        for i in 0..config.count {
            let radius = rng.gen::<f32>() * config.radius;
            let branch_angle = branch_angle(i, config.branches);
            let spin_angle = radius * config.spin;

            let random_x = (rng.gen::<f32>() - 0.5) * config.randomness * radius;
            let random_y = (rng.gen::<f32>() - 0.5) * config.randomness * radius;
            let random_z = (rng.gen::<f32>() - 0.5) * config.randomness * radius;

            let angle = branch_angle + spin_angle;
            points.push(angle.cos() * radius + random_x);
            points.push(random_y * config.flatten);
            points.push(angle.sin() * radius + random_z);
        }

        Self {
            points,
            branches: config.branches,
            transform: Transform::default(),
        }
    }

    /// Rigid-body update; the point buffer itself is never touched
    pub fn update(&mut self, frame: &FrameInput) {
        self.transform.rotation.y = frame.time * 0.04 + frame.pointer_x * 0.4;
        self.transform.rotation.x = frame.pointer_y * 0.2;

        self.transform.position.y = (frame.scroll_y * 0.001).sin() * 0.5;
        self.transform.position.z = frame.scroll_y * 0.0005;
    }

    pub fn count(&self) -> usize {
        self.points.len() / 3
    }

    pub fn branches(&self) -> usize {
        self.branches
    }

    pub fn point(&self, index: usize) -> Vec3 {
        let base = index * 3;
        Vec3::new(self.points[base], self.points[base + 1], self.points[base + 2])
    }

    pub fn position_data(&self) -> &[f32] {
        &self.points
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

/// Angle of the arm that point `index` belongs to
pub fn branch_angle(index: usize, branches: usize) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}
