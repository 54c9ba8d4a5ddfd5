//! Floating wireframe shapes drawn toward the pointer
//!
//! Positions are integrated in place every frame rather than recomputed from
//! the seed, so instances wander over a long session. That drift is part of
//! the look and is left unclamped.

use std::f32::consts::PI;

use rand::Rng;

use super::{lerp, FrameInput, Transform};
use crate::config::SwarmConfig;
use crate::math::Vec3;

const ATTRACTION_STEP: f32 = 0.01;
const ORBIT_STEP: f32 = 0.002;
const SCROLL_STEP: f32 = 0.01;
const SPIN_RATE: Vec3 = Vec3::new(0.015, 0.02, 0.01);
const PULSE_AMPLITUDE: f32 = 0.1;

/// Mesh primitive used by a swarm instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Box,
    Sphere,
    Torus,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 3] = [GeometryKind::Box, GeometryKind::Sphere, GeometryKind::Torus];

    /// Round-robin assignment by instance index
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// One floating mesh
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeInstance {
    pub position: Vec3,
    pub rotation: Vec3,
    /// Current uniform scale, `base_scale` modulated by the pulse
    pub scale: f32,
    pub base_scale: f32,
    pub kind: GeometryKind,
    pub speed: f32,
    /// Seeded but not used by the motion rule
    pub orbit_radius: f32,
    pub index: usize,
}

pub struct ShapeSwarm {
    shapes: Vec<ShapeInstance>,
    transform: Transform,
    attraction_radius: f32,
}

impl ShapeSwarm {
    pub fn new<R: Rng>(config: &SwarmConfig, rng: &mut R) -> Self {
        let [ex, ey, ez] = config.spawn_extent;

        let shapes = (0..config.count)
            .map(|index| {
                let base_scale = lerp(config.min_scale, config.max_scale, rng.gen::<f32>());
                ShapeInstance {
                    position: Vec3::new(
                        (rng.gen::<f32>() - 0.5) * ex,
                        (rng.gen::<f32>() - 0.5) * ey,
                        (rng.gen::<f32>() - 0.5) * ez,
                    ),
                    rotation: Vec3::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI, 0.0),
                    scale: base_scale,
                    base_scale,
                    kind: GeometryKind::for_index(index),
                    speed: lerp(config.min_speed, config.max_speed, rng.gen::<f32>()),
                    orbit_radius: lerp(config.min_orbit_radius, config.max_orbit_radius, rng.gen::<f32>()),
                    index,
                }
            })
            .collect();

        Self {
            shapes,
            transform: Transform::default(),
            attraction_radius: config.attraction_radius,
        }
    }

    pub fn update(&mut self, frame: &FrameInput) {
        let time = frame.time;

        for shape in &mut self.shapes {
            let i = shape.index as f32;

            let dx = shape.position.x - frame.mouse_world_x;
            let dy = shape.position.y - frame.mouse_world_y;
            let dist = (dx * dx + dy * dy).sqrt();

            let attraction = (1.0 - dist / self.attraction_radius).max(0.0);
            shape.position.x += dx * attraction * ATTRACTION_STEP;
            shape.position.y += dy * attraction * ATTRACTION_STEP;

            let orbit_phase = time * shape.speed + i;
            shape.position.x += orbit_phase.cos() * ORBIT_STEP;
            shape.position.y += orbit_phase.sin() * ORBIT_STEP;

            shape.position.y += (frame.scroll_y * 0.002 + i).sin() * SCROLL_STEP;

            shape.rotation += SPIN_RATE * shape.speed;

            let pulse = 1.0 + (time * 2.0 + i).sin() * PULSE_AMPLITUDE;
            shape.scale = shape.base_scale * pulse;
        }

        self.transform.rotation.y = time * 0.05 + frame.pointer_x * 0.5;
        self.transform.rotation.x = frame.pointer_y * 0.3;
    }

    pub fn shapes(&self) -> &[ShapeInstance] {
        &self.shapes
    }

    pub fn count(&self) -> usize {
        self.shapes.len()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[cfg(test)]
    fn shapes_mut(&mut self) -> &mut [ShapeInstance] {
        &mut self.shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn swarm() -> ShapeSwarm {
        let mut rng = SmallRng::seed_from_u64(5);
        ShapeSwarm::new(&SwarmConfig::default(), &mut rng)
    }

    #[test]
    fn test_seeding() {
        let swarm = swarm();
        assert_eq!(swarm.count(), 20);

        for (i, shape) in swarm.shapes().iter().enumerate() {
            assert_eq!(shape.index, i);
            assert_eq!(shape.kind, GeometryKind::for_index(i));
            assert!(shape.position.x.abs() <= 5.0 && shape.position.y.abs() <= 5.0);
            assert!(shape.position.z.abs() <= 2.5);
            assert!(shape.base_scale >= 0.15 && shape.base_scale < 0.40);
            assert!(shape.speed >= 0.5 && shape.speed < 1.5);
            assert!(shape.orbit_radius >= 0.5 && shape.orbit_radius < 1.0);
            assert!(shape.rotation.x >= 0.0 && shape.rotation.x < PI);
            assert_eq!(shape.rotation.z, 0.0);
        }
    }

    #[test]
    fn test_orbit_radius_from_config() {
        let config = SwarmConfig {
            min_orbit_radius: 2.0,
            max_orbit_radius: 2.0,
            ..SwarmConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let swarm = ShapeSwarm::new(&config, &mut rng);
        assert!(swarm.shapes().iter().all(|s| s.orbit_radius == 2.0));
    }

    #[test]
    fn test_round_robin_kinds() {
        assert_eq!(GeometryKind::for_index(0), GeometryKind::Box);
        assert_eq!(GeometryKind::for_index(1), GeometryKind::Sphere);
        assert_eq!(GeometryKind::for_index(2), GeometryKind::Torus);
        assert_eq!(GeometryKind::for_index(3), GeometryKind::Box);
    }

    #[test]
    fn test_instance_on_pointer_gets_no_attraction() {
        let mut swarm = swarm();
        swarm.shapes_mut()[0].position = Vec3::new(1.0, -1.0, 0.5);
        let before = swarm.shapes()[0].clone();

        let frame = FrameInput {
            time: 2.0,
            mouse_world_x: 1.0,
            mouse_world_y: -1.0,
            ..Default::default()
        };
        swarm.update(&frame);
        let after = &swarm.shapes()[0];

        // Only orbital and scroll drift move it (index 0, scroll 0)
        let phase = 2.0 * before.speed;
        let expected_x = 1.0 + phase.cos() * ORBIT_STEP;
        let expected_y = -1.0 + phase.sin() * ORBIT_STEP;
        assert!((after.position.x - expected_x).abs() < 1e-6);
        assert!((after.position.y - expected_y).abs() < 1e-6);
        assert_eq!(after.position.z, 0.5);

        // Rotation and pulse still advance
        assert!(after.rotation.x > before.rotation.x);
        let pulse = 1.0 + (4.0f32).sin() * PULSE_AMPLITUDE;
        assert!((after.scale - before.base_scale * pulse).abs() < 1e-6);
    }

    #[test]
    fn test_attraction_vanishes_beyond_radius() {
        let mut swarm = swarm();
        swarm.shapes_mut()[3].position = Vec3::new(10.0, 0.0, 0.0);

        let frame = FrameInput {
            time: 0.0,
            ..Default::default()
        };
        swarm.update(&frame);

        // dist = 10 > 3: x only moves by the orbital term
        let shape = &swarm.shapes()[3];
        let expected_x = 10.0 + (3.0f32).cos() * ORBIT_STEP;
        assert!((shape.position.x - expected_x).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut swarm = swarm();
        let start = swarm.shapes()[1].rotation;
        let speed = swarm.shapes()[1].speed;

        let frame = FrameInput::default();
        for _ in 0..100 {
            swarm.update(&frame);
        }

        let end = swarm.shapes()[1].rotation;
        assert!((end.x - start.x - 100.0 * 0.015 * speed).abs() < 1e-3);
        assert!((end.y - start.y - 100.0 * 0.02 * speed).abs() < 1e-3);
        assert!((end.z - start.z - 100.0 * 0.01 * speed).abs() < 1e-3);
    }

    #[test]
    fn test_positions_drift_with_constant_scroll() {
        let mut swarm = swarm();
        let start = swarm.shapes()[0].position;

        // Index 0 at scroll offset 785 gives sin(1.57) ~ 1: a steady upward push
        let frame = FrameInput {
            scroll_y: 785.0,
            mouse_world_x: 1000.0,
            ..Default::default()
        };
        for _ in 0..1000 {
            swarm.update(&frame);
        }

        assert!(swarm.shapes()[0].position.y - start.y > 5.0);
    }

    #[test]
    fn test_group_rotation() {
        let mut swarm = swarm();
        swarm.update(&FrameInput {
            time: 4.0,
            pointer_x: -1.0,
            pointer_y: 0.5,
            ..Default::default()
        });
        let r = swarm.transform().rotation;
        assert!((r.y - (0.2 - 0.5)).abs() < 1e-6);
        assert!((r.x - 0.15).abs() < 1e-6);
    }
}
