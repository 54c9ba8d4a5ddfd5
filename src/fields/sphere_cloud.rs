//! Spherical shell of points that scatter away from the pointer
//!
//! Every frame each point is re-derived from its fixed origin, so no error
//! accumulates however long the page stays open.

use std::f32::consts::TAU;

use rand::Rng;

use super::{lerp, FrameInput, Transform};
use crate::config::SphereCloudConfig;
use crate::math::Vec3;

const JITTER_XY: f32 = 0.05;
const JITTER_Z: f32 = 0.1;
const WAVE_SCROLL_FREQUENCY: f32 = 0.001;
const WAVE_INDEX_FREQUENCY: f32 = 0.01;

/// Shell of particles with pointer repulsion and a scroll wave
pub struct SphereCloud {
    origins: Vec<Vec3>,
    /// Render buffer, 3 floats per particle, overwritten every frame
    positions: Vec<f32>,
    transform: Transform,
    repulsion_radius: f32,
    scatter_strength: f32,
    wave_amplitude: f32,
}

impl SphereCloud {
    pub fn new<R: Rng>(config: &SphereCloudConfig, rng: &mut R) -> Self {
        let origins: Vec<Vec3> = (0..config.count)
            .map(|_| {
                let t = rng.gen::<f32>() * TAU;
                let p = rng.gen::<f32>() * TAU;
                let r = lerp(config.inner_radius, config.outer_radius, rng.gen::<f32>());

                Vec3::new(
                    r * t.sin() * p.cos(),
                    r * t.sin() * p.sin(),
                    r * t.cos(),
                )
            })
            .collect();

        let positions = origins.iter().flat_map(|o| o.to_array()).collect();

        Self {
            origins,
            positions,
            transform: Transform::default(),
            repulsion_radius: config.repulsion_radius,
            scatter_strength: config.scatter_strength,
            wave_amplitude: config.wave_amplitude,
        }
    }

    /// Position of particle `index` for the given frame, from its origin alone
    pub fn displaced_position(&self, index: usize, frame: &FrameInput) -> Vec3 {
        let origin = self.origins[index];

        let dx = origin.x - frame.mouse_world_x;
        let dy = origin.y - frame.mouse_world_y;
        let dist = (dx * dx + dy * dy).sqrt();

        // Linear in dist, never divides by it
        let force = (1.0 - dist / self.repulsion_radius).max(0.0);
        let scatter = force * self.scatter_strength;

        // Jitter and wave are both keyed on the particle's flat-buffer offset
        let key = (index * 3) as f32;

        let scroll_effect = self.wave_amplitude
            * (frame.scroll_y * WAVE_SCROLL_FREQUENCY + key * WAVE_INDEX_FREQUENCY).sin();

        let phase = frame.time + key;
        let slow_phase = frame.time * 0.5 + key;

        Vec3::new(
            origin.x + dx * scatter + phase.sin() * JITTER_XY,
            origin.y + dy * scatter + phase.cos() * JITTER_XY + scroll_effect,
            origin.z + slow_phase.sin() * JITTER_Z,
        )
    }

    pub fn update(&mut self, frame: &FrameInput) {
        for index in 0..self.origins.len() {
            let p = self.displaced_position(index, frame);
            let base = index * 3;
            self.positions[base] = p.x;
            self.positions[base + 1] = p.y;
            self.positions[base + 2] = p.z;
        }

        self.transform.rotation.x = frame.time * 0.03 + frame.pointer_y * 0.3;
        self.transform.rotation.y = frame.time * 0.05 + frame.pointer_x * 0.3;
    }

    pub fn count(&self) -> usize {
        self.origins.len()
    }

    pub fn origins(&self) -> &[Vec3] {
        &self.origins
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * 3;
        Vec3::new(self.positions[base], self.positions[base + 1], self.positions[base + 2])
    }

    /// Flat xyz buffer for GPU upload
    pub fn position_data(&self) -> &[f32] {
        &self.positions
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Largest distance a particle can move away from its origin in one frame
    pub fn max_displacement(&self) -> f32 {
        // 0.8 * d * (1 - d / R) peaks at d = R / 2
        let peak_scatter = self.scatter_strength * self.repulsion_radius / 4.0;
        let jitter = (2.0 * JITTER_XY * JITTER_XY + JITTER_Z * JITTER_Z).sqrt();
        peak_scatter + jitter + self.wave_amplitude
    }
}
