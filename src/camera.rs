//! Pointer-following camera with a scroll-driven dolly

use crate::config::CameraConfig;
use crate::math::{Mat4, Vec3};

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Eases the camera toward a pointer-derived target every frame
#[derive(Debug, Clone)]
pub struct CameraController {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    base_distance: f32,
    follow: f32,
    smoothing: f32,
    dolly_amplitude: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.distance),
            target: Vec3::ZERO,
            fov: config.fov_degrees.to_radians(),
            base_distance: config.distance,
            follow: config.follow,
            smoothing: config.smoothing,
            dolly_amplitude: config.dolly_amplitude,
        }
    }

    /// Advance one frame. The smoothing factor is per frame, not per second.
    pub fn update(&mut self, pointer_x: f32, pointer_y: f32, scroll_y: f32) {
        self.position.x += (pointer_x * self.follow - self.position.x) * self.smoothing;
        self.position.y += (pointer_y * self.follow - self.position.y) * self.smoothing;
        self.position.z = self.base_distance + (scroll_y * 0.001).sin() * self.dolly_amplitude;
    }

    /// View matrix aimed at the origin
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, Vec3::UP)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fov, aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Size of the visible world rectangle at the target's depth
    pub fn world_viewport(&self, aspect: f32) -> (f32, f32) {
        let distance = (self.position - self.target).length();
        let height = 2.0 * (self.fov / 2.0).tan() * distance;
        let width = height * aspect;

        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        (finite(width), finite(height))
    }

    /// Map a normalized pointer onto the world plane through the target
    pub fn project_pointer(&self, pointer_x: f32, pointer_y: f32, aspect: f32) -> (f32, f32) {
        let (width, height) = self.world_viewport(aspect);
        (pointer_x * width / 2.0, pointer_y * height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraController {
        CameraController::new(&CameraConfig::default())
    }

    #[test]
    fn test_initial_pose() {
        let camera = camera();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert!((camera.fov - 75f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut camera = camera();
        let mut prev_gap = (0.5 - camera.position.x).abs();

        for _ in 0..150 {
            camera.update(1.0, 0.0, 0.0);
            assert!(camera.position.x <= 0.5, "overshot to {}", camera.position.x);
            let gap = (0.5 - camera.position.x).abs();
            assert!(gap < prev_gap || gap == 0.0);
            prev_gap = gap;
        }

        assert!(prev_gap < 1e-3);
        assert!(camera.position.y.abs() < 1e-6);
    }

    #[test]
    fn test_first_step_is_five_percent() {
        let mut camera = camera();
        camera.update(1.0, -1.0, 0.0);
        assert!((camera.position.x - 0.025).abs() < 1e-6);
        assert!((camera.position.y + 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_scroll_dolly() {
        let mut camera = camera();
        camera.update(0.0, 0.0, 1570.8);
        assert!((camera.position.z - 3.5).abs() < 1e-3);

        camera.update(0.0, 0.0, 0.0);
        assert!((camera.position.z - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_world_viewport() {
        let camera = camera();
        let (w, h) = camera.world_viewport(2.0);
        let expected_h = 2.0 * (75f32.to_radians() / 2.0).tan() * 3.0;
        assert!((h - expected_h).abs() < 1e-4);
        assert!((w - 2.0 * expected_h).abs() < 1e-4);

        let (mx, my) = camera.project_pointer(1.0, -1.0, 2.0);
        assert!((mx - w / 2.0).abs() < 1e-4);
        assert!((my + h / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_aspect_projects_to_zero() {
        let camera = camera();
        let (mx, _) = camera.project_pointer(1.0, 1.0, 0.0);
        assert_eq!(mx, 0.0);

        let (mx, my) = camera.project_pointer(1.0, 1.0, f32::NAN);
        assert_eq!(mx, 0.0);
        assert!(my.is_finite());
    }
}
