//! Tunable parameters for the backdrop
//!
//! Every constant of the animation lives here with its default, so a host
//! page can override any subset by passing a YAML document to `mount`.

use serde::Deserialize;

/// Sphere cloud parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SphereCloudConfig {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Distance from the pointer at which repulsion reaches zero
    pub repulsion_radius: f32,
    pub scatter_strength: f32,
    pub wave_amplitude: f32,
    pub color: String,
    pub point_size: f32,
    pub opacity: f32,
}

impl Default for SphereCloudConfig {
    fn default() -> Self {
        Self {
            count: 4000,
            inner_radius: 1.5,
            outer_radius: 4.0,
            repulsion_radius: 2.0,
            scatter_strength: 0.8,
            wave_amplitude: 0.3,
            color: "#a855f7".to_string(),
            point_size: 0.004,
            opacity: 0.9,
        }
    }
}

/// Spiral galaxy parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    pub count: usize,
    pub branches: usize,
    pub radius: f32,
    pub spin: f32,
    pub randomness: f32,
    /// Vertical squash applied to the y jitter
    pub flatten: f32,
    pub color: String,
    pub point_size: f32,
    pub opacity: f32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            count: 3000,
            branches: 5,
            radius: 3.5,
            spin: 1.5,
            randomness: 0.5,
            flatten: 0.3,
            color: "#8b5cf6".to_string(),
            point_size: 0.005,
            opacity: 0.7,
        }
    }
}

/// Floating shape swarm parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub count: usize,
    /// Extent of the seeding box (x, y, z)
    pub spawn_extent: [f32; 3],
    pub min_scale: f32,
    pub max_scale: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_orbit_radius: f32,
    pub max_orbit_radius: f32,
    /// Distance from the pointer at which attraction reaches zero
    pub attraction_radius: f32,
    pub color: String,
    pub emissive: String,
    pub emissive_intensity: f32,
    pub opacity: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            count: 20,
            spawn_extent: [10.0, 10.0, 5.0],
            min_scale: 0.15,
            max_scale: 0.40,
            min_speed: 0.5,
            max_speed: 1.5,
            min_orbit_radius: 0.5,
            max_orbit_radius: 1.0,
            attraction_radius: 3.0,
            color: "#ec4899".to_string(),
            emissive: "#a855f7".to_string(),
            emissive_intensity: 0.4,
            opacity: 0.2,
        }
    }
}

/// Camera parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub distance: f32,
    pub follow: f32,
    pub smoothing: f32,
    pub dolly_amplitude: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            distance: 3.0,
            follow: 0.5,
            smoothing: 0.05,
            dolly_amplitude: 0.5,
        }
    }
}

/// Visibility gate parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Fraction of the viewport height that must be scrolled past
    pub threshold: f32,
    pub transition_ms: u32,
    /// Skip simulation and drawing while hidden
    pub suspend_when_hidden: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            transition_ms: 500,
            suspend_when_hidden: false,
        }
    }
}

/// Complete backdrop configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub sphere_cloud: SphereCloudConfig,
    pub spiral: SpiralConfig,
    pub swarm: SwarmConfig,
    pub camera: CameraConfig,
    pub visibility: VisibilityConfig,
    /// Fixed RNG seed; the host picks a random one when absent
    pub seed: Option<u64>,
}

impl BackdropConfig {
    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: BackdropConfig = if yaml.trim().is_empty() {
            BackdropConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the animation cannot render sensibly
    pub fn validate(&self) -> Result<(), String> {
        let cloud = &self.sphere_cloud;
        check_positive("sphere_cloud.inner_radius", cloud.inner_radius)?;
        check_positive("sphere_cloud.outer_radius", cloud.outer_radius)?;
        if cloud.inner_radius >= cloud.outer_radius {
            return Err(format!(
                "sphere_cloud.inner_radius ({}) must be below outer_radius ({})",
                cloud.inner_radius, cloud.outer_radius
            ));
        }
        check_positive("sphere_cloud.repulsion_radius", cloud.repulsion_radius)?;
        check_non_negative("sphere_cloud.scatter_strength", cloud.scatter_strength)?;
        check_non_negative("sphere_cloud.wave_amplitude", cloud.wave_amplitude)?;

        let spiral = &self.spiral;
        if spiral.branches == 0 {
            return Err("spiral.branches must be at least 1".to_string());
        }
        check_positive("spiral.radius", spiral.radius)?;
        check_non_negative("spiral.randomness", spiral.randomness)?;

        let swarm = &self.swarm;
        for (axis, extent) in swarm.spawn_extent.iter().enumerate() {
            check_non_negative(&format!("swarm.spawn_extent[{}]", axis), *extent)?;
        }
        check_range("swarm scale", swarm.min_scale, swarm.max_scale)?;
        check_range("swarm speed", swarm.min_speed, swarm.max_speed)?;
        check_range("swarm orbit radius", swarm.min_orbit_radius, swarm.max_orbit_radius)?;
        check_positive("swarm.attraction_radius", swarm.attraction_radius)?;

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(format!("camera.fov_degrees ({}) must be in (0, 180)", camera.fov_degrees));
        }
        check_positive("camera.distance", camera.distance)?;
        if !(0.0..=1.0).contains(&camera.smoothing) {
            return Err(format!("camera.smoothing ({}) must be in [0, 1]", camera.smoothing));
        }
        check_non_negative("visibility.threshold", self.visibility.threshold)?;

        for (name, color) in [
            ("sphere_cloud.color", &cloud.color),
            ("spiral.color", &spiral.color),
            ("swarm.color", &swarm.color),
            ("swarm.emissive", &swarm.emissive),
        ] {
            if crate::math::Vec3::from_hex(color).is_none() {
                return Err(format!("{} ('{}') is not a #rrggbb color", name, color));
            }
        }

        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} ({}) must be a positive number", name, value))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} ({}) must be a non-negative number", name, value))
    }
}

fn check_range(name: &str, min: f32, max: f32) -> Result<(), String> {
    check_non_negative(name, min)?;
    check_non_negative(name, max)?;
    if min > max {
        return Err(format!("{} range is inverted ({} > {})", name, min, max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_scene() {
        let config = BackdropConfig::default();
        assert_eq!(config.sphere_cloud.count, 4000);
        assert_eq!(config.spiral.count, 3000);
        assert_eq!(config.spiral.branches, 5);
        assert_eq!(config.swarm.count, 20);
        assert!((config.visibility.threshold - 0.8).abs() < 1e-6);
        assert!(!config.visibility.suspend_when_hidden);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = BackdropConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.sphere_cloud.count, 4000);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
seed: 7
spiral:
  count: 500
visibility:
  suspend_when_hidden: true
"#;
        let config = BackdropConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.spiral.count, 500);
        assert_eq!(config.spiral.branches, 5);
        assert!(config.visibility.suspend_when_hidden);
        assert_eq!(config.swarm.count, 20);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = BackdropConfig::from_yaml("spiral: [1, 2");
        assert!(result.unwrap_err().contains("YAML parse error"));
    }

    #[test]
    fn test_rejects_inverted_shell() {
        let yaml = "sphere_cloud:\n  inner_radius: 5.0\n  outer_radius: 4.0\n";
        let err = BackdropConfig::from_yaml(yaml).unwrap_err();
        assert!(err.contains("inner_radius"));
    }

    #[test]
    fn test_rejects_zero_branches() {
        let yaml = "spiral:\n  branches: 0\n";
        assert!(BackdropConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_inverted_orbit_radius() {
        let yaml = "swarm:\n  min_orbit_radius: 2.0\n  max_orbit_radius: 1.0\n";
        let err = BackdropConfig::from_yaml(yaml).unwrap_err();
        assert!(err.contains("orbit radius"));
    }

    #[test]
    fn test_rejects_bad_color() {
        let yaml = "swarm:\n  color: purple\n";
        let err = BackdropConfig::from_yaml(yaml).unwrap_err();
        assert!(err.contains("swarm.color"));
    }
}
