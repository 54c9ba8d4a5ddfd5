use super::Vec3;

/// 4x4 matrix for transformations (column-major for WebGL)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub data: [f32; 16],
}

impl Mat4 {
    pub fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[12] = x;
        m.data[13] = y;
        m.data[14] = z;
        m
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[0] = x;
        m.data[5] = y;
        m.data[10] = z;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, c, s, 0.0,
                0.0, -s, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            data: [
                c, 0.0, -s, 0.0,
                0.0, 1.0, 0.0, 0.0,
                s, 0.0, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            data: [
                c, s, 0.0, 0.0,
                -s, c, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Intrinsic X-then-Y-then-Z Euler rotation (`Rx * Ry * Rz`)
    pub fn rotation_euler(angles: Vec3) -> Self {
        Self::rotation_x(angles.x)
            .mul(&Self::rotation_y(angles.y))
            .mul(&Self::rotation_z(angles.z))
    }

    /// Build a model matrix as `T * R * S`
    pub fn compose(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self::translation(position.x, position.y, position.z)
            .mul(&Self::rotation_euler(rotation))
            .mul(&Self::scale(scale.x, scale.y, scale.z))
    }

    /// Perspective projection matrix
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let nf = 1.0 / (near - far);
        // A collapsed canvas would otherwise divide by zero
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };

        Self {
            data: [
                f / aspect, 0.0, 0.0, 0.0,
                0.0, f, 0.0, 0.0,
                0.0, 0.0, (far + near) * nf, -1.0,
                0.0, 0.0, 2.0 * far * near * nf, 0.0,
            ],
        }
    }

    /// Look-at view matrix
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalize();
        let r = f.cross(&up).normalize();
        let u = r.cross(&f);

        Self {
            data: [
                r.x, u.x, -f.x, 0.0,
                r.y, u.y, -f.y, 0.0,
                r.z, u.z, -f.z, 0.0,
                -r.dot(&eye), -u.dot(&eye), f.dot(&eye), 1.0,
            ],
        }
    }

    /// Matrix multiplication
    pub fn mul(&self, other: &Mat4) -> Self {
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.data[row + k * 4] * other.data[k + col * 4];
                }
                result[row + col * 4] = sum;
            }
        }

        Self { data: result }
    }

    /// Transform a point (applies translation)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * p.x + self.data[4] * p.y + self.data[8] * p.z + self.data[12],
            self.data[1] * p.x + self.data[5] * p.y + self.data[9] * p.z + self.data[13],
            self.data[2] * p.x + self.data[6] * p.y + self.data[10] * p.z + self.data[14],
        )
    }

    /// Get as slice for WebGL
    pub fn as_slice(&self) -> &[f32; 16] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 0.0001
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = Mat4::rotation_y(FRAC_PI_2);
        let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_euler_order_is_x_then_y() {
        // Rx * Ry applied to +X: Ry sends it to -Z, then Rx(90) sends -Z to +Y
        let m = Mat4::rotation_euler(Vec3::new(FRAC_PI_2, FRAC_PI_2, 0.0));
        let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 1.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_compose_scales_then_rotates_then_translates() {
        let m = Mat4::compose(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, FRAC_PI_2),
            Vec3::splat(2.0),
        );
        let p = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(0.0, 3.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let m = Mat4::rotation_euler(Vec3::new(0.3, 1.7, -0.4));
        let v = Vec3::new(1.5, -2.0, 0.5);
        assert!((m.transform_point(v).length() - v.length()).abs() < 0.0001);
    }

    #[test]
    fn test_look_at_origin_maps_to_negative_z() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::UP);
        let p = view.transform_point(Vec3::ZERO);
        assert!(approx(p, Vec3::new(0.0, 0.0, -3.0)));
    }

    #[test]
    fn test_perspective_tolerates_zero_aspect() {
        let m = Mat4::perspective(1.3, 0.0, 0.1, 1000.0);
        assert!(m.data.iter().all(|v| v.is_finite()));
    }
}
